pub mod basic;
pub mod middleware;
pub mod password;
pub mod store;

pub use middleware::require_basic_auth;
pub use store::CredentialStore;
