use axum::{routing::get, Router};

use crate::state::AppState;

pub const SUCCESS_MESSAGE: &str = "Erfolgreich authentifiziert!";

pub fn test_routes() -> Router<AppState> {
    Router::new().route("/test", get(test_endpoint))
}

/// Only reachable once the gate has accepted the request.
pub async fn test_endpoint() -> &'static str {
    SUCCESS_MESSAGE
}
