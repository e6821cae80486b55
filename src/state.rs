use crate::auth::CredentialStore;
use crate::config::{AppConfig, SecurityConfig};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub credentials: Arc<CredentialStore>,
    pub security: Arc<SecurityConfig>,
}

impl AppState {
    pub fn init(config: &AppConfig) -> anyhow::Result<Self> {
        config.security.validate()?;
        let credentials = Arc::new(CredentialStore::new(&config.user, &config.hashing)?);
        Ok(Self {
            credentials,
            security: Arc::new(config.security.clone()),
        })
    }

    #[cfg(test)]
    pub fn for_tests(security: SecurityConfig) -> Self {
        use crate::config::UserConfig;

        let credentials = CredentialStore::new(
            &UserConfig::default(),
            &crate::auth::password::cheap_hashing(),
        )
        .expect("test credential store");
        Self {
            credentials: Arc::new(credentials),
            security: Arc::new(security),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{HashingConfig, UserConfig};

    fn config(security: SecurityConfig) -> AppConfig {
        AppConfig {
            host: "127.0.0.1".into(),
            port: 0,
            security,
            user: UserConfig::default(),
            hashing: crate::auth::password::cheap_hashing(),
        }
    }

    #[test]
    fn init_builds_store_from_config() {
        let state = AppState::init(&config(SecurityConfig::default())).unwrap();
        assert!(state.credentials.verify("user", "password"));
        assert!(state.security.require_auth);
    }

    #[test]
    fn init_refuses_csrf_protection() {
        let security = SecurityConfig {
            csrf_protection: true,
            ..SecurityConfig::default()
        };
        assert!(AppState::init(&config(security)).is_err());
    }

    #[test]
    fn init_surfaces_bad_hashing_params() {
        let mut cfg = config(SecurityConfig::default());
        cfg.hashing = HashingConfig {
            memory_kib: 0,
            iterations: 0,
            parallelism: 0,
        };
        assert!(AppState::init(&cfg).is_err());
    }

    #[test]
    fn clones_share_the_same_store() {
        let state = AppState::for_tests(SecurityConfig::default());
        let clone = state.clone();
        assert!(Arc::ptr_eq(&state.credentials, &clone.credentials));
    }
}
