use std::fmt;

use anyhow::Context;

/// Realm announced in the `WWW-Authenticate` challenge.
pub const DEFAULT_REALM: &str = "Realm";

#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub require_auth: bool,
    /// Demo-only insecure default: CSRF protection stays off.
    pub csrf_protection: bool,
    pub security_headers: bool,
    pub realm: String,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            require_auth: true,
            csrf_protection: false,
            security_headers: true,
            realm: DEFAULT_REALM.into(),
        }
    }
}

impl SecurityConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        // Basic auth keeps no session, so there is nothing a CSRF token could be bound to.
        if self.csrf_protection {
            anyhow::bail!("csrf protection is not supported by a stateless basic-auth gate");
        }
        if self.realm.contains('"') {
            anyhow::bail!("realm must not contain '\"'");
        }
        Ok(())
    }
}

/// The single user, fixed at build time.
#[derive(Clone)]
pub struct UserConfig {
    pub username: String,
    pub password: String,
    pub role: String,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            username: "user".into(),
            password: "password".into(),
            role: "USER".into(),
        }
    }
}

impl fmt::Debug for UserConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserConfig")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("role", &self.role)
            .finish()
    }
}

/// Argon2id cost parameters used when the credential is created.
#[derive(Debug, Clone, Copy)]
pub struct HashingConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            memory_kib: argon2::Params::DEFAULT_M_COST,
            iterations: argon2::Params::DEFAULT_T_COST,
            parallelism: argon2::Params::DEFAULT_P_COST,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub security: SecurityConfig,
    pub user: UserConfig,
    pub hashing: HashingConfig,
}

impl AppConfig {
    /// Only the listen address comes from the environment; credentials never do.
    pub fn from_env() -> anyhow::Result<Self> {
        let host = std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port = parse_port(std::env::var("APP_PORT").ok())?;
        let config = Self {
            host,
            port,
            security: SecurityConfig::default(),
            user: UserConfig::default(),
            hashing: HashingConfig::default(),
        };
        config.security.validate()?;
        Ok(config)
    }

    pub fn bind_addr(&self) -> anyhow::Result<std::net::SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}

fn parse_port(raw: Option<String>) -> anyhow::Result<u16> {
    match raw {
        Some(v) => v
            .trim()
            .parse::<u16>()
            .with_context(|| format!("invalid APP_PORT {:?}", v)),
        None => Ok(8080),
    }
}
