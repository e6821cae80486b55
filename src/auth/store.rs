use std::fmt;

use subtle::ConstantTimeEq;
use tracing::{debug, error};

use super::password::{hash_password, hasher, verify_password};
use crate::config::{HashingConfig, UserConfig};

/// The one user known to the service. Built once at startup, never mutated.
pub struct UserRecord {
    pub username: String,
    pub password_hash: String, // Argon2id PHC string, salt embedded
    pub role: String,
}

impl UserRecord {
    /// Granted-authority form of the role, e.g. `ROLE_USER`.
    pub fn authority(&self) -> String {
        format!("ROLE_{}", self.role)
    }
}

impl fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserRecord")
            .field("username", &self.username)
            .field("password_hash", &"[REDACTED]")
            .field("role", &self.role)
            .finish()
    }
}

/// Read-only, single-entry credential store.
#[derive(Debug)]
pub struct CredentialStore {
    record: UserRecord,
}

impl CredentialStore {
    pub fn new(user: &UserConfig, hashing: &HashingConfig) -> anyhow::Result<Self> {
        if user.username.is_empty() {
            anyhow::bail!("username must not be empty");
        }
        let argon2 = hasher(hashing)?;
        let password_hash = hash_password(&argon2, &user.password)?;
        let record = UserRecord {
            username: user.username.clone(),
            password_hash,
            role: user.role.clone(),
        };
        debug!(username = %record.username, authority = %record.authority(), "credential store ready");
        Ok(Self { record })
    }

    pub fn record(&self) -> &UserRecord {
        &self.record
    }

    /// Usernames match case-insensitively (Unicode lowercase). The hash check always
    /// runs so a wrong username costs the same as a wrong password.
    pub fn verify(&self, username: &str, password: &str) -> bool {
        let name_ok = constant_time_eq(
            username.to_lowercase().as_bytes(),
            self.record.username.to_lowercase().as_bytes(),
        );
        let password_ok = match verify_password(password, &self.record.password_hash) {
            Ok(ok) => ok,
            Err(e) => {
                error!(error = %e, "stored password hash unusable");
                false
            }
        };
        name_ok & password_ok
    }
}

fn constant_time_eq(provided: &[u8], expected: &[u8]) -> bool {
    if provided.len() != expected.len() {
        let _ = expected.ct_eq(expected);
        return false;
    }
    provided.ct_eq(expected).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::cheap_hashing;

    fn store() -> CredentialStore {
        CredentialStore::new(&UserConfig::default(), &cheap_hashing()).expect("store builds")
    }

    #[test]
    fn accepts_the_configured_credentials() {
        assert!(store().verify("user", "password"));
    }

    #[test]
    fn rejects_wrong_password() {
        assert!(!store().verify("user", "wrongpassword"));
    }

    #[test]
    fn rejects_unknown_user() {
        assert!(!store().verify("otheruser", "password"));
        assert!(!store().verify("", "password"));
    }

    #[test]
    fn username_match_ignores_ascii_case() {
        assert!(store().verify("USER", "password"));
        assert!(!store().verify("user", "PASSWORD"));
    }

    #[test]
    fn username_match_folds_non_ascii_case() {
        let user = UserConfig {
            username: "jürgen".into(),
            ..UserConfig::default()
        };
        let store = CredentialStore::new(&user, &cheap_hashing()).unwrap();
        assert!(store.verify("JÜRGEN", "password"));
        assert!(store.verify("Jürgen", "password"));
        assert!(!store.verify("JURGEN", "password"));
    }

    #[test]
    fn rejects_every_single_character_variation() {
        let store = store();
        let plain = "password";
        let chars: Vec<char> = plain.chars().collect();

        for i in 0..chars.len() {
            let mut replaced = chars.clone();
            replaced[i] = if chars[i] == 'x' { 'y' } else { 'x' };
            let replaced: String = replaced.into_iter().collect();
            assert!(!store.verify("user", &replaced), "accepted {replaced}");

            let mut removed = chars.clone();
            removed.remove(i);
            let removed: String = removed.into_iter().collect();
            assert!(!store.verify("user", &removed), "accepted {removed}");
        }
        assert!(!store.verify("user", "password!"));
        assert!(!store.verify("user", "!password"));
        assert!(store.verify("user", plain));
    }

    #[test]
    fn record_keeps_no_plaintext() {
        let store = store();
        let record = store.record();
        assert_eq!(record.username, "user");
        assert_eq!(record.role, "USER");
        assert_eq!(record.authority(), "ROLE_USER");
        assert_ne!(record.password_hash, "password");
        assert!(record.password_hash.starts_with("$argon2id$"));
    }

    #[test]
    fn debug_redacts_hash() {
        let store = store();
        let rendered = format!("{:?}", store);
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains(&store.record().password_hash));
    }

    #[test]
    fn empty_username_is_rejected() {
        let user = UserConfig {
            username: String::new(),
            ..UserConfig::default()
        };
        assert!(CredentialStore::new(&user, &cheap_hashing()).is_err());
    }

    #[test]
    fn corrupt_hash_fails_closed() {
        let mut store = store();
        store.record.password_hash = "not-a-phc-string".into();
        assert!(!store.verify("user", "password"));
    }

    #[test]
    fn constant_time_eq_handles_length_mismatch() {
        assert!(constant_time_eq(b"user", b"user"));
        assert!(!constant_time_eq(b"use", b"user"));
        assert!(!constant_time_eq(b"", b"user"));
    }
}
