use std::fmt;

use base64ct::{Base64, Base64Unpadded, Encoding};

use crate::error::AuthError;

/// `username:password` pair carried by a Basic `Authorization` header.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for BasicCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicCredentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl BasicCredentials {
    /// Parse an `Authorization` header value such as `Basic dXNlcjpwYXNzd29yZA==`.
    pub fn from_header(value: &str) -> Result<Self, AuthError> {
        let value = value.trim();
        let (scheme, token) = match value.split_once(' ') {
            Some((scheme, token)) => (scheme, token.trim()),
            None => (value, ""),
        };
        if !scheme.eq_ignore_ascii_case("basic") {
            return Err(AuthError::UnsupportedScheme);
        }
        if token.is_empty() {
            return Err(AuthError::EmptyToken);
        }

        let decoded = Base64::decode_vec(token)
            .or_else(|_| Base64Unpadded::decode_vec(token))
            .map_err(|_| AuthError::InvalidEncoding)?;
        let decoded = String::from_utf8(decoded).map_err(|_| AuthError::InvalidEncoding)?;

        // Only the first colon separates; passwords may contain more.
        let (username, password) = decoded
            .split_once(':')
            .ok_or(AuthError::MissingSeparator)?;
        Ok(Self {
            username: username.to_string(),
            password: password.to_string(),
        })
    }
}

#[cfg(test)]
pub(crate) fn basic_header(username: &str, password: &str) -> String {
    format!(
        "Basic {}",
        Base64::encode_string(format!("{}:{}", username, password).as_bytes())
    )
}
