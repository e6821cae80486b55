use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// JSON body returned with a rejected request.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

/// Every way a request can fail the gate. All of them end in a 401 challenge.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("missing Authorization header")]
    MissingCredentials,
    #[error("authorization header must use Basic scheme")]
    UnsupportedScheme,
    #[error("empty basic authentication token")]
    EmptyToken,
    #[error("failed to decode basic authentication token")]
    InvalidEncoding,
    #[error("invalid basic authentication token")]
    MissingSeparator,
    #[error("bad credentials")]
    BadCredentials,
}

impl AuthError {
    /// 401 response carrying a `WWW-Authenticate: Basic realm="..."` challenge.
    pub fn into_challenge(self, realm: &str) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: "UNAUTHORIZED",
                message: self.to_string(),
            },
        };
        let mut res = (StatusCode::UNAUTHORIZED, Json(body)).into_response();
        let challenge = HeaderValue::from_str(&format!("Basic realm=\"{}\"", realm))
            .unwrap_or_else(|_| HeaderValue::from_static("Basic"));
        res.headers_mut().insert(header::WWW_AUTHENTICATE, challenge);
        res
    }
}
