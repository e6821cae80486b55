use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::{debug, error};

use super::basic::BasicCredentials;
use crate::{error::AuthError, state::AppState};

/// Gate in front of every route: forwards the request only when the Basic
/// credentials match the credential store. Nothing is remembered between requests.
pub async fn require_basic_auth(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if !state.security.require_auth {
        return next.run(request).await;
    }

    let outcome = authenticate(&state, request.headers()).await;
    match outcome {
        Ok(username) => {
            debug!(%username, "request authenticated");
            next.run(request).await
        }
        Err(e) => {
            debug!(reason = %e, "authentication failed");
            e.into_challenge(&state.security.realm)
        }
    }
}

async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<String, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;
    let creds = BasicCredentials::from_header(value)?;

    // Argon2 is CPU-bound; keep it off the async workers.
    let store = Arc::clone(&state.credentials);
    let BasicCredentials { username, password } = creds;
    let verified = tokio::task::spawn_blocking(move || {
        store.verify(&username, &password).then_some(username)
    })
    .await
    .map_err(|e| {
        error!(error = %e, "credential verification task failed");
        AuthError::BadCredentials
    })?;

    verified.ok_or(AuthError::BadCredentials)
}
