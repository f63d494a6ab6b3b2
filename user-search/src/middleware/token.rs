//! Static access token authentication
//!
//! Every request reaching this middleware must carry an `AccessToken`
//! header. When a token is configured the header must match it exactly.
//! Probe routes are mounted outside it.

use axum::{
    body::Body,
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::{config::AuthConfig, error::Error};

/// Header carrying the access token
pub const ACCESS_TOKEN_HEADER: &str = "AccessToken";

/// Access token middleware state
#[derive(Clone, Debug, Default)]
pub struct AccessTokenAuth {
    expected: Option<Arc<str>>,
}

impl AccessTokenAuth {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            expected: config.access_token.as_deref().map(Arc::from),
        }
    }

    /// Check the token carried by `headers`
    pub fn authorize(&self, headers: &HeaderMap) -> Result<(), Error> {
        let token = extract_token(headers).ok_or(Error::Unauthorized)?;

        match self.expected.as_deref() {
            Some(expected) if expected != token => Err(Error::Unauthorized),
            _ => Ok(()),
        }
    }

    /// Middleware function rejecting unauthenticated requests with 401
    pub async fn middleware(
        State(auth): State<Self>,
        request: Request<Body>,
        next: Next,
    ) -> Result<Response, Error> {
        if let Err(e) = auth.authorize(request.headers()) {
            tracing::warn!(path = %request.uri().path(), "Rejected request with bad access token");
            return Err(e);
        }

        Ok(next.run(request).await)
    }
}

/// Extract a non-empty token from the `AccessToken` header
pub fn extract_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(ACCESS_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|t| !t.is_empty())
}
