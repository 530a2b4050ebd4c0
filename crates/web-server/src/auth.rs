//! Bearer-token authentication for the protected API routes.

use crate::error::AppError;
use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// The configured API key, shared by every request.
#[derive(Debug, Clone, Default)]
pub struct ApiKeyAuth {
    api_key: Option<Arc<str>>,
}

impl ApiKeyAuth {
    pub fn new(api_key: Option<&str>) -> Self {
        Self {
            api_key: api_key.filter(|key| !key.is_empty()).map(Arc::from),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Checks the `Authorization: Bearer <key>` header.
    ///
    /// The header is validated before the configuration, so a client without
    /// credentials gets a 401 even on a misconfigured server.
    pub fn authorize(&self, headers: &HeaderMap) -> Result<(), AppError> {
        let value = headers
            .get(header::AUTHORIZATION)
            .ok_or(AppError::MissingCredentials)?
            .to_str()
            .map_err(|_| AppError::MalformedAuthorization)?;

        let token = match value.split(' ').collect::<Vec<_>>().as_slice() {
            ["Bearer", token] => *token,
            _ => return Err(AppError::MalformedAuthorization),
        };

        let expected = self.api_key.as_deref().ok_or(AppError::Misconfigured)?;
        if !constant_time_compare(expected, token) {
            tracing::warn!("Rejected request with an invalid API key.");
            return Err(AppError::InvalidApiKey);
        }
        Ok(())
    }
}

/// Middleware guarding every route it is layered on.
pub async fn require_api_key(
    State(auth): State<ApiKeyAuth>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    auth.authorize(request.headers())?;
    Ok(next.run(request).await)
}

/// Constant-time string comparison to prevent timing attacks
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }

    result == 0
}
