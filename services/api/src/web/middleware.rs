//! services/api/src/web/middleware.rs
//!
//! Authentication middleware for protecting routes.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use mindmatters_core::ports::PortError;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::{
    error::ApiError,
    web::state::{AppState, AuthUser},
};

/// Middleware that validates the bearer token and resolves the caller.
///
/// If valid, inserts an `AuthUser` into request extensions for handlers to use.
/// If the header is missing, the token does not verify, or its user no longer
/// exists, returns 401 Unauthorized and the handler never runs.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    // 1. Extract the bearer token
    let Some(token) = bearer_token(req.headers()) else {
        debug!("Rejected request without a bearer token");
        return Err(ApiError::Unauthorized);
    };

    // 2. Verify its signature and expiry
    let user_id = state.tokens.verify(token).map_err(|e| {
        warn!("Rejected bearer token: {}", e);
        ApiError::Unauthorized
    })?;

    // 3. Resolve the identity it claims
    let user = state.db.get_user_by_id(user_id).await.map_err(|e| match e {
        PortError::NotFound(_) => {
            warn!("Rejected token for unknown user {}", user_id);
            ApiError::Unauthorized
        }
        other => other.into(),
    })?;

    // 4. Attach it and continue to the handler
    req.extensions_mut().insert(AuthUser { id: user.id });
    Ok(next.run(req).await)
}

/// Returns the token of an `Authorization: Bearer <token>` header.
/// The scheme is matched case-insensitively.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn extracts_bearer_token() {
        assert_eq!(bearer_token(&headers("Bearer abc.def")), Some("abc.def"));
        assert_eq!(bearer_token(&headers("bearer abc.def")), Some("abc.def"));
    }

    #[test]
    fn rejects_other_shapes() {
        assert_eq!(bearer_token(&HeaderMap::new()), None);
        assert_eq!(bearer_token(&headers("Basic dXNlcjpwYXNz")), None);
        assert_eq!(bearer_token(&headers("Bearer")), None);
        assert_eq!(bearer_token(&headers("Bearer   ")), None);
        assert_eq!(bearer_token(&headers("abc.def")), None);
    }
}
