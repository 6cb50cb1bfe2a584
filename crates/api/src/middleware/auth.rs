//! Bearer-token authentication for handlers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use gymplan_core::error::CoreError;
use gymplan_core::types::DbId;

use crate::error::AppError;
use crate::state::AppState;

/// The caller, taken from a valid `Authorization: Bearer <jwt>` header.
///
/// Adding it as a handler argument makes the route require authentication;
/// a missing, malformed or expired token is answered with 401 before the
/// handler runs.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DbId,
    pub username: String,
}

fn unauthenticated(message: &str) -> AppError {
    AppError::Core(CoreError::Unauthenticated(message.to_string()))
}

/// The token part of a bearer `Authorization` header. The scheme is matched
/// case-insensitively.
fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let value = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| unauthenticated("Authentication credentials were not provided."))?;

    match value.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() => {
            Ok(token.trim())
        }
        _ => Err(unauthenticated(
            "Invalid Authorization header. Expected: Bearer <token>",
        )),
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?;
        let claims = state
            .config
            .jwt
            .verify_access_token(token)
            .map_err(|e| {
                tracing::debug!(error = %e, "Rejected access token");
                unauthenticated("Invalid or expired token")
            })?;

        Ok(AuthUser {
            user_id: claims.sub,
            username: claims.username,
        })
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use axum::http::HeaderValue;

    use super::*;

    fn headers(value: &str) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        map
    }

    #[test]
    fn extracts_bearer_token() {
        assert_eq!(bearer_token(&headers("Bearer abc.def")).unwrap(), "abc.def");
        assert_eq!(bearer_token(&headers("bearer abc")).unwrap(), "abc");
    }

    #[test]
    fn rejects_missing_or_foreign_scheme() {
        assert_matches!(
            bearer_token(&HeaderMap::new()),
            Err(AppError::Core(CoreError::Unauthenticated(_)))
        );
        assert!(bearer_token(&headers("Basic dXNlcjpwdw==")).is_err());
        assert!(bearer_token(&headers("Bearer ")).is_err());
    }
}
