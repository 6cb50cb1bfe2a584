//! Access and refresh tokens.
//!
//! Access tokens are HS256 JWTs carrying [`Claims`], issued by `gymplan`.
//! Refresh tokens are opaque random strings; the server keeps only their
//! SHA-256 hex digest.

use chrono::{DateTime, Duration, Utc};
use gymplan_core::types::{DbId, Timestamp};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::config::env_or;

/// `iss` of every access token this server issues.
pub const ISSUER: &str = "gymplan";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// User id.
    pub sub: DbId,
    pub username: String,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC secret for signing and verifying access tokens.
    pub secret: String,
    pub access_token_expiry_mins: i64,
    pub refresh_token_expiry_days: i64,
}

impl JwtConfig {
    /// | Env Var                    | Default    |
    /// |----------------------------|------------|
    /// | `JWT_SECRET`               | (required) |
    /// | `JWT_ACCESS_EXPIRY_MINS`   | `15`       |
    /// | `JWT_REFRESH_EXPIRY_DAYS`  | `7`        |
    ///
    /// # Panics
    ///
    /// If `JWT_SECRET` is unset or empty, or an expiry is not an integer.
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET").unwrap_or_default();
        assert!(!secret.is_empty(), "JWT_SECRET must be set and non-empty");

        Self {
            secret,
            access_token_expiry_mins: env_or("JWT_ACCESS_EXPIRY_MINS", 15),
            refresh_token_expiry_days: env_or("JWT_REFRESH_EXPIRY_DAYS", 7),
        }
    }

    /// Access token lifetime in seconds, as reported in `expires_in`.
    pub fn access_ttl_secs(&self) -> i64 {
        self.access_token_expiry_mins * 60
    }

    /// Expiry of a refresh token issued at `now`.
    pub fn refresh_expires_at(&self, now: DateTime<Utc>) -> Timestamp {
        now + Duration::days(self.refresh_token_expiry_days)
    }

    /// Sign an access token for `user_id`.
    pub fn issue_access_token(
        &self,
        user_id: DbId,
        username: &str,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id,
            username: username.to_string(),
            iss: ISSUER.to_string(),
            iat: now,
            exp: now + self.access_ttl_secs(),
            jti: Uuid::new_v4().to_string(),
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
    }

    /// Check signature, expiry and issuer; return the claims.
    pub fn verify_access_token(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[ISSUER]);
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
    }
}

/// A freshly minted refresh token. `plaintext` goes to the client, `hash`
/// to the database.
#[derive(Debug, Clone)]
pub struct RefreshToken {
    pub plaintext: String,
    pub hash: String,
}

impl RefreshToken {
    pub fn generate() -> Self {
        let plaintext = format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple());
        let hash = hash_refresh_token(&plaintext);
        Self { plaintext, hash }
    }
}

/// SHA-256 hex digest of a refresh token.
pub fn hash_refresh_token(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> JwtConfig {
        JwtConfig {
            secret: "unit-test-secret-long-enough-for-hs256".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        }
    }

    fn sign(claims: &Claims, secret: &str) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn issued_token_verifies() {
        let config = config();
        let token = config.issue_access_token(42, "sam").unwrap();

        let claims = config.verify_access_token(&token).unwrap();
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.username, "sam");
        assert_eq!(claims.iss, ISSUER);
        assert_eq!(claims.exp - claims.iat, config.access_ttl_secs());
    }

    #[test]
    fn expired_token_is_rejected() {
        let config = config();
        let now = Utc::now().timestamp();
        // Well past the default 60-second leeway.
        let claims = Claims {
            sub: 1,
            username: "sam".into(),
            iss: ISSUER.into(),
            iat: now - 600,
            exp: now - 300,
            jti: "x".into(),
        };
        assert!(config.verify_access_token(&sign(&claims, &config.secret)).is_err());
    }

    #[test]
    fn foreign_issuer_is_rejected() {
        let config = config();
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: 1,
            username: "sam".into(),
            iss: "someone-else".into(),
            iat: now,
            exp: now + 600,
            jti: "x".into(),
        };
        assert!(config.verify_access_token(&sign(&claims, &config.secret)).is_err());
    }

    #[test]
    fn other_secret_is_rejected() {
        let token = config().issue_access_token(1, "sam").unwrap();
        let other = JwtConfig {
            secret: "a-different-secret".into(),
            ..config()
        };
        assert!(other.verify_access_token(&token).is_err());
    }

    #[test]
    fn refresh_tokens_are_unique_and_hash_stably() {
        let a = RefreshToken::generate();
        let b = RefreshToken::generate();

        assert_ne!(a.plaintext, b.plaintext);
        assert_eq!(hash_refresh_token(&a.plaintext), a.hash);
        assert_eq!(a.hash.len(), 64);
    }

    #[test]
    fn refresh_expiry_uses_configured_days() {
        let now = Utc::now();
        assert_eq!(config().refresh_expires_at(now) - now, Duration::days(7));
    }
}
