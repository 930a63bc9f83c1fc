use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config;

/// The authenticated identity associated with a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: Uuid,
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub exp: i64,
    pub iat: i64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    /// Malformed, tampered and expired tokens all collapse into this kind
    /// so the rejection never reveals which check failed.
    #[error("invalid or expired token")]
    InvalidToken,

    #[error("token signing secret is not configured")]
    MissingSecret,

    #[error("failed to sign token")]
    Signing,
}

/// Issues and verifies the signed, time-limited identity tokens that guard
/// admin-only mutations. Stateless: validity is signature + expiry only,
/// with no revocation list.
#[derive(Clone)]
pub struct TokenService {
    secret: String,
    ttl_days: i64,
}

impl TokenService {
    pub fn new(secret: impl Into<String>, ttl_days: i64) -> Self {
        Self { secret: secret.into(), ttl_days }
    }

    pub fn from_config() -> Self {
        let security = &config::config().security;
        Self::new(security.jwt_secret.clone(), security.token_ttl_days)
    }

    /// Produce a signed token embedding the principal and an expiration
    /// instant `ttl_days` from now.
    pub fn issue(&self, principal: &Principal) -> Result<String, AuthError> {
        if self.secret.is_empty() {
            return Err(AuthError::MissingSecret);
        }

        let now = Utc::now();
        let claims = Claims {
            sub: principal.id,
            email: principal.email.clone(),
            exp: (now + Duration::days(self.ttl_days)).timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::default(), &claims, &EncodingKey::from_secret(self.secret.as_bytes()))
            .map_err(|_| AuthError::Signing)
    }

    /// Check signature and expiry, recovering the embedded principal.
    pub fn verify(&self, token: &str) -> Result<Principal, AuthError> {
        if self.secret.is_empty() {
            return Err(AuthError::MissingSecret);
        }

        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|_| AuthError::InvalidToken)?;

        Ok(Principal { id: data.claims.sub, email: data.claims.email })
    }
}
