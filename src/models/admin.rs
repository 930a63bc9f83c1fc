use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::Principal;
use crate::error::{ApiError, FieldError};
use crate::models::is_valid_email;

/// The single administrative account. Created at seed time, never mutated
/// or deleted through the API. The stored hash lives under the `password`
/// doc key and must never be serialized into a response; handlers build
/// explicit views instead of returning this struct.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Admin {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(rename = "password")]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Admin {
    pub fn create(
        name: impl Into<String>,
        email: impl Into<String>,
        password: &str,
    ) -> Result<Self, bcrypt::BcryptError> {
        let now = Utc::now();
        let email: String = email.into();
        Ok(Self {
            id: Uuid::new_v4(),
            name: name.into(),
            email: email.trim().to_lowercase(),
            password_hash: bcrypt::hash(password, bcrypt::DEFAULT_COST)?,
            created_at: now,
            updated_at: now,
        })
    }

    /// A malformed stored hash counts as a failed match.
    pub fn verify_password(&self, candidate: &str) -> bool {
        bcrypt::verify(candidate, &self.password_hash).unwrap_or(false)
    }

    pub fn principal(&self) -> Principal {
        Principal { id: self.id, email: self.email.clone() }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginPayload {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

impl LoginPayload {
    pub fn validate(self) -> Result<LoginInput, ApiError> {
        let mut errors = Vec::new();

        let email = self.email.unwrap_or_default().trim().to_lowercase();
        if email.is_empty() {
            errors.push(FieldError::new("email", "Email is required"));
        } else if !is_valid_email(&email) {
            errors.push(FieldError::new("email", "Invalid email format"));
        }

        let password = self.password.unwrap_or_default();
        if password.is_empty() {
            errors.push(FieldError::new("password", "Password is required"));
        }

        if !errors.is_empty() {
            return Err(ApiError::validation_errors(errors));
        }

        Ok(LoginInput { email, password })
    }
}
