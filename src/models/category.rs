use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ApiError, FieldError};

pub const NAME_MAX_LEN: usize = 50;
pub const DESCRIPTION_MAX_LEN: usize = 200;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    pub fn new(input: NewCategory) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: input.name,
            description: input.description,
            image: input.image,
            created_at: now,
            updated_at: now,
        }
    }

    /// Full replacement of the mutable fields, as the dashboard's edit
    /// form submits the complete document.
    pub fn apply(&mut self, input: NewCategory) {
        self.name = input.name;
        self.description = input.description;
        self.image = input.image;
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Deserialize)]
pub struct CategoryPayload {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
}

/// Validated, trimmed category fields ready to persist.
#[derive(Debug)]
pub struct NewCategory {
    pub name: String,
    pub description: Option<String>,
    pub image: Option<String>,
}

impl CategoryPayload {
    pub fn validate(self) -> Result<NewCategory, ApiError> {
        let mut errors = Vec::new();

        let name = self.name.unwrap_or_default().trim().to_string();
        if name.is_empty() {
            errors.push(FieldError::new("name", "Category name is required"));
        } else if name.len() > NAME_MAX_LEN {
            errors.push(FieldError::new("name", "Category name cannot exceed 50 characters"));
        }

        let description = self
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        if description.as_ref().is_some_and(|d| d.len() > DESCRIPTION_MAX_LEN) {
            errors.push(FieldError::new("description", "Description cannot exceed 200 characters"));
        }

        if !errors.is_empty() {
            return Err(ApiError::validation_errors(errors));
        }

        Ok(NewCategory { name, description, image: self.image })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_trims_and_requires_name() {
        let input = CategoryPayload {
            name: Some("  Rings  ".to_string()),
            description: Some(" For special moments ".to_string()),
            image: None,
        }
        .validate()
        .unwrap();
        assert_eq!(input.name, "Rings");
        assert_eq!(input.description.as_deref(), Some("For special moments"));

        let err = CategoryPayload { name: Some("   ".to_string()), description: None, image: None }
            .validate()
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn payload_enforces_length_limits() {
        let err = CategoryPayload {
            name: Some("x".repeat(NAME_MAX_LEN + 1)),
            description: None,
            image: None,
        }
        .validate()
        .unwrap_err();
        match err {
            ApiError::ValidationFailed { errors, .. } => assert_eq!(errors[0].field, "name"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
