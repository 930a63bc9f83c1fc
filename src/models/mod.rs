pub mod admin;
pub mod category;
pub mod order;
pub mod product;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ApiError, FieldError};

/// Decode a raw JSON body into an explicit payload struct, rejecting
/// unknown-shaped input before any integrity rule runs.
pub fn decode_payload<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value)
        .map_err(|err| ApiError::validation_errors(vec![FieldError::new("body", err.to_string())]))
}

/// Minimal shape check mirroring the storefront's address-format rule:
/// one `@`, a non-empty local part, and a dot somewhere in the domain.
pub fn is_valid_email(candidate: &str) -> bool {
    let mut parts = candidate.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty()
                && domain.len() >= 3
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && domain.contains('.')
        }
        _ => false,
    }
}

/// An image reference as the storefront sends it: either a single URL or a
/// non-empty list of URLs.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum ImageRef {
    One(String),
    Many(Vec<String>),
}

impl ImageRef {
    pub fn is_valid(&self) -> bool {
        match self {
            ImageRef::One(url) => !url.is_empty(),
            ImageRef::Many(urls) => !urls.is_empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn image_ref_accepts_string_or_array() {
        let single: ImageRef = serde_json::from_value(json!("https://img/a.jpg")).unwrap();
        assert_eq!(single, ImageRef::One("https://img/a.jpg".to_string()));
        assert!(single.is_valid());

        let many: ImageRef = serde_json::from_value(json!(["https://img/a.jpg", "https://img/b.jpg"])).unwrap();
        assert!(many.is_valid());

        assert!(!ImageRef::One(String::new()).is_valid());
        assert!(!ImageRef::Many(vec![]).is_valid());

        assert!(serde_json::from_value::<ImageRef>(json!(42)).is_err());
    }

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("admin@startup.com"));
        assert!(is_valid_email("a.b-c@mail.example.org"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@nodot"));
        assert!(!is_valid_email("user@x.y@z.com"));
    }
}
