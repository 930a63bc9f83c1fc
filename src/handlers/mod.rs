pub mod admin;
pub mod categories;
pub mod orders;
pub mod products;

use axum::Json;
use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::decode_payload;

/// Decode the request body into an explicit payload struct. `None` means
/// axum could not produce a JSON value at all (bad syntax, wrong
/// content type); both cases are boundary validation failures, never
/// raw framework rejections.
pub(crate) fn json_body<T: DeserializeOwned>(body: Option<Json<Value>>) -> Result<T, ApiError> {
    let Json(value) = body.ok_or_else(|| {
        ApiError::validation_failed("Request body must be valid JSON")
    })?;
    decode_payload(value)
}

/// Path and query identifiers are UUIDs; anything else is rejected
/// before touching the store.
pub(crate) fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw.trim()).map_err(|_| ApiError::validation_failed("Invalid id format"))
}
