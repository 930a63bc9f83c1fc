use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::{json, Map, Value};

/// Wrapper for API responses that renders the success envelope
/// `{success, message?, count?, data?}`.
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    data: Option<T>,
    message: Option<String>,
    count: Option<usize>,
    status_code: StatusCode,
}

impl<T: Serialize> ApiResponse<T> {
    /// 200 OK with data
    pub fn success(data: T) -> Self {
        Self { data: Some(data), message: None, count: None, status_code: StatusCode::OK }
    }

    /// 201 Created with data
    pub fn created(data: T) -> Self {
        Self { data: Some(data), message: None, count: None, status_code: StatusCode::CREATED }
    }

    /// 200 OK with a message and no data (delete endpoints)
    pub fn message_only(message: impl Into<String>) -> Self {
        Self {
            data: None,
            message: Some(message.into()),
            count: None,
            status_code: StatusCode::OK,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// List endpoints report the number of entries alongside the data.
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let data = match self.data.as_ref().map(serde_json::to_value).transpose() {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("failed to serialize response data: {}", e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "success": false,
                        "message": "An unexpected error occurred",
                    })),
                )
                    .into_response();
            }
        };

        let mut envelope = Map::new();
        envelope.insert("success".to_string(), Value::Bool(true));
        if let Some(message) = self.message {
            envelope.insert("message".to_string(), Value::String(message));
        }
        if let Some(count) = self.count {
            envelope.insert("count".to_string(), Value::from(count));
        }
        if let Some(data) = data {
            envelope.insert("data".to_string(), data);
        }

        (self.status_code, Json(Value::Object(envelope))).into_response()
    }
}

/// Handler result: success envelope or structured rejection.
pub type ApiResult<T> = Result<ApiResponse<T>, crate::error::ApiError>;
