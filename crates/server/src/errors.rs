use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// JSON error response with an explicit status: `{"message": ..., "error": ...}`.
/// The `error` member is present only when an underlying failure description
/// is worth surfacing to the caller.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub message: String,
    pub detail: Option<String>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, message: impl Into<String>, detail: Option<String>) -> Self {
        Self { status, message: message.into(), detail }
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        let mut body = json!({ "message": self.message });
        if let Some(detail) = self.detail {
            body["error"] = json!(detail);
        }
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_is_omitted_when_absent() {
        let err = JsonApiError::new(StatusCode::NOT_FOUND, "Store not found", None);
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert!(err.detail.is_none());
    }
}
