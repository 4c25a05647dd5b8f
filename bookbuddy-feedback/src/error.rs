//! HTTP mapping for intake rejections

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::intake::Rejection;

impl Rejection {
    pub fn status(&self) -> StatusCode {
        match self {
            Rejection::InvalidData | Rejection::InvalidType => StatusCode::BAD_REQUEST,
            Rejection::Unauthorized => StatusCode::FORBIDDEN,
            Rejection::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Rejection::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.to_string(),
        }));

        (self.status(), body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, Rejection>;
