use crate::chat::error::ChatError;
use crate::chat::error::ValidationError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::error;

/// Error body of every failed REST request: `{"error": "..."}`.
#[derive(Debug, Serialize)]
pub struct ApiErrorResponse {
	#[serde(skip)]
	status: StatusCode,
	error: String,
}

impl ApiErrorResponse {
	pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
		Self {
			status,
			error: error.into(),
		}
	}

	pub fn bad_request(error: impl Into<String>) -> Self {
		Self::new(StatusCode::BAD_REQUEST, error)
	}

	pub fn internal_server_error() -> Self {
		Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
	}
}

impl IntoResponse for ApiErrorResponse {
	fn into_response(self) -> Response {
		(self.status, Json(self)).into_response()
	}
}

impl From<ValidationError> for ApiErrorResponse {
	fn from(error: ValidationError) -> Self {
		Self::bad_request(error.to_string())
	}
}

impl From<ChatError> for ApiErrorResponse {
	fn from(error: ChatError) -> Self {
		match error {
			ChatError::Validation(error) => error.into(),
			ChatError::Persistence(error) => {
				error!(%error, "Failed to access chat messages.");
				Self::internal_server_error()
			}
		}
	}
}
