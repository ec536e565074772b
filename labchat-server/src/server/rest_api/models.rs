use crate::chat::model::ChatMessage;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct MessagesQuery {
	pub room: Option<String>,
	/// Kept as text so a malformed limit can be reported as a validation error.
	pub limit: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct PostMessageRequest {
	pub user_id: Option<i64>,
	pub room: Option<String>,
	pub message: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, PartialEq)]
pub struct MessagesResponse {
	pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct HealthResponse {
	pub status: String,
}
