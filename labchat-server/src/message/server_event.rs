use crate::chat::model::ChatMessage;
use axum::extract::ws::{Message, Utf8Bytes};
use serde::{Deserialize, Serialize};

/// Event pushed to the subscribers of a room: `{"event": "<name>", "data": {...}}`.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(tag = "event", content = "data")]
#[serde(rename_all = "snake_case")]
pub enum ServerEvent {
	UserJoined(MembershipNotification),
	UserLeft(MembershipNotification),
	ReceiveMessage(ChatMessage),
	UserTyping(TypingNotification),
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct MembershipNotification {
	pub username: String,
	pub room: String,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct TypingNotification {
	pub username: String,
	pub is_typing: bool,
	pub room: String,
}

impl From<&ServerEvent> for Message {
	fn from(event: &ServerEvent) -> Self {
		let json = serde_json::to_string(event).expect("Failed to serialize event to JSON.");
		Message::Text(Utf8Bytes::from(json))
	}
}
