use crate::message::MessageError;
use axum::extract::ws::Message;
use serde::Deserialize;
use thiserror::Error;

/// Event as sent by a client: `{"event": "<name>", "data": {...}}`.
///
/// Every field is optional on the wire, missing ones are only detected by [`ClientEvent::into_command`].
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(tag = "event", content = "data")]
#[serde(rename_all = "snake_case")]
pub enum ClientEvent {
	JoinRoom(RoomMembershipData),
	LeaveRoom(RoomMembershipData),
	SendMessage(SendMessageData),
	UserTyping(UserTypingData),
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct RoomMembershipData {
	pub room: Option<String>,
	pub username: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct SendMessageData {
	pub user_id: Option<i64>,
	pub room: Option<String>,
	pub message: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct UserTypingData {
	pub username: Option<String>,
	pub room: Option<String>,
	pub is_typing: Option<bool>,
}

/// A [`ClientEvent`] with all of its required fields present.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
	JoinRoom { room: String, username: String },
	LeaveRoom { room: String, username: String },
	SendMessage { user_id: i64, room: String, message: String },
	UserTyping { username: String, room: String, is_typing: bool },
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Required field '{field}' of '{event}' event is missing or empty.")]
pub struct MissingFieldError {
	pub event: &'static str,
	pub field: &'static str,
}

impl ClientEvent {
	pub fn kind(&self) -> &'static str {
		use ClientEvent::*;
		match self {
			JoinRoom(_) => "join_room",
			LeaveRoom(_) => "leave_room",
			SendMessage(_) => "send_message",
			UserTyping(_) => "user_typing",
		}
	}

	pub fn into_command(self) -> Result<Command, MissingFieldError> {
		let event = self.kind();
		let required = |value: Option<String>, field| {
			value
				.filter(|value| !value.is_empty())
				.ok_or(MissingFieldError { event, field })
		};

		Ok(match self {
			ClientEvent::JoinRoom(RoomMembershipData { room, username }) => Command::JoinRoom {
				room: required(room, "room")?,
				username: required(username, "username")?,
			},
			ClientEvent::LeaveRoom(RoomMembershipData { room, username }) => Command::LeaveRoom {
				room: required(room, "room")?,
				username: required(username, "username")?,
			},
			ClientEvent::SendMessage(SendMessageData {
				user_id,
				room,
				message,
			}) => Command::SendMessage {
				// ids start at 1, zero counts as absent
				user_id: user_id
					.filter(|user_id| *user_id > 0)
					.ok_or(MissingFieldError { event, field: "user_id" })?,
				room: required(room, "room")?,
				message: required(message, "message")?,
			},
			ClientEvent::UserTyping(UserTypingData {
				username,
				room,
				is_typing,
			}) => Command::UserTyping {
				username: required(username, "username")?,
				room: required(room, "room")?,
				is_typing: is_typing.ok_or(MissingFieldError {
					event,
					field: "is_typing",
				})?,
			},
		})
	}
}

impl TryFrom<&str> for ClientEvent {
	type Error = MessageError;

	fn try_from(json: &str) -> Result<Self, Self::Error> {
		serde_json::from_str(json).map_err(|error| MessageError::DeserializationFailed {
			error: error.to_string(),
			json: json.to_string(),
		})
	}
}

impl TryFrom<&Message> for ClientEvent {
	type Error = MessageError;

	fn try_from(websocket_message: &Message) -> Result<Self, Self::Error> {
		match websocket_message {
			Message::Text(json) => json.as_str().try_into(),
			_ => Err(MessageError::WrongMessageType(websocket_message.clone())),
		}
	}
}
