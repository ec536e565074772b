use crate::chat::error::{ChatError, ValidationError};
use crate::chat::model::ChatMessage;
use crate::database::{Database, Repository};
use chrono::Utc;
use std::num::IntErrorKind;
use std::sync::Arc;

pub mod error;
pub mod model;
pub mod repository;

pub const DEFAULT_ROOM: &str = "general";
pub const DEFAULT_HISTORY_LIMIT: u32 = 50;
const MAX_ROOM_NAME_LENGTH: usize = 100;

/// Append-only persistence of chat messages, grouped by room.
#[derive(Clone)]
pub struct MessageStore {
	database: Arc<dyn Database>,
	repository: Arc<dyn Repository>,
}

impl MessageStore {
	pub fn new(database: Arc<dyn Database>, repository: Arc<dyn Repository>) -> Self {
		Self { database, repository }
	}

	/// Persists a new message. Id and timestamp are assigned here, never by the caller.
	pub async fn append(&self, user_id: i64, room: &str, body: &str) -> Result<ChatMessage, ChatError> {
		if user_id <= 0 {
			return Err(ValidationError::MissingUserId.into());
		}
		if body.is_empty() {
			return Err(ValidationError::EmptyMessage.into());
		}
		validate_room(room)?;

		let mut connection = self.database.connection().await?;
		let message = self
			.repository
			.chat()
			.create(&mut *connection, user_id, room, body, Utc::now())
			.await?;
		Ok(message)
	}

	/// The `limit` most recent messages of `room`, oldest first.
	pub async fn recent(&self, room: &str, limit: u32) -> Result<Vec<ChatMessage>, ChatError> {
		validate_room(room)?;

		let mut connection = self.database.connection().await?;
		let mut messages = self
			.repository
			.chat()
			.list_latest(&mut *connection, room, limit)
			.await?;
		messages.reverse();
		Ok(messages)
	}
}

fn validate_room(room: &str) -> Result<(), ValidationError> {
	if room.is_empty() {
		return Err(ValidationError::EmptyRoom);
	}

	if room.len() > MAX_ROOM_NAME_LENGTH {
		return Err(ValidationError::RoomNameTooLong);
	}

	Ok(())
}

/// Parses the `limit` of a history request, falling back to [`DEFAULT_HISTORY_LIMIT`].
pub fn parse_history_limit(limit: Option<&str>) -> Result<u32, ValidationError> {
	match limit {
		None => Ok(DEFAULT_HISTORY_LIMIT),
		Some(limit) => match limit.trim().parse::<u32>() {
			Ok(limit) => Ok(limit),
			// more messages than can ever be stored, so nothing is cut off
			Err(error) if *error.kind() == IntErrorKind::PosOverflow => Ok(u32::MAX),
			Err(_) => Err(ValidationError::InvalidLimit),
		},
	}
}
