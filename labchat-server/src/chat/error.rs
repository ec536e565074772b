use crate::database::error::DatabaseError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChatError {
	#[error(transparent)]
	Validation(#[from] ValidationError),
	#[error("Failed to access chat messages: {0}")]
	Persistence(#[from] DatabaseError),
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
	#[error("User ID is required")]
	MissingUserId,
	#[error("Message must not be empty")]
	EmptyMessage,
	#[error("Room must not be empty")]
	EmptyRoom,
	#[error("Room name is too long (>100 bytes UTF-8)")]
	RoomNameTooLong,
	#[error("Limit must be a non-negative integer")]
	InvalidLimit,
}
