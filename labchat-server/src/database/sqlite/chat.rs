use super::{SqliteRepository, sqlite_connection};
use crate::chat::model::ChatMessage;
use crate::chat::repository::ChatRepository;
use crate::database::Connection;
use crate::database::error::DatabaseError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::query_as;

#[async_trait]
impl ChatRepository for SqliteRepository {
	async fn create(
		&self,
		connection: &mut dyn Connection,
		user_id: i64,
		room: &str,
		message: &str,
		created_at: DateTime<Utc>,
	) -> Result<ChatMessage, DatabaseError> {
		let connection = sqlite_connection(connection)?;

		query_as(
			r"INSERT INTO chat_message(
				user_id, room, message, created_at
			) VALUES (?1, ?2, ?3, ?4)
			RETURNING
				id,
				user_id,
				room,
				message,
				created_at
			",
		)
		.bind(user_id)
		.bind(room)
		.bind(message)
		.bind(created_at)
		.fetch_one(connection)
		.await
		.map_err(Into::into)
	}

	async fn list_latest(
		&self,
		connection: &mut dyn Connection,
		room: &str,
		limit: u32,
	) -> Result<Vec<ChatMessage>, DatabaseError> {
		let connection = sqlite_connection(connection)?;

		query_as(
			r"SELECT
				id,
				user_id,
				room,
				message,
				created_at
			FROM chat_message
			WHERE room = ?1
			ORDER BY id DESC
			LIMIT ?2
			",
		)
		.bind(room)
		.bind(i64::from(limit))
		.fetch_all(connection)
		.await
		.map_err(Into::into)
	}
}
