use crate::chat::model;
use crate::database::Connection;
use crate::database::error::DatabaseError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use static_assertions::assert_obj_safe;


#[async_trait]
pub trait ChatRepository: Send + Sync + 'static {
	async fn create(
		&self,
		connection: &mut dyn Connection,
		user_id: i64,
		room: &str,
		message: &str,
		created_at: DateTime<Utc>,
	) -> Result<model::ChatMessage, DatabaseError>;

	/// Up to `limit` messages of `room`, newest first.
	async fn list_latest(
		&self,
		connection: &mut dyn Connection,
		room: &str,
		limit: u32,
	) -> Result<Vec<model::ChatMessage>, DatabaseError>;
}

assert_obj_safe!(ChatRepository);
