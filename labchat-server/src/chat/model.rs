use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(FromRow, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ChatMessage {
	pub id: i64,
	pub user_id: i64,
	pub room: String,
	pub message: String,
	#[serde(rename = "timestamp")]
	pub created_at: DateTime<Utc>,
}
