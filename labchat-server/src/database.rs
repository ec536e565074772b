use crate::chat::repository::ChatRepository;
use crate::database::error::DatabaseError;
use async_trait::async_trait;
use static_assertions::assert_obj_safe;
use std::any::{Any, type_name};

pub mod error;
pub mod sqlite;

#[async_trait]
pub trait Database: Send + Sync {
	async fn migrate(&mut self) -> Result<(), DatabaseError>;

	async fn connection(&self) -> Result<Box<dyn Connection>, DatabaseError>;

	/// Does a round trip to the database.
	async fn ping(&self) -> Result<(), DatabaseError>;
}

assert_obj_safe!(Database);

pub trait Connection: Any + Send + Sync {
	fn type_name(&self) -> &'static str {
		type_name::<Self>()
	}
}

assert_obj_safe!(Connection);

pub trait Repository: ChatRepository + Send + Sync + 'static {
	fn chat(&self) -> &dyn ChatRepository;
}

assert_obj_safe!(Repository);
