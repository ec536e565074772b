use crate::chat::MessageStore;
use crate::configuration::Configuration;
use crate::connection::connection_id::ConnectionIdSequence;
use crate::database::error::DatabaseError;
use crate::database::sqlite::{SqliteDatabase, SqliteRepository};
use crate::database::{Database, Repository};
use crate::gateway::Gateway;
use crate::server::rate_limit::ClientRateLimiter;
use axum::extract::FromRef;
use std::sync::Arc;

#[derive(Clone, FromRef)]
pub struct ApplicationContext {
	pub configuration: Configuration,
	pub gateway: Gateway,
	pub database: Arc<dyn Database>,
	pub rate_limiter: Arc<ClientRateLimiter>,
	pub connection_ids: Arc<ConnectionIdSequence>,
}

impl ApplicationContext {
	pub async fn new(configuration: Configuration) -> Result<ApplicationContext, DatabaseError> {
		let mut database = SqliteDatabase::connect(
			&configuration.database_url,
			configuration.maximum_database_connections,
		)
		.await?;
		database.migrate().await?;

		Ok(Self::with_database(
			configuration,
			Arc::new(database),
			Arc::new(SqliteRepository),
		))
	}

	pub fn with_database(
		configuration: Configuration,
		database: Arc<dyn Database>,
		repository: Arc<dyn Repository>,
	) -> ApplicationContext {
		let rate_limiter = Arc::new(ClientRateLimiter::new(configuration.requests_per_minute));
		Self {
			gateway: Gateway::new(MessageStore::new(database.clone(), repository)),
			configuration,
			database,
			rate_limiter,
			connection_ids: Default::default(),
		}
	}
}
