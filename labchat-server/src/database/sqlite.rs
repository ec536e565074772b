use crate::chat::repository::ChatRepository;
use crate::database::error::{ConnectionContext, DatabaseError};
use crate::database::{Connection, Database, Repository};
use anyhow::anyhow;
use async_trait::async_trait;
use sqlx::pool::PoolConnection;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Connection as _, Sqlite, SqliteConnection, SqlitePool, migrate};
use std::any::Any;
use std::ops::DerefMut;
use std::str::FromStr;

mod chat;
#[cfg(test)]
pub mod test_utils;

#[derive(Clone)]
pub struct SqliteDatabase {
	pool: SqlitePool,
}

impl SqliteDatabase {
	pub async fn connect(database_url: &str, maximum_connections: u32) -> Result<Self, DatabaseError> {
		let options = SqliteConnectOptions::from_str(database_url)
			.connection_error("Invalid database URL")?
			.create_if_missing(true);
		// In-memory databases vanish together with their last connection, so connections are never recycled.
		let pool = SqlitePoolOptions::new()
			.max_connections(maximum_connections.max(1))
			.idle_timeout(None)
			.max_lifetime(None)
			.connect_with(options)
			.await
			.connection_error("Failed to connect to database")?;

		Ok(Self { pool })
	}
}

#[async_trait]
impl Database for SqliteDatabase {
	async fn migrate(&mut self) -> Result<(), DatabaseError> {
		migrate!().run(&self.pool).await.map_err(Into::into)
	}

	async fn connection(&self) -> Result<Box<dyn Connection>, DatabaseError> {
		self.pool
			.acquire()
			.await
			.map(|connection| Box::new(connection) as Box<dyn Connection>)
			.map_err(Into::into)
	}

	async fn ping(&self) -> Result<(), DatabaseError> {
		let mut connection = self.pool.acquire().await?;
		connection.ping().await.map_err(Into::into)
	}
}

impl Connection for SqliteConnection {}
impl Connection for PoolConnection<Sqlite> {}

#[derive(Default, Clone, Copy)]
pub struct SqliteRepository;

impl Repository for SqliteRepository {
	fn chat(&self) -> &dyn ChatRepository {
		self
	}
}

fn sqlite_connection(connection: &mut dyn Connection) -> Result<&mut SqliteConnection, DatabaseError> {
	let type_name = connection.type_name();

	let connection: &mut dyn Any = connection;

	if connection.is::<PoolConnection<Sqlite>>() {
		return Ok(connection.downcast_mut::<PoolConnection<Sqlite>>().unwrap().deref_mut());
	}

	if connection.is::<SqliteConnection>() {
		return Ok(connection.downcast_mut::<SqliteConnection>().unwrap());
	}

	Err(DatabaseError::DatabaseMismatch(anyhow!(
		"Expected SQLite connection, got {type_name}",
	)))
}
