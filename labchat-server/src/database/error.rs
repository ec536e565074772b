use anyhow::Context;
use sqlx::error::ErrorKind;
use sqlx::migrate::MigrateError;

/// Failure of the message database, independent of the backend that produced it.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
	#[error("Database unreachable: {0}")]
	Connection(anyhow::Error),
	#[error("Timed out waiting for a database connection: {0}")]
	Timeout(anyhow::Error),
	/// A `CHECK` or `NOT NULL` constraint of the chat schema rejected the row.
	#[error("Chat message rejected by the database: {0}")]
	ConstraintViolation(anyhow::Error),
	#[error("Stored chat message could not be converted: {0}")]
	RowMapping(anyhow::Error),
	#[error("Failed to migrate chat schema: {0}")]
	Migration(anyhow::Error),
	#[error("Repository and connection are for different databases: {0}")]
	DatabaseMismatch(anyhow::Error),
	#[error("Database error: {0}")]
	Database(anyhow::Error),
}

impl From<sqlx::Error> for DatabaseError {
	fn from(error: sqlx::Error) -> Self {
		use sqlx::Error::*;
		match error {
			Database(error) if matches!(error.kind(), ErrorKind::CheckViolation | ErrorKind::NotNullViolation) => {
				Self::ConstraintViolation(error.into())
			}
			PoolTimedOut => Self::Timeout(error.into()),
			PoolClosed | Io(_) | Tls(_) | Configuration(_) => Self::Connection(error.into()),
			RowNotFound | Encode(_) | Decode(_) | ColumnDecode { .. } | ColumnNotFound(_) => Self::RowMapping(error.into()),
			Migrate(error) => Self::Migration((*error).into()),
			other => Self::Database(other.into()),
		}
	}
}

impl From<MigrateError> for DatabaseError {
	fn from(error: MigrateError) -> Self {
		Self::Migration(error.into())
	}
}

pub trait ConnectionContext<Ok>: Sized {
	/// Treats any error as the database being unreachable.
	fn connection_error(self, context: &'static str) -> Result<Ok, DatabaseError>;
}

impl<Ok, Error> ConnectionContext<Ok> for Result<Ok, Error>
where
	Error: std::error::Error + Send + Sync + 'static,
{
	fn connection_error(self, context: &'static str) -> Result<Ok, DatabaseError> {
		self.context(context).map_err(DatabaseError::Connection)
	}
}
