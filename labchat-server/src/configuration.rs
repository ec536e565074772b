use nonzero_ext::nonzero;
use serde::Deserialize;
use std::fs::read_to_string;
use std::net::SocketAddr;
use std::num::NonZeroU32;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Configuration {
	#[serde(with = "socket_addr_deserializer")]
	pub address: SocketAddr,
	pub log_filters: String,
	pub database_url: String,
	pub maximum_database_connections: u32,
	/// Outbound frames buffered per websocket connection before it is considered stalled.
	pub outbound_queue_capacity: usize,
	/// Upper bound in bytes for a single inbound websocket message.
	pub maximum_message_size: usize,
	#[serde(with = "humantime_serde")]
	pub heartbeat_interval: Duration,
	pub missed_heartbeat_limit: u8,
	#[serde(default = "default_requests_per_minute")]
	pub requests_per_minute: NonZeroU32,
}

fn default_requests_per_minute() -> NonZeroU32 {
	nonzero!(100u32)
}

impl Configuration {
	pub fn from_file(path: impl AsRef<Path>) -> Result<Configuration, ConfigurationError> {
		let text = read_to_string(path)?;

		Ok(Configuration::try_from(text.as_str())?)
	}
}

impl TryFrom<&str> for Configuration {
	type Error = toml::de::Error;

	fn try_from(text: &str) -> Result<Self, Self::Error> {
		toml::from_str(text)
	}
}

#[cfg(test)]
impl Default for Configuration {
	fn default() -> Self {
		Self {
			address: SocketAddr::from(([127, 0, 0, 1], 8000)),
			log_filters: "info".to_string(),
			database_url: "sqlite::memory:".to_string(),
			maximum_database_connections: 1,
			outbound_queue_capacity: 64,
			maximum_message_size: 10 * 1024,
			heartbeat_interval: Duration::from_secs(2),
			missed_heartbeat_limit: 3,
			requests_per_minute: nonzero!(6000u32),
		}
	}
}

#[derive(Error, Debug)]
pub enum ConfigurationError {
	#[error("Failed to deserialize with error: {0}")]
	DeserializationError(#[from] toml::de::Error),
	#[error("IO operation failed: {0}")]
	IoError(#[from] std::io::Error),
}

// See https://serde.rs/custom-date-format.html
mod socket_addr_deserializer {
	use serde::{self, Deserialize, Deserializer};
	use std::net::SocketAddr;
	use std::str::FromStr;

	pub fn deserialize<'deserializer, D>(deserializer: D) -> Result<SocketAddr, D::Error>
	where
		D: Deserializer<'deserializer>,
	{
		let string = String::deserialize(deserializer)?;
		SocketAddr::from_str(string.as_str()).map_err(serde::de::Error::custom)
	}
}
