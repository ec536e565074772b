use crate::connection::ClientConnection;
use crate::connection::connection_id::ConnectionId;
use crate::connection::error::TransportError;
use axum::extract::ws::Message;
use std::collections::BTreeMap;
use std::sync::Arc;

/// The subscribers of a single room.
#[derive(Default)]
pub struct Subscribers {
	connections: parking_lot::Mutex<BTreeMap<ConnectionId, ClientConnection>>,
	sequence: Arc<tokio::sync::Mutex<()>>,
}

impl Subscribers {
	pub fn insert(&self, connection: ClientConnection) -> bool {
		self.connections.lock().insert(connection.id(), connection).is_none()
	}

	pub fn remove(&self, connection_id: ConnectionId) -> Option<ClientConnection> {
		self.connections.lock().remove(&connection_id)
	}

	pub fn contains(&self, connection_id: ConnectionId) -> bool {
		self.connections.lock().contains_key(&connection_id)
	}

	pub fn len(&self) -> usize {
		self.connections.lock().len()
	}

	pub fn is_empty(&self) -> bool {
		self.connections.lock().is_empty()
	}

	pub fn sequence(&self) -> Arc<tokio::sync::Mutex<()>> {
		self.sequence.clone()
	}

	/// Queues `message` for every subscriber, holding the lock so the set can't change midway.
	/// Returns the number of successful deliveries and the connections that failed.
	pub fn deliver(&self, message: &Message) -> (usize, Vec<(ClientConnection, TransportError)>) {
		let connections = self.connections.lock();
		let mut delivered = 0;
		let mut failed = Vec::new();
		for connection in connections.values() {
			match connection.send(message.clone()) {
				Ok(()) => delivered += 1,
				Err(error) => failed.push((connection.clone(), error)),
			}
		}
		(delivered, failed)
	}
}
