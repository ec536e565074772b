use crate::connection::ClientConnection;
use crate::connection::connection_id::ConnectionId;
use crate::connection::error::TransportError;
use crate::message::server_event::ServerEvent;
use crate::room::subscribers::Subscribers;
use axum::extract::ws::Message;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::OwnedMutexGuard;
use tracing::{debug, warn};

mod subscribers;

/// Which connection listens to which room.
///
/// Rooms come into existence on first join and are pruned once they have no subscribers and nobody
/// holds a [`RoomTurn`] for them. A room only ever gets removed under the write lock, so everything
/// done under the read lock (join, leave, broadcast) always sees the one live room of a given name.
#[derive(Clone, Default)]
pub struct RoomRegistry {
	rooms: Arc<RwLock<HashMap<String, Arc<Subscribers>>>>,
}

/// Exclusive turn for sending into one room, see [`RoomRegistry::take_turn`].
pub struct RoomTurn {
	registry: RoomRegistry,
	name: String,
	room: Option<Arc<Subscribers>>,
	_guard: OwnedMutexGuard<()>,
}

impl Drop for RoomTurn {
	fn drop(&mut self) {
		self.room.take();
		self.registry.prune(&self.name);
	}
}

impl RoomRegistry {
	/// Subscribes `connection` to `name`. Returns `false` if it already was a subscriber.
	pub fn join(&self, connection: &ClientConnection, name: &str) -> bool {
		if let Some(room) = self.rooms.read().get(name) {
			return room.insert(connection.clone());
		}

		let joined = self
			.rooms
			.write()
			.entry(name.to_owned())
			.or_default()
			.insert(connection.clone());
		debug!(room = name, "Room opened.");
		joined
	}

	/// Unsubscribes the connection from `name`. Returns `false` if it wasn't subscribed.
	pub fn leave(&self, connection_id: ConnectionId, name: &str) -> bool {
		let left = self
			.rooms
			.read()
			.get(name)
			.is_some_and(|room| room.remove(connection_id).is_some());
		if left {
			self.prune(name);
		}
		left
	}

	/// Removes the connection from every room it was subscribed to and returns the names of those rooms.
	pub fn disconnect(&self, connection_id: ConnectionId) -> Vec<String> {
		let left: Vec<String> = self
			.rooms
			.read()
			.iter()
			.filter(|(_, room)| room.remove(connection_id).is_some())
			.map(|(name, _)| name.clone())
			.collect();
		for name in &left {
			self.prune(name);
		}
		left
	}

	/// Delivers `event` to every current subscriber of `name` and returns how many it reached.
	///
	/// A subscriber that can't take the event is dropped from all rooms and asked to close.
	pub fn broadcast(&self, name: &str, event: &ServerEvent) -> usize {
		let message = Message::from(event);
		let (delivered, failed) = match self.rooms.read().get(name) {
			Some(room) => room.deliver(&message),
			None => return 0,
		};

		for (connection, error) in failed {
			self.drop_connection(&connection, name, error);
		}
		delivered
	}

	/// Waits until nobody else is sending into `name`, then holds that turn until the returned guard is dropped.
	///
	/// Messages that are persisted and broadcast while holding the turn reach every subscriber in
	/// persistence order.
	pub async fn take_turn(&self, name: &str) -> RoomTurn {
		let room = {
			let rooms = self.rooms.read();
			rooms.get(name).cloned()
		};
		let room = match room {
			Some(room) => room,
			None => self.rooms.write().entry(name.to_owned()).or_default().clone(),
		};

		let guard = room.sequence().lock_owned().await;
		RoomTurn {
			registry: self.clone(),
			name: name.to_owned(),
			room: Some(room),
			_guard: guard,
		}
	}

	pub fn is_subscribed(&self, connection_id: ConnectionId, name: &str) -> bool {
		self.rooms
			.read()
			.get(name)
			.is_some_and(|room| room.contains(connection_id))
	}

	pub fn subscriber_count(&self, name: &str) -> usize {
		self.rooms.read().get(name).map_or(0, |room| room.len())
	}

	pub fn room_count(&self) -> usize {
		self.rooms.read().len()
	}

	fn drop_connection(&self, connection: &ClientConnection, room: &str, error: TransportError) {
		warn!(
			connection_id = %connection.id(),
			room,
			%error,
			"Failed to deliver event, dropping connection."
		);
		self.disconnect(connection.id());
		connection.close();
	}

	fn prune(&self, name: &str) {
		let mut rooms = self.rooms.write();
		let unused = rooms
			.get(name)
			.is_some_and(|room| Arc::strong_count(room) == 1 && room.is_empty());
		if unused {
			rooms.remove(name);
			debug!(room = name, "Room closed.");
		}
	}
}
