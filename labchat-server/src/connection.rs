use crate::connection::connection_id::ConnectionId;
use crate::connection::error::TransportError;
use axum::extract::ws::Message;
use std::sync::Arc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{Notify, mpsc};

pub mod connection_id;
pub mod error;

/// Handle to the outbound side of one client's websocket.
///
/// Frames are queued, never written directly, so a slow client can't hold up whoever is sending to it.
/// Cloning the handle is cheap, every clone refers to the same queue.
#[derive(Clone, Debug)]
pub struct ClientConnection {
	id: ConnectionId,
	outgoing: mpsc::Sender<Message>,
	close_requested: Arc<Notify>,
}

impl ClientConnection {
	/// Creates a connection together with the receiving end of its outbound queue.
	pub fn new(id: ConnectionId, queue_capacity: usize) -> (Self, mpsc::Receiver<Message>) {
		let (outgoing, receiver) = mpsc::channel(queue_capacity.max(1));
		let connection = Self {
			id,
			outgoing,
			close_requested: Default::default(),
		};
		(connection, receiver)
	}

	pub fn id(&self) -> ConnectionId {
		self.id
	}

	pub fn send(&self, message: Message) -> Result<(), TransportError> {
		self.outgoing.try_send(message).map_err(|error| match error {
			TrySendError::Full(_) => TransportError::QueueFull,
			TrySendError::Closed(_) => TransportError::Closed,
		})
	}

	/// Asks whoever drives this connection to shut it down.
	pub fn close(&self) {
		self.close_requested.notify_one();
	}

	pub async fn close_requested(&self) {
		self.close_requested.notified().await;
	}
}
