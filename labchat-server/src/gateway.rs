use crate::chat::MessageStore;
use crate::chat::error::ChatError;
use crate::chat::model::ChatMessage;
use crate::connection::ClientConnection;
use crate::message::client_event::{ClientEvent, Command};
use crate::message::server_event::{MembershipNotification, ServerEvent};
use crate::presence::PresenceTracker;
use crate::room::RoomRegistry;
use tracing::{debug, error, info};

/// Dispatches client events to the message store, the room registry and the presence tracker.
#[derive(Clone)]
pub struct Gateway {
	rooms: RoomRegistry,
	messages: MessageStore,
	presence: PresenceTracker,
}

impl Gateway {
	pub fn new(messages: MessageStore) -> Self {
		let rooms = RoomRegistry::default();
		Self {
			presence: PresenceTracker::new(rooms.clone()),
			rooms,
			messages,
		}
	}

	pub fn rooms(&self) -> &RoomRegistry {
		&self.rooms
	}

	pub fn messages(&self) -> &MessageStore {
		&self.messages
	}

	pub async fn handle(&self, connection: &ClientConnection, event: ClientEvent) {
		let command = match event.into_command() {
			Ok(command) => command,
			Err(error) => {
				debug!(connection_id = %connection.id(), %error, "Dropping incomplete event.");
				return;
			}
		};

		match command {
			Command::JoinRoom { room, username } => self.join_room(connection, &room, &username),
			Command::LeaveRoom { room, username } => self.leave_room(connection, &room, &username),
			Command::SendMessage { user_id, room, message } => {
				match self.send_message(user_id, &room, &message).await {
					Ok(_) => {}
					Err(ChatError::Validation(error)) => {
						debug!(connection_id = %connection.id(), %error, "Dropping invalid message.");
					}
					Err(ChatError::Persistence(error)) => {
						error!(connection_id = %connection.id(), room = room.as_str(), %error, "Failed to store chat message.");
					}
				}
			}
			Command::UserTyping {
				username,
				room,
				is_typing,
			} => {
				self.presence.set_typing(&room, &username, is_typing);
			}
		}
	}

	/// Joining again is allowed and announced again.
	pub fn join_room(&self, connection: &ClientConnection, room: &str, username: &str) {
		self.rooms.join(connection, room);
		info!(connection_id = %connection.id(), room, username, "Joined room.");
		self.rooms.broadcast(
			room,
			&ServerEvent::UserJoined(MembershipNotification {
				username: username.to_owned(),
				room: room.to_owned(),
			}),
		);
	}

	pub fn leave_room(&self, connection: &ClientConnection, room: &str, username: &str) {
		if self.rooms.leave(connection.id(), room) {
			info!(connection_id = %connection.id(), room, username, "Left room.");
		}
		self.rooms.broadcast(
			room,
			&ServerEvent::UserLeft(MembershipNotification {
				username: username.to_owned(),
				room: room.to_owned(),
			}),
		);
	}

	/// Persists a message and pushes it to the room's subscribers.
	///
	/// The sender doesn't have to be subscribed. Messages of one room are broadcast in the order they were stored.
	pub async fn send_message(&self, user_id: i64, room: &str, body: &str) -> Result<ChatMessage, ChatError> {
		let _turn = self.rooms.take_turn(room).await;
		let message = self.messages.append(user_id, room, body).await?;
		let delivered = self
			.rooms
			.broadcast(room, &ServerEvent::ReceiveMessage(message.clone()));
		debug!(message_id = message.id, room, delivered, "Broadcast chat message.");
		Ok(message)
	}

	/// Drops the connection from every room. Nobody gets notified about it.
	pub fn disconnect(&self, connection: &ClientConnection) -> Vec<String> {
		self.rooms.disconnect(connection.id())
	}
}
