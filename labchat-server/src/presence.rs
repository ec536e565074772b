use crate::message::server_event::{ServerEvent, TypingNotification};
use crate::room::RoomRegistry;

/// Relays "is typing" flags to a room. Nothing is remembered, every call is broadcast as is.
#[derive(Clone)]
pub struct PresenceTracker {
	rooms: RoomRegistry,
}

impl PresenceTracker {
	pub fn new(rooms: RoomRegistry) -> Self {
		Self { rooms }
	}

	/// Returns the number of subscribers that were notified.
	pub fn set_typing(&self, room: &str, username: &str, is_typing: bool) -> usize {
		self.rooms.broadcast(
			room,
			&ServerEvent::UserTyping(TypingNotification {
				username: username.to_owned(),
				is_typing,
				room: room.to_owned(),
			}),
		)
	}
}
