use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::hash::Hash;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering::Relaxed;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ConnectionId {
	id: u64,
}

impl From<u64> for ConnectionId {
	fn from(id: u64) -> Self {
		ConnectionId { id }
	}
}

impl From<ConnectionId> for u64 {
	fn from(connection_id: ConnectionId) -> Self {
		connection_id.id
	}
}

impl Display for ConnectionId {
	fn fmt(&self, formatter: &mut Formatter) -> std::fmt::Result {
		write!(formatter, "ConnectionId({})", self.id)
	}
}

#[derive(Default)]
pub struct ConnectionIdSequence {
	next_id: AtomicU64,
}

impl ConnectionIdSequence {
	pub fn next(&self) -> ConnectionId {
		// Relaxed is enough, only the value of the counter itself needs to be consistent.
		ConnectionId::from(self.next_id.fetch_add(1, Relaxed))
	}
}
