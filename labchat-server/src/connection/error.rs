use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
	#[error("Outbound queue is full, the client isn't keeping up.")]
	QueueFull,
	#[error("Connection is already closed.")]
	Closed,
}
