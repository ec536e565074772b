use axum::extract::ws::Message;
use thiserror::Error;

pub mod client_event;
pub mod server_event;

#[derive(Error, Debug)]
pub enum MessageError {
	#[error("Failed to deserialize message with error: '{error}'; Message was '{json}'")]
	DeserializationFailed { error: String, json: String },
	#[error("Wrong websocket message type. Expected text, got: {0:?}")]
	WrongMessageType(Message),
}
