use crate::connection::ClientConnection;
use crate::context::ApplicationContext;
use crate::gateway::Gateway;
use crate::message::client_event::ClientEvent;
use axum::body::Bytes;
use axum::extract::ws::{Message, WebSocket};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior, interval_at, timeout};
use tracing::{debug, info};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LeftReason {
	Closed,
	Timeout,
	Dropped,
}

pub async fn run_client(application_context: ApplicationContext, websocket: WebSocket) {
	let configuration = &application_context.configuration;
	let (connection, outgoing) = ClientConnection::new(
		application_context.connection_ids.next(),
		configuration.outbound_queue_capacity,
	);
	let connection_id = connection.id();
	let (sink, stream) = websocket.split();
	let (pong_sender, pong_receiver) = mpsc::channel(usize::from(configuration.missed_heartbeat_limit).max(1));
	info!(%connection_id, "Client connected.");

	let left_reason = tokio::select! {
		() = handle_messages(&application_context.gateway, &connection, stream, pong_sender) => LeftReason::Closed,
		() = send_messages(sink, outgoing) => LeftReason::Closed,
		left_reason = heartbeat(
			&connection,
			pong_receiver,
			configuration.heartbeat_interval,
			configuration.missed_heartbeat_limit,
		) => left_reason,
		() = connection.close_requested() => LeftReason::Dropped,
	};

	let rooms = application_context.gateway.disconnect(&connection);
	info!(%connection_id, ?left_reason, ?rooms, "Client disconnected.");
}

async fn handle_messages(
	gateway: &Gateway,
	connection: &ClientConnection,
	mut stream: SplitStream<WebSocket>,
	pong_sender: mpsc::Sender<Bytes>,
) {
	while let Some(received) = stream.next().await {
		let message = match received {
			Ok(message) => message,
			Err(error) => {
				debug!(connection_id = %connection.id(), %error, "Failed to receive from websocket.");
				break;
			}
		};

		match message {
			Message::Close(_) => break,
			// answered by the websocket implementation itself
			Message::Ping(_) => continue,
			Message::Pong(payload) => {
				// a full queue means the heartbeat isn't waiting for this pong anyway
				let _ = pong_sender.try_send(payload);
				continue;
			}
			Message::Text(_) | Message::Binary(_) => {}
		}

		match ClientEvent::try_from(&message) {
			Ok(event) => {
				debug!(connection_id = %connection.id(), event = event.kind(), "Received event.");
				gateway.handle(connection, event).await;
			}
			Err(error) => debug!(connection_id = %connection.id(), %error, "Dropping malformed event."),
		}
	}
}

async fn send_messages(mut sink: SplitSink<WebSocket, Message>, mut outgoing: mpsc::Receiver<Message>) {
	while let Some(message) = outgoing.recv().await {
		if sink.send(message).await.is_err() {
			break;
		}
	}
}

/// Pings the client every `heartbeat_interval` and gives up after `missed_heartbeat_limit` pings in a row
/// haven't been answered within one interval.
pub async fn heartbeat(
	connection: &ClientConnection,
	mut pong_receiver: mpsc::Receiver<Bytes>,
	heartbeat_interval: Duration,
	missed_heartbeat_limit: u8,
) -> LeftReason {
	let mut interval = interval_at(Instant::now() + heartbeat_interval, heartbeat_interval);
	interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
	let mut missed_heartbeats = 0;
	let mut count = 0_u64;

	loop {
		interval.tick().await;

		let payload = count.to_be_bytes();
		if let Err(error) = connection.send(Message::Ping(Bytes::copy_from_slice(&payload))) {
			debug!(connection_id = %connection.id(), %error, "Failed to send ping.");
			return LeftReason::Dropped;
		}

		let receive_pong = async {
			while let Some(received) = pong_receiver.recv().await {
				if *received == payload {
					return true;
				}
			}
			false
		};
		match timeout(heartbeat_interval, receive_pong).await {
			Ok(true) => missed_heartbeats = 0,
			Ok(false) => return LeftReason::Closed,
			Err(_) => {
				missed_heartbeats += 1;
				debug!(connection_id = %connection.id(), missed_heartbeats, "Missed heartbeat.");
				if missed_heartbeats >= missed_heartbeat_limit {
					return LeftReason::Timeout;
				}
			}
		}

		count = count.wrapping_add(1);
	}
}
