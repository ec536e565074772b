use crate::message::server_event::{MembershipNotification, ServerEvent};
use axum::Router;
use futures_util::{SinkExt, StreamExt};
use reqwest::{Method, RequestBuilder};
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

const RECEIVE_TIMEOUT: Duration = Duration::from_secs(5);
const SILENCE_PERIOD: Duration = Duration::from_millis(300);

pub struct TestClient {
	server_handle: axum_server::Handle<SocketAddr>,
	client: reqwest::Client,
	server_address: SocketAddr,
}

impl TestClient {
	pub async fn new(router: Router) -> anyhow::Result<Self> {
		// NOTE: port 0 assigns a random available port
		let socket_address = SocketAddrV4::new(Ipv4Addr::LOCALHOST, 0);

		let (bind_address, handle) = loop {
			let handle = axum_server::Handle::new();
			let server = axum_server::Server::bind(socket_address.into()).handle(handle.clone());

			tokio::spawn(server.serve(router.clone().into_make_service_with_connect_info::<SocketAddr>()));

			if let Some(address) = handle.listening().await {
				break (address, handle);
			}
		};

		let client = reqwest::Client::builder()
			.connect_timeout(Duration::from_secs(10))
			.timeout(Duration::from_secs(10))
			.build()?;

		Ok(Self {
			server_handle: handle,
			client,
			server_address: bind_address,
		})
	}

	pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
		let base_address = self.server_address;
		let path = path.trim_start_matches('/');
		self.client.request(method, format!("http://{base_address}/{path}"))
	}

	pub fn get(&self, path: &str) -> RequestBuilder {
		self.request(Method::GET, path)
	}

	pub fn post(&self, path: &str) -> RequestBuilder {
		self.request(Method::POST, path)
	}

	pub async fn websocket(&self) -> TestWebSocket {
		let (stream, _response) = tokio_tungstenite::connect_async(format!("ws://{}/ws", self.server_address))
			.await
			.expect("Websocket connection failed");
		TestWebSocket { stream }
	}
}

impl Drop for TestClient {
	fn drop(&mut self) {
		self.server_handle.graceful_shutdown(Some(Duration::from_secs(5)));
	}
}

pub struct TestWebSocket {
	stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl TestWebSocket {
	pub async fn send(&mut self, message: Message) {
		self.stream.send(message).await.expect("Failed to send websocket message");
	}

	pub async fn send_event(&mut self, json: &str) {
		self.send(Message::text(json.to_owned())).await;
	}

	/// Joins `room` and consumes the resulting `user_joined` notification.
	pub async fn join(&mut self, room: &str, username: &str) {
		self.send_event(&format!(
			r#"{{"event":"join_room","data":{{"room":"{room}","username":"{username}"}}}}"#
		))
		.await;

		let expected = ServerEvent::UserJoined(MembershipNotification {
			username: username.to_string(),
			room: room.to_string(),
		});
		assert_eq!(expected, self.receive_event().await);
	}

	pub async fn receive_event(&mut self) -> ServerEvent {
		tokio::time::timeout(RECEIVE_TIMEOUT, self.next_event())
			.await
			.expect("Timed out waiting for an event")
	}

	pub async fn assert_nothing_received(&mut self) {
		if let Ok(event) = tokio::time::timeout(SILENCE_PERIOD, self.next_event()).await {
			panic!("Expected no event, got {event:?}");
		}
	}

	pub async fn close(mut self) {
		self.stream.close(None).await.expect("Failed to close websocket");
	}

	async fn next_event(&mut self) -> ServerEvent {
		loop {
			match self.stream.next().await {
				Some(Ok(Message::Text(json))) => {
					return serde_json::from_str(json.as_str()).expect("Failed to parse server event");
				}
				Some(Ok(Message::Ping(_) | Message::Pong(_))) => {}
				other => panic!("Expected event, got {other:?}"),
			}
		}
	}
}
