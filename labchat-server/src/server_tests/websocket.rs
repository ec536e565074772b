use crate::chat::model::ChatMessage;
use crate::message::server_event::{MembershipNotification, ServerEvent, TypingNotification};
use crate::server::rest_api::models::MessagesResponse;
use crate::server_tests::start_test_server;
use crate::server_tests::test_client::TestWebSocket;
use reqwest::StatusCode;
use serde_json::json;
use tokio_tungstenite::tungstenite::Message;

async fn expect_chat_message(websocket: &mut TestWebSocket) -> ChatMessage {
	match websocket.receive_event().await {
		ServerEvent::ReceiveMessage(message) => message,
		event => panic!("Expected receive_message, got {event:?}"),
	}
}

#[tokio::test]
async fn message_from_outside_the_room_should_reach_subscribers() {
	let client = start_test_server().await;
	let mut listener = client.websocket().await;
	let mut outsider = client.websocket().await;
	listener.join("general", "rosalind").await;

	outsider
		.send_event(r#"{"event":"send_message","data":{"user_id":1,"room":"general","message":"hello"}}"#)
		.await;

	let message = expect_chat_message(&mut listener).await;
	assert_eq!(1, message.user_id);
	assert_eq!("general", message.room);
	assert_eq!("hello", message.message);
	outsider.assert_nothing_received().await;

	let stored = client
		.get("/api/chat/messages?room=general")
		.send()
		.await
		.expect("Request failed.")
		.json::<MessagesResponse>()
		.await
		.expect("Failed to parse messages");
	assert_eq!(vec![message], stored.messages);
}

#[tokio::test]
async fn sender_in_the_room_should_receive_its_own_message() {
	let client = start_test_server().await;
	let mut marie = client.websocket().await;
	marie.join("lab1", "marie").await;

	marie
		.send_event(r#"{"event":"send_message","data":{"user_id":7,"room":"lab1","message":"titration done"}}"#)
		.await;

	let message = expect_chat_message(&mut marie).await;
	assert_eq!(7, message.user_id);
	assert_eq!("titration done", message.message);
}

#[tokio::test]
async fn typing_should_reach_everyone_in_the_room() {
	let client = start_test_server().await;
	let mut alice = client.websocket().await;
	let mut bob = client.websocket().await;
	alice.join("x", "alice").await;
	bob.join("x", "bob").await;
	let _bob_joined = alice.receive_event().await;

	bob.send_event(r#"{"event":"user_typing","data":{"username":"bob","room":"x","is_typing":true}}"#)
		.await;

	let expected = ServerEvent::UserTyping(TypingNotification {
		username: "bob".to_string(),
		is_typing: true,
		room: "x".to_string(),
	});
	assert_eq!(expected, alice.receive_event().await);
	assert_eq!(expected, bob.receive_event().await);
}

#[tokio::test]
async fn joining_twice_should_notify_twice() {
	let client = start_test_server().await;
	let mut alice = client.websocket().await;

	alice.join("lab1", "alice").await;
	alice.join("lab1", "alice").await;

	alice
		.send_event(r#"{"event":"send_message","data":{"user_id":1,"room":"lab1","message":"once"}}"#)
		.await;
	expect_chat_message(&mut alice).await;
	alice.assert_nothing_received().await;
}

#[tokio::test]
async fn malformed_events_should_be_ignored() {
	let client = start_test_server().await;
	let mut alice = client.websocket().await;
	alice.join("general", "alice").await;

	alice.send_event("not json at all").await;
	alice.send(Message::binary(vec![1u8, 2, 3, 4])).await;
	alice.send_event(r#"{"event":"delete_everything","data":{}}"#).await;
	alice
		.send_event(r#"{"event":"send_message","data":{"room":"general","message":"no author"}}"#)
		.await;
	alice
		.send_event(r#"{"event":"join_room","data":{"room":"lab1"}}"#)
		.await;
	alice
		.send_event(r#"{"event":"send_message","data":{"user_id":1,"room":"general","message":"still here"}}"#)
		.await;

	let message = expect_chat_message(&mut alice).await;
	assert_eq!("still here", message.message);
	alice.assert_nothing_received().await;
}

#[tokio::test]
async fn leaving_should_stop_deliveries_and_notify_the_rest() {
	let client = start_test_server().await;
	let mut alice = client.websocket().await;
	let mut bob = client.websocket().await;
	alice.join("lab1", "alice").await;
	bob.join("lab1", "bob").await;
	let _bob_joined = alice.receive_event().await;

	alice
		.send_event(r#"{"event":"leave_room","data":{"room":"lab1","username":"alice"}}"#)
		.await;

	assert_eq!(
		ServerEvent::UserLeft(MembershipNotification {
			username: "alice".to_string(),
			room: "lab1".to_string(),
		}),
		bob.receive_event().await
	);

	bob.send_event(r#"{"event":"send_message","data":{"user_id":2,"room":"lab1","message":"bye"}}"#)
		.await;
	expect_chat_message(&mut bob).await;
	alice.assert_nothing_received().await;
}

#[tokio::test]
async fn disconnect_should_not_be_announced() {
	let client = start_test_server().await;
	let mut alice = client.websocket().await;
	let mut bob = client.websocket().await;
	alice.join("lab1", "alice").await;
	bob.join("lab1", "bob").await;
	let _bob_joined = alice.receive_event().await;

	alice.close().await;
	bob.send_event(r#"{"event":"send_message","data":{"user_id":2,"room":"lab1","message":"anyone?"}}"#)
		.await;

	let message = expect_chat_message(&mut bob).await;
	assert_eq!("anyone?", message.message);
}

#[tokio::test]
async fn posted_message_should_be_broadcast_to_subscribers() {
	let client = start_test_server().await;
	let mut alice = client.websocket().await;
	alice.join("lab1", "alice").await;

	let response = client
		.post("/api/chat/messages")
		.json(&json!({"user_id": 3, "room": "lab1", "message": "order arrived"}))
		.send()
		.await
		.expect("Request failed.");
	assert_eq!(StatusCode::CREATED, response.status());
	let created = response.json::<ChatMessage>().await.expect("Failed to parse chat message");

	assert_eq!(created, expect_chat_message(&mut alice).await);
}
