use crate::chat::model::ChatMessage;
use crate::chat::{DEFAULT_ROOM, parse_history_limit};
use crate::context::ApplicationContext;
use crate::database::Database;
use crate::gateway::Gateway;
use crate::server::rest_api::error::ApiErrorResponse;
use crate::server::rest_api::models::{HealthResponse, MessagesQuery, MessagesResponse, PostMessageRequest};
use crate::server::rest_api::response::Created;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use std::sync::Arc;
use tracing::{debug, error};

pub mod error;
pub mod models;
pub mod response;

const REQUIRED_FIELDS_MISSING: &str = "User ID and message are required";

pub fn rest_api() -> Router<ApplicationContext> {
	Router::new()
		.route("/chat/messages", get(get_messages).post(post_message))
		.route("/health", get(health))
}

async fn get_messages(
	State(gateway): State<Gateway>,
	Query(MessagesQuery { room, limit }): Query<MessagesQuery>,
) -> Result<Json<MessagesResponse>, ApiErrorResponse> {
	let room = room
		.filter(|room| !room.is_empty())
		.unwrap_or_else(|| DEFAULT_ROOM.to_owned());
	let limit = parse_history_limit(limit.as_deref())?;

	let messages = gateway.messages().recent(&room, limit).await?;
	Ok(Json(MessagesResponse { messages }))
}

async fn post_message(
	State(gateway): State<Gateway>,
	request: Result<Json<PostMessageRequest>, JsonRejection>,
) -> Result<Created<Json<ChatMessage>>, ApiErrorResponse> {
	let Json(PostMessageRequest { user_id, room, message }) = request.map_err(|rejection| {
		debug!(%rejection, "Rejected chat message body.");
		match rejection {
			// well-formed JSON, but a field has the wrong type, e.g. `"user_id": "1"`
			JsonRejection::JsonDataError(_) => ApiErrorResponse::bad_request(REQUIRED_FIELDS_MISSING),
			rejection => ApiErrorResponse::bad_request(rejection.body_text()),
		}
	})?;

	let (Some(user_id), Some(message)) = (
		user_id.filter(|user_id| *user_id > 0),
		message.filter(|message| !message.is_empty()),
	) else {
		return Err(ApiErrorResponse::bad_request(REQUIRED_FIELDS_MISSING));
	};
	let room = room.unwrap_or_else(|| DEFAULT_ROOM.to_owned());

	let message = gateway.send_message(user_id, &room, &message).await?;
	Ok(Created(Json(message)))
}

async fn health(State(database): State<Arc<dyn Database>>) -> Result<Json<HealthResponse>, ApiErrorResponse> {
	database.ping().await.map_err(|error| {
		error!(%error, "Health check failed.");
		ApiErrorResponse::internal_server_error()
	})?;

	Ok(Json(HealthResponse {
		status: "ok".to_string(),
	}))
}
