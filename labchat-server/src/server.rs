use crate::context::ApplicationContext;
use crate::lifecycle::run_client;
use axum::Router;
use axum::extract::{State, WebSocketUpgrade};
use axum::middleware;
use axum::response::Response;
use axum::routing::get;
use std::net::SocketAddr;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod rate_limit;
pub mod rest_api;

pub async fn run_server(application_context: ApplicationContext) -> Result<(), std::io::Error> {
	let address = application_context.configuration.address;
	axum_server::bind(address)
		.serve(create_router(application_context).into_make_service_with_connect_info::<SocketAddr>())
		.await
}

pub fn create_router(application_context: ApplicationContext) -> Router {
	Router::new()
		.route("/ws", get(websocket))
		.nest("/api", rest_api::rest_api())
		.layer(middleware::from_fn_with_state(
			application_context.clone(),
			rate_limit::limit_requests,
		))
		.layer(TraceLayer::new_for_http())
		.layer(CorsLayer::permissive())
		.with_state(application_context)
}

async fn websocket(State(application_context): State<ApplicationContext>, upgrade: WebSocketUpgrade) -> Response {
	let maximum_message_size = application_context.configuration.maximum_message_size;
	upgrade
		.max_message_size(maximum_message_size)
		.max_frame_size(maximum_message_size)
		.on_upgrade(move |websocket| run_client(application_context, websocket))
}
