use crate::server::rest_api::error::ApiErrorResponse;
use axum::extract::{ConnectInfo, Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use std::net::{IpAddr, SocketAddr};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering::Relaxed;
use tracing::debug;

/// Every this many checks, addresses whose quota has fully recovered are forgotten.
const CHECKS_BETWEEN_CLEANUPS: u64 = 1024;

/// Limits the number of HTTP requests per client address.
pub struct ClientRateLimiter {
	limiter: DefaultKeyedRateLimiter<IpAddr>,
	checks: AtomicU64,
}

impl ClientRateLimiter {
	pub fn new(requests_per_minute: NonZeroU32) -> Self {
		Self {
			limiter: RateLimiter::keyed(Quota::per_minute(requests_per_minute)),
			checks: AtomicU64::new(0),
		}
	}

	pub fn allows(&self, address: IpAddr) -> bool {
		let checks = self.checks.fetch_add(1, Relaxed) + 1;
		if checks % CHECKS_BETWEEN_CLEANUPS == 0 {
			self.forget_idle_clients();
		}

		self.limiter.check_key(&address).is_ok()
	}

	pub fn tracked_clients(&self) -> usize {
		self.limiter.len()
	}

	fn forget_idle_clients(&self) {
		self.limiter.retain_recent();
		self.limiter.shrink_to_fit();
		debug!(tracked_clients = self.tracked_clients(), "Forgot clients with recovered quota.");
	}
}

pub async fn limit_requests(
	State(rate_limiter): State<Arc<ClientRateLimiter>>,
	ConnectInfo(address): ConnectInfo<SocketAddr>,
	request: Request,
	next: Next,
) -> Response {
	if !rate_limiter.allows(address.ip()) {
		debug!(%address, path = request.uri().path(), "Rate limit exceeded.");
		return ApiErrorResponse::new(StatusCode::TOO_MANY_REQUESTS, "Too many requests").into_response();
	}

	next.run(request).await
}
