//! Sliding-window request-rate middleware.
//!
//! A coarse per-process abuse guard, not a correctness mechanism: each client
//! address gets a rolling window of recent request instants, and a request is
//! refused with 429 once the window holds the configured maximum. The server
//! wires one relaxed instance over the whole API and a stricter one over the
//! authentication routes.

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::{Arc, Mutex, PoisonError};
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use futures_util::future::{LocalBoxFuture, Ready, ready};

use crate::domain::DomainError;

const RATE_LIMITED: &str = "Too many requests, please try again later";

/// Map size at which stale client entries are swept out.
const PRUNE_THRESHOLD: usize = 1024;

/// Requests without a peer address (unix sockets, some test rigs) share one
/// bucket under this key.
const UNKNOWN_CLIENT: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);

#[derive(Debug)]
struct SlidingWindow {
    window: Duration,
    max_requests: usize,
    hits: Mutex<HashMap<IpAddr, Vec<Instant>>>,
}

impl SlidingWindow {
    fn new(window: Duration, max_requests: usize) -> Self {
        Self {
            window,
            max_requests,
            hits: Mutex::new(HashMap::new()),
        }
    }

    fn allow(&self, client: Option<IpAddr>) -> bool {
        let key = client.unwrap_or(UNKNOWN_CLIENT);
        let now = Instant::now();
        let mut hits = self.hits.lock().unwrap_or_else(PoisonError::into_inner);

        if hits.len() > PRUNE_THRESHOLD {
            let window = self.window;
            hits.retain(|_, stamps| {
                stamps.iter().any(|stamp| now.duration_since(*stamp) < window)
            });
        }

        let stamps = hits.entry(key).or_default();
        stamps.retain(|stamp| now.duration_since(*stamp) < self.window);
        if stamps.len() >= self.max_requests {
            return false;
        }
        stamps.push(now);
        true
    }
}

/// Per-IP sliding-window rate limiting middleware.
#[derive(Clone)]
pub struct RateLimit {
    state: Arc<SlidingWindow>,
}

impl RateLimit {
    /// Allow up to `max_requests` per client address within `window`.
    pub fn new(window: Duration, max_requests: usize) -> Self {
        Self {
            state: Arc::new(SlidingWindow::new(window, max_requests)),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service,
            state: self.state.clone(),
        }))
    }
}

/// Service wrapper produced by [`RateLimit`].
pub struct RateLimitMiddleware<S> {
    service: S,
    state: Arc<SlidingWindow>,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let client = req.peer_addr().map(|addr| addr.ip());
        if self.state.allow(client) {
            let fut = self.service.call(req);
            Box::pin(fut)
        } else {
            tracing::warn!(?client, "rate limit exceeded");
            Box::pin(ready(Err(
                DomainError::too_many_requests(RATE_LIMITED).into()
            )))
        }
    }
}
