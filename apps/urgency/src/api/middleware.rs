//! # Middleware Module
//!
//! Rate limiting for the Urgency HTTP API.
//!
//! ## Configuration
//!
//! - `URGENCY_RATE_LIMIT`: Requests per second (default: 100, 0 disables)

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};
use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};
use std::num::NonZeroU32;
use std::sync::Arc;

/// Default rate limit in requests per second.
const DEFAULT_RATE_LIMIT: u32 = 100;

/// Global rate limiter type alias.
pub type GlobalRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Create a new global rate limiter. Zero falls back to the default rate.
pub fn create_rate_limiter(requests_per_second: u32) -> GlobalRateLimiter {
    let rps = NonZeroU32::new(requests_per_second)
        .or(NonZeroU32::new(DEFAULT_RATE_LIMIT))
        .unwrap_or(NonZeroU32::MIN);
    Arc::new(RateLimiter::direct(Quota::per_second(rps)))
}

/// Requests per second from `URGENCY_RATE_LIMIT`, or 100 if unset or unparsable.
pub fn get_rate_limit_from_env() -> u32 {
    std::env::var("URGENCY_RATE_LIMIT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_RATE_LIMIT)
}

/// Returns 429 Too Many Requests once the global limiter is exhausted.
pub async fn rate_limit_middleware(
    State(limiter): State<GlobalRateLimiter>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, &'static str)> {
    match limiter.check() {
        Ok(()) => Ok(next.run(request).await),
        Err(_) => {
            tracing::warn!("Rate limit exceeded");
            Err((StatusCode::TOO_MANY_REQUESTS, "Too Many Requests"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limiter_allows_first_request() {
        let limiter = create_rate_limiter(50);
        assert!(limiter.check().is_ok());
    }

    #[test]
    fn zero_rate_uses_default() {
        let limiter = create_rate_limiter(0);
        assert!(limiter.check().is_ok());
    }

    #[test]
    fn burst_is_bounded() {
        let limiter = create_rate_limiter(2);
        let allowed = (0..10).filter(|_| limiter.check().is_ok()).count();
        assert!(allowed < 10);
    }
}
