//! # Authentication Module
//!
//! Optional API key authentication for the Urgency HTTP API.
//!
//! When `URGENCY_API_KEY` is set, every endpoint except `/health` requires
//! the key:
//! ```text
//! Authorization: Bearer <your-api-key>
//! ```

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    middleware::Next,
    response::Response,
};
use subtle::ConstantTimeEq;

/// `URGENCY_API_KEY` if set and non-empty; `None` disables authentication.
pub fn get_api_key_from_env() -> Option<String> {
    std::env::var("URGENCY_API_KEY")
        .ok()
        .filter(|k| !k.is_empty())
}

/// Compare keys in constant time over the longer of the two lengths.
fn keys_match(provided: &[u8], expected: &[u8]) -> bool {
    let max_len = provided.len().max(expected.len());
    let mut padded_provided = vec![0u8; max_len];
    let mut padded_expected = vec![0u8; max_len];
    padded_provided[..provided.len()].copy_from_slice(provided);
    padded_expected[..expected.len()].copy_from_slice(expected);

    let bytes_match: bool = padded_provided.ct_eq(&padded_expected).into();
    bytes_match && provided.len() == expected.len()
}

/// API key authentication middleware.
///
/// Accepts both `Bearer <key>` and the raw key. `/health` always passes so
/// load balancers can probe without credentials.
pub async fn api_key_auth_middleware(
    request: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, &'static str)> {
    let Some(expected) = get_api_key_from_env() else {
        return Ok(next.run(request).await);
    };

    if request.uri().path() == "/health" {
        return Ok(next.run(request).await);
    }

    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    match auth_header {
        Some(header_value) => {
            let provided = header_value.strip_prefix("Bearer ").unwrap_or(header_value);
            if keys_match(provided.as_bytes(), expected.as_bytes()) {
                Ok(next.run(request).await)
            } else {
                tracing::warn!(
                    event = "auth_failure",
                    reason = "invalid_api_key",
                    "Authentication failed: invalid API key"
                );
                Err((StatusCode::UNAUTHORIZED, "Unauthorized"))
            }
        }
        None => {
            tracing::warn!(
                event = "auth_failure",
                reason = "missing_authorization_header",
                "Missing Authorization header"
            );
            Err((StatusCode::UNAUTHORIZED, "Unauthorized"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_keys_match() {
        assert!(keys_match(b"secret", b"secret"));
    }

    #[test]
    fn prefix_does_not_match() {
        assert!(!keys_match(b"secre", b"secret"));
        assert!(!keys_match(b"secret\0", b"secret"));
    }

    #[test]
    fn different_keys_do_not_match() {
        assert!(!keys_match(b"public", b"secret"));
    }
}
