//! # Urgency HTTP API Module
//!
//! This module implements the HTTP REST API server using axum.
//!
//! ## Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /config` - Server default detector config
//! - `POST /detect` - Flag urgent weeks in a posted series
//! - `POST /analyze` - Detection plus the full analysis report
//! - `POST /generate` - Seeded synthetic weekly series
//!
//! ## Security Configuration (Environment Variables)
//!
//! - `URGENCY_CORS_ORIGINS`: Comma-separated list of allowed origins, or "*" for all (default: localhost only)
//! - `URGENCY_RATE_LIMIT`: Requests per second (default: 100, 0 to disable)
//! - `URGENCY_API_KEY`: If set, requires Bearer token authentication

mod auth;
mod handlers;
mod middleware;
mod types;

pub use auth::get_api_key_from_env;
pub use middleware::{create_rate_limiter, get_rate_limit_from_env};
pub use types::{
    AnalyzeResponse, DetectResponse, DetectorOverrides, GenerateRequest, GenerateResponse,
    HealthResponse, SeriesRequest,
};

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use urgency_core::{DetectorConfig, SyntheticConfig, UrgencyError};

/// Request body limit.
const MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state. Requests never mutate it.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Detector config under any per-request overrides.
    pub config: DetectorConfig,
    /// Synthetic config under any `/generate` overrides.
    pub synthetic: SyntheticConfig,
}

impl AppState {
    #[must_use]
    pub fn new(config: DetectorConfig) -> Self {
        Self {
            config,
            synthetic: SyntheticConfig::default(),
        }
    }

    #[must_use]
    pub fn with_synthetic(mut self, synthetic: SyntheticConfig) -> Self {
        self.synthetic = synthetic;
        self
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

/// Build CORS layer from `URGENCY_CORS_ORIGINS`.
///
/// - "*": allows all origins (development only)
/// - unset: localhost only
/// - otherwise: comma-separated list of allowed origins
fn build_cors_layer() -> CorsLayer {
    let origins_env = std::env::var("URGENCY_CORS_ORIGINS").ok();

    match origins_env.as_deref() {
        Some("*") => {
            tracing::warn!(
                "CORS: Allowing ALL origins (URGENCY_CORS_ORIGINS=*). This is insecure for production!"
            );
            CorsLayer::permissive()
        }
        Some(origins) => {
            let allowed_origins: Vec<HeaderValue> = origins
                .split(',')
                .filter_map(|s| {
                    let trimmed = s.trim();
                    match trimmed.parse::<HeaderValue>() {
                        Ok(hv) => {
                            tracing::info!("CORS: Allowing origin: {}", trimmed);
                            Some(hv)
                        }
                        Err(e) => {
                            tracing::warn!("CORS: Invalid origin '{}': {}", trimmed, e);
                            None
                        }
                    }
                })
                .collect();

            if allowed_origins.is_empty() {
                tracing::warn!(
                    "CORS: No valid origins in URGENCY_CORS_ORIGINS, defaulting to localhost only"
                );
                build_localhost_cors()
            } else {
                CorsLayer::new()
                    .allow_origin(allowed_origins)
                    .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                    .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
            }
        }
        None => {
            tracing::info!("CORS: No URGENCY_CORS_ORIGINS set, defaulting to localhost only");
            build_localhost_cors()
        }
    }
}

fn build_localhost_cors() -> CorsLayer {
    let origins: Vec<HeaderValue> = [
        "http://localhost:3000",
        "http://localhost:8080",
        "http://127.0.0.1:3000",
        "http://127.0.0.1:8080",
    ]
    .iter()
    .filter_map(|o| o.parse::<HeaderValue>().ok())
    .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner):
/// 1. Tracing
/// 2. CORS
/// 3. Body limit
/// 4. Rate limiting (if enabled)
/// 5. Authentication (if configured)
pub fn create_router(state: AppState) -> Router {
    let cors = build_cors_layer();

    let rate_limit = get_rate_limit_from_env();
    let rate_limiter = if rate_limit > 0 {
        tracing::info!("Rate limiting enabled: {} requests/second", rate_limit);
        Some(create_rate_limiter(rate_limit))
    } else {
        tracing::info!("Rate limiting disabled");
        None
    };

    let has_auth = get_api_key_from_env().is_some();
    if has_auth {
        tracing::info!("API key authentication enabled");
    } else {
        tracing::warn!(
            "API key authentication DISABLED - all endpoints are publicly accessible. \
             Set URGENCY_API_KEY to enable authentication."
        );
    }

    let mut router = Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/config", get(handlers::config_handler))
        .route("/detect", post(handlers::detect_handler))
        .route("/analyze", post(handlers::analyze_handler))
        .route("/generate", post(handlers::generate_handler));

    if has_auth {
        router = router.layer(axum_middleware::from_fn(auth::api_key_auth_middleware));
    }

    if let Some(limiter) = rate_limiter {
        router = router.layer(axum_middleware::from_fn_with_state(
            limiter,
            middleware::rate_limit_middleware,
        ));
    }

    router
        .layer(axum::extract::DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Bind `addr` and serve until the process is stopped.
pub async fn run_server(addr: &str, state: AppState) -> Result<(), UrgencyError> {
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| UrgencyError::IoError(format!("Bind failed: {}", e)))?;

    tracing::info!("Urgency HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .await
        .map_err(|e| UrgencyError::IoError(format!("Server error: {}", e)))
}
