use crate::config::Config;
use crate::errors::AppError;
use crate::models::{HealthStatus, ServiceHealthResponse, TelegramHealth};
use crate::telegram_client::TelegramClient;
use crate::valuation_handler;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::any::Any;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::{
    catch_panic::CatchPanicLayer, cors::CorsLayer, limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// Client for relaying leads to Telegram (None if it failed to initialize).
    pub telegram: Option<TelegramClient>,
}

impl AppState {
    /// Builds the state, keeping the service up even if the client cannot be created.
    pub fn new(config: Config) -> Self {
        let telegram = match TelegramClient::new(&config) {
            Ok(client) => {
                tracing::info!(
                    "✓ Telegram client initialized (configured: {}, test mode: {})",
                    client.is_configured(),
                    client.is_test_mode()
                );
                Some(client)
            }
            Err(e) => {
                tracing::error!("Failed to initialize Telegram client: {}", e);
                None
            }
        };

        Self { config, telegram }
    }
}

/// Builds the application router with all middleware.
///
/// `/health` sits outside the rate limiter; the submission routes get the body
/// limit and a per-client-IP limiter. The limiter needs the peer address, so
/// serve the router with `into_make_service_with_connect_info::<SocketAddr>()`.
///
/// # Arguments
///
/// * `state` - The shared application state.
///
/// # Returns
///
/// * `Result<Router, AppError>` - The router, or an error if the limiter settings are unusable.
pub fn router(state: Arc<AppState>) -> Result<Router, AppError> {
    let config = &state.config;

    // Configure rate limiter per client IP
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_millisecond(replenish_interval_ms(config.rate_limit_per_second))
            .burst_size(config.rate_limit_burst)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .ok_or_else(|| {
                AppError::InternalError("Invalid rate limiter configuration".to_string())
            })?,
    );

    // Build protected routes with security layers
    let protected_routes = Router::new()
        .route(
            "/api/submit-valuation",
            get(service_health).post(valuation_handler::submit_valuation),
        )
        .layer(
            ServiceBuilder::new()
                // Leads are tiny; reject anything larger than the configured limit
                .layer(RequestBodyLimitLayer::new(config.max_body_bytes))
                .layer(GovernorLayer {
                    config: governor_conf,
                }),
        );

    // Health check bypasses rate limiting
    Ok(Router::new()
        .route("/health", get(health))
        .merge(protected_routes)
        .with_state(state)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()))
}

/// Milliseconds between two replenished limiter slots for a sustained rate of
/// `per_second` requests per second.
pub fn replenish_interval_ms(per_second: u64) -> u64 {
    (1000 / per_second.max(1)).max(1)
}

/// Turns a panic anywhere in the request path into a generic 500.
pub fn handle_panic(_err: Box<dyn Any + Send + 'static>) -> Response {
    AppError::InternalError("Request handler panicked".to_string()).into_response()
}

/// Health check endpoint.
///
/// Liveness only: no outbound calls are made.
///
/// # Returns
///
/// * `(StatusCode, Json<serde_json::Value>)` - HTTP 200 OK with health status JSON.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// GET /api/submit-valuation
///
/// Reports whether lead delivery is configured, whether test mode is active, and
/// the live result of a Telegram connection test.
pub async fn service_health(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<ServiceHealthResponse>) {
    let Some(client) = state.telegram.as_ref() else {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ServiceHealthResponse {
                status: HealthStatus::Error,
                telegram: None,
                error: Some("Health check failed".to_string()),
            }),
        );
    };

    let connection_test = client.test_connection().await;

    (
        StatusCode::OK,
        Json(ServiceHealthResponse {
            status: HealthStatus::Ok,
            telegram: Some(TelegramHealth {
                configured: state.config.telegram_configured(),
                test_mode: client.is_test_mode(),
                connection_test,
            }),
            error: None,
        }),
    )
}
