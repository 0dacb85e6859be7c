//! notewise HTTP API server.
//!
//! A thin JSON surface over the delta engine, the text enhancer and the AI
//! text features. Stateless: no persistence, no auth.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, HeaderValue, Method, Request, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use notewise_core::{defaults, GenerationBackend, TextEnhancer};
use notewise_inference::{EnhancementRewriter, ModelRoles, OpenAIBackend};

mod handlers;

// =============================================================================
// REQUEST ID (UUIDv7)
// =============================================================================

/// Generates time-ordered UUIDv7 request correlation IDs.
#[derive(Clone, Default)]
struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

// =============================================================================
// APPLICATION STATE
// =============================================================================

/// Generation backend shared by every handler.
pub(crate) type SharedBackend = Arc<dyn GenerationBackend>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) backend: SharedBackend,
    pub(crate) roles: Arc<ModelRoles>,
    pub(crate) enhancer: Arc<TextEnhancer<EnhancementRewriter<SharedBackend>>>,
}

impl AppState {
    pub(crate) fn new(backend: SharedBackend, roles: ModelRoles) -> Self {
        let enhancer = TextEnhancer::new(EnhancementRewriter::new(backend.clone(), roles.clone()));
        Self {
            backend,
            roles: Arc::new(roles),
            enhancer: Arc::new(enhancer),
        }
    }
}

// =============================================================================
// ERRORS
// =============================================================================

/// Handler error, rendered as `{"error": message}`.
#[derive(Debug)]
pub(crate) enum ApiError {
    /// Caller sent unusable input.
    BadRequest(String),
    /// The AI provider failed or answered with something unusable.
    BadGateway(String),
    /// Anything else.
    Internal(String),
}

impl From<notewise_core::Error> for ApiError {
    fn from(err: notewise_core::Error) -> Self {
        if err.is_validation() {
            ApiError::BadRequest(err.to_string())
        } else if err.is_upstream() {
            ApiError::BadGateway(err.to_string())
        } else {
            ApiError::Internal(err.to_string())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::BadGateway(msg) => {
                warn!(error = %msg, "Upstream AI failure");
                (StatusCode::BAD_GATEWAY, msg)
            }
            ApiError::Internal(msg) => {
                error!(error = %msg, "Internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = Json(serde_json::json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

// =============================================================================
// ROUTER
// =============================================================================

/// Parse allowed CORS origins from the ALLOWED_ORIGINS environment variable.
fn parse_allowed_origins() -> Vec<HeaderValue> {
    let origins_str =
        std::env::var("ALLOWED_ORIGINS").unwrap_or_else(|_| "http://localhost:3000".to_string());

    origins_str
        .split(',')
        .filter_map(|s| {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            match trimmed.parse::<HeaderValue>() {
                Ok(v) => Some(v),
                Err(e) => {
                    warn!("Invalid CORS origin '{}': {}", trimmed, e);
                    None
                }
            }
        })
        .collect()
}

pub(crate) fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/ai/enhance", post(handlers::ai::enhance))
        .route("/api/ai/extract-tasks", post(handlers::ai::extract_tasks))
        .route("/api/ai/parse-datetime", post(handlers::ai::parse_datetime))
        .route(
            "/api/ai/extract-attendees",
            post(handlers::ai::extract_attendees),
        )
        .route("/api/ai/convert-todo", post(handlers::ai::convert_todo))
        .route("/api/messages/convert", post(handlers::messages::convert))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("-");
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id,
                )
            }),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(parse_allowed_origins()))
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
                .max_age(std::time::Duration::from_secs(3600)),
        )
        .with_state(state)
}

// =============================================================================
// HEALTH CHECK
// =============================================================================

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

// =============================================================================
// MAIN
// =============================================================================

fn init_tracing() -> String {
    // Environment variables:
    //   LOG_FORMAT  - "json" or "text" (default: "text")
    //   LOG_ANSI    - "true"/"false" override ANSI colors (auto-detected by default)
    //   RUST_LOG    - standard env filter (default: "notewise_api=debug,tower_http=debug")
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let log_ansi = std::env::var("LOG_ANSI")
        .ok()
        .map(|v| v == "true" || v == "1");

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| defaults::LOG_FILTER.into());

    let registry = tracing_subscriber::registry().with(env_filter);

    if log_format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        let mut layer = tracing_subscriber::fmt::layer();
        if let Some(ansi) = log_ansi {
            layer = layer.with_ansi(ansi);
        }
        registry.with(layer).init();
    }

    log_format
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let log_format = init_tracing();
    info!(log_format = %log_format, "Logging initialized");

    let roles = ModelRoles::from_env();
    roles.validate()?;

    let backend: SharedBackend = Arc::new(OpenAIBackend::from_env()?);
    info!(
        subsystem = "api",
        default_model = %roles.default_model,
        task_detection_model = %roles.task_detection_model,
        "Generation backend ready"
    );

    let app = app(AppState::new(backend, roles));

    let host = std::env::var("HOST").unwrap_or_else(|_| defaults::SERVER_HOST.to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(defaults::SERVER_PORT);

    // Start server
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
