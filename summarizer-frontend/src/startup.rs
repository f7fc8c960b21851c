use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::middleware::{
    security_headers::security_headers_middleware, tracing::request_id_middleware,
};
use service_core::observability::extract_request_id;
use time::Duration;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::handlers::{
    app::{health_check, index},
    metrics::metrics,
    upload::{reset_handler, select_file_handler, summarize_handler},
};
use crate::middleware::metrics::metrics_middleware;
use crate::AppState;

/// Name of the cookie carrying the session id.
pub const SESSION_COOKIE: &str = "summarizer_session";

pub fn build_router(state: AppState) -> Router {
    let server = state.settings.server.clone();

    // Session only carries the form id; the form lives in `FormStore`
    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_name(SESSION_COOKIE)
        .with_secure(false) // Set to true in production with HTTPS
        .with_expiry(Expiry::OnInactivity(Duration::minutes(
            server.session_idle_minutes as i64,
        )));

    Router::new()
        .route("/", get(index))
        .route("/select", post(select_file_handler))
        .route("/summarize", post(summarize_handler))
        .route("/reset", post(reset_handler))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .nest_service("/static", ServeDir::new(&server.static_dir))
        .layer(DefaultBodyLimit::max(server.max_body_bytes))
        .layer(session_layer)
        .layer(from_fn(metrics_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id =
                    extract_request_id(request.headers()).unwrap_or_else(|| "-".to_string());

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        // Outermost so the span above sees the request id
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}
