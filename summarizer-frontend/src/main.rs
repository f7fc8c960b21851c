use dotenvy::dotenv;
use service_core::observability::logging::init_tracing;
use std::time::Duration;
use summarizer_frontend::config::get_configuration;
use summarizer_frontend::startup::build_router;
use summarizer_frontend::AppState;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let configuration = get_configuration().map_err(|e| {
        eprintln!("Failed to read configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing(
        "summarizer-frontend",
        &configuration.telemetry.log_level,
        configuration.telemetry.otlp_endpoint.as_deref(),
    )?;

    summarizer_frontend::services::metrics::init_metrics()
        .map_err(|e| anyhow::anyhow!("Failed to register metrics: {}", e))?;

    let address = format!(
        "{}:{}",
        configuration.server.host, configuration.server.port
    );
    let idle = Duration::from_secs(configuration.server.session_idle_minutes * 60);

    let state = AppState::new(configuration)?;
    let _sweeper = state.forms.spawn_sweeper(idle);
    info!(
        backend = %state.summarizer.summarize_url(),
        variant = ?state.settings.ui.variant,
        "Summarization backend configured"
    );

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&address).await.map_err(|e| {
        tracing::error!("Failed to bind TCP listener to {}: {}", address, e);
        anyhow::anyhow!("Failed to bind to address {}: {}", address, e)
    })?;

    info!("Starting summarizer-frontend on {}", address);
    axum::serve(listener, app).await.map_err(|e| {
        tracing::error!("Server error: {}", e);
        anyhow::anyhow!("Server error: {}", e)
    })?;

    Ok(())
}
