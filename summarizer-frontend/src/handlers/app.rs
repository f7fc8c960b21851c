use crate::handlers::upload::PanelTemplate;
use crate::utils::session::form_id;
use crate::AppState;
use askama::Template;
use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;
use service_core::error::AppError;
use tower_sessions::Session;

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub title: String,
    pub panel: PanelTemplate,
}

pub async fn index(
    State(state): State<AppState>,
    session: Session,
) -> Result<IndexTemplate, AppError> {
    let id = form_id(&session).await?;
    let form = state.forms.snapshot(id);

    Ok(IndexTemplate {
        title: state.settings.ui.title.clone(),
        panel: PanelTemplate::from_form(&form, &state.settings.ui),
    })
}

/// Liveness of this service, plus whether the summarization backend answers.
/// Always 200: an unreachable backend degrades the form, it does not take
/// the page down.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let backend = match state.summarizer.health().await {
        Ok(()) => "ok",
        Err(e) => {
            tracing::warn!(error = %e, "Summarization backend health probe failed");
            "unreachable"
        }
    };

    Json(json!({
        "status": "ok",
        "service": "summarizer-frontend",
        "version": env!("CARGO_PKG_VERSION"),
        "backend": backend
    }))
}
