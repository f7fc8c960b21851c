use crate::config::UiSettings;
use crate::models::{FormError, SelectedFile, Submission, UploadForm, GENERIC_FAILURE_MESSAGE};
use crate::services::metrics::record_summarize;
use crate::services::summarizer_client::FILE_FIELD;
use crate::utils::session::form_id;
use crate::AppState;
use askama::Template;
use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Extension,
};
use service_core::error::AppError;
use service_core::middleware::tracing::RequestId;
use std::time::Instant;
use tower_sessions::Session;
use uuid::Uuid;

/// The form fragment swapped in by HTMX after every interaction.
#[derive(Template)]
#[template(path = "partials/panel.html")]
pub struct PanelTemplate {
    pub dropzone: bool,
    pub accept: &'static str,
    pub max_upload_note_mb: u64,
    pub file: Option<FileView>,
    pub loading: bool,
    pub can_submit: bool,
    pub error: Option<String>,
    pub result: Option<ResultView>,
}

pub struct FileView {
    pub name: String,
    pub size_label: String,
}

pub struct ResultView {
    pub filename: String,
    pub summary: String,
    pub key_points: Vec<String>,
    pub word_count: Option<u64>,
}

impl PanelTemplate {
    pub fn from_form(form: &UploadForm, ui: &UiSettings) -> Self {
        let file = form.selected().map(|f| FileView {
            name: f.name.clone(),
            size_label: f.size_label(),
        });

        let result = form.result().map(|r| ResultView {
            // Backend may omit the name; fall back to what was uploaded
            filename: r
                .filename
                .clone()
                .or_else(|| form.selected().map(|f| f.name.clone()))
                .unwrap_or_default(),
            summary: r.summary.clone(),
            key_points: r.key_points.clone(),
            word_count: r.word_count,
        });

        Self {
            dropzone: ui.variant.is_dropzone(),
            accept: ui.variant.accept(),
            max_upload_note_mb: ui.max_upload_note_mb,
            file,
            loading: form.is_loading(),
            can_submit: form.can_submit(),
            error: form.error().map(str::to_string),
            result,
        }
    }
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::BadRequest(anyhow::anyhow!(err.body_text()))
    }
}

fn render(state: &AppState, id: Uuid) -> PanelTemplate {
    PanelTemplate::from_form(&state.forms.snapshot(id), &state.settings.ui)
}

/// Take the first `file` field as the pending upload. A field without a file
/// name (the browser's "nothing chosen") or no field at all clears it.
pub async fn select_file_handler(
    State(state): State<AppState>,
    session: Session,
    mut multipart: Multipart,
) -> Result<PanelTemplate, AppError> {
    let id = form_id(&session).await?;
    let mut selected = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = field.bytes().await.map_err(|e| {
            tracing::error!("Failed to read file {}: {}", file_name, e);
            multipart_error(e)
        })?;

        if !file_name.is_empty() {
            selected = Some(SelectedFile::new(file_name, content_type, data));
        }
        break;
    }

    match &selected {
        Some(file) => tracing::info!(
            form_id = %id,
            file_name = %file.name,
            size = file.size(),
            "File selected"
        ),
        None => tracing::debug!(form_id = %id, "Selection cleared"),
    }

    state.forms.update(id, |form| form.select_file(selected));

    Ok(render(&state, id))
}

/// Forward the pending file to the backend and record the outcome.
pub async fn summarize_handler(
    State(state): State<AppState>,
    session: Session,
    request_id: Option<Extension<RequestId>>,
) -> Result<PanelTemplate, AppError> {
    let id = form_id(&session).await?;
    let variant = state.settings.ui.variant;

    match state.forms.update(id, |form| form.begin_submit(variant)) {
        Ok(submission) => {
            let ticket = submission.clone();
            let request_id = request_id.map(|Extension(r)| r.0);

            // Detached so a closed browser tab cannot strand the form in
            // its loading state.
            let task = tokio::spawn(run_submission(state.clone(), id, submission, request_id));
            if let Err(e) = task.await {
                tracing::error!(form_id = %id, error = %e, "Summarize task failed");
                state.forms.update(id, |form| {
                    form.complete(&ticket, Err(GENERIC_FAILURE_MESSAGE.to_string()))
                });
            }
        }
        Err(FormError::InFlight) => {
            tracing::debug!(form_id = %id, "Ignoring submit while a request is in flight");
        }
        Err(FormError::NoFileSelected) => {
            tracing::debug!(form_id = %id, "Submit without a selected file");
        }
    }

    Ok(render(&state, id))
}

async fn run_submission(
    state: AppState,
    id: Uuid,
    submission: Submission,
    request_id: Option<String>,
) {
    let start = Instant::now();
    let result = state
        .summarizer
        .summarize(&submission.file, request_id.as_deref())
        .await;
    let elapsed = start.elapsed().as_secs_f64();

    let outcome = match result {
        Ok(summary) => {
            record_summarize("success", elapsed);
            tracing::info!(
                form_id = %id,
                file_name = %submission.file.name,
                elapsed_secs = elapsed,
                "Summary received"
            );
            Ok(summary)
        }
        Err(e) => {
            record_summarize(e.kind(), elapsed);
            tracing::warn!(
                form_id = %id,
                file_name = %submission.file.name,
                error = %e,
                "Summarization failed"
            );
            Err(e.user_message())
        }
    };

    let applied = state
        .forms
        .update(id, |form| form.complete(&submission, outcome));
    if !applied {
        tracing::debug!(form_id = %id, "Discarded outcome for a superseded selection");
    }
}

pub async fn reset_handler(
    State(state): State<AppState>,
    session: Session,
) -> Result<PanelTemplate, AppError> {
    let id = form_id(&session).await?;
    state.forms.update(id, |form| form.reset());
    tracing::debug!(form_id = %id, "Form reset");

    Ok(render(&state, id))
}
