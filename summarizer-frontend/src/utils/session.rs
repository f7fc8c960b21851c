use service_core::error::AppError;
use tower_sessions::Session;
use uuid::Uuid;

/// Session key holding the id of this browser's upload form.
pub const FORM_ID_KEY: &str = "form_id";

/// Id of the caller's form, minted and stored in the session on first use.
pub async fn form_id(session: &Session) -> Result<Uuid, AppError> {
    let existing: Option<Uuid> = session
        .get(FORM_ID_KEY)
        .await
        .map_err(|e| AppError::SessionError(anyhow::anyhow!(e)))?;

    if let Some(id) = existing {
        return Ok(id);
    }

    let id = Uuid::new_v4();
    session
        .insert(FORM_ID_KEY, id)
        .await
        .map_err(|e| AppError::SessionError(anyhow::anyhow!(e)))?;
    tracing::debug!(form_id = %id, "Started new upload form");

    Ok(id)
}
