//! View state of the upload form.
//!
//! One `UploadForm` exists per browser session. Handlers mutate it in
//! response to user events; the panel template renders it.

use super::summary::SummaryResult;
use axum::body::Bytes;
use serde::Deserialize;

/// Validation message for a submit without a selected file.
pub const NO_FILE_MESSAGE: &str = "Please select a file";

/// Extensions offered by the drag-and-drop variant's file picker.
const DROPZONE_ACCEPT: &str = ".pdf,.txt,.md,.csv,.json,.html,.xml,.rtf,.doc,.docx,.odt,\
.png,.jpg,.jpeg,.gif,.webp,.bmp";

const CLASSIC_ACCEPT: &str = ".pdf,.txt";

/// The two flavours of the form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormVariant {
    /// Plain file input for PDF/TXT. Submitting without a file reports
    /// `NO_FILE_MESSAGE`.
    Classic,
    /// Drag-and-drop surface with a wider allow-list and a size note.
    /// Submitting without a file does nothing.
    #[default]
    Dropzone,
}

impl FormVariant {
    /// Value of the file input's `accept` attribute. Client-side only.
    pub fn accept(&self) -> &'static str {
        match self {
            FormVariant::Classic => CLASSIC_ACCEPT,
            FormVariant::Dropzone => DROPZONE_ACCEPT,
        }
    }

    pub fn is_dropzone(&self) -> bool {
        matches!(self, FormVariant::Dropzone)
    }
}

/// A file picked by the user, held in memory until replaced or reset.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Bytes) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn size_label(&self) -> String {
        human_size(self.size())
    }
}

fn human_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;

    let b = bytes as f64;
    if b < KB {
        format!("{} B", bytes)
    } else if b < MB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{:.2} MB", b / MB)
    }
}

/// Result or error of the last submission. A single slot keeps the two
/// mutually exclusive.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Summary(SummaryResult),
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("no file selected")]
    NoFileSelected,
    #[error("a summarize request is already in flight")]
    InFlight,
}

/// Ticket handed out by `UploadForm::begin_submit`.
#[derive(Debug, Clone)]
pub struct Submission {
    revision: u64,
    pub file: SelectedFile,
}

#[derive(Debug, Clone, Default)]
pub struct UploadForm {
    selected: Option<SelectedFile>,
    loading: bool,
    outcome: Option<Outcome>,
    // Bumped by every selection and reset so a response that outlives them
    // is dropped instead of overwriting the newer state.
    revision: u64,
}

impl UploadForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the pending file (`None` clears it). Clears result and error.
    pub fn select_file(&mut self, file: Option<SelectedFile>) {
        self.selected = file;
        self.outcome = None;
        self.revision += 1;
    }

    pub fn begin_submit(&mut self, variant: FormVariant) -> Result<Submission, FormError> {
        if self.loading {
            return Err(FormError::InFlight);
        }

        let Some(file) = self.selected.clone() else {
            if variant == FormVariant::Classic {
                self.outcome = Some(Outcome::Failed(NO_FILE_MESSAGE.to_string()));
            }
            return Err(FormError::NoFileSelected);
        };

        self.outcome = None;
        self.loading = true;

        Ok(Submission {
            revision: self.revision,
            file,
        })
    }

    /// Finish a submission. The loading flag always drops; the outcome is
    /// applied only if nothing was selected or reset in the meantime.
    ///
    /// Returns whether the outcome was applied.
    pub fn complete(
        &mut self,
        submission: &Submission,
        result: Result<SummaryResult, String>,
    ) -> bool {
        self.loading = false;

        if submission.revision != self.revision {
            return false;
        }

        self.outcome = Some(match result {
            Ok(summary) => Outcome::Summary(summary),
            Err(message) => Outcome::Failed(message),
        });
        true
    }

    /// Back to the initial empty form. A request still in flight keeps the
    /// form loading until it returns; its outcome is discarded.
    pub fn reset(&mut self) {
        self.selected = None;
        self.outcome = None;
        self.revision += 1;
    }

    pub fn can_submit(&self) -> bool {
        self.selected.is_some() && !self.loading
    }

    pub fn selected(&self) -> Option<&SelectedFile> {
        self.selected.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn result(&self) -> Option<&SummaryResult> {
        match &self.outcome {
            Some(Outcome::Summary(result)) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            Some(Outcome::Failed(message)) => Some(message),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_none() && self.outcome.is_none() && !self.loading
    }
}
