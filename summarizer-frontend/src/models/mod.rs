pub mod summary;
pub mod upload;

pub use summary::{ErrorBody, SummaryResult, GENERIC_FAILURE_MESSAGE};
pub use upload::{
    FormError, FormVariant, Outcome, SelectedFile, Submission, UploadForm, NO_FILE_MESSAGE,
};
