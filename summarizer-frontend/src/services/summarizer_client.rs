//! Client for the external summarization backend.
//!
//! One `POST {base_url}/summarize` per call. No retries: a failure is
//! reported to the user as-is.

use crate::config::SummarizerSettings;
use crate::models::{ErrorBody, SelectedFile, SummaryResult, GENERIC_FAILURE_MESSAGE};
use reqwest::{multipart, Client, StatusCode};
use service_core::observability::TracedClientExt;
use std::time::Duration;
use thiserror::Error;

/// Name of the multipart field the backend reads the upload from.
pub const FILE_FIELD: &str = "file";

#[derive(Debug, Error)]
pub enum SummarizeError {
    #[error("request to summarization backend failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("summarization backend returned {status}")]
    Rejected {
        status: StatusCode,
        detail: Option<String>,
    },

    #[error("summarization backend returned an unreadable body: {0}")]
    MalformedBody(String),
}

impl SummarizeError {
    /// Text shown in the form: the backend's `detail` when it sent one,
    /// the generic failure message otherwise.
    pub fn user_message(&self) -> String {
        match self {
            SummarizeError::Rejected {
                detail: Some(detail),
                ..
            } => detail.clone(),
            _ => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }

    /// Label for the outcome metric.
    pub fn kind(&self) -> &'static str {
        match self {
            SummarizeError::Network(_) => "network",
            SummarizeError::Rejected { .. } => "rejected",
            SummarizeError::MalformedBody(_) => "malformed",
        }
    }
}

pub struct SummarizerClient {
    client: Client,
    settings: SummarizerSettings,
}

impl SummarizerClient {
    pub fn new(settings: SummarizerSettings) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {}", e))?;

        Ok(Self { client, settings })
    }

    pub fn base_url(&self) -> &str {
        self.settings.base_url.trim_end_matches('/')
    }

    pub fn summarize_url(&self) -> String {
        format!("{}/summarize", self.base_url())
    }

    /// Upload `file` and parse the summary.
    ///
    /// `request_id` is forwarded as `x-request-id` so backend logs can be
    /// correlated with ours.
    #[tracing::instrument(
        skip(self, file),
        fields(file_name = %file.name, size = file.size())
    )]
    pub async fn summarize(
        &self,
        file: &SelectedFile,
        request_id: Option<&str>,
    ) -> Result<SummaryResult, SummarizeError> {
        let part = multipart::Part::stream_with_length(file.bytes.clone(), file.size())
            .file_name(file.name.clone())
            .mime_str(&file.content_type)
            .or_else(|_| {
                multipart::Part::stream_with_length(file.bytes.clone(), file.size())
                    .file_name(file.name.clone())
                    .mime_str("application/octet-stream")
            })?;
        let form = multipart::Form::new().part(FILE_FIELD, part);

        let url = self.summarize_url();
        let request = self.client.traced_post(&url).multipart(form);
        let response = match request_id {
            Some(id) => request.send_with_request_id(id).await,
            None => request.send().await,
        }
        .map_err(|e| {
            tracing::error!("Failed to send POST request to {}: {}", url, e);
            SummarizeError::Network(e)
        })?;

        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let detail = serde_json::from_slice::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.message().map(str::to_string));
            tracing::warn!(
                status = %status,
                detail = detail.as_deref().unwrap_or("-"),
                "Summarization backend rejected the upload"
            );
            return Err(SummarizeError::Rejected { status, detail });
        }

        serde_json::from_slice::<SummaryResult>(&body).map_err(|e| {
            tracing::error!("Failed to parse summary response: {}", e);
            SummarizeError::MalformedBody(e.to_string())
        })
    }

    /// Probe the backend's `/health` endpoint.
    pub async fn health(&self) -> Result<(), SummarizeError> {
        let url = format!("{}/health", self.base_url());
        let response = self
            .client
            .traced_get(&url)
            .timeout(Duration::from_secs(5))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(SummarizeError::Rejected {
                status,
                detail: None,
            })
        }
    }
}
