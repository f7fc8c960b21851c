pub mod config;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod startup;
pub mod utils;

use config::Settings;
use services::{form_store::FormStore, summarizer_client::SummarizerClient};
use std::sync::Arc;

/// Shared application state: backend client, per-browser forms, settings.
#[derive(Clone)]
pub struct AppState {
    pub summarizer: Arc<SummarizerClient>,
    pub forms: FormStore,
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(settings: Settings) -> anyhow::Result<Self> {
        let summarizer = SummarizerClient::new(settings.summarizer.clone())?;

        Ok(Self {
            summarizer: Arc::new(summarizer),
            forms: FormStore::new(),
            settings: Arc::new(settings),
        })
    }
}
