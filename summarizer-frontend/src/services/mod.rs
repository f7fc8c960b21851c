pub mod form_store;
pub mod metrics;
pub mod summarizer_client;
