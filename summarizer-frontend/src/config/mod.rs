use crate::models::upload::FormVariant;
use serde::Deserialize;
use std::path::PathBuf;

/// Environment variable holding the summarization backend's base URL.
pub const BASE_URL_ENV: &str = "SUMMARIZER_BASE_URL";

/// Used when neither the config file nor the environment name a backend.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

#[derive(Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub summarizer: SummarizerSettings,
    pub ui: UiSettings,
    pub telemetry: TelemetrySettings,
}

#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Upper bound on request bodies, sized above the advisory upload note.
    pub max_body_bytes: usize,
    /// Per-browser form state is dropped after this much inactivity.
    pub session_idle_minutes: u64,
    pub static_dir: PathBuf,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            max_body_bytes: 25 * 1024 * 1024,
            session_idle_minutes: 60,
            static_dir: PathBuf::from("summarizer-frontend/static"),
        }
    }
}

#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct SummarizerSettings {
    /// Base URL of the summarization backend; `/summarize` is appended.
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for SummarizerSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 120,
        }
    }
}

#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct UiSettings {
    pub title: String,
    pub variant: FormVariant,
    /// Size shown in the "max size" note. Not enforced.
    pub max_upload_note_mb: u64,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            title: "Document Summarizer".to_string(),
            variant: FormVariant::default(),
            max_upload_note_mb: 10,
        }
    }
}

#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct TelemetrySettings {
    pub log_level: String,
    /// OTLP gRPC endpoint; span export is off when unset.
    pub otlp_endpoint: Option<String>,
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            otlp_endpoint: None,
        }
    }
}

/// `APP_` prefixed variables with `__` between nested keys, e.g.
/// `APP_SERVER__PORT=8080` or `APP_UI__VARIANT=classic`.
fn environment() -> config::Environment {
    config::Environment::with_prefix("APP")
        .prefix_separator("_")
        .separator("__")
}

/// Layer defaults, `config/base.yaml`, `APP_SERVER__PORT`-style variables and
/// finally `SUMMARIZER_BASE_URL`.
pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path =
        std::env::current_dir().map_err(|e| config::ConfigError::Foreign(Box::new(e)))?;

    // Running from the crate directory or from the workspace root
    let crate_root = if base_path.ends_with("summarizer-frontend") {
        base_path
    } else {
        base_path.join("summarizer-frontend")
    };

    let settings = config::Config::builder()
        .set_default(
            "server.static_dir",
            crate_root.join("static").to_string_lossy().to_string(),
        )?
        .add_source(
            config::File::from(crate_root.join("config").join("base.yaml")).required(false),
        )
        .add_source(environment())
        .set_override_option("summarizer.base_url", std::env::var(BASE_URL_ENV).ok())?
        .build()?;

    settings.try_deserialize::<Settings>()
}
