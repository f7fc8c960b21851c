use serde::{Deserialize, Deserializer, Serialize};

/// Shown when the backend gives no usable `detail`.
pub const GENERIC_FAILURE_MESSAGE: &str = "Error summarizing file";

/// Success body of `POST /summarize`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryResult {
    pub summary: String,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub key_points: Vec<String>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub word_count: Option<u64>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts any JSON number; fractional counts are rounded and negative ones
/// dropped.
fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let number = Option::<serde_json::Number>::deserialize(deserializer)?;
    Ok(number.and_then(|n| {
        n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0)
                .map(|f| f.round() as u64)
        })
    }))
}

/// Error body of `POST /summarize`.
///
/// `detail` is kept as raw JSON: validation failures carry a list there, and
/// only a plain, non-empty string is meant for the user.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    pub fn message(&self) -> Option<&str> {
        self.detail
            .as_ref()
            .and_then(|d| d.as_str())
            .filter(|d| !d.is_empty())
    }
}
