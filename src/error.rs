use std::path::PathBuf;

use thiserror::Error;

/// Persistence failures for the file-backed stores.
///
/// Absent or malformed storage is *not* an error at the load boundary; the
/// stores degrade to an empty table there. These variants cover the write
/// path, where losing data silently would be worse than reporting.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to write store '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode store row: {0}")]
    Encode(#[from] csv::Error),
}

/// Configuration resolution failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Narrative advisor failures.
///
/// Callers render these inline and never retry; the advisor is the only
/// component with an external network dependency.
#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error("advisor is disabled: no API key configured")]
    Disabled,

    #[error("request to text-generation service failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("text-generation service error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("text-generation service returned no usable candidate")]
    EmptyResponse,
}
