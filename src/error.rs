use thiserror::Error;

/// Failure taxonomy for the evidence pipeline.
///
/// Remote failures carry the offending URL (and, where available, the raw
/// response body) as structured fields so diagnostics stay intact without
/// relying on format-argument ordering.
#[derive(Error, Debug)]
pub enum SonarEvidenceError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned status {status}, response body: {body}")]
    RemoteStatus { url: String, status: u16, body: String },

    #[error("Failed to decode response from {url}: {source}, response body: {body}")]
    Parse {
        url: String,
        body: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize evidence: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SonarEvidenceError>;
