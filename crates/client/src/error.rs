use thiserror::Error;

/// Failure of one poll against the log endpoint.
///
/// Every variant leaves the cursor state untouched, so the next tick retries
/// from the same offset: no data is skipped, and nothing is delivered twice
/// once a fetch eventually succeeds.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("transport: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("backend returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("protocol violation: {0}")]
    Protocol(String),
}
