use std::time::Duration;

use logpane_proto::LogChunk;
use tracing::{debug, info};

use crate::error::FetchError;
use crate::state::{FetchPlan, LogSourceState, commit, plan};

/// What the viewer needs from one poll.
#[derive(Debug, Clone, Default)]
pub struct FetchOutcome {
    /// Previously rendered content can no longer be trusted to be contiguous
    /// with `text`; the caller must clear decoder and display before
    /// appending.
    pub should_reset: bool,
    /// New log text starting at the committed cursor.
    pub text: String,
    /// Whether the observed process is currently alive.
    pub running: bool,
    pub pid: Option<i64>,
    /// Backend-reported error, if any.
    pub error: Option<String>,
}

/// HTTP client for one log source's polling endpoint.
pub struct LogCursorClient {
    client: reqwest::Client,
    url: String,
    state: LogSourceState,
}

impl LogCursorClient {
    /// Create a client for `<base_url>/<source_path>` with the given timeout.
    pub fn new(
        base_url: &str,
        source_path: &str,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url, source_path))
    }

    /// Create from an existing `reqwest::Client` (e.g. shared across panels).
    pub fn with_client(client: reqwest::Client, base_url: &str, source_path: &str) -> Self {
        Self {
            client,
            url: format!(
                "{}/{}",
                base_url.trim_end_matches('/'),
                source_path.trim_start_matches('/')
            ),
            state: LogSourceState::default(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn state(&self) -> &LogSourceState {
        &self.state
    }

    /// Drop all protocol state, as when a panel closes or the user forces a
    /// refresh.
    pub fn reset_state(&mut self) {
        self.state = LogSourceState::default();
    }

    /// Fetch the next slice of log text.
    ///
    /// `forced` reads from offset 0 regardless of the tracked cursor. When a
    /// response reveals that the observed process restarted while we were
    /// reading at a stale nonzero offset, its text is discarded and a single
    /// forced re-fetch runs in its place; that second pass can never recurse
    /// again. On error the cursor state is untouched, so the next call
    /// resumes from the same offset.
    pub async fn fetch(&mut self, forced: bool) -> Result<FetchOutcome, FetchError> {
        let result = match self.fetch_once(forced).await {
            Ok(Some(outcome)) => Ok(outcome),
            Ok(None) => {
                info!("session changed mid-stream, re-fetching {} from zero", self.url);
                match self.fetch_once(true).await {
                    Ok(Some(outcome)) => Ok(outcome),
                    // A forced pass never plans another retry.
                    Ok(None) => Err(FetchError::Protocol(
                        "forced re-fetch deferred again".to_string(),
                    )),
                    Err(e) => Err(e),
                }
            }
            Err(e) => Err(e),
        };

        if let Err(e) = &result {
            self.state.last_error = e.to_string();
        }
        result
    }

    async fn fetch_once(&mut self, forced: bool) -> Result<Option<FetchOutcome>, FetchError> {
        let since = if forced { 0 } else { self.state.cursor_offset };
        let url = format!("{}?since={}", self.url, since);
        debug!("polling {url}");

        let resp = self.client.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(FetchError::Status { status, body });
        }

        let body = resp.text().await?;
        let chunk: LogChunk = serde_json::from_str(&body)?;

        if chunk.to < since {
            return Err(FetchError::Protocol(format!(
                "cursor moved backwards: to={} < since={since}",
                chunk.to
            )));
        }

        match plan(&self.state, &chunk, forced) {
            FetchPlan::RetryFromZero => {
                self.state.cursor_offset = 0;
                Ok(None)
            }
            FetchPlan::Commit { should_reset } => {
                commit(&mut self.state, &chunk);
                Ok(Some(FetchOutcome {
                    should_reset,
                    text: chunk.text,
                    running: chunk.running,
                    pid: chunk.pid,
                    error: chunk.error,
                }))
            }
        }
    }
}
