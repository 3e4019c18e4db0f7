//! Viewer configuration, persisted as `logpane.toml`.

use serde::{Deserialize, Serialize};

/// Canonical config file name used by the CLI and the console shell.
pub const CONFIG_FILE_NAME: &str = "logpane.toml";

/// Tunables shared by every log panel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ViewerConfig {
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
    #[serde(default = "default_true")]
    pub autoscroll: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            http_timeout_secs: default_http_timeout_secs(),
            autoscroll: true,
        }
    }
}

// ── Serde default functions ─────────────────────────────────────────────

fn default_poll_interval_ms() -> u64 {
    1000
}
fn default_http_timeout_secs() -> u64 {
    10
}
fn default_true() -> bool {
    true
}
