//! Shared wire types for the log polling endpoint.
//!
//! This crate is the **single source of truth** for the shapes exchanged with
//! the console backend's `GET <logs-path>?since=<offset>` endpoint. The client
//! and viewer crates import these types directly; TypeScript types are
//! auto-generated via `ts-rs` and consumed by the console frontend.
//!
//! To regenerate TypeScript types:
//!   cargo test -p logpane-proto -- export_bindings --nocapture

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ─── Log chunks ──────────────────────────────────────────────────────────────

/// Query string for the polling endpoint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LogQuery {
    /// Byte offset the caller has already consumed; the response starts here.
    #[serde(default)]
    pub since: u64,
}

/// One incremental slice of process-log output.
///
/// `to` is the next cursor value and is always ≥ the requested `since` within
/// one session. `session` and `startedAt` identify the process instance the
/// slice was read from; either changing means the backend restarted the
/// observed process. All fields are defaulted so a sparse backend response
/// still deserializes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LogChunk {
    /// UTF-8 log text starting at the requested `since` offset.
    #[serde(default)]
    pub text: String,
    /// New cursor value to poll from next.
    #[serde(default)]
    pub to: u64,
    /// Opaque process-instance identifier; 0 = unknown.
    #[serde(default)]
    pub session: u64,
    /// ISO-8601 start time of the current process instance, or empty.
    /// Compared as an opaque string, never parsed.
    #[serde(default)]
    pub started_at: String,
    /// True when the backend could not guarantee gapless delivery from `since`
    /// (its ring buffer wrapped past the caller's offset).
    #[serde(default)]
    pub lost: bool,
    /// Whether the observed process is currently alive.
    #[serde(default)]
    pub running: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pid: Option<i64>,
    /// Backend-reported error, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
