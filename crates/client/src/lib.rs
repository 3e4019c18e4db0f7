//! Cursor-tracking HTTP client for the log polling endpoint.
//!
//! One [`LogCursorClient`] per log source. It remembers how far into the
//! stream the panel has read (`cursor_offset`) and which process instance
//! produced it (`session_id`/`started_at`), and tells the caller when
//! accumulated output must be discarded because continuity broke: the backend
//! lost buffer, the observed process restarted, or the panel is reading from
//! scratch.

mod client;
mod error;
mod state;

pub use client::{FetchOutcome, LogCursorClient};
pub use error::FetchError;
pub use state::LogSourceState;
