//! Live log panel orchestration.
//!
//! A [`LogViewer`] owns one decoder and one cursor client per log source and
//! drives the fixed-interval poll loop between them: fetch, reset display
//! state when stream continuity broke, decode, append, autoscroll. Kernel-log
//! and app-log panels are independent `LogViewer` instances sharing nothing.

mod config;
mod follow;
mod sink;
mod viewer;

pub use config::{CONFIG_FILE_NAME, ViewerConfig};
pub use follow::FollowState;
pub use sink::{DisplaySink, HtmlBuffer};
pub use viewer::{ChunkFetcher, LogViewer};
