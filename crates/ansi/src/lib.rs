//! Incremental ANSI/SGR decoding for the live log panel.
//!
//! The decoder turns raw process-log text into HTML-safe fragments with
//! terminal colors and attributes resolved to inline styles. It is a pure
//! leaf with no I/O and no shared state: one instance per log source, owned
//! and reset by the viewer that drives it.

pub mod color;
pub mod decoder;
pub mod html;

pub use color::{Rgb, ansi16_to_rgb, ansi256_to_rgb};
pub use decoder::{AnsiStreamDecoder, StyleState};
pub use html::{escape, strip_markup};
