use std::time::Duration;

use logpane_ansi::AnsiStreamDecoder;
use logpane_client::{FetchError, FetchOutcome, LogCursorClient};
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use crate::config::ViewerConfig;
use crate::follow::FollowState;
use crate::sink::DisplaySink;

/// Seam between the viewer loop and the HTTP client, so the loop can be
/// driven from a scripted source in tests.
#[allow(async_fn_in_trait)]
pub trait ChunkFetcher {
    async fn fetch(&mut self, forced: bool) -> Result<FetchOutcome, FetchError>;
    /// Drop cursor/session state ahead of a forced refresh.
    fn reset(&mut self);
}

impl ChunkFetcher for LogCursorClient {
    async fn fetch(&mut self, forced: bool) -> Result<FetchOutcome, FetchError> {
        LogCursorClient::fetch(self, forced).await
    }

    fn reset(&mut self) {
        self.reset_state();
    }
}

/// One live log panel: the poll loop wiring a cursor client to a decoder and
/// a display sink.
pub struct LogViewer<F = LogCursorClient> {
    fetcher: F,
    decoder: AnsiStreamDecoder,
    follow: FollowState,
    poll_interval: Duration,
}

impl<F: ChunkFetcher> LogViewer<F> {
    pub fn new(fetcher: F, config: &ViewerConfig) -> Self {
        Self {
            fetcher,
            decoder: AnsiStreamDecoder::new(),
            follow: FollowState::new(config.autoscroll),
            poll_interval: Duration::from_millis(config.poll_interval_ms.max(1)),
        }
    }

    pub fn follow_mut(&mut self) -> &mut FollowState {
        &mut self.follow
    }

    /// One poll tick: fetch, reset display state if continuity broke,
    /// decode, append.
    pub async fn poll_once(&mut self, sink: &mut dyn DisplaySink) {
        let result = self.fetcher.fetch(false).await;
        self.apply(result, sink);
    }

    /// Manual refresh: an explicit local reset regardless of server signals,
    /// then a forced fetch from offset zero.
    pub async fn refresh(&mut self, sink: &mut dyn DisplaySink) {
        sink.clear();
        self.decoder.reset();
        self.fetcher.reset();
        let result = self.fetcher.fetch(true).await;
        self.apply(result, sink);
    }

    /// The sink's rendered content as plain text, for the clipboard.
    pub fn copy_text(&self, sink: &dyn DisplaySink) -> String {
        sink.text()
    }

    /// Poll on a fixed interval until `shutdown` flips to true.
    ///
    /// A tick that fires while a fetch is still in flight is skipped rather
    /// than queued; a fetch in flight when shutdown lands is allowed to
    /// finish but its result is discarded.
    pub async fn run(&mut self, sink: &mut dyn DisplaySink, mut shutdown: watch::Receiver<bool>) {
        let mut tick = tokio::time::interval(self.poll_interval);
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = tick.tick() => {
                    let result = self.fetcher.fetch(false).await;
                    if *shutdown.borrow() {
                        debug!("viewer stopped mid-fetch, discarding result");
                        break;
                    }
                    self.apply(result, sink);
                }
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        debug!("viewer stopping");
                        break;
                    }
                }
            }
        }
    }

    /// Errors never stop the loop: the status line degrades and the next
    /// tick retries from the same offset.
    fn apply(&mut self, result: Result<FetchOutcome, FetchError>, sink: &mut dyn DisplaySink) {
        match result {
            Ok(outcome) => {
                if outcome.should_reset {
                    sink.clear();
                    self.decoder.reset();
                }
                if !outcome.text.is_empty() {
                    let fragment = self.decoder.decode(&outcome.text);
                    sink.append_html(&fragment);
                    if self.follow.should_scroll() {
                        sink.scroll_to_end();
                    }
                }
                match outcome.error {
                    Some(err) => sink.set_status(&format!("backend: {err}")),
                    None => sink.set_status(""),
                }
            }
            Err(e) => {
                warn!("log fetch failed: {e}");
                sink.set_status(&format!(
                    "error: {e} ({})",
                    chrono::Local::now().format("%H:%M:%S")
                ));
            }
        }
    }
}
