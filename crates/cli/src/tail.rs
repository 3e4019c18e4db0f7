use std::io::Write;
use std::time::Duration;

use anyhow::{Context, Result};
use logpane_ansi::strip_markup;
use logpane_client::LogCursorClient;
use logpane_viewer::{DisplaySink, LogViewer};
use tokio::sync::watch;
use tracing::info;

use crate::config_cmd::load_config;

/// Streams fragments straight to stdout; status and reset markers go to
/// stderr so piped output stays clean.
struct StdoutSink {
    plain: bool,
    text: String,
}

impl DisplaySink for StdoutSink {
    fn append_html(&mut self, fragment: &str) {
        if self.plain {
            print!("{}", strip_markup(fragment));
        } else {
            print!("{fragment}");
        }
        let _ = std::io::stdout().flush();
        self.text.push_str(&strip_markup(fragment));
    }

    fn clear(&mut self) {
        // A terminal stream cannot unprint; mark the discontinuity instead.
        if !self.text.is_empty() {
            println!();
            eprintln!("-- log restarted --");
        }
        self.text.clear();
    }

    fn scroll_to_end(&mut self) {}

    fn set_status(&mut self, status: &str) {
        if !status.is_empty() {
            eprintln!("{status}");
        }
    }

    fn text(&self) -> String {
        self.text.clone()
    }
}

pub async fn run_tail(
    url: &str,
    source: &str,
    interval_ms: Option<u64>,
    plain: bool,
) -> Result<()> {
    let mut config = load_config()?;
    if let Some(ms) = interval_ms {
        config.poll_interval_ms = ms;
    }

    let client = LogCursorClient::new(
        url,
        &format!("api/logs/{source}"),
        Duration::from_secs(config.http_timeout_secs),
    )
    .context("cannot build HTTP client")?;
    info!(
        "following {} every {}ms",
        client.url(),
        config.poll_interval_ms
    );

    let mut viewer = LogViewer::new(client, &config);
    let mut sink = StdoutSink {
        plain,
        text: String::new(),
    };

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        let _ = shutdown_tx.send(true);
    });

    viewer.run(&mut sink, shutdown_rx).await;
    println!();
    Ok(())
}
