mod config_cmd;
mod tail;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "logpane", about = "Live log panel driver for the management console")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Follow a backend log source and print rendered output
    Tail {
        /// Backend base URL, e.g. http://127.0.0.1:8080
        url: String,

        /// Log source to follow (app, kernel, ...)
        #[arg(long, default_value = "app")]
        source: String,

        /// Override the poll interval from logpane.toml
        #[arg(long)]
        interval_ms: Option<u64>,

        /// Print plain text instead of HTML fragments
        #[arg(long)]
        plain: bool,
    },

    /// Show the effective viewer configuration
    Config,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Tail {
            url,
            source,
            interval_ms,
            plain,
        } => tail::run_tail(&url, &source, interval_ms, plain).await,
        Commands::Config => config_cmd::show_config(),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
