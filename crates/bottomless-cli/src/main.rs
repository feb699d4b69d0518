//! Bottomless demo
//!
//! Drives the pagination controller against a simulated viewport and an
//! in-memory page source: a reader loop scrolls toward the bottom, the
//! controller fires debounced page triggers, and the run ends once the
//! source is exhausted.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use bottomless_core::{PagerBuilder, PagerConfig};
use clap::Parser;
use tracing::info;

mod sim;

use sim::{LogIndicator, SimFetcher, SimSink, SimViewport};

/// Bottomless - infinite-scroll pagination controller demo
#[derive(Parser)]
#[command(name = "bottomless")]
#[command(about = "Infinite-scroll pagination controller demo", long_about = None)]
struct Cli {
    /// Total items the simulated source holds
    #[arg(long, default_value_t = 87)]
    total_items: usize,

    /// Items per page
    #[arg(long, default_value_t = 20)]
    page_size: u32,

    /// Polling cadence in milliseconds
    #[arg(long, default_value_t = 250)]
    poll_interval_ms: u64,

    /// Minimum spacing between triggers in milliseconds
    #[arg(long, default_value_t = 150)]
    min_trigger_interval_ms: u64,

    /// Simulated fetch latency in milliseconds
    #[arg(long, default_value_t = 120)]
    fetch_latency_ms: u64,

    /// Load the controller config from a TOML file instead of the flags
    #[arg(long)]
    config: Option<std::path::PathBuf>,
}

impl Cli {
    fn pager_config(&self) -> Result<PagerConfig> {
        let config = match &self.config {
            Some(path) => toml::from_str(&std::fs::read_to_string(path)?)?,
            None => PagerConfig {
                page_size: self.page_size,
                poll_interval_ms: self.poll_interval_ms,
                min_trigger_interval_ms: self.min_trigger_interval_ms,
                ..PagerConfig::default()
            },
        };
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.pager_config()?;

    let viewport = Arc::new(SimViewport::new(600.0));
    let fetcher = Arc::new(SimFetcher::new(
        cli.total_items,
        Duration::from_millis(cli.fetch_latency_ms),
    ));
    let sink = Arc::new(SimSink::new(viewport.clone()));

    let mut handle = PagerBuilder::new(config)
        .viewport(viewport.clone())
        .fetcher(fetcher)
        .sink(sink)
        .indicator(Arc::new(LogIndicator))
        .attach()?;

    info!(total_items = cli.total_items, "scrolling until the source is exhausted");

    let mut reader = tokio::time::interval(Duration::from_millis(60));
    loop {
        tokio::select! {
            _ = reader.tick() => {
                viewport.scroll_down(80.0);
            }
            advance = handle.next_advance() => {
                match advance {
                    Some(advance) => info!(
                        page = advance.page,
                        offset = advance.window.offset,
                        "advance"
                    ),
                    None => break,
                }
            }
        }

        let status = handle.status();
        if status.exhausted {
            info!(pages = status.fire_count, "source exhausted, detaching");
            break;
        }
    }

    handle.detach();
    Ok(())
}
