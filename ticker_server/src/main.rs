//! Stock ticker TCP server.
//!
//! This binary installs the process-wide `StockTicker` with a `BroadcastHub` as its
//! notifier and serves TCP clients. Internally, it wires together:
//!
//! - `StockTicker` — owns the market state, the stocks and the price schedule.
//! - `BroadcastHub` — fans every market event out to all connected clients.
//! - Per-client session — reads commands, replies, and forwards hub events to the
//!   client's socket.
//!
//! Network protocol (high-level):
//! - Bind address: `0.0.0.0:8090` by default (see `COMMAND_PORT`).
//! - Client sends one JSON command per line, e.g. `{"command":"openMarket"}`.
//! - Server answers each command and streams `event` messages such as
//!   `updateStockPrice` to every connected client.
#![warn(missing_docs)]
use clap::Parser;
use log::info;
use std::net::TcpListener;
use std::path::PathBuf;
use std::sync::Arc;
use ticker_common::Result;
use ticker_common::net::{COMMAND_PORT, addr};
use ticker_server::session::serve;
use ticker_server::{BroadcastHub, StockTicker, TickerConfig};

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Args {
    /// Address to listen on for client connections.
    #[clap(long)]
    bind: Option<String>,

    /// Path to a JSON file with ticker settings.
    #[clap(long)]
    config: Option<PathBuf>,

    /// Seed for the price random walk; overrides the config file.
    #[clap(long)]
    seed: Option<u64>,

    /// Open the market right after startup.
    #[clap(long)]
    open: bool,
}

fn main() -> Result<()> {
    init_logger();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => TickerConfig::from_file(path)?,
        None => TickerConfig::default(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    info!("Ticker settings: {:?}", config);

    let hub = Arc::new(BroadcastHub::new());
    let ticker = StockTicker::install(&config, hub.clone())?;
    if args.open {
        ticker.open();
    }

    let bind = args.bind.unwrap_or_else(|| addr("0.0.0.0", COMMAND_PORT));
    let listener = TcpListener::bind(&bind)?;
    serve(listener, ticker, hub)
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
