//! Ticker Client — a TCP client for the stock ticker server. It sends a single
//! command (list stocks, query the market state, open, close or reset the market),
//! prints the server's reply and, with `--watch`, keeps printing every market event
//! the server broadcasts until Ctrl+C.
//!
//! Usage example (CLI):
//! ```bash
//! ticker_client --server-ip 192.168.0.10 open-market --watch
//! ```
#![warn(missing_docs)]
mod args;

use crate::args::Args;
use chrono::DateTime;
use clap::Parser;
use log::{error, info};
use std::io::{BufReader, BufWriter};
use std::net::{Shutdown, TcpStream};
use ticker_common::codec::{read_message, write_message};
use ticker_common::{MarketEvent, Result, ServerMessage};

fn main() -> Result<()> {
    init_logger();
    let args = Args::parse();
    let server_ip = args.server_ip.trim().replace('"', "");

    info!("Connecting to ticker server at {}:{}", server_ip, args.port);
    let stream = TcpStream::connect((server_ip.as_str(), args.port))?;
    {
        // Closing the socket ends the blocking read below.
        let stream = stream.try_clone()?;
        if let Err(e) = ctrlc::set_handler(move || {
            info!("Ctrl+C received. Shutting down client...");
            let _ = stream.shutdown(Shutdown::Both);
        }) {
            error!("Failed to set Ctrl+C handler: {}", e);
        }
    }

    let mut writer = BufWriter::new(stream.try_clone()?);
    let mut reader = BufReader::new(stream);

    info!("Sending command: {}", args.command);
    write_message(&mut writer, &args.command)?;

    loop {
        let message: Option<ServerMessage> = match read_message(&mut reader) {
            Ok(message) => message,
            Err(e) if args.watch => {
                info!("Connection closed: {}", e);
                break;
            }
            Err(e) => return Err(e),
        };
        let Some(message) = message else {
            info!("Server closed the connection");
            break;
        };
        let is_reply = !matches!(message, ServerMessage::Event { .. });
        print_message(message);
        if is_reply && !args.watch {
            break;
        }
    }
    Ok(())
}

fn print_message(message: ServerMessage) {
    match message {
        ServerMessage::Stocks { stocks } => {
            for stock in stocks {
                info!("STOCK: {} Price={}", stock.symbol, stock.price);
            }
        }
        ServerMessage::MarketState { state } => info!("MARKET: {}", state),
        ServerMessage::Ack { command } => info!("OK: {}", command),
        ServerMessage::Error { message } => error!("SERVER ERROR: {}", message),
        ServerMessage::Event { timestamp, event } => {
            let time = DateTime::from_timestamp_millis(timestamp)
                .map(|t| t.format("%H:%M:%S%.3f").to_string())
                .unwrap_or_else(|| timestamp.to_string());
            match event {
                MarketEvent::MarketOpened => info!("[{}] Market opened", time),
                MarketEvent::MarketClosed => info!("[{}] Market closed", time),
                MarketEvent::MarketReset => info!("[{}] Market reset", time),
                MarketEvent::UpdateStockPrice { stock } => {
                    info!("[{}] QUOTE: {} Price={}", time, stock.symbol, stock.price)
                }
            }
        }
    }
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
