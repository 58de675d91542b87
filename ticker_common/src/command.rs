//! Protocol messages exchanged between client and server.
//!
//! A client sends one `ClientCommand` per line, mirroring the ticker's public
//! operations. The server answers each command with exactly one `ServerMessage`
//! and interleaves `ServerMessage::Event` for every broadcast market event.
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::market::{MarketEvent, MarketState};
use crate::stock::Stock;

/// Command sent by a client.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ValueEnum,
    Display,
    EnumString,
)]
#[serde(tag = "command", rename_all = "camelCase")]
#[clap(rename_all = "kebab-case")]
#[strum(serialize_all = "camelCase", ascii_case_insensitive)]
pub enum ClientCommand {
    /// List every stock with its current price.
    GetAllStocks,
    /// Report whether the market is open or closed.
    GetMarketState,
    /// Open the market and start ticking.
    OpenMarket,
    /// Close the market and stop ticking.
    CloseMarket,
    /// Reload default prices; only valid while closed.
    Reset,
}

/// Message sent by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMessage {
    /// Reply to `getAllStocks`.
    Stocks {
        /// Snapshot of every stock.
        stocks: Vec<Stock>,
    },
    /// Reply to `getMarketState`.
    MarketState {
        /// Current market state.
        state: MarketState,
    },
    /// A state-changing command was applied.
    Ack {
        /// The command being acknowledged.
        command: ClientCommand,
    },
    /// The command failed or could not be parsed.
    Error {
        /// Human-readable reason.
        message: String,
    },
    /// A broadcast market event.
    Event {
        /// UTC timestamp in milliseconds since Unix epoch, stamped when sent.
        timestamp: i64,
        /// The event itself.
        event: MarketEvent,
    },
}
