//!
//! Common types and utilities shared by the ticker server and client.
//!
//! This crate aggregates:
//! - `error` — unified error type `TickerError` used across the workspace.
//! - `result` — handy `Result<T, TickerError>` alias.
//! - `stock` — the `Stock` model and decimal price helpers.
//! - `market` — `MarketState` and the `MarketEvent`s pushed to subscribers.
//! - `command` — protocol messages exchanged between client and server.
//! - `codec` — line-delimited JSON framing.
//! - `net` — networking constants and small helpers.
#![warn(missing_docs)]
pub mod codec;
pub mod command;
pub mod error;
pub mod market;
pub mod net;
pub mod result;
pub mod stock;

pub use command::{ClientCommand, ServerMessage};
pub use error::TickerError;
pub use market::{MarketEvent, MarketState};
pub use result::Result;
pub use stock::Stock;
