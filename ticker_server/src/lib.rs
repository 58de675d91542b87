//! Simulated stock market that ticks on a schedule and pushes every change to
//! subscribers.
//!
//! The core is the [`StockTicker`](ticker::StockTicker), a process-wide
//! coordinator wiring together:
//!
//! - `registry` — the stocks and their current prices, safe for concurrent access.
//! - `price_mutator` — the job that randomly nudges prices once per tick.
//! - `schedule` — the timer thread that runs the job while the market is open.
//! - `notifier` — the sink the ticker announces market events to.
//!
//! Around the core, `hub` broadcasts events to in-process subscribers and `session`
//! exposes the ticker to TCP clients speaking line-delimited JSON.
#![warn(missing_docs)]

pub mod config;
pub mod hub;
pub mod notifier;
pub mod price_mutator;
pub mod registry;
pub mod schedule;
pub mod session;
pub mod ticker;

pub use config::TickerConfig;
pub use hub::BroadcastHub;
pub use notifier::{LogNotifier, Notifier};
pub use ticker::StockTicker;
