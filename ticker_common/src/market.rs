//! Market state and the events broadcast to subscribers.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::stock::Stock;

/// Two possible states of the market. A fresh market is `Closed`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum MarketState {
    /// Prices are frozen; the market may be reset.
    #[default]
    Closed,
    /// Prices tick on the schedule.
    Open,
}

/// Event pushed to every subscriber.
///
/// Serialized with a `type` tag using the same names clients listen for:
/// `marketOpened`, `marketClosed`, `marketReset` and `updateStockPrice`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum MarketEvent {
    /// The market transitioned to `Open`.
    MarketOpened,
    /// The market transitioned to `Closed`.
    MarketClosed,
    /// The stock set was reloaded to its defaults.
    MarketReset,
    /// A stock changed price; carries the stock's new state.
    UpdateStockPrice {
        /// New state of the stock.
        stock: Stock,
    },
}
