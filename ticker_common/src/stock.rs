//! Stock data model shared by server and client.
//!
//! A `Stock` is the payload announced on every price change and returned when
//! listing the market. Prices are fixed-point decimals kept at exactly
//! [`PRICE_SCALE`] fractional digits; they serialize as strings so no precision is
//! lost on the wire.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::TickerError;

/// Number of fractional digits every stored price carries.
pub const PRICE_SCALE: u32 = 2;

/// Rounding applied to prices and price changes.
pub const PRICE_ROUNDING: RoundingStrategy = RoundingStrategy::MidpointNearestEven;

/// Market state of a single stock.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Stock {
    /// Ticker symbol (e.g. `MSFT`).
    pub symbol: String,
    /// Last price, always non-negative with two fractional digits.
    pub price: Decimal,
}

impl Stock {
    /// Create a validated stock. The price is rounded to [`PRICE_SCALE`] digits.
    pub fn new(symbol: impl Into<String>, price: Decimal) -> Result<Self, TickerError> {
        let symbol = symbol.into();
        if symbol.trim().is_empty() {
            return Err(TickerError::InvalidStock("symbol must not be empty".to_string()));
        }
        if price.is_sign_negative() && !price.is_zero() {
            return Err(TickerError::InvalidStock(format!(
                "{} has negative price {}",
                symbol, price
            )));
        }
        Ok(Stock {
            symbol,
            price: normalize_price(price),
        })
    }
}

/// Round `price` to [`PRICE_SCALE`] fractional digits and pin its scale there, so
/// `41.6` becomes `41.60`.
pub fn normalize_price(price: Decimal) -> Decimal {
    let mut rounded = price.round_dp_with_strategy(PRICE_SCALE, PRICE_ROUNDING);
    rounded.rescale(PRICE_SCALE);
    rounded
}
