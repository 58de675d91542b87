//! Ticker tuning knobs.
//!
//! `TickerConfig` is read from an optional JSON file; every field has a default so
//! `{}` is a valid file. Command-line flags of the server binary override it.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use ticker_common::{Result, TickerError};

/// Default delay between two ticks of the schedule.
pub const DEFAULT_UPDATE_INTERVAL_MS: u64 = 250;
/// Default bound of a single price change, as a fraction of the price.
pub const DEFAULT_RANGE_PERCENT: Decimal = dec!(0.002);
/// Default chance that a given stock moves on a tick.
pub const DEFAULT_UPDATE_PROBABILITY: f64 = 0.10;

/// Tuning of the price simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickerConfig {
    /// Milliseconds between ticks while the market is open.
    pub update_interval_ms: u64,
    /// Upper bound of one price change as a fraction of the current price.
    pub range_percent: Decimal,
    /// Probability in `[0, 1]` that a stock changes on a tick.
    pub update_probability: f64,
    /// Fixed seed for the random stream; seeded from the OS when absent.
    pub seed: Option<u64>,
}

impl Default for TickerConfig {
    fn default() -> Self {
        Self {
            update_interval_ms: DEFAULT_UPDATE_INTERVAL_MS,
            range_percent: DEFAULT_RANGE_PERCENT,
            update_probability: DEFAULT_UPDATE_PROBABILITY,
            seed: None,
        }
    }
}

impl TickerConfig {
    /// Load and validate a JSON configuration file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let config: TickerConfig = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every value is inside its accepted range.
    pub fn validate(&self) -> Result<()> {
        if self.update_interval_ms == 0 {
            return Err(TickerError::Config(
                "update_interval_ms must be greater than zero".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.update_probability) {
            return Err(TickerError::Config(format!(
                "update_probability must be within [0, 1], got {}",
                self.update_probability
            )));
        }
        if self.range_percent.is_sign_negative() || self.range_percent >= Decimal::ONE {
            return Err(TickerError::Config(format!(
                "range_percent must be within [0, 1), got {}",
                self.range_percent
            )));
        }
        Ok(())
    }

    /// Tick interval as a `Duration`.
    pub fn update_interval(&self) -> Duration {
        Duration::from_millis(self.update_interval_ms)
    }
}
