//! Price mutation job.
//!
//! Runs once per tick while the market is open. For every stock it rolls whether the
//! stock moves at all and, if so, nudges the price by a random fraction of
//! `range_percent` in a random direction. Every move is announced right away.
//!
//! Design notes:
//! - At most one pass runs at a time. A pass that finds another one in flight is
//!   dropped, not queued; the check is a compare-and-set, never a wait.
//! - Arithmetic stays in `Decimal` and every change is rounded to cents with
//!   banker's rounding, so prices never drift the way binary floats would.
//! - The direction is a fair coin.
//! - One seeded random stream drives the whole job; a configured seed makes runs
//!   reproducible.

use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, trace};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use ticker_common::stock::{PRICE_ROUNDING, PRICE_SCALE};
use ticker_common::{MarketEvent, Stock};

use crate::config::TickerConfig;
use crate::notifier::{Notifier, deliver};
use crate::registry::{StockEntry, StockRegistry};

/// Result of one call to [`PriceMutator::run_pass`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassOutcome {
    /// The pass ran; `changed` stocks moved.
    Completed {
        /// Number of stocks whose price changed.
        changed: usize,
    },
    /// Another pass was still running; nothing was done.
    Skipped,
}

/// Holds the busy flag for the duration of a pass.
struct PassGuard<'a>(&'a AtomicBool);

impl<'a> PassGuard<'a> {
    fn try_acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .ok()
            .map(|_| PassGuard(flag))
    }
}

impl Drop for PassGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Random-walk price updater.
pub struct PriceMutator {
    range_percent: Decimal,
    update_probability: f64,
    rng: Mutex<StdRng>,
    updating: AtomicBool,
}

impl PriceMutator {
    /// Create a mutator tuned by `config`.
    pub fn new(config: &TickerConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            range_percent: config.range_percent,
            update_probability: config.update_probability,
            rng: Mutex::new(rng),
            updating: AtomicBool::new(false),
        }
    }

    #[cfg(test)]
    fn is_updating(&self) -> bool {
        self.updating.load(Ordering::Acquire)
    }

    /// Run one mutation pass over every stock in `registry`.
    ///
    /// Each changed stock is announced to `notifier` as soon as it is computed.
    pub fn run_pass(&self, registry: &StockRegistry, notifier: &dyn Notifier) -> PassOutcome {
        let Some(_guard) = PassGuard::try_acquire(&self.updating) else {
            debug!("Previous price update still running, skipping tick");
            return PassOutcome::Skipped;
        };

        let mut rng = self.rng.lock();
        let mut changed = 0;
        for entry in registry.entries() {
            if let Some(stock) = self.try_update(&entry, &mut *rng) {
                trace!("{} moved to {}", stock.symbol, stock.price);
                changed += 1;
                deliver(notifier, &MarketEvent::UpdateStockPrice { stock });
            }
        }
        PassOutcome::Completed { changed }
    }

    fn try_update<R: Rng + ?Sized>(&self, entry: &StockEntry, rng: &mut R) -> Option<Stock> {
        // Most ticks leave a stock alone: only a roll above the probability skips it.
        if rng.random::<f64>() > self.update_probability {
            return None;
        }
        let factor: f64 = rng.random();
        let rising = rng.random_bool(0.5);
        entry.apply_change(|price| price_change(price, factor, self.range_percent, rising))
    }
}

/// Signed price change for a stock at `price`.
///
/// `factor` in `[0, 1)` scales the largest allowed move `price * range_percent`; the
/// magnitude is rounded to cents before the sign is applied.
pub fn price_change(price: Decimal, factor: f64, range_percent: Decimal, rising: bool) -> Decimal {
    let factor = Decimal::from_f64_retain(factor).unwrap_or(Decimal::ZERO);
    let change = (price * factor * range_percent).round_dp_with_strategy(PRICE_SCALE, PRICE_ROUNDING);
    if rising { change } else { -change }
}
