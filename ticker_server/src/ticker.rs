//! Stock ticker: the market state machine and the coordinator around it.
//!
//! `StockTicker` owns the registry, the price mutation job and the schedule that
//! drives it, and announces every observable change through a [`Notifier`].
//!
//! Locking:
//! - the market lock guards the state and the schedule handle; open, close and
//!   reset hold it for their whole transition, including starting and joining the
//!   timer thread;
//! - the mutation job has its own non-blocking busy flag;
//! - the registry locks internally.
//!
//! The timer thread never takes the market lock, so `close` can join it without
//! risking a deadlock.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use log::{debug, error, info, warn};
use parking_lot::Mutex;
use ticker_common::{MarketEvent, MarketState, Result, Stock, TickerError};

use crate::config::TickerConfig;
use crate::notifier::{LogNotifier, Notifier, deliver};
use crate::price_mutator::PriceMutator;
use crate::registry::StockRegistry;
use crate::schedule::Schedule;

static INSTANCE: OnceLock<Arc<StockTicker>> = OnceLock::new();

/// Market state together with the timer it implies.
///
/// `schedule` is `Some` exactly when `state` is `Open`.
struct Market {
    state: MarketState,
    schedule: Option<Schedule>,
}

/// Coordinator of the simulated market.
pub struct StockTicker {
    registry: Arc<StockRegistry>,
    mutator: Arc<PriceMutator>,
    notifier: Arc<dyn Notifier>,
    market: Mutex<Market>,
    update_interval: Duration,
}

impl StockTicker {
    /// Build a closed market seeded with the default stocks.
    ///
    /// Fails with [`TickerError::Config`] if `config` does not validate.
    pub fn new(config: &TickerConfig, notifier: Arc<dyn Notifier>) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config, notifier))
    }

    fn build(config: &TickerConfig, notifier: Arc<dyn Notifier>) -> Self {
        let registry = StockRegistry::with_defaults();
        debug!("Seeded the registry with {} stocks", registry.len());
        Self {
            registry: Arc::new(registry),
            mutator: Arc::new(PriceMutator::new(config)),
            notifier,
            market: Mutex::new(Market {
                state: MarketState::Closed,
                schedule: None,
            }),
            update_interval: config.update_interval(),
        }
    }

    /// Install the process-wide ticker.
    ///
    /// Must run at most once, before the first [`StockTicker::instance`] call;
    /// afterwards it fails with [`TickerError::AlreadyInitialized`]. An invalid
    /// `config` is rejected before anything is installed.
    pub fn install(config: &TickerConfig, notifier: Arc<dyn Notifier>) -> Result<Arc<StockTicker>> {
        config.validate()?;
        let mut installed = false;
        let ticker = INSTANCE.get_or_init(|| {
            installed = true;
            Arc::new(StockTicker::build(config, notifier))
        });
        if !installed {
            return Err(TickerError::AlreadyInitialized);
        }
        info!("Stock ticker installed");
        Ok(Arc::clone(ticker))
    }

    /// The process-wide ticker, created with the default configuration and a
    /// [`LogNotifier`] if none was installed.
    pub fn instance() -> Arc<StockTicker> {
        let ticker = INSTANCE.get_or_init(|| {
            warn!("No stock ticker installed, creating a default one");
            Arc::new(StockTicker::build(&TickerConfig::default(), Arc::new(LogNotifier)))
        });
        Arc::clone(ticker)
    }

    /// Snapshot of every stock.
    pub fn all_stocks(&self) -> Vec<Stock> {
        self.registry.all()
    }

    /// Current market state.
    pub fn market_state(&self) -> MarketState {
        self.market.lock().state
    }

    /// Whether a timer is currently driving price updates.
    pub fn is_ticking(&self) -> bool {
        self.market.lock().schedule.is_some()
    }

    /// Open the market and start ticking. Does nothing if already open.
    pub fn open(&self) {
        let mut market = self.market.lock();
        if market.state == MarketState::Open {
            return;
        }

        if self.registry.is_empty() {
            warn!("Opening a market with no stocks");
        }
        // Announce before the first tick can fire.
        market.state = MarketState::Open;
        self.emit(MarketEvent::MarketOpened);

        let registry = Arc::clone(&self.registry);
        let mutator = Arc::clone(&self.mutator);
        let notifier = Arc::clone(&self.notifier);
        match Schedule::start(self.update_interval, move || {
            mutator.run_pass(&registry, notifier.as_ref());
        }) {
            Ok(schedule) => {
                market.schedule = Some(schedule);
                info!("Market opened, ticking every {:?}", self.update_interval);
            }
            Err(e) => {
                error!("Failed to start price schedule, market stays closed: {}", e);
                market.state = MarketState::Closed;
                self.emit(MarketEvent::MarketClosed);
            }
        }
    }

    /// Close the market. Does nothing if already closed.
    ///
    /// No price update is announced after this returns.
    pub fn close(&self) {
        let mut market = self.market.lock();
        if market.state == MarketState::Closed {
            return;
        }
        if let Some(schedule) = market.schedule.take() {
            schedule.stop();
        }
        market.state = MarketState::Closed;
        info!("Market closed");
        self.emit(MarketEvent::MarketClosed);
    }

    /// Reload the default stocks.
    ///
    /// Fails with [`TickerError::InvalidState`] while the market is open, leaving
    /// everything untouched.
    pub fn reset(&self) -> Result<()> {
        let market = self.market.lock();
        if market.state != MarketState::Closed {
            return Err(TickerError::reset_while_open());
        }
        self.registry.load_defaults();
        info!("Market reset, {} stocks reloaded", self.registry.len());
        self.emit(MarketEvent::MarketReset);
        Ok(())
    }

    fn emit(&self, event: MarketEvent) {
        deliver(self.notifier.as_ref(), &event);
    }
}
