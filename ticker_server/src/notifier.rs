//! Boundary between the ticker and whatever pushes events to clients.
//!
//! The ticker only knows the [`Notifier`] trait. The server binary plugs in the
//! [`BroadcastHub`](crate::hub::BroadcastHub); embedders may provide their own.

use std::panic::{self, AssertUnwindSafe};

use log::{error, info};
use ticker_common::{MarketEvent, Stock};

/// Sink for market events.
///
/// Calls happen on the caller's thread (market transitions) or on the schedule
/// thread (price updates) and must not block for long. An implementation must not
/// call back into the ticker synchronously from a notification.
pub trait Notifier: Send + Sync {
    /// The market has opened.
    fn market_opened(&self);
    /// The market has closed.
    fn market_closed(&self);
    /// The stocks were reset to their defaults.
    fn market_reset(&self);
    /// A stock changed price.
    fn stock_price(&self, stock: &Stock);

    /// Dispatch `event` to the matching callback.
    fn notify(&self, event: &MarketEvent) {
        match event {
            MarketEvent::MarketOpened => self.market_opened(),
            MarketEvent::MarketClosed => self.market_closed(),
            MarketEvent::MarketReset => self.market_reset(),
            MarketEvent::UpdateStockPrice { stock } => self.stock_price(stock),
        }
    }
}

/// Deliver `event`, containing a panicking notifier to this single event.
pub(crate) fn deliver(notifier: &dyn Notifier, event: &MarketEvent) {
    if panic::catch_unwind(AssertUnwindSafe(|| notifier.notify(event))).is_err() {
        error!("Notifier panicked while delivering {:?}", event);
    }
}

/// Notifier that only writes events to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn market_opened(&self) {
        info!("Market opened");
    }

    fn market_closed(&self) {
        info!("Market closed");
    }

    fn market_reset(&self) {
        info!("Market reset");
    }

    fn stock_price(&self, stock: &Stock) {
        info!("{} {}", stock.symbol, stock.price);
    }
}
