//! In-process broadcast of market events.
//!
//! `BroadcastHub` is the [`Notifier`] the server plugs into the ticker. Every
//! subscriber owns the receiving end of a bounded `crossbeam_channel`; the hub
//! pushes each event to all of them with `try_send`, so it never blocks the caller.
//!
//! Design notes:
//! - A subscriber is removed when its receiver is gone or when its queue is full.
//!   A removed subscriber sees its channel disconnect once it drains what is queued.
//! - Events reach every subscriber in the order the hub published them.

use crossbeam_channel::{Receiver, Sender, TrySendError, bounded};
use log::{debug, info, warn};
use parking_lot::Mutex;
use ticker_common::{MarketEvent, Stock};

use crate::notifier::Notifier;

/// Events queued for one subscriber before the hub gives up on it.
pub const SUBSCRIBER_CAPACITY: usize = 1024;

/// Fan-out of market events to any number of subscribers.
#[derive(Default)]
pub struct BroadcastHub {
    subscribers: Mutex<Vec<Sender<MarketEvent>>>,
}

impl BroadcastHub {
    /// Create a hub with no subscriber.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber; it receives every event published from now on.
    pub fn subscribe(&self) -> Receiver<MarketEvent> {
        let (tx, rx) = bounded(SUBSCRIBER_CAPACITY);
        let mut subscribers = self.subscribers.lock();
        subscribers.push(tx);
        info!("Hub: new subscriber added. Total subscribers: {}", subscribers.len());
        rx
    }

    /// Number of live subscribers as of the last publish.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }

    /// Push `event` to every subscriber, dropping the ones that went away or
    /// stopped keeping up.
    pub fn publish(&self, event: MarketEvent) {
        let mut subscribers = self.subscribers.lock();
        let before = subscribers.len();
        subscribers.retain(|tx| match tx.try_send(event.clone()) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                warn!("Hub: subscriber queue full, dropping subscriber");
                false
            }
            Err(TrySendError::Disconnected(_)) => false,
        });
        if subscribers.len() < before {
            debug!(
                "Hub: dropped {} subscriber(s)",
                before - subscribers.len()
            );
        }
    }
}

impl Notifier for BroadcastHub {
    fn market_opened(&self) {
        self.publish(MarketEvent::MarketOpened);
    }

    fn market_closed(&self) {
        self.publish(MarketEvent::MarketClosed);
    }

    fn market_reset(&self) {
        self.publish(MarketEvent::MarketReset);
    }

    fn stock_price(&self, stock: &Stock) {
        self.publish(MarketEvent::UpdateStockPrice {
            stock: stock.clone(),
        });
    }
}
