//! Helpers shared by the integration tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use rust_decimal::Decimal;
use ticker_common::{MarketEvent, Stock};
use ticker_server::{Notifier, StockTicker, TickerConfig};

/// Notifier that remembers every event in arrival order.
#[derive(Default)]
pub struct Recorder {
    events: Mutex<Vec<MarketEvent>>,
}

impl Recorder {
    pub fn events(&self) -> Vec<MarketEvent> {
        self.events.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn count(&self, wanted: &MarketEvent) -> usize {
        self.events.lock().iter().filter(|e| *e == wanted).count()
    }

    pub fn price_updates(&self) -> Vec<Stock> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                MarketEvent::UpdateStockPrice { stock } => Some(stock.clone()),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: MarketEvent) {
        self.events.lock().push(event);
    }
}

impl Notifier for Recorder {
    fn market_opened(&self) {
        self.push(MarketEvent::MarketOpened);
    }
    fn market_closed(&self) {
        self.push(MarketEvent::MarketClosed);
    }
    fn market_reset(&self) {
        self.push(MarketEvent::MarketReset);
    }
    fn stock_price(&self, stock: &Stock) {
        self.push(MarketEvent::UpdateStockPrice {
            stock: stock.clone(),
        });
    }
}

/// Fast ticking configuration where every stock rolls a move on every tick.
pub fn busy_config(update_interval_ms: u64) -> TickerConfig {
    TickerConfig {
        update_interval_ms,
        update_probability: 1.0,
        seed: Some(2024),
        ..TickerConfig::default()
    }
}

pub fn ticker_with(config: &TickerConfig) -> (StockTicker, Arc<Recorder>) {
    let recorder = Arc::new(Recorder::default());
    let ticker = StockTicker::new(config, recorder.clone()).unwrap();
    (ticker, recorder)
}

pub fn prices(stocks: &[Stock]) -> HashMap<String, Decimal> {
    stocks
        .iter()
        .map(|s| (s.symbol.clone(), s.price))
        .collect()
}
