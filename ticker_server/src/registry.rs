//! Stock registry.
//!
//! Holds the current state of every stock. The stock set itself lives behind an
//! `Arc` that is swapped wholesale on (re)load, so readers always see either the
//! previous complete set or the new one. Each stock guards its own price, so the
//! mutation job updates one stock without blocking readers of the others.

use std::collections::HashMap;
use std::sync::Arc;

use log::debug;
use parking_lot::RwLock;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use ticker_common::stock::normalize_price;
use ticker_common::{Result, Stock};

/// Seed prices loaded on startup and on every reset.
pub const DEFAULT_STOCKS: [(&str, Decimal); 3] = [
    ("MSFT", dec!(41.68)),
    ("AAPL", dec!(92.08)),
    ("GOOG", dec!(543.01)),
];

/// A single stock owned by the registry.
#[derive(Debug)]
pub struct StockEntry {
    symbol: String,
    price: RwLock<Decimal>,
}

impl StockEntry {
    fn new(stock: Stock) -> Self {
        Self {
            symbol: stock.symbol,
            price: RwLock::new(stock.price),
        }
    }

    /// Ticker symbol.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Current price.
    pub fn price(&self) -> Decimal {
        *self.price.read()
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> Stock {
        Stock {
            symbol: self.symbol.clone(),
            price: self.price(),
        }
    }

    /// Apply the change computed by `change` from the current price.
    ///
    /// The result is clamped at zero and kept at two fractional digits. Returns the new
    /// state when the price actually moved, `None` otherwise.
    pub fn apply_change<F>(&self, change: F) -> Option<Stock>
    where
        F: FnOnce(Decimal) -> Decimal,
    {
        let mut price = self.price.write();
        let old = *price;
        let new = normalize_price((old + change(old)).max(Decimal::ZERO));
        if new == old {
            return None;
        }
        *price = new;
        Some(Stock {
            symbol: self.symbol.clone(),
            price: new,
        })
    }
}

#[derive(Debug, Default)]
struct StockSet {
    entries: Vec<Arc<StockEntry>>,
    index: HashMap<String, usize>,
}

impl StockSet {
    fn build(stocks: impl IntoIterator<Item = Stock>) -> Self {
        let mut set = StockSet::default();
        for stock in stocks {
            let entry = Arc::new(StockEntry::new(stock));
            match set.index.get(entry.symbol()) {
                Some(&slot) => set.entries[slot] = entry,
                None => {
                    set.index.insert(entry.symbol.clone(), set.entries.len());
                    set.entries.push(entry);
                }
            }
        }
        set
    }
}

/// Concurrent mapping from symbol to stock.
#[derive(Debug, Default)]
pub struct StockRegistry {
    stocks: RwLock<Arc<StockSet>>,
}

impl StockRegistry {
    /// Create a registry holding the default stocks.
    pub fn with_defaults() -> Self {
        let registry = Self::default();
        registry.load_defaults();
        registry
    }

    /// Replace every stock with the default seed set.
    pub fn load_defaults(&self) {
        let defaults = DEFAULT_STOCKS.iter().map(|(symbol, price)| Stock {
            symbol: symbol.to_string(),
            price: *price,
        });
        self.swap(StockSet::build(defaults));
    }

    /// Replace every stock with `stocks`.
    ///
    /// Each stock is validated first; on error the current set stays untouched. A
    /// symbol listed twice keeps its last price.
    pub fn load(&self, stocks: impl IntoIterator<Item = Stock>) -> Result<()> {
        let validated = stocks
            .into_iter()
            .map(|stock| Stock::new(stock.symbol, stock.price))
            .collect::<Result<Vec<_>>>()?;
        self.swap(StockSet::build(validated));
        Ok(())
    }

    fn swap(&self, set: StockSet) {
        debug!("Loading {} stocks into the registry", set.entries.len());
        *self.stocks.write() = Arc::new(set);
    }

    fn current(&self) -> Arc<StockSet> {
        self.stocks.read().clone()
    }

    /// Snapshot of every stock, in load order.
    pub fn all(&self) -> Vec<Stock> {
        self.current()
            .entries
            .iter()
            .map(|entry| entry.snapshot())
            .collect()
    }

    #[cfg(test)]
    fn get(&self, symbol: &str) -> Option<Stock> {
        let set = self.current();
        set.index.get(symbol).map(|&slot| set.entries[slot].snapshot())
    }

    /// Shared handles to the current stocks, for in-place price updates.
    pub fn entries(&self) -> Vec<Arc<StockEntry>> {
        self.current().entries.clone()
    }

    /// Number of stocks.
    pub fn len(&self) -> usize {
        self.current().entries.len()
    }

    /// Whether the registry holds no stock.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
