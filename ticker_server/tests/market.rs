mod common;

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use common::{busy_config, prices, ticker_with};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use ticker_common::stock::{PRICE_ROUNDING, PRICE_SCALE};
use ticker_common::{MarketEvent, MarketState, TickerError};
use ticker_server::{LogNotifier, StockTicker, TickerConfig};
use ticker_server::registry::DEFAULT_STOCKS;

fn default_prices() -> HashMap<String, Decimal> {
    DEFAULT_STOCKS
        .iter()
        .map(|(symbol, price)| (symbol.to_string(), *price))
        .collect()
}

#[test]
fn invalid_config_is_rejected_at_construction() {
    let zero_interval = TickerConfig {
        update_interval_ms: 0,
        ..TickerConfig::default()
    };
    let result = StockTicker::new(&zero_interval, Arc::new(LogNotifier));
    assert!(matches!(result, Err(TickerError::Config(_))));

    let wide_range = TickerConfig {
        range_percent: dec!(1.5),
        ..TickerConfig::default()
    };
    let result = StockTicker::new(&wide_range, Arc::new(LogNotifier));
    assert!(matches!(result, Err(TickerError::Config(_))));
}

#[test]
fn fresh_market_lists_seed_stocks() {
    let (ticker, recorder) = ticker_with(&TickerConfig::default());
    let stocks = ticker.all_stocks();
    assert_eq!(stocks.len(), 3);
    assert_eq!(
        prices(&stocks),
        HashMap::from([
            ("MSFT".to_string(), dec!(41.68)),
            ("AAPL".to_string(), dec!(92.08)),
            ("GOOG".to_string(), dec!(543.01)),
        ])
    );
    assert_eq!(ticker.market_state(), MarketState::Closed);
    assert!(!ticker.is_ticking());
    assert!(recorder.events().is_empty());
}

#[test]
fn open_twice_announces_once() {
    let (ticker, recorder) = ticker_with(&TickerConfig::default());
    ticker.open();
    ticker.open();
    assert_eq!(ticker.market_state(), MarketState::Open);
    assert!(ticker.is_ticking());
    assert_eq!(recorder.count(&MarketEvent::MarketOpened), 1);

    ticker.close();
    ticker.close();
    assert_eq!(recorder.count(&MarketEvent::MarketClosed), 1);
}

#[test]
fn close_when_closed_is_silent() {
    let (ticker, recorder) = ticker_with(&TickerConfig::default());
    ticker.close();
    assert_eq!(ticker.market_state(), MarketState::Closed);
    assert!(!ticker.is_ticking());
    assert!(recorder.events().is_empty());
}

#[test]
fn reset_while_open_fails_and_changes_nothing() {
    let config = TickerConfig {
        update_probability: 0.0,
        ..TickerConfig::default()
    };
    let (ticker, recorder) = ticker_with(&config);
    ticker.open();
    let before = ticker.all_stocks();

    let err = ticker.reset().unwrap_err();
    assert!(matches!(err, TickerError::InvalidState(_)));
    assert_eq!(err.to_string(), "Invalid market state: market must be closed before reset");

    assert_eq!(ticker.market_state(), MarketState::Open);
    assert!(ticker.is_ticking());
    assert_eq!(ticker.all_stocks(), before);
    assert_eq!(recorder.count(&MarketEvent::MarketReset), 0);
    ticker.close();
}

#[test]
fn ticks_move_prices_within_bounds() {
    let (ticker, recorder) = ticker_with(&busy_config(10));
    ticker.open();
    thread::sleep(Duration::from_millis(300));
    ticker.close();

    let events = recorder.events();
    assert_eq!(events.first(), Some(&MarketEvent::MarketOpened));
    assert_eq!(events.last(), Some(&MarketEvent::MarketClosed));

    // Replay the announced moves from the seed prices.
    let mut replay = default_prices();
    let updates = recorder.price_updates();
    assert!(!updates.is_empty());
    for stock in &updates {
        let old = replay[&stock.symbol];
        let bound = (old * dec!(0.002)).round_dp_with_strategy(PRICE_SCALE, PRICE_ROUNDING);
        assert_ne!(stock.price, old, "unchanged price announced for {}", stock.symbol);
        assert!((stock.price - old).abs() <= bound);
        assert!(!stock.price.is_sign_negative());
        assert_eq!(stock.price.scale(), PRICE_SCALE);
        replay.insert(stock.symbol.clone(), stock.price);
    }
    assert_eq!(prices(&ticker.all_stocks()), replay);
}

#[test]
fn no_price_updates_after_close() {
    let (ticker, recorder) = ticker_with(&busy_config(1));
    ticker.open();
    thread::sleep(Duration::from_millis(50));
    ticker.close();

    let seen = recorder.len();
    assert_eq!(recorder.events().last(), Some(&MarketEvent::MarketClosed));
    let frozen = ticker.all_stocks();

    thread::sleep(Duration::from_millis(50));
    assert_eq!(recorder.len(), seen);
    assert_eq!(ticker.all_stocks(), frozen);
    assert!(!ticker.is_ticking());
}

#[test]
fn close_then_reset_restores_defaults() {
    let (ticker, recorder) = ticker_with(&busy_config(5));
    ticker.open();
    thread::sleep(Duration::from_millis(100));
    ticker.close();
    assert!(!recorder.price_updates().is_empty());

    ticker.reset().unwrap();
    assert_eq!(prices(&ticker.all_stocks()), default_prices());
    assert_eq!(recorder.events().last(), Some(&MarketEvent::MarketReset));
    assert_eq!(ticker.market_state(), MarketState::Closed);
    assert!(!ticker.is_ticking());
}

#[test]
fn schedule_handle_follows_state() {
    let (ticker, _recorder) = ticker_with(&busy_config(2));
    let check = || assert_eq!(ticker.is_ticking(), ticker.market_state() == MarketState::Open);

    check();
    ticker.open();
    check();
    ticker.open();
    check();
    ticker.close();
    check();
    ticker.reset().unwrap();
    check();
    ticker.open();
    check();
    assert!(ticker.reset().is_err());
    check();
    ticker.close();
    check();
}

#[test]
fn concurrent_transitions_alternate_events() {
    let (ticker, recorder) = ticker_with(&busy_config(1));
    let ticker = Arc::new(ticker);

    let workers: Vec<_> = (0..8)
        .map(|worker| {
            let ticker = Arc::clone(&ticker);
            thread::spawn(move || {
                for round in 0..25 {
                    if (worker + round) % 2 == 0 {
                        ticker.open();
                    } else {
                        ticker.close();
                    }
                    let _ = ticker.reset();
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }
    ticker.close();

    assert!(!ticker.is_ticking());
    let mut open = false;
    for event in recorder.events() {
        match event {
            MarketEvent::MarketOpened => {
                assert!(!open, "opened twice in a row");
                open = true;
            }
            MarketEvent::MarketClosed => {
                assert!(open, "closed twice in a row");
                open = false;
            }
            MarketEvent::MarketReset => assert!(!open, "reset while open"),
            MarketEvent::UpdateStockPrice { .. } => assert!(open, "price moved while closed"),
        }
    }
    assert!(!open);
}

#[test]
fn concurrent_readers_never_see_torn_prices() {
    let (ticker, recorder) = ticker_with(&busy_config(1));
    let ticker = Arc::new(ticker);
    let stop = Arc::new(AtomicBool::new(false));
    ticker.open();

    let readers: Vec<_> = (0..100)
        .map(|_| {
            let ticker = Arc::clone(&ticker);
            let stop = Arc::clone(&stop);
            thread::spawn(move || {
                let mut seen = Vec::new();
                while !stop.load(Ordering::Relaxed) {
                    seen.extend(ticker.all_stocks());
                    thread::sleep(Duration::from_millis(1));
                }
                seen
            })
        })
        .collect();

    thread::sleep(Duration::from_millis(150));
    stop.store(true, Ordering::Relaxed);
    let observed: Vec<_> = readers
        .into_iter()
        .flat_map(|reader| reader.join().unwrap())
        .collect();
    ticker.close();

    let mut held: HashSet<(String, Decimal)> = default_prices().into_iter().collect();
    held.extend(
        recorder
            .price_updates()
            .into_iter()
            .map(|stock| (stock.symbol, stock.price)),
    );
    assert!(!observed.is_empty());
    for stock in observed {
        assert_eq!(stock.price.scale(), PRICE_SCALE);
        assert!(
            held.contains(&(stock.symbol.clone(), stock.price)),
            "{} observed at {}, a price it never held",
            stock.symbol,
            stock.price
        );
    }
}
