//! Recurring timer that drives the price mutation job.
//!
//! A `Schedule` owns one named thread that waits on a `crossbeam_channel::tick`
//! and a stop channel with `select!`. Ticks that elapse while the handler is still
//! running are coalesced by the tick channel, so a slow handler never builds a
//! backlog. Stopping is synchronous: once [`Schedule::stop`] returns, the handler
//! is not running and will not run again.

use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Sender, bounded, select, tick};
use log::{debug, error};
use ticker_common::Result;

/// Live handle of a running timer thread.
pub struct Schedule {
    stop_tx: Sender<()>,
    worker: Option<JoinHandle<()>>,
}

impl Schedule {
    /// Spawn the timer thread; `on_tick` runs every `interval`, first after one
    /// full interval.
    pub fn start<F>(interval: Duration, on_tick: F) -> Result<Self>
    where
        F: Fn() + Send + 'static,
    {
        let (stop_tx, stop_rx) = bounded::<()>(1);
        let worker = thread::Builder::new()
            .name("ticker-schedule".to_string())
            .spawn(move || {
                let ticks = tick(interval);
                debug!("Schedule started with interval {:?}", interval);
                loop {
                    select! {
                        recv(stop_rx) -> _ => break,
                        recv(ticks) -> _ => {
                            // A stop racing with a tick wins.
                            if !stop_rx.is_empty() {
                                break;
                            }
                            on_tick();
                        }
                    }
                }
                debug!("Schedule stopped");
            })?;
        Ok(Self {
            stop_tx,
            worker: Some(worker),
        })
    }

    /// Stop the timer and wait for an in-flight tick to finish.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };
        let _ = self.stop_tx.try_send(());
        // Called from inside a tick: the loop exits once the handler returns.
        if worker.thread().id() == thread::current().id() {
            return;
        }
        if worker.join().is_err() {
            error!("Schedule thread panicked");
        }
    }
}

impl Drop for Schedule {
    fn drop(&mut self) {
        self.shutdown();
    }
}
