//! Background tick driver.
//!
//! The world lives behind an `Arc<Mutex<_>>` so other threads (a renderer
//! catching up with `snapshot_all`, a control surface) can read it between
//! ticks.  The driver never waits for the lock: if it is held when a tick is
//! due, that tick is skipped and retried on the next interval.  Stop requests
//! are only observed between ticks, so a tick is never cut in half.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, TryLockError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use wh_core::Tick;
use wh_grid::Router;

use crate::{SimError, SimResult, World, WorldObserver};

/// Ticks a shared [`World`] on a named background thread every `interval`.
///
/// The observer moves into the thread and is handed back by [`stop`] or
/// [`join`].  Dropping the driver stops the thread and discards the observer.
///
/// [`stop`]: PollingDriver::stop
/// [`join`]: PollingDriver::join
pub struct PollingDriver<O> {
    running: Arc<AtomicBool>,
    handle:  Option<JoinHandle<O>>,
}

impl<O: WorldObserver + Send + 'static> PollingDriver<O> {
    /// Start ticking `world` until its `end_tick` or a stop request.
    pub fn spawn<R: Router + 'static>(
        world:    Arc<Mutex<World<R>>>,
        observer: O,
        interval: Duration,
    ) -> SimResult<Self> {
        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);
        let handle = thread::Builder::new()
            .name("wh-tick".into())
            .spawn(move || poll(world, observer, interval, flag))?;
        Ok(Self { running, handle: Some(handle) })
    }

    /// `true` once the thread has left its loop.
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Ask the thread to stop after the current tick and wait for it.
    pub fn stop(self) -> SimResult<O> {
        self.running.store(false, Ordering::SeqCst);
        self.join()
    }

    /// Wait for the thread to reach the world's `end_tick`.
    pub fn join(mut self) -> SimResult<O> {
        let handle = self.handle.take().ok_or(SimError::DriverPanicked)?;
        handle.join().map_err(|_| SimError::DriverPanicked)
    }
}

impl<O> Drop for PollingDriver<O> {
    fn drop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn poll<R: Router, O: WorldObserver>(
    world:    Arc<Mutex<World<R>>>,
    mut observer: O,
    interval: Duration,
    running:  Arc<AtomicBool>,
) -> O {
    log::info!("polling driver started, one tick every {interval:?}");
    let mut last = Tick::ZERO;

    while running.load(Ordering::SeqCst) {
        let started = Instant::now();
        match world.try_lock() {
            Ok(mut w) => {
                if w.current_tick() >= w.config.end_tick() {
                    last = w.current_tick();
                    break;
                }
                w.tick_observed(&mut observer);
                last = w.current_tick();
            }
            Err(TryLockError::WouldBlock) => {
                log::debug!("world is locked elsewhere, skipping this tick");
            }
            Err(TryLockError::Poisoned(_)) => {
                log::error!("world mutex poisoned, polling driver stopping");
                break;
            }
        }
        if let Some(rest) = interval.checked_sub(started.elapsed()) {
            thread::sleep(rest);
        }
    }

    observer.on_run_end(last);
    log::info!("polling driver stopped at {last}");
    observer
}
