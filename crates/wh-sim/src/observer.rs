//! World observer trait for renderers, transports and data collection.

use wh_core::Tick;

use crate::WorldEvent;

/// Callbacks invoked by [`World::run`][crate::World::run] and the
/// [`PollingDriver`][crate::PollingDriver] at tick boundaries.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// A tick is atomic from an observer's point of view: `on_batch` receives the
/// complete event batch only after every mutation of that tick is done, and
/// one tick's batch is always delivered before the next tick starts.
/// Observers only ever see immutable snapshots.
///
/// # Example: JSON lines to stdout
///
/// ```rust,ignore
/// struct JsonLines;
///
/// impl WorldObserver for JsonLines {
///     fn on_batch(&mut self, _tick: Tick, events: &[WorldEvent]) {
///         for e in events {
///             println!("{}", serde_json::to_string(e).unwrap());
///         }
///     }
/// }
/// ```
pub trait WorldObserver {
    /// Called at the very start of each tick, before any processing.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Every update and remove event of `tick`.  Order within the batch is
    /// unspecified.  Not called for ticks without events.
    fn on_batch(&mut self, _tick: Tick, _events: &[WorldEvent]) {}

    /// Called at the end of each tick with the number of events emitted.
    fn on_tick_end(&mut self, _tick: Tick, _events: usize) {}

    /// Called once after the final tick completes.
    fn on_run_end(&mut self, _final_tick: Tick) {}
}

/// A [`WorldObserver`] that does nothing.
pub struct NoopObserver;

impl WorldObserver for NoopObserver {}

/// Keeps every batch in memory.  Handy in tests and for late-joining
/// renderers that replay a short history.
#[derive(Default)]
pub struct BatchRecorder {
    pub batches: Vec<(Tick, Vec<WorldEvent>)>,
    pub ticks:   u64,
    pub ended:   Option<Tick>,
}

impl WorldObserver for BatchRecorder {
    fn on_batch(&mut self, tick: Tick, events: &[WorldEvent]) {
        self.batches.push((tick, events.to_vec()));
    }

    fn on_tick_end(&mut self, _tick: Tick, _events: usize) {
        self.ticks += 1;
    }

    fn on_run_end(&mut self, final_tick: Tick) {
        self.ended = Some(final_tick);
    }
}
