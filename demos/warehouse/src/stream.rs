//! JSON-lines event stream.

use std::io::{self, BufWriter, Write};

use wh_core::Tick;
use wh_sim::{Snapshot, WorldEvent, WorldObserver};

/// Writes one JSON object per event.  Flushed once per batch so a reader
/// never sees half a tick.
pub struct JsonLines<W: Write> {
    out:    BufWriter<W>,
    events: u64,
    failed: bool,
}

impl<W: Write> JsonLines<W> {
    pub fn new(out: W) -> Self {
        Self { out: BufWriter::new(out), events: 0, failed: false }
    }

    /// Send the current state of every entity as updates, for a reader that
    /// starts from nothing.
    pub fn write_initial(&mut self, snapshots: Vec<Snapshot>) -> io::Result<()> {
        let events: Vec<WorldEvent> = snapshots.into_iter().map(WorldEvent::Update).collect();
        self.write_batch(&events)
    }

    pub fn events(&self) -> u64 {
        self.events
    }

    fn write_batch(&mut self, events: &[WorldEvent]) -> io::Result<()> {
        for event in events {
            serde_json::to_writer(&mut self.out, event)?;
            self.out.write_all(b"\n")?;
        }
        self.events += events.len() as u64;
        self.out.flush()
    }
}

impl<W: Write> WorldObserver for JsonLines<W> {
    fn on_batch(&mut self, tick: Tick, events: &[WorldEvent]) {
        if self.failed {
            return;
        }
        if let Err(e) = self.write_batch(events) {
            log::error!("event stream closed at {tick}: {e}");
            self.failed = true;
        }
    }

    fn on_run_end(&mut self, final_tick: Tick) {
        log::info!("stream finished at {final_tick}, {} events written", self.events);
    }
}
