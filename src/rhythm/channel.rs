//! Single-slot tick channel between the beat clock and its consumers
//!
//! Each tick type has exactly one slot. Publishing overwrites, consuming
//! clears, and anything older than the acceptance window is dropped on
//! read. There is no queue: two ticks published between polls lose the
//! earlier one.

use crate::core::config::RhythmConfig;
use crate::core::types::Millis;
use crate::rhythm::tick::{BeatTick, SubdivisionTick, TickSink, Timestamped};

/// One overwrite-and-expire slot
#[derive(Debug, Clone, PartialEq)]
pub struct TickSlot<T> {
    pending: Option<T>,
}

impl<T: Timestamped> TickSlot<T> {
    pub fn new() -> Self {
        Self { pending: None }
    }

    /// Replace whatever is pending
    pub fn publish(&mut self, tick: T) {
        self.pending = Some(tick);
    }

    /// Take the pending tick if it is younger than `window_ms`
    ///
    /// The slot is cleared either way, so a tick is handed out at most once.
    pub fn consume(&mut self, now: Millis, window_ms: f64) -> Option<T> {
        let tick = self.pending.take()?;
        if now - tick.timestamp() < window_ms {
            Some(tick)
        } else {
            None
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn clear(&mut self) {
        self.pending = None;
    }
}

impl<T: Timestamped> Default for TickSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Carrier for the latest beat and subdivision tick
#[derive(Debug, Clone)]
pub struct RhythmEventChannel {
    beat: TickSlot<BeatTick>,
    subdivision: TickSlot<SubdivisionTick>,
    acceptance_window_ms: f64,
}

impl RhythmEventChannel {
    pub fn new(config: &RhythmConfig) -> Self {
        Self::with_window(config.acceptance_window_ms)
    }

    pub fn with_window(acceptance_window_ms: f64) -> Self {
        Self {
            beat: TickSlot::new(),
            subdivision: TickSlot::new(),
            acceptance_window_ms,
        }
    }

    pub fn acceptance_window_ms(&self) -> f64 {
        self.acceptance_window_ms
    }

    pub fn consume_beat(&mut self, now: Millis) -> Option<BeatTick> {
        self.beat.consume(now, self.acceptance_window_ms)
    }

    pub fn consume_subdivision(&mut self, now: Millis) -> Option<SubdivisionTick> {
        self.subdivision.consume(now, self.acceptance_window_ms)
    }

    pub fn has_pending(&self) -> bool {
        self.beat.is_pending() || self.subdivision.is_pending()
    }

    /// Drop both pending ticks
    pub fn clear(&mut self) {
        self.beat.clear();
        self.subdivision.clear();
    }
}

impl TickSink for RhythmEventChannel {
    fn publish_beat(&mut self, tick: BeatTick) {
        self.beat.publish(tick);
    }

    fn publish_subdivision(&mut self, tick: SubdivisionTick) {
        self.subdivision.publish(tick);
    }
}
