//! Tick types produced by the beat clock

use serde::{Deserialize, Serialize};

use crate::core::types::Millis;
use crate::rhythm::constants::{
    EIGHTH_SUBDIVISIONS, SIXTEENTH_SUBDIVISIONS, TRIPLET_SUBDIVISIONS,
};

/// One main beat of the measure
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BeatTick {
    /// Position in the measure, `0..beats_per_measure`
    pub beat_number: u8,
    pub is_downbeat: bool,
    pub bonus_multiplier: f32,
    pub timestamp: Millis,
}

impl BeatTick {
    pub fn new(beat_number: u8, bonus_multiplier: f32, timestamp: Millis) -> Self {
        Self {
            beat_number,
            is_downbeat: beat_number == 0,
            bonus_multiplier,
            timestamp,
        }
    }
}

/// A rhythmic event between main beats
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubdivisionTick {
    /// Fraction of the beat, `sub_beat_counter / subdivision_count`
    pub position: f32,
    pub bonus_multiplier: f32,
    pub timestamp: Millis,
    pub is_eighth: bool,
    pub is_triplet: bool,
    pub is_sixteenth: bool,
    pub is_syncopated: bool,
}

impl SubdivisionTick {
    /// Build a tick for the `sub_beat_counter`-th subdivision since the last beat
    pub fn new(
        subdivision_count: u8,
        sub_beat_counter: u32,
        bonus_multiplier: f32,
        timestamp: Millis,
    ) -> Self {
        Self {
            position: sub_beat_counter as f32 / subdivision_count.max(1) as f32,
            bonus_multiplier,
            timestamp,
            is_eighth: subdivision_count == EIGHTH_SUBDIVISIONS,
            is_triplet: subdivision_count == TRIPLET_SUBDIVISIONS,
            is_sixteenth: SIXTEENTH_SUBDIVISIONS.contains(&subdivision_count),
            is_syncopated: subdivision_count == EIGHTH_SUBDIVISIONS && sub_beat_counter % 2 == 1,
        }
    }
}

/// Either kind of tick, for sinks that record everything
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RhythmTick {
    Beat(BeatTick),
    Subdivision(SubdivisionTick),
}

impl RhythmTick {
    pub fn timestamp(&self) -> Millis {
        match self {
            RhythmTick::Beat(t) => t.timestamp,
            RhythmTick::Subdivision(t) => t.timestamp,
        }
    }

    pub fn as_beat(&self) -> Option<&BeatTick> {
        match self {
            RhythmTick::Beat(t) => Some(t),
            RhythmTick::Subdivision(_) => None,
        }
    }
}

/// Anything carrying the logical time it was produced at
pub trait Timestamped {
    fn timestamp(&self) -> Millis;
}

impl Timestamped for BeatTick {
    fn timestamp(&self) -> Millis {
        self.timestamp
    }
}

impl Timestamped for SubdivisionTick {
    fn timestamp(&self) -> Millis {
        self.timestamp
    }
}

/// Destination of ticks published by the beat clock
pub trait TickSink {
    fn publish_beat(&mut self, tick: BeatTick);
    fn publish_subdivision(&mut self, tick: SubdivisionTick);
}

/// Recording sink: keeps every tick in order
impl TickSink for Vec<RhythmTick> {
    fn publish_beat(&mut self, tick: BeatTick) {
        self.push(RhythmTick::Beat(tick));
    }

    fn publish_subdivision(&mut self, tick: SubdivisionTick) {
        self.push(RhythmTick::Subdivision(tick));
    }
}
