//! Conductor event types

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::boss::BossKind;
use crate::core::error::{GameError, Result};

/// Every event the conductor can run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    #[serde(rename = "FALLING_NOTES")]
    FallingNotes,
    #[serde(rename = "RHYTHM_ZONES")]
    RhythmZones,
    #[serde(rename = "TEMPO_CHANGE")]
    TempoChange,
    #[serde(rename = "HAZARD_LINES")]
    HazardLines,
    #[serde(rename = "PERCUSSIONIST_EVENT")]
    Percussionist,
    #[serde(rename = "CONDUCTOR_EVENT")]
    Conductor,
    #[serde(rename = "ORCHESTRATOR_EVENT")]
    Orchestrator,
}

impl EventKind {
    pub const ALL: [EventKind; 7] = [
        EventKind::FallingNotes,
        EventKind::RhythmZones,
        EventKind::TempoChange,
        EventKind::HazardLines,
        EventKind::Percussionist,
        EventKind::Conductor,
        EventKind::Orchestrator,
    ];

    /// Events eligible for the random regular pick
    pub const REGULAR: [EventKind; 4] = [
        EventKind::FallingNotes,
        EventKind::RhythmZones,
        EventKind::TempoChange,
        EventKind::HazardLines,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::FallingNotes => "FALLING_NOTES",
            EventKind::RhythmZones => "RHYTHM_ZONES",
            EventKind::TempoChange => "TEMPO_CHANGE",
            EventKind::HazardLines => "HAZARD_LINES",
            EventKind::Percussionist => "PERCUSSIONIST_EVENT",
            EventKind::Conductor => "CONDUCTOR_EVENT",
            EventKind::Orchestrator => "ORCHESTRATOR_EVENT",
        }
    }

    pub fn boss(&self) -> Option<BossKind> {
        match self {
            EventKind::Percussionist => Some(BossKind::Percussionist),
            EventKind::Conductor => Some(BossKind::Conductor),
            EventKind::Orchestrator => Some(BossKind::Orchestrator),
            _ => None,
        }
    }

    pub fn is_boss(&self) -> bool {
        self.boss().is_some()
    }

    pub fn for_boss(boss: BossKind) -> Self {
        match boss {
            BossKind::Percussionist => EventKind::Percussionist,
            BossKind::Conductor => EventKind::Conductor,
            BossKind::Orchestrator => EventKind::Orchestrator,
        }
    }

    /// Events that take over enemy spawning while they run
    pub fn suspends_spawning(&self) -> bool {
        matches!(self, EventKind::FallingNotes | EventKind::RhythmZones) || self.is_boss()
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        EventKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| GameError::UnknownEvent(wanted.to_string()))
    }
}
