//! Renderer-agnostic snapshots of what the active event shows
//!
//! The conductor never draws. `ConductorScheduler::visuals` returns one of
//! these and the render layer decides how to paint it.

use serde::{Deserialize, Serialize};

use crate::boss::{BossKind, BossPhase};
use crate::core::types::Vec2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteVisual {
    pub position: Vec2,
    pub size: f32,
    pub rotation: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneVisual {
    pub position: Vec2,
    pub radius: f32,
    /// Remaining fade fraction `1..0`; `None` for a live zone
    pub fade: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineVisual {
    /// Staff line index `0..5`
    pub index: usize,
    /// Offset of the line within its staff section
    pub base_offset: f32,
    /// Current oscillation added to `base_offset`
    pub wave_offset: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AttackVisual {
    Shockwave {
        center: Vec2,
        radius: f32,
        max_radius: f32,
        requiem: bool,
    },
    Field {
        center: Vec2,
        radius: f32,
        remaining: f32,
    },
    Silence {
        center: Vec2,
        radius: f32,
        remaining: f32,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BossVisual {
    pub kind: BossKind,
    pub name: String,
    pub position: Vec2,
    pub size: f32,
    pub phase: BossPhase,
    pub invulnerable: bool,
    pub health_fraction: f32,
    /// Progress toward the next requiem while in combat
    pub requiem_fraction: f32,
    pub attacks: Vec<AttackVisual>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EventVisual {
    FallingNotes { notes: Vec<NoteVisual> },
    RhythmZones { zones: Vec<ZoneVisual> },
    TempoChange { speed_up: bool, bpm: f64, flash: f32 },
    HazardLines { section_height: f32, lines: Vec<LineVisual> },
    Boss(BossVisual),
}
