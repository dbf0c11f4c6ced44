//! Read-only player snapshot consumed by the rhythm core

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::error::{GameError, Result};
use crate::core::types::Vec2;
use crate::rhythm::pattern::RhythmPattern;

/// Default collision size of the player
pub const PLAYER_SIZE: f32 = 40.0;

/// Playable character archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CharacterKind {
    /// Ranged, fires at the current target
    Archer,
    /// Melee, strikes around itself
    Footman,
}

impl CharacterKind {
    /// Base attack interval used when no beat clock drives attacks
    pub fn base_attack_rate_ms(&self) -> f64 {
        match self {
            CharacterKind::Archer => 100.0,
            CharacterKind::Footman => 300.0,
        }
    }

    pub fn is_ranged(&self) -> bool {
        matches!(self, CharacterKind::Archer)
    }
}

impl fmt::Display for CharacterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CharacterKind::Archer => write!(f, "ARCHER"),
            CharacterKind::Footman => write!(f, "FOOTMAN"),
        }
    }
}

impl FromStr for CharacterKind {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "ARCHER" => Ok(CharacterKind::Archer),
            "FOOTMAN" => Ok(CharacterKind::Footman),
            other => Err(GameError::InvalidConfig(format!(
                "unknown character type: {}",
                other
            ))),
        }
    }
}

/// Player inputs to the resolver and scheduler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub level: u32,
    pub position: Vec2,
    pub size: f32,
    pub character: CharacterKind,
    pub rhythm_pattern: RhythmPattern,
    pub has_eighth_notes: bool,

    // Temporary debuffs, 1.0 when inactive
    pub speed_scale: f32,
    pub attack_rate_scale: f32,
}

impl PlayerState {
    pub fn new(character: CharacterKind) -> Self {
        Self {
            level: 1,
            position: Vec2::default(),
            size: PLAYER_SIZE,
            character,
            rhythm_pattern: RhythmPattern::default(),
            has_eighth_notes: false,
            speed_scale: 1.0,
            attack_rate_scale: 1.0,
        }
    }

    /// Install the pattern of a rhythm upgrade level
    pub fn apply_rhythm_upgrade(&mut self, level: u8) {
        self.rhythm_pattern = RhythmPattern::for_upgrade_level(level);
        self.has_eighth_notes = self.rhythm_pattern.includes_offbeat();
    }

    /// Fallback attack interval, including any attack-rate debuff
    pub fn effective_attack_rate_ms(&self) -> f64 {
        self.character.base_attack_rate_ms() * self.attack_rate_scale as f64
    }

    pub fn apply_debuff(&mut self, speed_scale: f32, attack_rate_scale: f32) {
        self.speed_scale = speed_scale;
        self.attack_rate_scale = attack_rate_scale;
    }

    pub fn clear_debuff(&mut self) {
        self.speed_scale = 1.0;
        self.attack_rate_scale = 1.0;
    }
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::new(CharacterKind::Archer)
    }
}
