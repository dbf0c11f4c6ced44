//! Rhythm patterns - which beat slots a player attacks on

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::error::{GameError, Result};
use crate::rhythm::constants::{MAX_PATTERN_BEATS, OFFBEAT_TOKEN};

/// One slot token of a pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PatternSlot {
    #[serde(rename = "1")]
    One,
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "3")]
    Three,
    #[serde(rename = "4")]
    Four,
    #[serde(rename = "&")]
    And,
}

impl PatternSlot {
    /// Slot for a zero-based beat number; `None` past the fourth beat
    pub fn for_beat(beat_number: u8) -> Option<Self> {
        match beat_number {
            0 => Some(Self::One),
            1 => Some(Self::Two),
            2 => Some(Self::Three),
            3 => Some(Self::Four),
            _ => None,
        }
    }

    /// One-based beat this slot sits on, `None` for the off-beat
    pub fn beat(&self) -> Option<u8> {
        match self {
            Self::One => Some(1),
            Self::Two => Some(2),
            Self::Three => Some(3),
            Self::Four => Some(MAX_PATTERN_BEATS),
            Self::And => None,
        }
    }

    pub fn token(&self) -> &'static str {
        match self {
            Self::One => "1",
            Self::Two => "2",
            Self::Three => "3",
            Self::Four => "4",
            Self::And => OFFBEAT_TOKEN,
        }
    }
}

impl fmt::Display for PatternSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for PatternSlot {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "1" => Ok(Self::One),
            "2" => Ok(Self::Two),
            "3" => Ok(Self::Three),
            "4" => Ok(Self::Four),
            OFFBEAT_TOKEN => Ok(Self::And),
            other => Err(GameError::UnknownPatternSlot(other.to_string())),
        }
    }
}

/// Ordered set of slots a player's attacks are gated on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RhythmPattern(Vec<PatternSlot>);

impl RhythmPattern {
    /// Build from slots in play order. A repeated "&" marks one off-beat
    /// per gap; matching only asks whether a slot is present.
    pub fn new(slots: impl IntoIterator<Item = PatternSlot>) -> Self {
        Self(slots.into_iter().collect())
    }

    /// Pattern unlocked at a rhythm upgrade level (1..=7)
    pub fn for_upgrade_level(level: u8) -> Self {
        use PatternSlot::*;
        let slots: &[PatternSlot] = match level {
            2 => &[One, Three],
            3 => &[One, Two, Three],
            4 => &[One, Two, Three, Four],
            5 => &[One, And, Two, Three, Four],
            6 => &[One, And, Two, Three, And, Four],
            7 => &[One, And, Two, And, Three, And, Four],
            _ => &[One],
        };
        Self::new(slots.iter().copied())
    }

    pub fn includes(&self, slot: PatternSlot) -> bool {
        self.0.contains(&slot)
    }

    pub fn includes_offbeat(&self) -> bool {
        self.includes(PatternSlot::And)
    }

    pub fn slots(&self) -> &[PatternSlot] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for RhythmPattern {
    fn default() -> Self {
        Self::for_upgrade_level(1)
    }
}

impl fmt::Display for RhythmPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tokens: Vec<&str> = self.0.iter().map(|s| s.token()).collect();
        write!(f, "[{}]", tokens.join(","))
    }
}

/// Parses comma separated tokens, e.g. `"1,&,3"`
impl FromStr for RhythmPattern {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        let slots = s
            .split(',')
            .filter(|t| !t.trim().is_empty())
            .map(PatternSlot::from_str)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(slots))
    }
}
