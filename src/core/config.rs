//! Game configuration with documented constants
//!
//! All tunables for the rhythm core live here, grouped by subsystem.
//! Every section is `#[serde(default)]` so a TOML file only needs to
//! name the values it overrides.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::conductor::EventKind;
use crate::core::error::{GameError, Result};

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub rhythm: RhythmConfig,
    pub conductor: ConductorConfig,
    pub frame: FrameConfig,
    pub arena: ArenaConfig,
}

/// Beat clock and tick acceptance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RhythmConfig {
    /// Tempo the clock starts at and TEMPO_CHANGE falls back to
    pub default_bpm: f64,

    /// Multiplier carried by every main-beat tick
    pub beat_bonus: f32,

    /// Subdivision ticks carry `beat_bonus * subdivision_bonus_factor`
    ///
    /// At 0.8 an off-beat attack is worth less than an on-beat one,
    /// so the "&" slot rewards density rather than precision.
    pub subdivision_bonus_factor: f32,

    /// Beats per measure; beat numbers cycle `0..beats_per_measure`
    pub beats_per_measure: u8,

    /// Subdivision granularity (2 = eighths, 3 = triplets, 4/8 = sixteenths)
    pub subdivision_count: u8,

    /// Ticks older than this are dropped by the channel
    ///
    /// Must stay well above one frame (16.7 ms at 60 fps) or ticks
    /// expire before the main loop gets to poll them.
    pub acceptance_window_ms: f64,

    /// Sampling step of a tempo transition
    pub transition_sample_ms: f64,
}

impl Default for RhythmConfig {
    fn default() -> Self {
        Self {
            default_bpm: 60.0,
            beat_bonus: 1.2,
            subdivision_bonus_factor: 0.8,
            beats_per_measure: 4,
            subdivision_count: 1,
            acceptance_window_ms: 150.0,
            transition_sample_ms: 50.0,
        }
    }
}

/// Conductor event scheduling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConductorConfig {
    /// Ascending player levels that trigger a random regular event
    ///
    /// Once exhausted, the next threshold is `last trigger + fallback_level_step`.
    pub event_levels: Vec<u32>,

    /// Ascending player levels that trigger a boss, mapped in order to
    /// PERCUSSIONIST, CONDUCTOR, ORCHESTRATOR
    pub boss_levels: Vec<u32>,

    /// Step of the arithmetic progression after `event_levels` runs out
    pub fallback_level_step: u32,

    /// Regular event duration = base + level * per_level
    pub base_duration_ms: f64,
    pub duration_per_level_ms: f64,

    /// Boss event duration = boss_base + level * boss_per_level
    ///
    /// Only a safety bound: boss events normally end on defeat.
    pub boss_base_duration_ms: f64,
    pub boss_duration_per_level_ms: f64,

    /// Events that never start (neither by threshold nor by request)
    pub disabled_events: Vec<EventKind>,
}

impl Default for ConductorConfig {
    fn default() -> Self {
        Self {
            event_levels: vec![7, 11, 14, 17, 21, 23],
            boss_levels: vec![5, 10, 15],
            fallback_level_step: 2,
            base_duration_ms: 10_000.0,
            duration_per_level_ms: 1_000.0,
            boss_base_duration_ms: 90_000.0,
            boss_duration_per_level_ms: 5_000.0,
            disabled_events: Vec::new(),
        }
    }
}

/// Main loop timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    /// Frame deltas are clamped to this to absorb hitches
    pub max_delta_ms: f64,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self { max_delta_ms: 100.0 }
    }
}

/// Logical playfield used for boss entry and movement targets
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

impl GameConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a (possibly partial) TOML document and validate it
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: GameConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        let rhythm = &self.rhythm;
        if !(rhythm.default_bpm.is_finite() && rhythm.default_bpm > 0.0) {
            return Err(GameError::InvalidTempo(rhythm.default_bpm));
        }
        if rhythm.beats_per_measure == 0 {
            return Err(GameError::InvalidConfig(
                "beats_per_measure must be at least 1".into(),
            ));
        }
        if rhythm.subdivision_count == 0 {
            return Err(GameError::InvalidConfig(
                "subdivision_count must be at least 1".into(),
            ));
        }
        if rhythm.acceptance_window_ms <= 0.0 || rhythm.transition_sample_ms <= 0.0 {
            return Err(GameError::InvalidConfig(
                "acceptance_window_ms and transition_sample_ms must be positive".into(),
            ));
        }

        let conductor = &self.conductor;
        if !is_strictly_ascending(&conductor.event_levels) {
            return Err(GameError::InvalidConfig(format!(
                "event_levels must be strictly ascending: {:?}",
                conductor.event_levels
            )));
        }
        if !is_strictly_ascending(&conductor.boss_levels) {
            return Err(GameError::InvalidConfig(format!(
                "boss_levels must be strictly ascending: {:?}",
                conductor.boss_levels
            )));
        }
        if conductor.boss_levels.len() > crate::boss::BossKind::ALL.len() {
            return Err(GameError::InvalidConfig(format!(
                "at most {} boss levels are supported, got {}",
                crate::boss::BossKind::ALL.len(),
                conductor.boss_levels.len()
            )));
        }
        if conductor.fallback_level_step == 0 {
            return Err(GameError::InvalidConfig(
                "fallback_level_step must be at least 1".into(),
            ));
        }
        if conductor.base_duration_ms <= 0.0 || conductor.boss_base_duration_ms <= 0.0 {
            return Err(GameError::InvalidConfig(
                "event base durations must be positive".into(),
            ));
        }

        if self.frame.max_delta_ms <= 0.0 {
            return Err(GameError::InvalidConfig(
                "max_delta_ms must be positive".into(),
            ));
        }
        if self.arena.width <= 0.0 || self.arena.height <= 0.0 {
            return Err(GameError::InvalidConfig(
                "arena dimensions must be positive".into(),
            ));
        }

        Ok(())
    }
}

fn is_strictly_ascending(levels: &[u32]) -> bool {
    levels.windows(2).all(|w| w[0] < w[1])
}
