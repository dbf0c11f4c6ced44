//! TEMPO_CHANGE - one-shot tempo scaling, reverted when the event ends

use rand::Rng;

use crate::conductor::context::EventContext;
use crate::conductor::hooks::{EventFrame, EventHooks};
use crate::conductor::visuals::EventVisual;

const FLASH_MS: f64 = 1000.0;

/// Tempo assumed when there is no beat clock
pub const FALLBACK_BPM: f64 = 60.0;

#[derive(Debug, Clone, PartialEq)]
pub struct TempoChange {
    original_bpm: f64,
    target_bpm: f64,
    speed_up: bool,
    flash_ms: f64,
}

impl TempoChange {
    pub fn start(level: u32, ctx: &mut EventContext<'_>) -> Self {
        let original_bpm = ctx.clock().map(|c| c.bpm()).unwrap_or(FALLBACK_BPM);
        let speed_up = ctx.rng.gen_bool(0.5);
        let target_bpm = scaled_bpm(original_bpm, level, speed_up);

        if let Some(clock) = ctx.clock.as_deref_mut() {
            if let Err(e) = clock.set_tempo(target_bpm) {
                tracing::warn!("Tempo change rejected: {}", e);
            }
            ctx.services
                .play_sound(if speed_up { "tempo_up" } else { "tempo_down" }, 0.7);
        }
        tracing::debug!("Tempo change {} -> {} BPM", original_bpm, target_bpm);

        Self {
            original_bpm,
            target_bpm,
            speed_up,
            flash_ms: FLASH_MS,
        }
    }

    pub fn original_bpm(&self) -> f64 {
        self.original_bpm
    }

    pub fn target_bpm(&self) -> f64 {
        self.target_bpm
    }

    pub fn is_speed_up(&self) -> bool {
        self.speed_up
    }
}

/// Scaling factor grows with level up to level 10
pub fn tempo_factor(level: u32) -> f64 {
    1.4 + level.min(10) as f64 * 0.02
}

pub fn scaled_bpm(bpm: f64, level: u32, speed_up: bool) -> f64 {
    let factor = tempo_factor(level);
    if speed_up {
        (bpm * factor).round()
    } else {
        (bpm / factor).round()
    }
}

impl EventHooks for TempoChange {
    fn update(&mut self, frame: &EventFrame<'_>, _ctx: &mut EventContext<'_>) -> u32 {
        self.flash_ms = (self.flash_ms - frame.delta_ms).max(0.0);
        0
    }

    fn teardown(&mut self, ctx: &mut EventContext<'_>) {
        if let Some(clock) = ctx.clock() {
            if let Err(e) = clock.set_tempo(self.original_bpm) {
                tracing::warn!("Tempo revert rejected: {}", e);
            }
        }
    }

    fn visual(&self) -> EventVisual {
        EventVisual::TempoChange {
            speed_up: self.speed_up,
            bpm: self.target_bpm,
            flash: (self.flash_ms / FLASH_MS) as f32,
        }
    }
}
