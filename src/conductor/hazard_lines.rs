//! HAZARD_LINES - oscillating staff lines that hurt on contact
//!
//! The world is tiled vertically by staff sections of five lines. A
//! subset of line indices is hazardous in every section at once and is
//! reselected periodically.

use rand::seq::index;
use rand_chacha::ChaCha8Rng;

use crate::conductor::context::{DamageSource, EventContext};
use crate::conductor::hooks::{EventFrame, EventHooks};
use crate::conductor::visuals::{EventVisual, LineVisual};
use crate::core::types::Millis;

pub const STAFF_LINES: usize = 5;
pub const LINE_SPACING: f32 = 40.0;
/// Five lines plus a 100 unit gap
pub const SECTION_HEIGHT: f32 = LINE_SPACING * STAFF_LINES as f32 + 100.0;

const RESELECT_INTERVAL_MS: f64 = 4000.0;
const DAMAGE_COOLDOWN_MS: f64 = 1000.0;
const WAVE_AMPLITUDE: f32 = 8.0;
const WAVE_PHASES: [f32; STAFF_LINES] = [0.0, 0.3, 0.6, 0.9, 1.2];
const WAVE_FREQUENCIES: [f32; STAFF_LINES] = [100.0, 90.0, 110.0, 95.0, 105.0];

/// Vertical displacement of line `index` at event time `t`
pub fn wave_offset(index: usize, t: Millis) -> f32 {
    let i = index % STAFF_LINES;
    let time = t as f32 / WAVE_FREQUENCIES[i];
    let sign = if (time / 2.0).sin() > 0.0 { 1.0 } else { -1.0 };
    (time + WAVE_PHASES[i]).sin() * WAVE_AMPLITUDE
        + (time * 3.0).sin() * (WAVE_AMPLITUDE / 3.0) * sign
}

/// Active line count grows every five levels, capped at four
pub fn active_line_count(level: u32) -> usize {
    (2 + (level / 5) as usize).min(4)
}

#[derive(Debug, Clone)]
pub struct HazardLines {
    active: Vec<usize>,
    line_count: usize,
    reselect_timer_ms: f64,
    damage_cooldown_ms: f64,
    wave_time: Millis,
}

impl HazardLines {
    pub fn new(level: u32, rng: &mut ChaCha8Rng) -> Self {
        let line_count = active_line_count(level);
        Self {
            active: select_lines(line_count, rng),
            line_count,
            reselect_timer_ms: 0.0,
            damage_cooldown_ms: 0.0,
            wave_time: 0.0,
        }
    }

    pub fn active_lines(&self) -> &[usize] {
        &self.active
    }

    /// World y of line `index` in the section starting at `section_top`
    fn line_y(&self, section_top: f32, index: usize) -> f32 {
        section_top + index as f32 * LINE_SPACING + wave_offset(index, self.wave_time)
    }

    /// Does a body of `size` at world `y` touch any active line?
    pub fn overlaps(&self, y: f32, size: f32) -> bool {
        let section = (y / SECTION_HEIGHT).floor();
        // Neighbouring sections cover bodies straddling a boundary
        (-1..=1).any(|d| {
            let top = (section + d as f32) * SECTION_HEIGHT;
            self.active
                .iter()
                .any(|&i| (y - self.line_y(top, i)).abs() < size / 2.0)
        })
    }
}

fn select_lines(count: usize, rng: &mut ChaCha8Rng) -> Vec<usize> {
    let mut lines = index::sample(rng, STAFF_LINES, count.min(STAFF_LINES)).into_vec();
    lines.sort_unstable();
    lines
}

impl EventHooks for HazardLines {
    fn update(&mut self, frame: &EventFrame<'_>, ctx: &mut EventContext<'_>) -> u32 {
        self.wave_time = frame.elapsed_ms;

        self.reselect_timer_ms += frame.delta_ms;
        if self.reselect_timer_ms >= RESELECT_INTERVAL_MS {
            self.active = select_lines(self.line_count, ctx.rng);
            self.reselect_timer_ms = 0.0;
        }

        self.damage_cooldown_ms = (self.damage_cooldown_ms - frame.delta_ms).max(0.0);
        let player = frame.player;
        if self.damage_cooldown_ms <= 0.0 && self.overlaps(player.position.y, player.size) {
            self.damage_cooldown_ms = DAMAGE_COOLDOWN_MS;
            ctx.damage_player(1, DamageSource::HazardLine);
        }

        0
    }

    fn teardown(&mut self, _ctx: &mut EventContext<'_>) {
        self.active.clear();
    }

    fn visual(&self) -> EventVisual {
        EventVisual::HazardLines {
            section_height: SECTION_HEIGHT,
            lines: self
                .active
                .iter()
                .map(|&i| LineVisual {
                    index: i,
                    base_offset: i as f32 * LINE_SPACING,
                    wave_offset: wave_offset(i, self.wave_time),
                })
                .collect(),
        }
    }
}
