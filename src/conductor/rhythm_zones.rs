//! RHYTHM_ZONES - stay inside the rotating safe zones

use std::f32::consts::TAU;

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::conductor::context::{DamageSource, EventContext};
use crate::conductor::hooks::{EventFrame, EventHooks};
use crate::conductor::visuals::{EventVisual, ZoneVisual};
use crate::core::types::Vec2;

const FADE_MS: f64 = 1000.0;
const SCORE_INTERVAL_MS: f64 = 1000.0;
const SCORE_PER_INTERVAL: u32 = 5;
const DANGER_INTERVAL_MS: f64 = 1000.0;

#[derive(Debug, Clone, PartialEq)]
pub struct SafeZone {
    pub position: Vec2,
    pub radius: f32,
    score_timer_ms: f64,
    /// Set once the zone has been replaced
    fade_ms: Option<f64>,
}

impl SafeZone {
    fn random_near(center: Vec2, rng: &mut ChaCha8Rng) -> Self {
        let angle = rng.gen_range(0.0..TAU);
        let distance = rng.gen_range(100.0..300.0);
        Self {
            position: center.offset_polar(angle, distance),
            radius: rng.gen_range(80.0..120.0),
            score_timer_ms: 0.0,
            fade_ms: None,
        }
    }

    pub fn is_fading(&self) -> bool {
        self.fade_ms.is_some()
    }

    pub fn contains(&self, point: Vec2) -> bool {
        self.position.distance(&point) < self.radius
    }
}

#[derive(Debug, Clone)]
pub struct RhythmZones {
    zones: Vec<SafeZone>,
    rotation_timer_ms: f64,
    rotation_interval_ms: f64,
    danger_timer_ms: f64,
}

impl RhythmZones {
    pub fn new(level: u32, player_pos: Vec2, rng: &mut ChaCha8Rng) -> Self {
        let zones = (0..initial_zone_count(level))
            .map(|_| SafeZone::random_near(player_pos, rng))
            .collect();
        Self {
            zones,
            rotation_timer_ms: 0.0,
            rotation_interval_ms: rotation_interval_ms(level),
            danger_timer_ms: 0.0,
        }
    }

    pub fn zones(&self) -> &[SafeZone] {
        &self.zones
    }

    pub fn live_zone_count(&self) -> usize {
        self.zones.iter().filter(|z| !z.is_fading()).count()
    }

    fn rotate(&mut self, player_pos: Vec2, progress: f64, ctx: &mut EventContext<'_>) {
        let mut old = std::mem::take(&mut self.zones);
        for _ in 0..zones_per_rotation(progress) {
            self.zones.push(SafeZone::random_near(player_pos, ctx.rng));
        }
        for zone in old.iter_mut() {
            zone.fade_ms.get_or_insert(FADE_MS);
        }
        self.zones.extend(old);
        ctx.services.play_sound("beat_strong", 0.5);
    }
}

pub fn rotation_interval_ms(level: u32) -> f64 {
    (2500.0 - level as f64 * 100.0).max(1200.0)
}

pub fn initial_zone_count(level: u32) -> usize {
    4usize.saturating_sub((level / 3) as usize).max(2)
}

/// Fewer zones as the event progresses
pub fn zones_per_rotation(progress: f64) -> usize {
    3usize
        .saturating_sub((progress * 2.0).floor() as usize)
        .max(1)
}

impl EventHooks for RhythmZones {
    fn update(&mut self, frame: &EventFrame<'_>, ctx: &mut EventContext<'_>) -> u32 {
        let player_pos = frame.player.position;
        let mut score = 0;

        self.rotation_timer_ms += frame.delta_ms;
        if self.rotation_timer_ms >= self.rotation_interval_ms {
            self.rotate(player_pos, frame.progress(), ctx);
            self.rotation_timer_ms = 0.0;
        }

        // Fading zones expire
        self.zones.retain_mut(|zone| match zone.fade_ms.as_mut() {
            Some(fade) => {
                *fade -= frame.delta_ms;
                *fade > 0.0
            }
            None => true,
        });

        // Fading zones still shelter but never score
        let shelter = self.zones.iter_mut().find(|z| z.contains(player_pos));
        let sheltered = shelter.is_some();
        if let Some(zone) = shelter {
            if !zone.is_fading() {
                zone.score_timer_ms += frame.delta_ms;
                if zone.score_timer_ms >= SCORE_INTERVAL_MS {
                    zone.score_timer_ms = 0.0;
                    score += SCORE_PER_INTERVAL;
                }
            }
        }

        if sheltered {
            self.danger_timer_ms = 0.0;
        } else {
            self.danger_timer_ms += frame.delta_ms;
            if self.danger_timer_ms >= DANGER_INTERVAL_MS {
                self.danger_timer_ms = 0.0;
                ctx.damage_player(1, DamageSource::DangerZone);
            }
        }

        score
    }

    fn teardown(&mut self, _ctx: &mut EventContext<'_>) {
        self.zones.clear();
    }

    fn visual(&self) -> EventVisual {
        EventVisual::RhythmZones {
            zones: self
                .zones
                .iter()
                .map(|z| ZoneVisual {
                    position: z.position,
                    radius: z.radius,
                    fade: z.fade_ms.map(|f| (f / FADE_MS) as f32),
                })
                .collect(),
        }
    }
}
