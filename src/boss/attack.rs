//! Boss-owned attack objects
//!
//! Each object is ticked independently and reports whether it is still
//! alive; the owning encounter drops it as soon as it is not.

use serde::{Deserialize, Serialize};

use crate::conductor::context::{DamageSource, EventContext};
use crate::conductor::visuals::AttackVisual;
use crate::core::types::{Vec2, FRAME_MS};
use crate::player::PlayerState;

/// Half thickness of a shockwave ring
pub const SHOCKWAVE_HALF_WIDTH: f32 = 10.0;
pub const FIELD_DAMAGE_INTERVAL_MS: f64 = 1000.0;

/// Expanding ring; hits the player at most once
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shockwave {
    pub center: Vec2,
    pub radius: f32,
    pub max_radius: f32,
    /// Growth per reference frame
    pub speed: f32,
    pub damage: u32,
    pub requiem: bool,
    pub has_hit_player: bool,
}

impl Shockwave {
    pub fn new(center: Vec2, max_radius: f32, speed: f32, requiem: bool) -> Self {
        Self {
            center,
            radius: 0.0,
            max_radius,
            speed,
            damage: 1,
            requiem,
            has_hit_player: false,
        }
    }

    /// Is the player inside the ring band?
    pub fn touches(&self, player: &PlayerState) -> bool {
        let distance = player.position.distance(&self.center);
        (distance - self.radius).abs() < player.size / 2.0 + SHOCKWAVE_HALF_WIDTH
    }
}

/// Circular area dealing periodic damage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageField {
    pub center: Vec2,
    pub radius: f32,
    pub remaining_ms: f64,
    pub damage: u32,
    damage_timer_ms: f64,
}

impl DamageField {
    pub fn new(center: Vec2, radius: f32, lifetime_ms: f64) -> Self {
        Self {
            center,
            radius,
            remaining_ms: lifetime_ms,
            damage: 1,
            damage_timer_ms: 0.0,
        }
    }
}

/// Arena-wide requiem field; its effect is the player debuff
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SilenceField {
    pub center: Vec2,
    pub radius: f32,
    pub remaining_ms: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AttackObject {
    Shockwave(Shockwave),
    Field(DamageField),
    Silence(SilenceField),
}

impl AttackObject {
    /// Advance one update. Returns `false` once the object has expired.
    pub fn tick(&mut self, delta_ms: f64, player: &PlayerState, ctx: &mut EventContext<'_>) -> bool {
        match self {
            AttackObject::Shockwave(wave) => {
                wave.radius += wave.speed * (delta_ms / FRAME_MS) as f32;
                if !wave.has_hit_player && wave.touches(player) {
                    wave.has_hit_player = true;
                    ctx.damage_player(wave.damage, DamageSource::Shockwave);
                }
                wave.radius < wave.max_radius
            }
            AttackObject::Field(field) => {
                field.remaining_ms -= delta_ms;
                let distance = player.position.distance(&field.center);
                if distance < field.radius + player.size / 2.0 {
                    field.damage_timer_ms += delta_ms;
                    if field.damage_timer_ms >= FIELD_DAMAGE_INTERVAL_MS {
                        field.damage_timer_ms = 0.0;
                        ctx.damage_player(field.damage, DamageSource::Field);
                    }
                }
                field.remaining_ms > 0.0
            }
            AttackObject::Silence(silence) => {
                silence.remaining_ms -= delta_ms;
                silence.remaining_ms > 0.0
            }
        }
    }

    pub fn visual(&self) -> AttackVisual {
        match self {
            AttackObject::Shockwave(w) => AttackVisual::Shockwave {
                center: w.center,
                radius: w.radius,
                max_radius: w.max_radius,
                requiem: w.requiem,
            },
            AttackObject::Field(f) => AttackVisual::Field {
                center: f.center,
                radius: f.radius,
                remaining: f.remaining_ms as f32,
            },
            AttackObject::Silence(s) => AttackVisual::Silence {
                center: s.center,
                radius: s.radius,
                remaining: s.remaining_ms as f32,
            },
        }
    }
}
