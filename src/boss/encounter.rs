//! Boss encounter state machine
//!
//! Entry -> Combat <-> Requiem, and Combat -> Defeated once health runs
//! out while the boss is vulnerable. Per-boss behavior (movement, attack,
//! ultimate) is selected by `BossKind`; the phase logic is shared.

use std::f32::consts::TAU;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::boss::attack::{AttackObject, DamageField, Shockwave, SilenceField};
use crate::boss::constants::*;
use crate::boss::kind::{BossKind, BossProfile};
use crate::conductor::context::{take_first_hit, EventContext, GameplayEffect};
use crate::conductor::deferred::DeferredAction;
use crate::conductor::visuals::BossVisual;
use crate::core::config::ArenaConfig;
use crate::core::types::{Millis, Vec2};
use crate::player::PlayerState;

/// Encounter phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BossPhase {
    Entry,    // Descending into the arena, invulnerable
    Combat,   // Moving, attacking, charging the requiem
    Requiem,  // Charging the ultimate, invulnerable
    Defeated, // Death animation, terminal
}

/// Result of one encounter update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BossSignal {
    Continue,
    /// Death animation finished and rewards dropped; end the owning event
    Finished,
}

#[derive(Debug, Clone)]
pub struct BossEncounter {
    kind: BossKind,
    profile: &'static BossProfile,
    level: u32,
    arena: ArenaConfig,

    // State
    phase: BossPhase,
    position: Vec2,
    target: Vec2,
    health: f32,
    max_health: f32,
    invulnerable: bool,

    // Timers
    elapsed_ms: Millis,
    attack_timer_ms: f64,
    requiem_timer_ms: f64,
    requiem_charge_ms: f64,
    defeat_timer_ms: f64,

    attacks: Vec<AttackObject>,
    rewards_dropped: bool,
    defeat_count: u32,
    deferred: Vec<(f64, DeferredAction)>,
}

impl BossEncounter {
    pub fn new(kind: BossKind, level: u32, arena: ArenaConfig) -> Self {
        let profile = kind.profile();
        let max_health = profile.health * (1.0 + level as f32 * HEALTH_SCALE_PER_LEVEL);
        Self {
            kind,
            profile,
            level,
            arena,
            phase: BossPhase::Entry,
            position: Vec2::new(arena.width / 2.0, -profile.size),
            target: Vec2::new(arena.width / 2.0, arena.height / 4.0),
            health: max_health,
            max_health,
            invulnerable: true,
            elapsed_ms: 0.0,
            attack_timer_ms: 0.0,
            requiem_timer_ms: 0.0,
            requiem_charge_ms: 0.0,
            defeat_timer_ms: 0.0,
            attacks: Vec::new(),
            rewards_dropped: false,
            defeat_count: 0,
            deferred: Vec::new(),
        }
    }

    pub fn kind(&self) -> BossKind {
        self.kind
    }

    pub fn phase(&self) -> BossPhase {
        self.phase
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn max_health(&self) -> f32 {
        self.max_health
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable
    }

    pub fn attacks(&self) -> &[AttackObject] {
        &self.attacks
    }

    pub fn rewards_dropped(&self) -> bool {
        self.rewards_dropped
    }

    /// How many times the boss entered `Defeated` (never more than once)
    pub fn defeat_count(&self) -> u32 {
        self.defeat_count
    }

    pub fn add_attack(&mut self, attack: AttackObject) {
        self.attacks.push(attack);
    }

    /// Deferred parts queued by the last update, as `(delay, action)`
    pub fn take_deferred(&mut self) -> Vec<(f64, DeferredAction)> {
        std::mem::take(&mut self.deferred)
    }

    /// Advance one frame
    pub fn update(
        &mut self,
        delta_ms: f64,
        player: &PlayerState,
        ctx: &mut EventContext<'_>,
    ) -> BossSignal {
        self.elapsed_ms += delta_ms;
        let mut signal = BossSignal::Continue;

        match self.phase {
            BossPhase::Entry => self.update_entry(ctx),
            BossPhase::Combat => self.update_combat(delta_ms, player, ctx),
            BossPhase::Requiem => {
                self.requiem_charge_ms -= delta_ms;
                if self.requiem_charge_ms <= 0.0 {
                    self.unleash_requiem(ctx);
                    self.phase = BossPhase::Combat;
                    self.invulnerable = false;
                    ctx.services.play_sound("requiem_activate", 1.0);
                    tracing::info!("{} unleashes {}", self.profile.name, self.profile.requiem_ability);
                }
            }
            BossPhase::Defeated => {
                self.defeat_timer_ms -= delta_ms;
                if self.defeat_timer_ms <= 0.0 && !self.rewards_dropped {
                    self.drop_rewards(ctx);
                    signal = BossSignal::Finished;
                }
            }
        }

        self.attacks.retain_mut(|attack| attack.tick(delta_ms, player, ctx));

        if !self.invulnerable {
            if let Some(strike) = take_first_hit(ctx.strikes, self.position, self.profile.size / 2.0) {
                ctx.emit(GameplayEffect::HitFeedback {
                    position: strike.position,
                    critical: strike.critical,
                });
                self.apply_damage(strike.power, strike.critical, ctx);
            }
        }

        signal
    }

    /// Apply weapon power to the boss
    ///
    /// Ignored while invulnerable. Returns whether damage was taken.
    pub fn apply_damage(&mut self, power: f32, critical: bool, ctx: &mut EventContext<'_>) -> bool {
        if self.invulnerable || self.phase == BossPhase::Defeated {
            return false;
        }

        let damage = if critical { power * CRITICAL_MULTIPLIER } else { power };
        self.health -= damage;
        ctx.services
            .play_sound(if critical { "boss_hit_crit" } else { "boss_hit" }, 1.0);

        if self.health <= 0.0 {
            self.defeat(ctx);
        }
        true
    }

    fn update_entry(&mut self, ctx: &mut EventContext<'_>) {
        self.position.approach(self.target, ENTRY_APPROACH);
        if self.position.distance(&self.target) < ENTRY_SNAP_DISTANCE {
            self.position = self.target;
            self.phase = BossPhase::Combat;
            self.invulnerable = false;
            ctx.services.play_music(self.kind.music_track());
            tracing::info!("{} enters combat", self.profile.name);
        }
    }

    fn update_combat(&mut self, delta_ms: f64, player: &PlayerState, ctx: &mut EventContext<'_>) {
        self.target = self.combat_target(player);
        self.position
            .approach(self.target, COMBAT_DAMPING * self.profile.speed);

        self.attack_timer_ms += delta_ms;
        if self.attack_timer_ms >= self.profile.attack_interval_ms {
            self.attack_timer_ms = 0.0;
            self.launch_attack(player, ctx);
        }

        self.requiem_timer_ms += delta_ms;
        if self.requiem_timer_ms >= self.profile.requiem_interval_ms {
            self.requiem_timer_ms = 0.0;
            self.phase = BossPhase::Requiem;
            self.invulnerable = true;
            self.requiem_charge_ms = REQUIEM_CHARGE_MS;
            ctx.services.play_sound("requiem_charge", 1.0);
            tracing::info!("{} charges its requiem", self.profile.name);
        }
    }

    /// Where the boss is heading this frame
    fn combat_target(&self, player: &PlayerState) -> Vec2 {
        let (w, h) = (self.arena.width, self.arena.height);
        let t = self.elapsed_ms as f32;
        match self.kind {
            // Lateral sweep, faster for faster bosses
            BossKind::Percussionist => {
                let period = 2000.0 / self.profile.speed;
                Vec2::new(w / 2.0 + (t / period).sin() * (w / 3.0), self.target.y)
            }
            // Alternate between pressing the player and retreating to the top
            BossKind::Conductor => {
                if (t / 3000.0).sin() > 0.0 {
                    Vec2::new(player.position.x, (h / 3.0).min(player.position.y - 100.0))
                } else {
                    Vec2::new(w / 2.0, h / 5.0)
                }
            }
            BossKind::Orchestrator => {
                let phase = t / 2000.0;
                Vec2::new(
                    w / 2.0 + phase.cos() * (w / 4.0),
                    h / 3.0 + phase.sin() * (h / 6.0),
                )
            }
        }
    }

    fn launch_attack(&mut self, player: &PlayerState, ctx: &mut EventContext<'_>) {
        let level = self.level as f32;
        match self.kind {
            BossKind::Percussionist => {
                self.attacks.push(AttackObject::Shockwave(Shockwave::new(
                    self.position,
                    SHOCKWAVE_BASE_RADIUS + level * SHOCKWAVE_RADIUS_PER_LEVEL,
                    SHOCKWAVE_BASE_SPEED + level * SHOCKWAVE_SPEED_PER_LEVEL,
                    false,
                )));
                ctx.services.play_sound("boss_shockwave", 1.0);
            }
            BossKind::Conductor => {
                let count = 3 + self.level / 10;
                for i in 0..count {
                    let angle = TAU * i as f32 / count as f32;
                    ctx.emit(GameplayEffect::SpawnMinion {
                        position: self.position.offset_polar(angle, MINION_RING),
                        speed_scale: MINION_SPEED_SCALE,
                        size_scale: MINION_SIZE_SCALE,
                    });
                }
                ctx.services.play_sound("boss_summon", 1.0);
            }
            BossKind::Orchestrator => {
                let count = 2 + self.level / 15;
                for _ in 0..count {
                    let center = Vec2::new(
                        player.position.x + ctx.rng.gen_range(-FIELD_SPREAD..FIELD_SPREAD),
                        player.position.y + ctx.rng.gen_range(-FIELD_SPREAD..FIELD_SPREAD),
                    );
                    self.attacks.push(AttackObject::Field(DamageField::new(
                        center,
                        FIELD_RADIUS,
                        FIELD_LIFETIME_MS,
                    )));
                }
                ctx.services.play_sound("boss_field", 1.0);
            }
        }
    }

    fn unleash_requiem(&mut self, ctx: &mut EventContext<'_>) {
        let level = self.level as f32;
        match self.kind {
            BossKind::Percussionist => {
                for i in 0..CANON_WAVES {
                    self.deferred.push((
                        i as f64 * CANON_SPACING_MS,
                        DeferredAction::BossShockwave {
                            boss: self.kind,
                            max_radius: CANON_BASE_RADIUS + level * CANON_RADIUS_PER_LEVEL,
                            speed: CANON_BASE_SPEED + level * CANON_SPEED_PER_LEVEL,
                        },
                    ));
                }
            }
            BossKind::Conductor => {
                let count = 10 + self.level / 5;
                for i in 0..count {
                    self.deferred.push((
                        i as f64 * SWARM_SPACING_MS,
                        DeferredAction::SpawnMinion {
                            boss: self.kind,
                            angle: TAU * i as f32 / count as f32,
                            distance: SWARM_RING,
                            speed_scale: SWARM_SPEED_SCALE,
                            size_scale: 1.0,
                        },
                    ));
                }
            }
            BossKind::Orchestrator => {
                let (w, h) = (self.arena.width, self.arena.height);
                self.attacks.push(AttackObject::Silence(SilenceField {
                    center: Vec2::new(w / 2.0, h / 2.0),
                    radius: w.max(h),
                    remaining_ms: SILENCE_LIFETIME_MS,
                }));
                ctx.emit(GameplayEffect::PlayerDebuff {
                    speed_scale: SILENCE_SPEED_SCALE,
                    attack_rate_scale: SILENCE_ATTACK_RATE_SCALE,
                });
                self.deferred
                    .push((SILENCE_LIFETIME_MS, DeferredAction::ClearDebuff));
            }
        }
    }

    fn defeat(&mut self, ctx: &mut EventContext<'_>) {
        if self.phase == BossPhase::Defeated {
            return;
        }
        self.phase = BossPhase::Defeated;
        self.invulnerable = true;
        self.defeat_timer_ms = DEATH_ANIMATION_MS;
        self.defeat_count += 1;

        let fame = self.kind.fame_reward();
        ctx.services.play_sound("boss_defeated", 1.0);
        ctx.emit(GameplayEffect::BossDefeated {
            boss: self.kind,
            fame,
        });
        tracing::info!("{} defeated (+{} fame)", self.profile.name, fame);
    }

    fn drop_rewards(&mut self, ctx: &mut EventContext<'_>) {
        for _ in 0..self.profile.drop_amount {
            let angle = ctx.rng.gen_range(0.0..TAU);
            let distance = ctx.rng.gen_range(0.0..REWARD_SCATTER);
            ctx.emit(GameplayEffect::NoteFragment {
                position: self.position.offset_polar(angle, distance),
            });
        }
        ctx.emit(GameplayEffect::RewardChest {
            position: self.position,
            guaranteed: true,
        });
        self.rewards_dropped = true;
        tracing::info!(
            "{} dropped {} note fragments",
            self.profile.name,
            self.profile.drop_amount
        );
    }

    pub fn visual(&self) -> BossVisual {
        BossVisual {
            kind: self.kind,
            name: self.profile.name.to_string(),
            position: self.position,
            size: self.profile.size,
            phase: self.phase,
            invulnerable: self.invulnerable,
            health_fraction: (self.health / self.max_health).max(0.0),
            requiem_fraction: if self.phase == BossPhase::Combat {
                (self.requiem_timer_ms / self.profile.requiem_interval_ms) as f32
            } else {
                0.0
            },
            attacks: self.attacks.iter().map(|a| a.visual()).collect(),
        }
    }
}
