//! Attack pattern resolver - turns ticks into attack requests
//!
//! With a channel, attacks follow the player's rhythm pattern. Without
//! one the resolver degrades to a plain accumulator at the character's
//! base attack rate.

use serde::{Deserialize, Serialize};

use crate::core::types::{Millis, Vec2};
use crate::player::{CharacterKind, PlayerState};
use crate::rhythm::channel::RhythmEventChannel;
use crate::rhythm::constants::FALLBACK_BONUS;
use crate::rhythm::pattern::{PatternSlot, RhythmPattern};
use crate::rhythm::tick::{BeatTick, SubdivisionTick};

/// What triggered an attack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AttackSource {
    Beat { slot: PatternSlot },
    Offbeat,
    Fallback,
}

/// Opaque payload handed to the combat collaborator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttackRequest {
    pub source: AttackSource,
    pub bonus_multiplier: f32,
    pub character: CharacterKind,
    /// Aim point; only ranged characters carry one
    pub target: Option<Vec2>,
    pub timestamp: Millis,
}

impl AttackRequest {
    fn new(
        source: AttackSource,
        bonus_multiplier: f32,
        player: &PlayerState,
        target: Option<Vec2>,
        timestamp: Millis,
    ) -> Self {
        Self {
            source,
            bonus_multiplier,
            character: player.character,
            target: if player.character.is_ranged() { target } else { None },
            timestamp,
        }
    }
}

/// Does a beat tick land on a slot of the pattern?
pub fn beat_matches(pattern: &RhythmPattern, tick: &BeatTick) -> Option<PatternSlot> {
    PatternSlot::for_beat(tick.beat_number).filter(|slot| pattern.includes(*slot))
}

/// Does a subdivision tick trigger an off-beat attack?
pub fn offbeat_matches(player: &PlayerState, tick: &SubdivisionTick) -> bool {
    player.has_eighth_notes && player.rhythm_pattern.includes_offbeat() && tick.is_eighth
}

#[derive(Debug, Clone, Default)]
pub struct AttackPatternResolver {
    fallback_timer_ms: f64,
}

impl AttackPatternResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve this frame's attacks
    ///
    /// `channel` is `None` when no beat clock exists, which selects the
    /// fallback accumulator.
    pub fn update(
        &mut self,
        delta_ms: f64,
        now: Millis,
        channel: Option<&mut RhythmEventChannel>,
        player: &PlayerState,
        target: Option<Vec2>,
    ) -> Vec<AttackRequest> {
        match channel {
            Some(channel) => self.resolve_ticks(channel, now, player, target),
            None => self.resolve_fallback(delta_ms, now, player, target),
        }
    }

    /// At most one request per tick type
    pub fn resolve_ticks(
        &mut self,
        channel: &mut RhythmEventChannel,
        now: Millis,
        player: &PlayerState,
        target: Option<Vec2>,
    ) -> Vec<AttackRequest> {
        let mut requests = Vec::new();

        if let Some(tick) = channel.consume_beat(now) {
            if let Some(slot) = beat_matches(&player.rhythm_pattern, &tick) {
                requests.push(AttackRequest::new(
                    AttackSource::Beat { slot },
                    tick.bonus_multiplier,
                    player,
                    target,
                    tick.timestamp,
                ));
            }
        }

        if let Some(tick) = channel.consume_subdivision(now) {
            if offbeat_matches(player, &tick) {
                requests.push(AttackRequest::new(
                    AttackSource::Offbeat,
                    tick.bonus_multiplier,
                    player,
                    target,
                    tick.timestamp,
                ));
            }
        }

        requests
    }

    /// Fixed-rate attacks without a beat clock
    ///
    /// At most one attack per frame. The remainder past the attack rate
    /// carries over so the cadence does not drift with the frame step.
    pub fn resolve_fallback(
        &mut self,
        delta_ms: f64,
        now: Millis,
        player: &PlayerState,
        target: Option<Vec2>,
    ) -> Vec<AttackRequest> {
        let rate = player.effective_attack_rate_ms();
        self.fallback_timer_ms += delta_ms;
        if self.fallback_timer_ms < rate {
            return Vec::new();
        }

        self.fallback_timer_ms -= rate;
        vec![AttackRequest::new(
            AttackSource::Fallback,
            FALLBACK_BONUS,
            player,
            target,
            now,
        )]
    }

    pub fn reset(&mut self) {
        self.fallback_timer_ms = 0.0;
    }
}
