//! Game session - composition root for the rhythm core
//!
//! Owns the beat clock, tick channel, attack resolver and conductor, and
//! runs them in a fixed order once per frame:
//! clamp delta, advance clock into the channel, resolve attacks, update
//! the conductor.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::conductor::{
    Collaborators, ConductorScheduler, EventContext, EventKind, EventStatus, EventVisual,
    GameplayEffect, Strike,
};
use crate::core::config::GameConfig;
use crate::core::error::Result;
use crate::core::types::Millis;
use crate::player::PlayerState;
use crate::rhythm::constants::EIGHTH_SUBDIVISIONS;
use crate::rhythm::{AttackPatternResolver, AttackRequest, BeatClock, RhythmEventChannel};

/// Everything one frame produced
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameReport {
    pub now_ms: Millis,
    pub attacks: Vec<AttackRequest>,
    pub effects: Vec<GameplayEffect>,
    pub status: Option<EventStatus>,
}

#[derive(Debug)]
pub struct GameSession {
    config: GameConfig,
    clock: Option<BeatClock>,
    channel: RhythmEventChannel,
    resolver: AttackPatternResolver,
    scheduler: ConductorScheduler,
    services: Collaborators,
    rng: ChaCha8Rng,
    now_ms: Millis,
    frames: u64,
}

impl GameSession {
    /// Build a session with a running beat clock and an armed conductor
    pub fn new(config: GameConfig, seed: u64) -> Result<Self> {
        config.validate()?;

        let mut clock = BeatClock::new(&config.rhythm);
        clock.start(0.0);
        let mut scheduler = ConductorScheduler::new(&config.conductor);
        scheduler.initialize();

        tracing::info!(
            "Session started at {} BPM (seed {})",
            config.rhythm.default_bpm,
            seed
        );

        Ok(Self {
            channel: RhythmEventChannel::new(&config.rhythm),
            clock: Some(clock),
            resolver: AttackPatternResolver::new(),
            scheduler,
            services: Collaborators::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            now_ms: 0.0,
            frames: 0,
            config,
        })
    }

    /// Drop the beat clock; attacks fall back to the fixed-rate accumulator
    pub fn without_clock(mut self) -> Self {
        if let Some(mut clock) = self.clock.take() {
            clock.stop();
        }
        self.channel.clear();
        tracing::info!("Running without a beat clock (fallback attacks)");
        self
    }

    pub fn with_collaborators(mut self, services: Collaborators) -> Self {
        self.services = services;
        self
    }

    /// Run one frame
    pub fn frame(
        &mut self,
        raw_delta_ms: f64,
        player: &PlayerState,
        strikes: &mut Vec<Strike>,
    ) -> FrameReport {
        let delta_ms = raw_delta_ms.clamp(0.0, self.config.frame.max_delta_ms);
        self.now_ms += delta_ms;
        self.frames += 1;

        if let Some(clock) = self.clock.as_mut() {
            let wanted = if player.has_eighth_notes {
                EIGHTH_SUBDIVISIONS
            } else {
                self.config.rhythm.subdivision_count
            };
            if clock.subdivision_count() != wanted {
                if let Err(e) = clock.set_subdivision_count(wanted) {
                    tracing::warn!("Subdivision change rejected: {}", e);
                }
            }
            clock.advance(self.now_ms, &mut self.channel);
        }

        let target = self.scheduler.boss().map(|boss| boss.position());
        let channel = match self.clock {
            Some(_) => Some(&mut self.channel),
            None => None,
        };
        let attacks = self
            .resolver
            .update(delta_ms, self.now_ms, channel, player, target);

        let mut effects = Vec::new();
        let mut ctx = EventContext {
            clock: self.clock.as_mut(),
            services: &mut self.services,
            rng: &mut self.rng,
            strikes,
            effects: &mut effects,
            arena: self.config.arena,
        };
        self.scheduler.update(delta_ms, player, &mut ctx);

        FrameReport {
            now_ms: self.now_ms,
            attacks,
            effects,
            status: self.scheduler.status(),
        }
    }

    /// Request an event outside the level thresholds
    pub fn start_event(&mut self, kind: EventKind, player: &PlayerState) -> Result<Vec<GameplayEffect>> {
        let mut effects = Vec::new();
        let mut strikes = Vec::new();
        let mut ctx = EventContext {
            clock: self.clock.as_mut(),
            services: &mut self.services,
            rng: &mut self.rng,
            strikes: &mut strikes,
            effects: &mut effects,
            arena: self.config.arena,
        };
        self.scheduler.start_event(kind, player, &mut ctx)?;
        Ok(effects)
    }

    /// Enable or disable the conductor
    pub fn set_conductor_enabled(&mut self, enabled: bool) -> Vec<GameplayEffect> {
        let mut effects = Vec::new();
        let mut strikes = Vec::new();
        let mut ctx = EventContext {
            clock: self.clock.as_mut(),
            services: &mut self.services,
            rng: &mut self.rng,
            strikes: &mut strikes,
            effects: &mut effects,
            arena: self.config.arena,
        };
        self.scheduler.set_enabled(enabled, &mut ctx);
        effects
    }

    /// Cancel every timer, tick and deferred task at once
    ///
    /// The conductor reverts borrowed state first, then the clock restarts
    /// at the configured tempo from the current time.
    pub fn reset(&mut self) {
        let mut effects = Vec::new();
        let mut strikes = Vec::new();
        let mut ctx = EventContext {
            clock: self.clock.as_mut(),
            services: &mut self.services,
            rng: &mut self.rng,
            strikes: &mut strikes,
            effects: &mut effects,
            arena: self.config.arena,
        };
        self.scheduler.reset(&mut ctx);

        if let Some(clock) = self.clock.as_mut() {
            clock.stop();
            if let Err(e) = clock.set_tempo(self.config.rhythm.default_bpm) {
                tracing::warn!("Tempo reset rejected: {}", e);
            }
            clock.start(self.now_ms);
        }
        self.channel.clear();
        self.resolver.reset();
        tracing::info!("Session reset at {:.0} ms", self.now_ms);
    }

    pub fn now_ms(&self) -> Millis {
        self.now_ms
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn clock(&self) -> Option<&BeatClock> {
        self.clock.as_ref()
    }

    pub fn clock_mut(&mut self) -> Option<&mut BeatClock> {
        self.clock.as_mut()
    }

    pub fn channel(&self) -> &RhythmEventChannel {
        &self.channel
    }

    pub fn scheduler(&self) -> &ConductorScheduler {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut ConductorScheduler {
        &mut self.scheduler
    }

    pub fn services_mut(&mut self) -> &mut Collaborators {
        &mut self.services
    }

    /// Draw hook for the render layer
    pub fn visuals(&self) -> Option<EventVisual> {
        self.scheduler.visuals()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rhythm::AttackSource;

    fn run(session: &mut GameSession, player: &PlayerState, ms: f64) -> Vec<FrameReport> {
        let frames = (ms / 16.0).round() as usize;
        let mut strikes = Vec::new();
        (0..frames)
            .map(|_| session.frame(16.0, player, &mut strikes))
            .collect()
    }

    #[test]
    fn test_beats_drive_attacks() {
        let mut session = GameSession::new(GameConfig::default(), 1).unwrap();
        let mut player = PlayerState::default();
        player.apply_rhythm_upgrade(4);

        let attacks: usize = run(&mut session, &player, 4_000.0)
            .iter()
            .map(|r| r.attacks.len())
            .sum();
        // 60 BPM, every beat in the pattern
        assert_eq!(attacks, 4);
    }

    #[test]
    fn test_fallback_without_clock() {
        let mut session = GameSession::new(GameConfig::default(), 1)
            .unwrap()
            .without_clock();
        let mut player = PlayerState::new(crate::player::CharacterKind::Footman);
        player.level = 1;

        let reports = run(&mut session, &player, 1_000.0);
        let attacks: Vec<_> = reports.iter().flat_map(|r| r.attacks.iter()).collect();
        assert!(!attacks.is_empty());
        assert!(attacks.iter().all(|a| a.source == AttackSource::Fallback));
    }

    #[test]
    fn test_eighth_notes_switch_subdivisions() {
        let mut session = GameSession::new(GameConfig::default(), 1).unwrap();
        let mut player = PlayerState::default();
        player.apply_rhythm_upgrade(7);

        let reports = run(&mut session, &player, 3_000.0);
        assert_eq!(session.clock().unwrap().subdivision_count(), 2);
        assert!(reports
            .iter()
            .flat_map(|r| r.attacks.iter())
            .any(|a| a.source == AttackSource::Offbeat));
    }

    #[test]
    fn test_delta_is_clamped() {
        let mut session = GameSession::new(GameConfig::default(), 1).unwrap();
        let report = session.frame(5_000.0, &PlayerState::default(), &mut Vec::new());
        assert_eq!(report.now_ms, 100.0);
    }

    #[test]
    fn test_reset_drops_active_event() {
        let mut session = GameSession::new(GameConfig::default(), 1).unwrap();
        let mut player = PlayerState::default();
        player.level = 5;
        run(&mut session, &player, 100.0);
        assert_eq!(session.scheduler().current_kind(), Some(EventKind::Percussionist));

        session.reset();
        assert!(!session.scheduler().is_active());
        assert!(!session.channel().has_pending());
        assert_eq!(session.clock().unwrap().bpm(), 60.0);
    }
}
