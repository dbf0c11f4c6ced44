//! Level-gated conductor event scheduling
//!
//! IDLE / EVENT_ACTIVE state machine. At most one event runs at a time;
//! a start request while one is active is rejected, never queued.
//! Boss thresholds are checked before regular ones on every idle update.

use ahash::AHashSet;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::boss::{AttackObject, BossEncounter, BossKind, BossPhase, BossSignal, Shockwave};
use crate::conductor::context::{EventContext, GameplayEffect};
use crate::conductor::cursor::ThresholdCursor;
use crate::conductor::deferred::DeferredAction;
use crate::conductor::falling_notes::FallingNotes;
use crate::conductor::hazard_lines::HazardLines;
use crate::conductor::hooks::{EventFrame, EventHooks};
use crate::conductor::kind::EventKind;
use crate::conductor::rhythm_zones::RhythmZones;
use crate::conductor::tempo_change::TempoChange;
use crate::conductor::visuals::EventVisual;
use crate::core::config::ConductorConfig;
use crate::core::error::{GameError, Result};
use crate::core::task_queue::TaskQueue;
use crate::core::types::{EventId, Millis};
use crate::player::PlayerState;

/// Per-type state of the running event
#[derive(Debug, Clone)]
pub enum EventState {
    FallingNotes(FallingNotes),
    RhythmZones(RhythmZones),
    TempoChange(TempoChange),
    HazardLines(HazardLines),
    Boss(BossEncounter),
}

impl EventState {
    /// Hooks of a regular event; bosses run their own state machine
    fn hooks_mut(&mut self) -> Option<&mut dyn EventHooks> {
        match self {
            EventState::FallingNotes(e) => Some(e),
            EventState::RhythmZones(e) => Some(e),
            EventState::TempoChange(e) => Some(e),
            EventState::HazardLines(e) => Some(e),
            EventState::Boss(_) => None,
        }
    }

    fn visual(&self) -> EventVisual {
        match self {
            EventState::FallingNotes(e) => e.visual(),
            EventState::RhythmZones(e) => e.visual(),
            EventState::TempoChange(e) => e.visual(),
            EventState::HazardLines(e) => e.visual(),
            EventState::Boss(boss) => EventVisual::Boss(boss.visual()),
        }
    }
}

/// The single active event
#[derive(Debug, Clone)]
pub struct ConductorEvent {
    pub id: EventId,
    pub kind: EventKind,
    pub level: u32,
    pub started_at: Millis,
    pub duration_ms: f64,
    pub elapsed_ms: f64,
    pub score: u32,
    /// Spawn flag borrowed from the enemy collaborator, restored on end
    saved_spawn: Option<bool>,
    pub state: EventState,
}

/// HUD view of the active event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventStatus {
    pub id: EventId,
    pub kind: EventKind,
    pub level: u32,
    pub elapsed_ms: f64,
    pub duration_ms: f64,
    pub score: u32,
}

#[derive(Debug)]
pub struct ConductorScheduler {
    config: ConductorConfig,
    enabled: bool,
    disabled: AHashSet<EventKind>,
    active: Option<ConductorEvent>,
    regular_cursor: ThresholdCursor,
    boss_cursor: ThresholdCursor,
    last_trigger_level: u32,
    total_score: u32,
    events_run: u32,
    deferred: TaskQueue<DeferredAction>,
    clock_ms: Millis,
}

impl ConductorScheduler {
    /// Build a disabled scheduler; call `initialize` to arm it
    pub fn new(config: &ConductorConfig) -> Self {
        Self {
            config: config.clone(),
            enabled: false,
            disabled: config.disabled_events.iter().copied().collect(),
            active: None,
            regular_cursor: ThresholdCursor::new(config.event_levels.clone()),
            boss_cursor: ThresholdCursor::new(config.boss_levels.clone()),
            last_trigger_level: 0,
            total_score: 0,
            events_run: 0,
            deferred: TaskQueue::new(),
            clock_ms: 0.0,
        }
    }

    /// Enable scheduling and rewind the threshold cursors
    ///
    /// Events toggled off at runtime are re-enabled; events disabled in the
    /// configuration stay disabled.
    pub fn initialize(&mut self) {
        self.enabled = true;
        self.disabled = self.config.disabled_events.iter().copied().collect();
        self.regular_cursor.reset();
        self.boss_cursor.reset();
        self.last_trigger_level = 0;
        tracing::info!("Conductor initialized");
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Disabling ends the active event and drops all deferred work
    pub fn set_enabled(&mut self, enabled: bool, ctx: &mut EventContext<'_>) {
        if self.enabled == enabled {
            return;
        }
        self.enabled = enabled;
        if !enabled {
            self.end_event(ctx);
            let dropped = self.cancel_deferred(ctx);
            tracing::info!("Conductor disabled ({} deferred actions dropped)", dropped);
        } else {
            tracing::info!("Conductor enabled");
        }
    }

    pub fn toggle_event(&mut self, kind: EventKind, enabled: bool) {
        if enabled {
            self.disabled.remove(&kind);
        } else {
            self.disabled.insert(kind);
        }
        tracing::debug!("Event {} {}", kind, if enabled { "enabled" } else { "disabled" });
    }

    pub fn is_event_enabled(&self, kind: EventKind) -> bool {
        !self.disabled.contains(&kind)
    }

    /// Atomic reset
    ///
    /// The active event is dropped without scoring after its borrowed spawn
    /// flag and tempo are restored. Scores, cursors and deferred work are
    /// cleared.
    pub fn reset(&mut self, ctx: &mut EventContext<'_>) {
        if let Some(mut event) = self.active.take() {
            if let Some(hooks) = event.state.hooks_mut() {
                hooks.teardown(ctx);
            }
            if let Some(saved) = event.saved_spawn {
                ctx.services.set_spawn_enabled(saved);
            }
            tracing::debug!("Dropped {} on reset", event.kind);
        }
        let dropped = self.cancel_deferred(ctx);
        self.regular_cursor.reset();
        self.boss_cursor.reset();
        self.last_trigger_level = 0;
        self.total_score = 0;
        self.events_run = 0;
        tracing::info!("Conductor reset ({} deferred actions dropped)", dropped);
    }

    /// Start `kind` at the player's level
    pub fn start_event(
        &mut self,
        kind: EventKind,
        player: &PlayerState,
        ctx: &mut EventContext<'_>,
    ) -> Result<()> {
        if let Some(active) = &self.active {
            return Err(GameError::EventAlreadyActive {
                active: active.kind,
                requested: kind,
            });
        }
        if self.disabled.contains(&kind) {
            return Err(GameError::EventDisabled(kind));
        }

        let level = player.level;
        let duration_ms = if kind.is_boss() {
            self.config.boss_base_duration_ms + level as f64 * self.config.boss_duration_per_level_ms
        } else {
            self.config.base_duration_ms + level as f64 * self.config.duration_per_level_ms
        };

        let saved_spawn = if kind.suspends_spawning() {
            let saved = ctx.services.spawn_enabled();
            if saved.is_some() {
                ctx.services.set_spawn_enabled(false);
            }
            saved
        } else {
            None
        };

        let arena = ctx.arena;
        let boss = |boss: BossKind| EventState::Boss(BossEncounter::new(boss, level, arena));
        let state = match kind {
            EventKind::FallingNotes => EventState::FallingNotes(FallingNotes::new(level)),
            EventKind::RhythmZones => {
                EventState::RhythmZones(RhythmZones::new(level, player.position, ctx.rng))
            }
            EventKind::TempoChange => EventState::TempoChange(TempoChange::start(level, ctx)),
            EventKind::HazardLines => EventState::HazardLines(HazardLines::new(level, ctx.rng)),
            EventKind::Percussionist => boss(BossKind::Percussionist),
            EventKind::Conductor => boss(BossKind::Conductor),
            EventKind::Orchestrator => boss(BossKind::Orchestrator),
        };

        self.active = Some(ConductorEvent {
            id: EventId::new(),
            kind,
            level,
            started_at: self.clock_ms,
            duration_ms,
            elapsed_ms: 0.0,
            score: 0,
            saved_spawn,
            state,
        });
        self.events_run += 1;
        ctx.services.play_sound("conductor_event", 1.0);
        tracing::info!(
            "Conductor event started: {} (level {}, {} ms)",
            kind,
            level,
            duration_ms
        );
        Ok(())
    }

    /// Advance one frame
    pub fn update(&mut self, delta_ms: f64, player: &PlayerState, ctx: &mut EventContext<'_>) {
        self.clock_ms += delta_ms;
        self.fire_deferred(ctx);

        if !self.enabled {
            return;
        }

        let Some(event) = self.active.as_mut() else {
            self.check_thresholds(player, ctx);
            return;
        };

        event.elapsed_ms += delta_ms;
        let expired = event.elapsed_ms >= event.duration_ms;
        if expired || self.update_active(delta_ms, player, ctx) {
            self.end_event(ctx);
        }
    }

    /// Runs the active event's hooks; returns true when the event asked to end
    fn update_active(&mut self, delta_ms: f64, player: &PlayerState, ctx: &mut EventContext<'_>) -> bool {
        let Some(event) = self.active.as_mut() else {
            return false;
        };

        if let EventState::Boss(boss) = &mut event.state {
            let signal = boss.update(delta_ms, player, ctx);
            for (delay, action) in boss.take_deferred() {
                self.deferred.schedule(self.clock_ms + delay, action);
            }
            return signal == BossSignal::Finished;
        }

        let frame = EventFrame {
            delta_ms,
            elapsed_ms: event.elapsed_ms,
            duration_ms: event.duration_ms,
            player,
        };
        if let Some(hooks) = event.state.hooks_mut() {
            event.score += hooks.update(&frame, ctx);
        }
        false
    }

    fn check_thresholds(&mut self, player: &PlayerState, ctx: &mut EventContext<'_>) {
        let level = player.level;

        // Bosses fire one at a time in roster order, even across a level jump
        if let Some((index, threshold)) = self.boss_cursor.peek_next_reached(level) {
            match BossKind::for_threshold(index).map(EventKind::for_boss) {
                Some(kind) if self.is_event_enabled(kind) => {
                    self.boss_cursor.consume_through(index);
                    tracing::info!(
                        "Boss threshold {} reached at level {}: {}",
                        threshold,
                        level,
                        kind
                    );
                    if let Err(e) = self.start_event(kind, player, ctx) {
                        tracing::warn!("Boss event not started: {}", e);
                    }
                    self.last_trigger_level = level;
                    return;
                }
                _ => {}
            }
        }

        let threshold = self.next_regular_threshold();
        if level < threshold || level <= self.last_trigger_level {
            return;
        }
        if let Some((index, _)) = self.regular_cursor.peek_highest_reached(level) {
            self.regular_cursor.consume_through(index);
        } else {
            tracing::debug!("Fallback threshold {} reached at level {}", threshold, level);
        }
        self.last_trigger_level = level;

        let available: Vec<EventKind> = EventKind::REGULAR
            .iter()
            .copied()
            .filter(|kind| self.is_event_enabled(*kind))
            .collect();
        match available.choose(&mut *ctx.rng) {
            Some(&kind) => {
                if let Err(e) = self.start_event(kind, player, ctx) {
                    tracing::warn!("Regular event not started: {}", e);
                }
            }
            None => tracing::debug!("No regular event enabled at level {}", level),
        }
    }

    /// Next level at which a regular event fires
    ///
    /// After the configured list runs out, `last trigger + step`, skipping
    /// levels still reserved by an unfired boss threshold.
    pub fn next_regular_threshold(&self) -> u32 {
        if let Some(threshold) = self.regular_cursor.current() {
            return threshold;
        }
        let mut threshold = self.last_trigger_level + self.config.fallback_level_step;
        while self.boss_cursor.remaining().contains(&threshold) {
            threshold += 1;
        }
        threshold
    }

    /// End the active event; a no-op when idle
    pub fn end_event(&mut self, ctx: &mut EventContext<'_>) {
        let Some(mut event) = self.active.take() else {
            return;
        };

        if let Some(hooks) = event.state.hooks_mut() {
            hooks.teardown(ctx);
        }
        if let Some(saved) = event.saved_spawn {
            ctx.services.set_spawn_enabled(saved);
        }
        if event.kind.is_boss() {
            ctx.services.play_music("gameplay");
        }

        self.total_score += event.score;
        ctx.emit(GameplayEffect::EventEnded {
            kind: event.kind,
            score: event.score,
        });
        tracing::info!(
            "Conductor event ended: {} after {:.0} ms, score {}",
            event.kind,
            event.elapsed_ms,
            event.score
        );
    }

    fn fire_deferred(&mut self, ctx: &mut EventContext<'_>) {
        for (_, action) in self.deferred.drain_due(self.clock_ms) {
            if action == DeferredAction::ClearDebuff {
                ctx.emit(GameplayEffect::PlayerDebuffCleared);
                continue;
            }

            let boss = match self.active.as_mut().map(|e| &mut e.state) {
                Some(EventState::Boss(boss))
                    if Some(boss.kind()) == action.owner() && boss.phase() != BossPhase::Defeated =>
                {
                    boss
                }
                _ => {
                    tracing::debug!("Dropped deferred {:?}: owning boss is gone", action);
                    continue;
                }
            };

            let origin = boss.position();
            match action {
                DeferredAction::BossShockwave { max_radius, speed, .. } => {
                    boss.add_attack(AttackObject::Shockwave(Shockwave::new(
                        origin,
                        max_radius,
                        speed,
                        true,
                    )));
                    ctx.services.play_sound("boss_shockwave", 1.0);
                }
                DeferredAction::SpawnMinion {
                    angle,
                    distance,
                    speed_scale,
                    size_scale,
                    ..
                } => {
                    ctx.emit(GameplayEffect::SpawnMinion {
                        position: origin.offset_polar(angle, distance),
                        speed_scale,
                        size_scale,
                    });
                }
                DeferredAction::ClearDebuff => {}
            }
        }
    }

    pub fn status(&self) -> Option<EventStatus> {
        self.active.as_ref().map(|event| EventStatus {
            id: event.id,
            kind: event.kind,
            level: event.level,
            elapsed_ms: event.elapsed_ms,
            duration_ms: event.duration_ms,
            score: event.score,
        })
    }

    /// Draw hook: snapshot of everything the active event shows
    pub fn visuals(&self) -> Option<EventVisual> {
        self.active.as_ref().map(|event| event.state.visual())
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn current_kind(&self) -> Option<EventKind> {
        self.active.as_ref().map(|e| e.kind)
    }

    pub fn current_event(&self) -> Option<&ConductorEvent> {
        self.active.as_ref()
    }

    pub fn boss(&self) -> Option<&BossEncounter> {
        match self.active.as_ref().map(|e| &e.state) {
            Some(EventState::Boss(boss)) => Some(boss),
            _ => None,
        }
    }

    pub fn boss_mut(&mut self) -> Option<&mut BossEncounter> {
        match self.active.as_mut().map(|e| &mut e.state) {
            Some(EventState::Boss(boss)) => Some(boss),
            _ => None,
        }
    }

    pub fn total_score(&self) -> u32 {
        self.total_score
    }

    /// Events started since the last reset
    pub fn events_run(&self) -> u32 {
        self.events_run
    }

    pub fn pending_deferred(&self) -> usize {
        self.deferred.len()
    }

    /// Cancel all deferred work without touching the active event
    ///
    /// A pending debuff clear is applied immediately instead of dropped.
    pub fn cancel_deferred(&mut self, ctx: &mut EventContext<'_>) -> usize {
        let dropped = self.deferred.drain_all();
        if dropped.contains(&DeferredAction::ClearDebuff) {
            ctx.emit(GameplayEffect::PlayerDebuffCleared);
        }
        dropped.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conductor::context::{Collaborators, SpawnSwitch, Strike};
    use crate::core::config::ArenaConfig;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    struct Harness {
        services: Collaborators,
        rng: ChaCha8Rng,
        strikes: Vec<Strike>,
        effects: Vec<GameplayEffect>,
    }

    impl Harness {
        fn new(services: Collaborators) -> Self {
            Self {
                services,
                rng: ChaCha8Rng::seed_from_u64(7),
                strikes: Vec::new(),
                effects: Vec::new(),
            }
        }

        fn ctx(&mut self) -> EventContext<'_> {
            EventContext {
                clock: None,
                services: &mut self.services,
                rng: &mut self.rng,
                strikes: &mut self.strikes,
                effects: &mut self.effects,
                arena: ArenaConfig::default(),
            }
        }
    }

    fn scheduler() -> ConductorScheduler {
        let mut scheduler = ConductorScheduler::new(&ConductorConfig::default());
        scheduler.initialize();
        scheduler
    }

    fn player_at(level: u32) -> PlayerState {
        let mut player = PlayerState::default();
        player.level = level;
        player
    }

    #[test]
    fn test_start_while_active_is_rejected() {
        let mut h = Harness::new(Collaborators::new());
        let mut s = scheduler();
        let player = player_at(3);

        s.start_event(EventKind::HazardLines, &player, &mut h.ctx()).unwrap();
        let id = s.status().unwrap().id;

        let result = s.start_event(EventKind::FallingNotes, &player, &mut h.ctx());
        assert!(matches!(result, Err(GameError::EventAlreadyActive { .. })));
        assert_eq!(s.current_kind(), Some(EventKind::HazardLines));
        assert_eq!(s.status().unwrap().id, id);
    }

    #[test]
    fn test_disabled_event_does_not_start() {
        let mut h = Harness::new(Collaborators::new());
        let mut s = scheduler();
        s.toggle_event(EventKind::TempoChange, false);

        let result = s.start_event(EventKind::TempoChange, &player_at(1), &mut h.ctx());
        assert!(matches!(result, Err(GameError::EventDisabled(EventKind::TempoChange))));
        assert!(!s.is_active());

        s.initialize();
        assert!(s.is_event_enabled(EventKind::TempoChange));
    }

    #[test]
    fn test_durations() {
        let mut h = Harness::new(Collaborators::new());
        let mut s = scheduler();
        s.start_event(EventKind::HazardLines, &player_at(7), &mut h.ctx()).unwrap();
        assert_eq!(s.status().unwrap().duration_ms, 17_000.0);
        s.end_event(&mut h.ctx());

        s.start_event(EventKind::Conductor, &player_at(10), &mut h.ctx()).unwrap();
        assert_eq!(s.status().unwrap().duration_ms, 140_000.0);
    }

    #[test]
    fn test_regular_event_ends_on_timer() {
        let mut h = Harness::new(Collaborators::new());
        let mut s = scheduler();
        let player = player_at(0);
        s.start_event(EventKind::HazardLines, &player, &mut h.ctx()).unwrap();

        for _ in 0..99 {
            s.update(100.0, &player, &mut h.ctx());
        }
        assert!(s.is_active());
        s.update(100.0, &player, &mut h.ctx());
        assert!(!s.is_active());
        assert!(h
            .effects
            .iter()
            .any(|e| matches!(e, GameplayEffect::EventEnded { kind: EventKind::HazardLines, .. })));
    }

    #[test]
    fn test_level_jump_fires_once_at_highest_threshold() {
        let mut h = Harness::new(Collaborators::new());
        let mut config = ConductorConfig::default();
        config.boss_levels = vec![];
        config.event_levels = vec![5, 6];
        let mut s = ConductorScheduler::new(&config);
        s.initialize();

        s.update(16.0, &player_at(4), &mut h.ctx());
        assert!(!s.is_active());
        s.update(16.0, &player_at(6), &mut h.ctx());
        assert!(s.is_active());
        assert_eq!(s.status().unwrap().level, 6);
        assert_eq!(s.events_run(), 1);

        s.end_event(&mut h.ctx());
        s.update(16.0, &player_at(6), &mut h.ctx());
        assert!(!s.is_active());
        // List exhausted: fallback is last trigger + 2
        assert_eq!(s.next_regular_threshold(), 8);
    }

    #[test]
    fn test_boss_threshold_fires_exactly_once() {
        let mut h = Harness::new(Collaborators::new());
        let mut s = scheduler();
        let player = player_at(5);

        s.update(16.0, &player, &mut h.ctx());
        assert_eq!(s.current_kind(), Some(EventKind::Percussionist));
        s.end_event(&mut h.ctx());

        for _ in 0..50 {
            s.update(16.0, &player, &mut h.ctx());
            assert_ne!(s.current_kind(), Some(EventKind::Percussionist));
            s.end_event(&mut h.ctx());
        }
        assert_eq!(s.events_run(), 1);
    }

    #[test]
    fn test_level_jump_runs_skipped_bosses_in_order() {
        let mut h = Harness::new(Collaborators::new());
        let mut s = scheduler();

        s.update(16.0, &player_at(4), &mut h.ctx());
        assert!(!s.is_active());

        let player = player_at(12);
        let mut started = Vec::new();
        for _ in 0..20 {
            s.update(16.0, &player, &mut h.ctx());
            started.extend(s.current_kind());
            s.end_event(&mut h.ctx());
        }
        assert_eq!(started, vec![EventKind::Percussionist, EventKind::Conductor]);
    }

    #[test]
    fn test_disabled_boss_falls_through_to_regular() {
        let mut h = Harness::new(Collaborators::new());
        let mut s = scheduler();
        s.toggle_event(EventKind::Percussionist, false);

        s.update(16.0, &player_at(7), &mut h.ctx());
        let kind = s.current_kind().unwrap();
        assert!(!kind.is_boss());
    }

    #[test]
    fn test_fallback_skips_reserved_boss_levels() {
        let mut config = ConductorConfig::default();
        config.event_levels = vec![];
        config.boss_levels = vec![2, 3];
        let mut s = ConductorScheduler::new(&config);
        s.initialize();
        assert_eq!(s.next_regular_threshold(), 4);
    }

    #[test]
    fn test_spawn_flag_restored_verbatim() {
        for initial in [true, false] {
            let switch = SpawnSwitch::new(initial);
            let mut h = Harness::new(Collaborators::new().with_enemies(switch.clone()));
            let mut s = scheduler();

            for kind in EventKind::ALL {
                s.start_event(kind, &player_at(1), &mut h.ctx()).unwrap();
                if kind.suspends_spawning() {
                    assert!(!switch.get());
                }
                s.end_event(&mut h.ctx());
                assert_eq!(switch.get(), initial, "{} changed the spawn flag", kind);
            }
        }
    }

    #[test]
    fn test_reset_restores_spawn_and_clears_score() {
        let switch = SpawnSwitch::new(true);
        let mut h = Harness::new(Collaborators::new().with_enemies(switch.clone()));
        let mut s = scheduler();

        s.start_event(EventKind::FallingNotes, &player_at(1), &mut h.ctx()).unwrap();
        assert!(!switch.get());
        s.reset(&mut h.ctx());
        assert!(switch.get());
        assert!(!s.is_active());
        assert_eq!(s.total_score(), 0);
        assert_eq!(s.next_regular_threshold(), 7);
    }

    #[test]
    fn test_end_event_is_idempotent() {
        let mut h = Harness::new(Collaborators::new());
        let mut s = scheduler();
        s.end_event(&mut h.ctx());
        s.start_event(EventKind::TempoChange, &player_at(1), &mut h.ctx()).unwrap();
        s.end_event(&mut h.ctx());
        s.end_event(&mut h.ctx());
        let ended = h
            .effects
            .iter()
            .filter(|e| matches!(e, GameplayEffect::EventEnded { .. }))
            .count();
        assert_eq!(ended, 1);
    }

    #[test]
    fn test_disable_ends_event_and_drops_deferred() {
        let mut h = Harness::new(Collaborators::new());
        let mut s = scheduler();
        s.start_event(EventKind::Percussionist, &player_at(5), &mut h.ctx()).unwrap();
        s.deferred.schedule(10_000.0, DeferredAction::ClearDebuff);

        s.set_enabled(false, &mut h.ctx());
        assert!(!s.is_active());
        assert_eq!(s.pending_deferred(), 0);
        assert!(h.effects.contains(&GameplayEffect::PlayerDebuffCleared));

        // Disabled scheduler never starts events
        s.update(16.0, &player_at(50), &mut h.ctx());
        assert!(!s.is_active());
    }

    #[test]
    fn test_deferred_part_dropped_when_boss_gone() {
        let mut h = Harness::new(Collaborators::new());
        let mut s = scheduler();
        s.deferred.schedule(
            0.0,
            DeferredAction::SpawnMinion {
                boss: BossKind::Conductor,
                angle: 0.0,
                distance: 200.0,
                speed_scale: 2.0,
                size_scale: 1.0,
            },
        );
        s.deferred.schedule(0.0, DeferredAction::ClearDebuff);

        s.update(16.0, &player_at(0), &mut h.ctx());
        assert!(!h
            .effects
            .iter()
            .any(|e| matches!(e, GameplayEffect::SpawnMinion { .. })));
        assert!(h.effects.contains(&GameplayEffect::PlayerDebuffCleared));
    }

    #[test]
    fn test_visuals_follow_active_event() {
        let mut h = Harness::new(Collaborators::new());
        let mut s = scheduler();
        assert!(s.visuals().is_none());
        s.start_event(EventKind::Orchestrator, &player_at(15), &mut h.ctx()).unwrap();
        assert!(matches!(s.visuals(), Some(EventVisual::Boss(_))));
    }
}
