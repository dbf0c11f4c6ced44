//! Conductor scheduler integration tests

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use rhythm_survivor::conductor::*;
use rhythm_survivor::core::config::{ArenaConfig, ConductorConfig, RhythmConfig};
use rhythm_survivor::core::error::GameError;
use rhythm_survivor::core::types::Vec2;
use rhythm_survivor::player::PlayerState;
use rhythm_survivor::rhythm::BeatClock;

/// Owns everything an `EventContext` borrows
struct World {
    clock: Option<BeatClock>,
    services: Collaborators,
    rng: ChaCha8Rng,
    strikes: Vec<Strike>,
    effects: Vec<GameplayEffect>,
}

impl World {
    fn new() -> Self {
        Self {
            clock: None,
            services: Collaborators::new(),
            rng: ChaCha8Rng::seed_from_u64(2024),
            strikes: Vec::new(),
            effects: Vec::new(),
        }
    }

    fn with_clock(mut self, bpm: f64) -> Self {
        let mut clock = BeatClock::new(&RhythmConfig::default());
        clock.set_tempo(bpm).unwrap();
        clock.start(0.0);
        self.clock = Some(clock);
        self
    }

    fn ctx(&mut self) -> EventContext<'_> {
        EventContext {
            clock: self.clock.as_mut(),
            services: &mut self.services,
            rng: &mut self.rng,
            strikes: &mut self.strikes,
            effects: &mut self.effects,
            arena: ArenaConfig::default(),
        }
    }

    fn ended(&self) -> Vec<(EventKind, u32)> {
        self.effects
            .iter()
            .filter_map(|e| match e {
                GameplayEffect::EventEnded { kind, score } => Some((*kind, *score)),
                _ => None,
            })
            .collect()
    }
}

fn armed(config: &ConductorConfig) -> ConductorScheduler {
    let mut scheduler = ConductorScheduler::new(config);
    scheduler.initialize();
    scheduler
}

fn player_at(level: u32) -> PlayerState {
    let mut player = PlayerState::default();
    player.level = level;
    player.position = Vec2::new(640.0, 400.0);
    player
}

#[test]
fn test_uninitialized_scheduler_stays_idle() {
    let mut world = World::new();
    let mut scheduler = ConductorScheduler::new(&ConductorConfig::default());
    scheduler.update(16.0, &player_at(30), &mut world.ctx());
    assert!(!scheduler.is_active());
    assert!(!scheduler.is_enabled());
}

#[test]
fn test_level_jump_four_to_six_starts_one_event() {
    let mut world = World::new();
    let mut scheduler = armed(&ConductorConfig::default());

    scheduler.update(16.0, &player_at(4), &mut world.ctx());
    assert!(!scheduler.is_active());

    scheduler.update(16.0, &player_at(6), &mut world.ctx());
    assert_eq!(scheduler.current_kind(), Some(EventKind::Percussionist));
    assert_eq!(scheduler.events_run(), 1);
}

#[test]
fn test_boss_threshold_checked_before_regular() {
    let mut world = World::new();
    let mut config = ConductorConfig::default();
    config.event_levels = vec![5];
    let mut scheduler = armed(&config);

    scheduler.update(16.0, &player_at(5), &mut world.ctx());
    assert_eq!(scheduler.current_kind(), Some(EventKind::Percussionist));
}

#[test]
fn test_regular_thresholds_then_fallback_progression() {
    let mut world = World::new();
    let mut config = ConductorConfig::default();
    config.boss_levels = vec![];
    config.event_levels = vec![3];
    config.base_duration_ms = 100.0;
    config.duration_per_level_ms = 0.0;
    let mut scheduler = armed(&config);

    let mut started_at_levels = Vec::new();
    for level in 1..=10 {
        let player = player_at(level);
        for _ in 0..20 {
            let was_active = scheduler.is_active();
            scheduler.update(16.0, &player, &mut world.ctx());
            if !was_active && scheduler.is_active() {
                started_at_levels.push(level);
            }
        }
    }
    assert_eq!(started_at_levels, vec![3, 5, 7, 9]);
}

#[test]
fn test_tempo_change_reverts_on_end() {
    let mut world = World::new().with_clock(90.0);
    let mut scheduler = armed(&ConductorConfig::default());
    let player = player_at(2);

    scheduler
        .start_event(EventKind::TempoChange, &player, &mut world.ctx())
        .unwrap();
    let changed = world.clock.as_ref().unwrap().bpm();
    assert_ne!(changed, 90.0);

    // 10 s base + 2 s for level 2
    for _ in 0..121 {
        scheduler.update(100.0, &player, &mut world.ctx());
    }
    assert!(!scheduler.is_active());
    assert_eq!(world.clock.as_ref().unwrap().bpm(), 90.0);
    assert_eq!(world.ended(), vec![(EventKind::TempoChange, 0)]);
}

#[test]
fn test_falling_notes_score_flows_into_total() {
    let mut world = World::new();
    let mut scheduler = armed(&ConductorConfig::default());
    let player = player_at(1);

    scheduler
        .start_event(EventKind::FallingNotes, &player, &mut world.ctx())
        .unwrap();

    // Shoot down every note as soon as it appears
    while scheduler.is_active() {
        let positions: Vec<Vec2> = match scheduler.visuals() {
            Some(EventVisual::FallingNotes { notes }) => notes.iter().map(|n| n.position).collect(),
            _ => Vec::new(),
        };
        world.strikes = positions
            .into_iter()
            .map(|p| Strike::new(p, 5.0, 1.0))
            .collect();
        scheduler.update(16.67, &player, &mut world.ctx());
    }

    let ended = world.ended();
    assert_eq!(ended.len(), 1);
    assert!(ended[0].1 > 0);
    assert_eq!(scheduler.total_score(), ended[0].1);
}

#[test]
fn test_status_reports_progress() {
    let mut world = World::new();
    let mut scheduler = armed(&ConductorConfig::default());
    let player = player_at(3);
    scheduler
        .start_event(EventKind::HazardLines, &player, &mut world.ctx())
        .unwrap();
    scheduler.update(250.0, &player, &mut world.ctx());

    let status = scheduler.status().unwrap();
    assert_eq!(status.kind, EventKind::HazardLines);
    assert_eq!(status.level, 3);
    assert_eq!(status.elapsed_ms, 250.0);
    assert_eq!(status.duration_ms, 13_000.0);
}

#[test]
fn test_config_disabled_events_survive_initialize() {
    let mut world = World::new();
    let mut config = ConductorConfig::default();
    config.disabled_events = vec![EventKind::FallingNotes];
    let mut scheduler = armed(&config);
    scheduler.initialize();

    let result = scheduler.start_event(EventKind::FallingNotes, &player_at(1), &mut world.ctx());
    assert!(matches!(result, Err(GameError::EventDisabled(EventKind::FallingNotes))));
}

#[test]
fn test_all_regular_disabled_consumes_threshold_quietly() {
    let mut world = World::new();
    let mut config = ConductorConfig::default();
    config.boss_levels = vec![];
    let mut scheduler = armed(&config);
    for kind in EventKind::REGULAR {
        scheduler.toggle_event(kind, false);
    }

    scheduler.update(16.0, &player_at(7), &mut world.ctx());
    assert!(!scheduler.is_active());
    assert_eq!(scheduler.next_regular_threshold(), 11);
}

#[test]
fn test_start_event_cues_audio() {
    let log = AudioLog::new();
    let mut world = World::new();
    world.services = Collaborators::new().with_audio(log.clone());
    let mut scheduler = armed(&ConductorConfig::default());

    scheduler
        .start_event(EventKind::RhythmZones, &player_at(1), &mut world.ctx())
        .unwrap();
    assert_eq!(log.count("conductor_event"), 1);
}
