//! End-to-end tests for the per-frame session loop

use rhythm_survivor::conductor::{
    AudioLog, Collaborators, EventKind, GameplayEffect, SpawnSwitch, Strike,
};
use rhythm_survivor::core::config::{ConductorConfig, GameConfig};
use rhythm_survivor::player::{CharacterKind, PlayerState};
use rhythm_survivor::rhythm::AttackSource;
use rhythm_survivor::session::{FrameReport, GameSession};

const STEP: f64 = 16.0;

struct Rig {
    session: GameSession,
    audio: AudioLog,
    spawns: SpawnSwitch,
}

fn rig(config: GameConfig) -> Rig {
    let audio = AudioLog::new();
    let spawns = SpawnSwitch::new(true);
    let services = Collaborators::new()
        .with_audio(audio.clone())
        .with_enemies(spawns.clone());
    let session = GameSession::new(config, 42)
        .unwrap()
        .with_collaborators(services);
    Rig {
        session,
        audio,
        spawns,
    }
}

fn no_bosses() -> GameConfig {
    GameConfig {
        conductor: ConductorConfig {
            boss_levels: vec![],
            ..ConductorConfig::default()
        },
        ..GameConfig::default()
    }
}

fn run(session: &mut GameSession, player: &PlayerState, ms: f64) -> Vec<FrameReport> {
    let frames = (ms / STEP).round() as usize;
    let mut strikes: Vec<Strike> = Vec::new();
    (0..frames)
        .map(|_| session.frame(STEP, player, &mut strikes))
        .collect()
}

fn ended(reports: &[FrameReport]) -> Vec<(EventKind, u32)> {
    reports
        .iter()
        .flat_map(|r| r.effects.iter())
        .filter_map(|e| match e {
            GameplayEffect::EventEnded { kind, score } => Some((*kind, *score)),
            _ => None,
        })
        .collect()
}

#[test]
fn test_regular_event_runs_its_full_duration() {
    let mut rig = rig(no_bosses());
    let mut player = PlayerState::default();
    player.level = 7;

    let first = rig.session.frame(STEP, &player, &mut Vec::new());
    let status = first.status.expect("event should start at level 7");
    assert_eq!(status.duration_ms, 17_000.0);
    assert!(!status.kind.is_boss());
    assert_eq!(rig.spawns.get(), !status.kind.suspends_spawning());

    let reports = run(&mut rig.session, &player, 18_000.0);
    let ended = ended(&reports);
    assert_eq!(ended.len(), 1);
    assert_eq!(ended[0].0, status.kind);

    let scheduler = rig.session.scheduler();
    assert!(!scheduler.is_active());
    assert_eq!(scheduler.events_run(), 1);
    assert_eq!(scheduler.total_score(), ended[0].1);
    assert!(rig.spawns.get());
    assert_eq!(rig.session.clock().unwrap().bpm(), 60.0);
    assert!(rig.audio.count("conductor_event") >= 1);
}

#[test]
fn test_levelling_walks_through_event_thresholds() {
    let mut rig = rig(no_bosses());
    let mut player = PlayerState::default();
    let mut kinds = Vec::new();

    // Each level is held long enough for any event it triggers to finish
    for level in [7, 11, 14] {
        player.level = level;
        let reports = run(&mut rig.session, &player, 10_000.0 + level as f64 * 1_000.0 + 1_000.0);
        kinds.extend(ended(&reports).into_iter().map(|(kind, _)| kind));
        assert!(!rig.session.scheduler().is_active());
        assert!(rig.spawns.get());
    }

    assert_eq!(kinds.len(), 3);
    assert!(kinds.iter().all(|k| EventKind::REGULAR.contains(k)));
    assert_eq!(rig.session.scheduler().events_run(), 3);
}

#[test]
fn test_boss_run_suspends_spawning_and_targets_boss() {
    let mut rig = rig(GameConfig::default());
    let mut player = PlayerState::new(CharacterKind::Archer);
    player.level = 5;
    player.apply_rhythm_upgrade(4);

    let reports = run(&mut rig.session, &player, 3_000.0);
    assert_eq!(
        rig.session.scheduler().current_kind(),
        Some(EventKind::Percussionist)
    );
    assert!(!rig.spawns.get());

    // The first frame resolves attacks before the boss exists
    assert!(reports
        .iter()
        .skip(1)
        .flat_map(|r| r.attacks.iter())
        .all(|a| a.target.is_some()));
    assert!(rig.session.visuals().is_some());
}

#[test]
fn test_reset_cancels_everything_and_rearms() {
    let mut rig = rig(GameConfig::default());
    let mut player = PlayerState::default();
    player.level = 5;
    player.apply_rhythm_upgrade(7);

    run(&mut rig.session, &player, 500.0);
    assert!(rig.session.scheduler().is_active());
    assert!(!rig.spawns.get());

    rig.session.reset();
    assert!(!rig.session.scheduler().is_active());
    assert_eq!(rig.session.scheduler().pending_deferred(), 0);
    assert_eq!(rig.session.scheduler().total_score(), 0);
    assert!(!rig.session.channel().has_pending());
    assert!(rig.spawns.get());

    // Cursors were cleared, so the boss threshold fires again
    run(&mut rig.session, &player, STEP);
    assert_eq!(
        rig.session.scheduler().current_kind(),
        Some(EventKind::Percussionist)
    );
}

#[test]
fn test_disabling_conductor_ends_event_and_stays_idle() {
    let mut rig = rig(GameConfig::default());
    let mut player = PlayerState::default();
    player.level = 5;
    player.apply_rhythm_upgrade(4);

    run(&mut rig.session, &player, 200.0);
    assert!(rig.session.scheduler().is_active());

    let effects = rig.session.set_conductor_enabled(false);
    assert!(effects
        .iter()
        .any(|e| matches!(e, GameplayEffect::EventEnded { .. })));
    assert!(rig.spawns.get());

    let reports = run(&mut rig.session, &player, 3_000.0);
    assert!(reports.iter().all(|r| r.status.is_none()));
    // Attacks keep flowing with the conductor off
    assert!(reports.iter().any(|r| !r.attacks.is_empty()));
}

#[test]
fn test_manual_start_is_rejected_while_active() {
    let mut rig = rig(no_bosses());
    let player = PlayerState::default();

    rig.session
        .start_event(EventKind::TempoChange, &player)
        .unwrap();
    assert!(rig
        .session
        .start_event(EventKind::FallingNotes, &player)
        .is_err());
    assert_eq!(
        rig.session.scheduler().current_kind(),
        Some(EventKind::TempoChange)
    );
}

#[test]
fn test_fallback_cadence_without_clock() {
    let mut session = GameSession::new(GameConfig::default(), 7)
        .unwrap()
        .without_clock();
    let player = PlayerState::new(CharacterKind::Footman);

    let reports = run(&mut session, &player, 5_000.0);
    let attacks: Vec<_> = reports.iter().flat_map(|r| r.attacks.iter()).collect();
    assert!(attacks.iter().all(|a| a.source == AttackSource::Fallback));

    let expected = 5_000.0 / player.effective_attack_rate_ms();
    assert!((attacks.len() as f64 - expected).abs() <= 1.0);
    assert!(session.clock().is_none());
}

#[test]
fn test_toml_tempo_drives_attack_rate() {
    let config = GameConfig::from_toml_str(
        r#"
        [rhythm]
        default_bpm = 120.0
        "#,
    )
    .unwrap();
    let mut session = GameSession::new(config, 3).unwrap();
    let mut player = PlayerState::default();
    player.apply_rhythm_upgrade(4);

    let beats = run(&mut session, &player, 4_000.0)
        .iter()
        .flat_map(|r| r.attacks.iter())
        .filter(|a| matches!(a.source, AttackSource::Beat { .. }))
        .count();
    assert!((7..=9).contains(&beats), "got {} beats", beats);
}

#[test]
fn test_frame_report_serializes_to_json() {
    let mut rig = rig(GameConfig::default());
    let mut player = PlayerState::default();
    player.level = 5;

    let report = rig.session.frame(STEP, &player, &mut Vec::new());
    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["status"]["kind"], "PERCUSSIONIST_EVENT");
    assert_eq!(value["now_ms"], 16.0);
    assert!(value["effects"].is_array());
}
