//! Headless Rhythm Survivor runner
//!
//! Runs a fixed-step session with a scripted player that levels up on a
//! timer, feeds every attack back in as a strike, and prints a summary.

use std::path::PathBuf;

use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use rhythm_survivor::conductor::{AudioLog, Collaborators, GameplayEffect, SpawnSwitch, Strike};
use rhythm_survivor::core::config::GameConfig;
use rhythm_survivor::core::error::Result;
use rhythm_survivor::core::types::Vec2;
use rhythm_survivor::player::{CharacterKind, PlayerState};
use rhythm_survivor::rhythm::{AttackRequest, AttackSource};
use rhythm_survivor::session::GameSession;

/// Strike radius of a melee swing around the player
const MELEE_REACH: f32 = 60.0;
/// Strike radius of an arrow
const ARROW_RADIUS: f32 = 8.0;
const STRIKE_POWER: f32 = 1.0;
/// Highest rhythm upgrade level
const MAX_RHYTHM_LEVEL: u8 = 7;

/// Headless Rhythm Survivor - simulate the rhythm core without a renderer
#[derive(Parser, Debug)]
#[command(name = "rhythm-survivor")]
#[command(about = "Run a headless rhythm-survivor session and print a summary")]
struct Args {
    /// TOML config file (missing keys use defaults)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Simulated seconds
    #[arg(long, default_value_t = 120.0)]
    seconds: f64,

    /// Frame step in milliseconds
    #[arg(long, default_value_t = 16.67)]
    frame_ms: f64,

    /// Seconds between player level-ups
    #[arg(long, default_value_t = 8.0)]
    level_every: f64,

    /// Character: archer or footman
    #[arg(long, default_value = "archer")]
    character: String,

    /// Run without a beat clock (fallback attacks)
    #[arg(long)]
    no_clock: bool,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,
}

#[derive(Debug, Default, Serialize)]
struct AttackCounts {
    beat: u32,
    offbeat: u32,
    fallback: u32,
}

#[derive(Debug, Serialize)]
struct EventRecord {
    kind: String,
    score: u32,
}

#[derive(Debug, Default, Serialize)]
struct RunSummary {
    seed: u64,
    seconds: f64,
    frames: u64,
    character: String,
    final_level: u32,
    final_bpm: Option<f64>,
    attacks: AttackCounts,
    events: Vec<EventRecord>,
    total_score: u32,
    boss_defeats: Vec<String>,
    fame: u32,
    damage_taken: u32,
    minions_spawned: u32,
    note_fragments: u32,
    audio_cues: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("rhythm_survivor=info")),
        )
        .init();

    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(|| rand::random());
    let character: CharacterKind = args.character.parse()?;

    let config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };

    let audio = AudioLog::new();
    let spawns = SpawnSwitch::new(true);
    let services = Collaborators::new()
        .with_audio(audio.clone())
        .with_enemies(spawns.clone());

    let arena = config.arena;
    let mut session = GameSession::new(config, seed)?.with_collaborators(services);
    if args.no_clock {
        session = session.without_clock();
    }

    let mut player = PlayerState::new(character);
    player.position = Vec2::new(arena.width / 2.0, arena.height * 0.6);
    player.apply_rhythm_upgrade(1);

    let mut summary = RunSummary {
        seed,
        seconds: args.seconds,
        character: character.to_string(),
        ..RunSummary::default()
    };

    let total_ms = args.seconds * 1000.0;
    let level_every_ms = args.level_every.max(0.001) * 1000.0;
    let mut next_level_at = level_every_ms;
    let mut strikes: Vec<Strike> = Vec::new();

    while session.now_ms() < total_ms {
        if session.now_ms() >= next_level_at {
            next_level_at += level_every_ms;
            player.level += 1;
            let rhythm_level = (player.level / 2).clamp(1, MAX_RHYTHM_LEVEL as u32) as u8;
            player.apply_rhythm_upgrade(rhythm_level);
            tracing::debug!("Player reached level {}", player.level);
        }

        let report = session.frame(args.frame_ms, &player, &mut strikes);

        strikes.clear();
        for attack in &report.attacks {
            count_attack(&mut summary.attacks, attack);
            strikes.push(strike_for(attack, &player));
        }

        for effect in &report.effects {
            apply_effect(&mut summary, &mut player, effect);
        }
    }

    summary.frames = session.frames();
    summary.final_level = player.level;
    summary.final_bpm = session.clock().map(|c| c.bpm());
    summary.total_score = session.scheduler().total_score();
    summary.audio_cues = audio.cues().len();

    if args.format == "text" {
        print_text(&summary);
    } else {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }
    Ok(())
}

fn count_attack(counts: &mut AttackCounts, attack: &AttackRequest) {
    match attack.source {
        AttackSource::Beat { .. } => counts.beat += 1,
        AttackSource::Offbeat => counts.offbeat += 1,
        AttackSource::Fallback => counts.fallback += 1,
    }
}

/// Arrows fly to the target; swings land around the player
fn strike_for(attack: &AttackRequest, player: &PlayerState) -> Strike {
    let power = STRIKE_POWER * attack.bonus_multiplier;
    match attack.target {
        Some(target) => Strike::new(target, ARROW_RADIUS, power),
        None => Strike::new(player.position, MELEE_REACH, power),
    }
}

fn apply_effect(summary: &mut RunSummary, player: &mut PlayerState, effect: &GameplayEffect) {
    match effect {
        GameplayEffect::PlayerDamaged { amount, .. } => summary.damage_taken += amount,
        GameplayEffect::SpawnMinion { .. } => summary.minions_spawned += 1,
        GameplayEffect::NoteFragment { .. } => summary.note_fragments += 1,
        GameplayEffect::PlayerDebuff {
            speed_scale,
            attack_rate_scale,
        } => player.apply_debuff(*speed_scale, *attack_rate_scale),
        GameplayEffect::PlayerDebuffCleared => player.clear_debuff(),
        GameplayEffect::BossDefeated { boss, fame } => {
            summary.boss_defeats.push(boss.to_string());
            summary.fame += fame;
        }
        GameplayEffect::EventEnded { kind, score } => summary.events.push(EventRecord {
            kind: kind.to_string(),
            score: *score,
        }),
        GameplayEffect::HitFeedback { .. } | GameplayEffect::RewardChest { .. } => {}
    }
}

fn print_text(summary: &RunSummary) {
    println!("=== RHYTHM SURVIVOR ===");
    println!(
        "{} for {:.0} s ({} frames, seed {})",
        summary.character, summary.seconds, summary.frames, summary.seed
    );
    println!("Final level: {}", summary.final_level);
    match summary.final_bpm {
        Some(bpm) => println!("Final tempo: {} BPM", bpm),
        None => println!("Final tempo: no beat clock"),
    }
    println!(
        "Attacks: {} on beat, {} off beat, {} fallback",
        summary.attacks.beat, summary.attacks.offbeat, summary.attacks.fallback
    );
    println!("Events:");
    for event in &summary.events {
        println!("  {:<20} score {}", event.kind, event.score);
    }
    println!("Total score: {}", summary.total_score);
    if !summary.boss_defeats.is_empty() {
        println!(
            "Bosses defeated: {} (+{} fame)",
            summary.boss_defeats.join(", "),
            summary.fame
        );
    }
    println!("Damage taken: {}", summary.damage_taken);
    println!("Minions spawned: {}", summary.minions_spawned);
    println!("Note fragments: {}", summary.note_fragments);
    println!("Audio cues: {}", summary.audio_cues);
}
