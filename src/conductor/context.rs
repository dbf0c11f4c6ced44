//! Collaborator seams and the per-frame context handed to events
//!
//! Audio and enemy systems are optional. Every helper on `Collaborators`
//! is a no-op when the collaborator is absent, so events keep their
//! gameplay effect and simply skip the cue.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::boss::BossKind;
use crate::conductor::kind::EventKind;
use crate::core::config::ArenaConfig;
use crate::core::types::Vec2;
use crate::rhythm::clock::BeatClock;

/// Sound and music playback
pub trait AudioSink {
    fn play_sound(&mut self, id: &str, volume: f32);
    fn play_music(&mut self, track: &str);
}

/// Enemy system as seen by the conductor
pub trait EnemySpawner {
    fn spawn_enabled(&self) -> bool;
    fn set_spawn_enabled(&mut self, enabled: bool);
}

/// Shared spawn-enable flag
///
/// Clones share the same flag, so the caller can keep a handle while the
/// conductor holds a boxed copy.
#[derive(Debug, Clone)]
pub struct SpawnSwitch {
    enabled: Rc<Cell<bool>>,
}

impl SpawnSwitch {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled: Rc::new(Cell::new(enabled)),
        }
    }

    pub fn get(&self) -> bool {
        self.enabled.get()
    }

    pub fn set(&self, enabled: bool) {
        self.enabled.set(enabled);
    }
}

impl Default for SpawnSwitch {
    fn default() -> Self {
        Self::new(true)
    }
}

impl EnemySpawner for SpawnSwitch {
    fn spawn_enabled(&self) -> bool {
        self.get()
    }

    fn set_spawn_enabled(&mut self, enabled: bool) {
        self.set(enabled);
    }
}

/// Audio stand-in that records every cue
#[derive(Debug, Clone, Default)]
pub struct AudioLog {
    cues: Rc<RefCell<Vec<String>>>,
}

impl AudioLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cues(&self) -> Vec<String> {
        self.cues.borrow().clone()
    }

    pub fn count(&self, id: &str) -> usize {
        self.cues.borrow().iter().filter(|c| c.as_str() == id).count()
    }
}

impl AudioSink for AudioLog {
    fn play_sound(&mut self, id: &str, _volume: f32) {
        self.cues.borrow_mut().push(id.to_string());
    }

    fn play_music(&mut self, track: &str) {
        self.cues.borrow_mut().push(format!("music:{}", track));
    }
}

/// Optional external systems
#[derive(Default)]
pub struct Collaborators {
    pub audio: Option<Box<dyn AudioSink>>,
    pub enemies: Option<Box<dyn EnemySpawner>>,
}

impl Collaborators {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_audio(mut self, audio: impl AudioSink + 'static) -> Self {
        self.audio = Some(Box::new(audio));
        self
    }

    pub fn with_enemies(mut self, enemies: impl EnemySpawner + 'static) -> Self {
        self.enemies = Some(Box::new(enemies));
        self
    }

    pub fn has_audio(&self) -> bool {
        self.audio.is_some()
    }

    pub fn play_sound(&mut self, id: &str, volume: f32) {
        if let Some(audio) = self.audio.as_mut() {
            audio.play_sound(id, volume);
        }
    }

    pub fn play_music(&mut self, track: &str) {
        if let Some(audio) = self.audio.as_mut() {
            audio.play_music(track);
        }
    }

    /// `None` when there is no enemy system
    pub fn spawn_enabled(&self) -> Option<bool> {
        self.enemies.as_ref().map(|e| e.spawn_enabled())
    }

    pub fn set_spawn_enabled(&mut self, enabled: bool) {
        if let Some(enemies) = self.enemies.as_mut() {
            enemies.set_spawn_enabled(enabled);
        }
    }
}

impl fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collaborators")
            .field("audio", &self.audio.is_some())
            .field("enemies", &self.spawn_enabled())
            .finish()
    }
}

/// A weapon hit volume from the combat collaborator (projectile or melee arc)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Strike {
    pub position: Vec2,
    pub radius: f32,
    pub power: f32,
    pub critical: bool,
    pub piercing: bool,
}

impl Strike {
    pub fn new(position: Vec2, radius: f32, power: f32) -> Self {
        Self {
            position,
            radius,
            power,
            critical: false,
            piercing: false,
        }
    }

    pub fn lands_on(&self, center: Vec2, radius: f32) -> bool {
        self.position.distance(&center) < self.radius + radius
    }
}

/// First strike landing on a circle; non-piercing strikes are used up
pub fn take_first_hit(strikes: &mut Vec<Strike>, center: Vec2, radius: f32) -> Option<Strike> {
    let index = strikes.iter().position(|s| s.lands_on(center, radius))?;
    let strike = strikes[index];
    if !strike.piercing {
        strikes.remove(index);
    }
    Some(strike)
}

/// What hurt the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageSource {
    FallingNote,
    DangerZone,
    HazardLine,
    Shockwave,
    Field,
}

/// Outbound effects for the game's other systems
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum GameplayEffect {
    PlayerDamaged {
        amount: u32,
        source: DamageSource,
    },
    HitFeedback {
        position: Vec2,
        critical: bool,
    },
    SpawnMinion {
        position: Vec2,
        speed_scale: f32,
        size_scale: f32,
    },
    NoteFragment {
        position: Vec2,
    },
    RewardChest {
        position: Vec2,
        guaranteed: bool,
    },
    PlayerDebuff {
        speed_scale: f32,
        attack_rate_scale: f32,
    },
    PlayerDebuffCleared,
    BossDefeated {
        boss: BossKind,
        fame: u32,
    },
    EventEnded {
        kind: EventKind,
        score: u32,
    },
}

/// Everything an event may touch during one update
pub struct EventContext<'a> {
    pub clock: Option<&'a mut BeatClock>,
    pub services: &'a mut Collaborators,
    pub rng: &'a mut ChaCha8Rng,
    pub strikes: &'a mut Vec<Strike>,
    pub effects: &'a mut Vec<GameplayEffect>,
    pub arena: ArenaConfig,
}

impl<'a> EventContext<'a> {
    pub fn emit(&mut self, effect: GameplayEffect) {
        self.effects.push(effect);
    }

    pub fn damage_player(&mut self, amount: u32, source: DamageSource) {
        self.effects.push(GameplayEffect::PlayerDamaged { amount, source });
        self.services.play_sound("player_hit", 1.0);
    }

    pub fn clock(&mut self) -> Option<&mut BeatClock> {
        self.clock.as_deref_mut()
    }
}
