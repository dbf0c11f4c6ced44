//! FALLING_NOTES - hazards rain down on the player

use std::f32::consts::TAU;

use rand::Rng;

use crate::conductor::context::{take_first_hit, DamageSource, EventContext};
use crate::conductor::hooks::{EventFrame, EventHooks};
use crate::conductor::visuals::{EventVisual, NoteVisual};
use crate::core::types::Vec2;

const NOTE_SIZE: f32 = 20.0;
const SPAWN_SPREAD: f32 = 300.0;
const SPAWN_MARGIN: f32 = 50.0;

#[derive(Debug, Clone, PartialEq)]
pub struct FallingNote {
    pub position: Vec2,
    pub size: f32,
    /// World units per reference frame
    pub speed: f32,
    pub rotation: f32,
    pub has_hit_player: bool,
}

#[derive(Debug, Clone)]
pub struct FallingNotes {
    notes: Vec<FallingNote>,
    spawn_timer_ms: f64,
    spawn_interval_ms: f64,
}

impl FallingNotes {
    pub fn new(level: u32) -> Self {
        Self {
            notes: Vec::new(),
            spawn_timer_ms: 0.0,
            spawn_interval_ms: spawn_interval_ms(level),
        }
    }

    pub fn notes(&self) -> &[FallingNote] {
        &self.notes
    }

    pub fn spawn_interval_ms(&self) -> f64 {
        self.spawn_interval_ms
    }

    fn spawn(&mut self, player_pos: Vec2, ctx: &mut EventContext<'_>) {
        let x = player_pos.x + ctx.rng.gen_range(-SPAWN_SPREAD..SPAWN_SPREAD);
        let y = player_pos.y - ctx.arena.height / 2.0 - SPAWN_MARGIN;
        self.notes.push(FallingNote {
            position: Vec2::new(x, y),
            size: NOTE_SIZE,
            speed: ctx.rng.gen_range(2.0..5.0),
            rotation: ctx.rng.gen_range(0.0..TAU),
            has_hit_player: false,
        });
    }
}

/// Spawn interval shrinks with level, floored at 600 ms
pub fn spawn_interval_ms(level: u32) -> f64 {
    (1200.0 - level as f64 * 30.0).max(600.0)
}

/// Notes per spawn grow with event progress
pub fn notes_per_spawn(progress: f64) -> usize {
    1 + (progress * 2.0).floor() as usize
}

impl EventHooks for FallingNotes {
    fn update(&mut self, frame: &EventFrame<'_>, ctx: &mut EventContext<'_>) -> u32 {
        let player = frame.player;
        let mut score = 0;

        self.spawn_timer_ms += frame.delta_ms;
        if self.spawn_timer_ms >= self.spawn_interval_ms {
            for _ in 0..notes_per_spawn(frame.progress()) {
                self.spawn(player.position, ctx);
            }
            self.spawn_timer_ms = 0.0;
        }

        let scale = frame.frame_scale();
        let cull_y = player.position.y + ctx.arena.height / 1.5;
        let mut i = 0;
        while i < self.notes.len() {
            let note = &mut self.notes[i];
            note.position.y += note.speed * scale;
            note.rotation += 0.01 * scale;

            if note.position.y > cull_y {
                self.notes.remove(i);
                continue;
            }

            if !note.has_hit_player
                && player.position.distance(&note.position) < player.size / 2.0 + note.size / 2.0
            {
                note.has_hit_player = true;
                ctx.damage_player(1, DamageSource::FallingNote);
            }

            let (center, radius) = (note.position, note.size / 2.0);
            if take_first_hit(ctx.strikes, center, radius).is_some() {
                self.notes.remove(i);
                score += 1;
                ctx.services.play_sound("melee_hit", 0.5);
                continue;
            }

            i += 1;
        }

        score
    }

    fn teardown(&mut self, _ctx: &mut EventContext<'_>) {
        self.notes.clear();
    }

    fn visual(&self) -> EventVisual {
        EventVisual::FallingNotes {
            notes: self
                .notes
                .iter()
                .map(|n| NoteVisual {
                    position: n.position,
                    size: n.size,
                    rotation: n.rotation,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conductor::context::{Collaborators, GameplayEffect, Strike};
    use crate::core::config::ArenaConfig;
    use crate::player::PlayerState;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_interval_scales_with_level() {
        assert_eq!(spawn_interval_ms(1), 1170.0);
        assert_eq!(spawn_interval_ms(20), 600.0);
        assert_eq!(spawn_interval_ms(40), 600.0);
    }

    #[test]
    fn test_notes_per_spawn() {
        assert_eq!(notes_per_spawn(0.0), 1);
        assert_eq!(notes_per_spawn(0.49), 1);
        assert_eq!(notes_per_spawn(0.5), 2);
        assert_eq!(notes_per_spawn(1.0), 3);
    }

    #[test]
    fn test_strike_destroys_note_for_score() {
        let mut services = Collaborators::new();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut strikes = Vec::new();
        let mut effects = Vec::new();
        let player = PlayerState::default();
        let mut event = FallingNotes::new(1);
        event.notes.push(FallingNote {
            position: Vec2::new(0.0, -200.0),
            size: NOTE_SIZE,
            speed: 0.0,
            rotation: 0.0,
            has_hit_player: false,
        });
        strikes.push(Strike::new(Vec2::new(0.0, -200.0), 4.0, 1.0));

        let mut ctx = EventContext {
            clock: None,
            services: &mut services,
            rng: &mut rng,
            strikes: &mut strikes,
            effects: &mut effects,
            arena: ArenaConfig::default(),
        };
        let frame = EventFrame {
            delta_ms: 16.0,
            elapsed_ms: 16.0,
            duration_ms: 11_000.0,
            player: &player,
        };
        assert_eq!(event.update(&frame, &mut ctx), 1);
        assert!(event.notes().is_empty());
        assert!(strikes.is_empty());
        assert!(effects.is_empty());
    }

    #[test]
    fn test_note_hits_player_once() {
        let mut services = Collaborators::new();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut strikes = Vec::new();
        let mut effects = Vec::new();
        let player = PlayerState::default();
        let mut event = FallingNotes::new(1);
        event.notes.push(FallingNote {
            position: Vec2::new(0.0, 0.0),
            size: NOTE_SIZE,
            speed: 0.0,
            rotation: 0.0,
            has_hit_player: false,
        });

        for _ in 0..3 {
            let mut ctx = EventContext {
                clock: None,
                services: &mut services,
                rng: &mut rng,
                strikes: &mut strikes,
                effects: &mut effects,
                arena: ArenaConfig::default(),
            };
            let frame = EventFrame {
                delta_ms: 16.0,
                elapsed_ms: 16.0,
                duration_ms: 11_000.0,
                player: &player,
            };
            event.update(&frame, &mut ctx);
        }

        let hits = effects
            .iter()
            .filter(|e| matches!(e, GameplayEffect::PlayerDamaged { .. }))
            .count();
        assert_eq!(hits, 1);
    }
}
