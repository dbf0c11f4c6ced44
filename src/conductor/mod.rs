//! Conductor: level-gated events layered over normal gameplay
//!
//! The scheduler owns at most one active event. Regular events live in one
//! module each and share the `EventHooks` interface; boss events hand over
//! to `crate::boss`.

pub mod context;
pub mod cursor;
pub mod deferred;
pub mod falling_notes;
pub mod hazard_lines;
pub mod hooks;
pub mod kind;
pub mod rhythm_zones;
pub mod scheduler;
pub mod tempo_change;
pub mod visuals;

pub use context::{
    AudioLog, AudioSink, Collaborators, DamageSource, EnemySpawner, EventContext, GameplayEffect,
    SpawnSwitch, Strike,
};
pub use cursor::ThresholdCursor;
pub use deferred::DeferredAction;
pub use hooks::{EventFrame, EventHooks};
pub use kind::EventKind;
pub use scheduler::{ConductorEvent, ConductorScheduler, EventState, EventStatus};
pub use visuals::{AttackVisual, BossVisual, EventVisual};
