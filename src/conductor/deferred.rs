//! Deferred multi-part effects
//!
//! Requiem bursts are scheduled on the conductor's task queue at fixed
//! delays. They are not individually cancellable; a scheduler reset or
//! disable drops them all.

use serde::{Deserialize, Serialize};

use crate::boss::BossKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum DeferredAction {
    /// One ring of a shockwave burst, launched from the boss's position at fire time
    BossShockwave {
        boss: BossKind,
        max_radius: f32,
        speed: f32,
    },
    /// One minion of a swarm, placed on a ring around the boss at fire time
    SpawnMinion {
        boss: BossKind,
        angle: f32,
        distance: f32,
        speed_scale: f32,
        size_scale: f32,
    },
    /// End of the silence debuff; fires even after the boss is gone
    ClearDebuff,
}

impl DeferredAction {
    /// Boss the action belongs to, if it needs one alive to fire
    pub fn owner(&self) -> Option<BossKind> {
        match self {
            DeferredAction::BossShockwave { boss, .. } => Some(*boss),
            DeferredAction::SpawnMinion { boss, .. } => Some(*boss),
            DeferredAction::ClearDebuff => None,
        }
    }
}
