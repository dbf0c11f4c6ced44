//! Boss roster and per-boss data

use std::fmt;

use serde::{Deserialize, Serialize};

/// The three requiem bosses, in encounter order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BossKind {
    Percussionist,
    Conductor,
    Orchestrator,
}

/// Static stats of a boss before level scaling
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BossProfile {
    pub name: &'static str,
    pub requiem_ability: &'static str,
    pub health: f32,
    pub size: f32,
    pub speed: f32,
    pub attack_interval_ms: f64,
    pub requiem_interval_ms: f64,
    /// Note fragments dropped on defeat
    pub drop_amount: u32,
}

const PERCUSSIONIST: BossProfile = BossProfile {
    name: "Rhythm Devourer",
    requiem_ability: "Percussion Canon",
    health: 100.0,
    size: 100.0,
    speed: 1.2,
    attack_interval_ms: 2000.0,
    requiem_interval_ms: 10_000.0,
    drop_amount: 20,
};

const CONDUCTOR: BossProfile = BossProfile {
    name: "Dissonance Director",
    requiem_ability: "Cacophonic Swarm",
    health: 120.0,
    size: 85.0,
    speed: 1.5,
    attack_interval_ms: 3000.0,
    requiem_interval_ms: 15_000.0,
    drop_amount: 25,
};

const ORCHESTRATOR: BossProfile = BossProfile {
    name: "Silence Symphony",
    requiem_ability: "Grand Silence",
    health: 150.0,
    size: 120.0,
    speed: 0.8,
    attack_interval_ms: 2500.0,
    requiem_interval_ms: 12_000.0,
    drop_amount: 30,
};

impl BossKind {
    pub const ALL: [BossKind; 3] = [
        BossKind::Percussionist,
        BossKind::Conductor,
        BossKind::Orchestrator,
    ];

    pub fn profile(&self) -> &'static BossProfile {
        match self {
            BossKind::Percussionist => &PERCUSSIONIST,
            BossKind::Conductor => &CONDUCTOR,
            BossKind::Orchestrator => &ORCHESTRATOR,
        }
    }

    /// Position in the roster, starting at 1
    pub fn ordinal(&self) -> u32 {
        match self {
            BossKind::Percussionist => 1,
            BossKind::Conductor => 2,
            BossKind::Orchestrator => 3,
        }
    }

    /// Boss mapped to the `index`-th boss threshold
    pub fn for_threshold(index: usize) -> Option<BossKind> {
        Self::ALL.get(index).copied()
    }

    pub fn fame_reward(&self) -> u32 {
        50 + 10 * self.ordinal()
    }

    pub fn music_track(&self) -> &'static str {
        match self {
            BossKind::Percussionist => "boss_theme_percussionist",
            BossKind::Conductor => "boss_theme_conductor",
            BossKind::Orchestrator => "boss_theme_orchestrator",
        }
    }
}

impl fmt::Display for BossKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.profile().name)
    }
}
