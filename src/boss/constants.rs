//! Boss encounter constants

// Entry
pub const ENTRY_APPROACH: f32 = 0.05; // fraction of remaining distance per update
pub const ENTRY_SNAP_DISTANCE: f32 = 1.0;

// Combat
pub const COMBAT_DAMPING: f32 = 0.03; // scaled by boss speed
pub const HEALTH_SCALE_PER_LEVEL: f32 = 0.15;
pub const CRITICAL_MULTIPLIER: f32 = 2.0;

// Requiem
pub const REQUIEM_CHARGE_MS: f64 = 3000.0;
pub const DEATH_ANIMATION_MS: f64 = 3000.0;

// Percussionist
pub const SHOCKWAVE_BASE_RADIUS: f32 = 350.0;
pub const SHOCKWAVE_RADIUS_PER_LEVEL: f32 = 10.0;
pub const SHOCKWAVE_BASE_SPEED: f32 = 3.0;
pub const SHOCKWAVE_SPEED_PER_LEVEL: f32 = 0.1;
pub const CANON_WAVES: u32 = 5;
pub const CANON_SPACING_MS: f64 = 600.0;
pub const CANON_BASE_RADIUS: f32 = 500.0;
pub const CANON_RADIUS_PER_LEVEL: f32 = 15.0;
pub const CANON_BASE_SPEED: f32 = 4.0;
pub const CANON_SPEED_PER_LEVEL: f32 = 0.15;

// Conductor
pub const MINION_RING: f32 = 80.0;
pub const MINION_SPEED_SCALE: f32 = 1.5;
pub const MINION_SIZE_SCALE: f32 = 0.8;
pub const SWARM_RING: f32 = 200.0;
pub const SWARM_SPACING_MS: f64 = 200.0;
pub const SWARM_SPEED_SCALE: f32 = 2.0;

// Orchestrator
pub const FIELD_RADIUS: f32 = 80.0;
pub const FIELD_LIFETIME_MS: f64 = 5000.0;
pub const FIELD_SPREAD: f32 = 150.0; // around the player
pub const SILENCE_LIFETIME_MS: f64 = 8000.0;
pub const SILENCE_SPEED_SCALE: f32 = 0.6;
pub const SILENCE_ATTACK_RATE_SCALE: f32 = 1.5;

// Rewards
pub const REWARD_SCATTER: f32 = 150.0;
