//! Rhythm constants - fixed values of the beat clock
//!
//! Tunables (tempo, bonuses, windows) live in `RhythmConfig`; these are
//! the values the timing model itself is built on.

// Time
pub const MS_PER_MINUTE: f64 = 60_000.0;

// The subdivision timer always runs at eighth-note rate; even counts
// coincide with main beats and are skipped.
pub const SUBDIVISION_TIMER_DIVISOR: f64 = 2.0;

// Subdivision flags
pub const EIGHTH_SUBDIVISIONS: u8 = 2;
pub const TRIPLET_SUBDIVISIONS: u8 = 3;
pub const SIXTEENTH_SUBDIVISIONS: [u8; 2] = [4, 8];

// Pattern slots
pub const MAX_PATTERN_BEATS: u8 = 4;
pub const OFFBEAT_TOKEN: &str = "&";

// Fallback attacks fire without a rhythm bonus
pub const FALLBACK_BONUS: f32 = 1.0;
