//! Rhythm core: beat clock, tick channel, patterns and attack resolution
//!
//! Data flows `BeatClock -> RhythmEventChannel -> AttackPatternResolver`.

pub mod channel;
pub mod clock;
pub mod constants;
pub mod pattern;
pub mod resolver;
pub mod tick;

pub use channel::{RhythmEventChannel, TickSlot};
pub use clock::{BeatClock, TempoTransition};
pub use pattern::{PatternSlot, RhythmPattern};
pub use resolver::{AttackPatternResolver, AttackRequest, AttackSource};
pub use tick::{BeatTick, RhythmTick, SubdivisionTick, TickSink, Timestamped};
