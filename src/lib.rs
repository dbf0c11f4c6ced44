//! Rhythm Survivor - rhythm synchronization and event-scheduling core
//!
//! The beat clock publishes ticks into a single-slot channel, the attack
//! resolver turns them into attack requests, and the conductor layers
//! level-gated events (including boss encounters) over normal gameplay.

pub mod boss;
pub mod conductor;
pub mod core;
pub mod player;
pub mod rhythm;
pub mod session;
