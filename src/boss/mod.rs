//! Requiem bosses
//!
//! Three boss encounters sharing one phase machine (entry, combat,
//! requiem, defeat) with per-boss movement, attacks and ultimates.

pub mod attack;
pub mod constants;
pub mod encounter;
pub mod kind;

pub use attack::{AttackObject, DamageField, Shockwave, SilenceField};
pub use encounter::{BossEncounter, BossPhase, BossSignal};
pub use kind::{BossKind, BossProfile};
