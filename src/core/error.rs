use thiserror::Error;

use crate::conductor::EventKind;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("Invalid tempo: {0} BPM (must be a finite value > 0)")]
    InvalidTempo(f64),

    #[error("Unknown conductor event: {0}")]
    UnknownEvent(String),

    #[error("Unknown rhythm pattern slot: {0:?}")]
    UnknownPatternSlot(String),

    #[error("Cannot start {requested:?}: {active:?} is already active")]
    EventAlreadyActive {
        active: EventKind,
        requested: EventKind,
    },

    #[error("Conductor event is disabled: {0:?}")]
    EventDisabled(EventKind),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GameError>;
