pub mod config;
pub mod error;
pub mod task_queue;
pub mod types;

pub use config::GameConfig;
pub use error::{GameError, Result};
pub use task_queue::TaskQueue;
pub use types::{EventId, Millis, Vec2};
