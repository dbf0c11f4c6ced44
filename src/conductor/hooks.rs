//! Per-event hooks shared by the regular event catalog

use crate::conductor::context::EventContext;
use crate::conductor::visuals::EventVisual;
use crate::core::types::Millis;
use crate::player::PlayerState;

/// Inputs of one event update
#[derive(Debug, Clone, Copy)]
pub struct EventFrame<'p> {
    pub delta_ms: f64,
    pub elapsed_ms: Millis,
    pub duration_ms: f64,
    pub player: &'p PlayerState,
}

impl<'p> EventFrame<'p> {
    /// Fraction of the event's duration already elapsed
    pub fn progress(&self) -> f64 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        (self.elapsed_ms / self.duration_ms).clamp(0.0, 1.0)
    }

    /// Scale of a per-reference-frame speed for this delta
    pub fn frame_scale(&self) -> f32 {
        (self.delta_ms / crate::core::types::FRAME_MS) as f32
    }
}

/// Update/teardown/draw hooks of a regular event
pub trait EventHooks {
    /// Advance one frame; returns score earned this frame
    fn update(&mut self, frame: &EventFrame<'_>, ctx: &mut EventContext<'_>) -> u32;

    /// Type-specific cleanup when the event ends
    fn teardown(&mut self, _ctx: &mut EventContext<'_>) {}

    /// Snapshot for the render layer
    fn visual(&self) -> EventVisual;
}
