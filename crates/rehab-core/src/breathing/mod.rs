//! Guided breathing exercise.
//!
//! [`CycleEngine`] is the tick-driven state machine; [`BreathingDriver`]
//! runs it on a tokio interval and forwards its events.

mod driver;
mod engine;
mod feedback;
mod phase;

pub use driver::{BreathingDriver, EventSink, HapticForwarder, HapticSink};
pub use engine::{BreathingSnapshot, BreathingState, CycleEngine};
pub use feedback::{pulses, HapticPlayback, Pulse, ScaleAnimation};
pub use phase::{format_elapsed, HapticPattern, Phase, CYCLE_MS, SCALE_MAX, SCALE_MIN};
