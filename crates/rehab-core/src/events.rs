use serde::{Deserialize, Serialize};

use crate::breathing::Phase;

/// Every state change of the breathing engine produces an Event.
/// The driver forwards them to sinks; the CLI prints them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    BreathingStarted {
        at_ms: u64,
    },
    /// A phase boundary was crossed. The visual scale moves from
    /// `scale_from` to `scale_to` over `animate_ms` (0 means set instantly).
    PhaseChanged {
        phase: Phase,
        cycle: u32,
        scale_from: f64,
        scale_to: f64,
        animate_ms: u64,
        at_ms: u64,
    },
    SecondElapsed {
        elapsed_secs: u64,
        at_ms: u64,
    },
    /// Vibrate for `duration_ms`.
    HapticPulse {
        duration_ms: u64,
        at_ms: u64,
    },
    /// Stop any vibration still in progress.
    HapticCancelled {
        at_ms: u64,
    },
    HapticsToggled {
        enabled: bool,
        at_ms: u64,
    },
    BreathingStopped {
        elapsed_secs: u64,
        cycles_completed: u32,
        at_ms: u64,
    },
}

impl Event {
    pub fn at_ms(&self) -> u64 {
        match self {
            Event::BreathingStarted { at_ms }
            | Event::PhaseChanged { at_ms, .. }
            | Event::SecondElapsed { at_ms, .. }
            | Event::HapticPulse { at_ms, .. }
            | Event::HapticCancelled { at_ms }
            | Event::HapticsToggled { at_ms, .. }
            | Event::BreathingStopped { at_ms, .. } => *at_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_type_tag() {
        let ev = Event::PhaseChanged {
            phase: Phase::Hold,
            cycle: 0,
            scale_from: 2.0,
            scale_to: 2.0,
            animate_ms: 0,
            at_ms: 4_000,
        };
        let json = serde_json::to_value(&ev).unwrap();
        assert_eq!(json["type"], "PhaseChanged");
        assert_eq!(json["phase"], "hold");
        assert_eq!(ev.at_ms(), 4_000);
    }
}
