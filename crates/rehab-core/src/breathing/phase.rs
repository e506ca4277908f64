use serde::{Deserialize, Serialize};

/// Length of one full Inhale → Hold → Exhale cycle.
pub const CYCLE_MS: u64 = 13_000;

/// Resting scale of the breathing circle.
pub const SCALE_MIN: f64 = 1.0;
/// Fully expanded scale of the breathing circle.
pub const SCALE_MAX: f64 = 2.0;

/// One segment of the breathing cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Inhale,
    Hold,
    Exhale,
}

/// Vibration pattern in alternating wait/on milliseconds, starting with a wait.
pub type HapticPattern = &'static [u64];

const INHALE_PATTERN: HapticPattern = &[0, 100, 50, 100];
const HOLD_PATTERN: HapticPattern = &[0, 300];
const EXHALE_PATTERN: HapticPattern = &[0, 100, 100, 100, 100, 100];

impl Phase {
    pub const ALL: [Phase; 3] = [Phase::Inhale, Phase::Hold, Phase::Exhale];

    pub fn duration_ms(self) -> u64 {
        match self {
            Phase::Inhale => 4_000,
            Phase::Hold => 3_000,
            Phase::Exhale => 6_000,
        }
    }

    pub fn duration_secs(self) -> u64 {
        self.duration_ms() / 1_000
    }

    pub fn next(self) -> Phase {
        match self {
            Phase::Inhale => Phase::Hold,
            Phase::Hold => Phase::Exhale,
            Phase::Exhale => Phase::Inhale,
        }
    }

    /// Offset of this phase's start within a cycle.
    pub fn offset_ms(self) -> u64 {
        match self {
            Phase::Inhale => 0,
            Phase::Hold => Phase::Inhale.duration_ms(),
            Phase::Exhale => Phase::Inhale.duration_ms() + Phase::Hold.duration_ms(),
        }
    }

    /// Two short pulses to inhale, one long to hold, three short to exhale.
    pub fn haptic_pattern(self) -> HapticPattern {
        match self {
            Phase::Inhale => INHALE_PATTERN,
            Phase::Hold => HOLD_PATTERN,
            Phase::Exhale => EXHALE_PATTERN,
        }
    }

    /// Scale at the start and end of the phase.
    pub fn scale_range(self) -> (f64, f64) {
        match self {
            Phase::Inhale => (SCALE_MIN, SCALE_MAX),
            Phase::Hold => (SCALE_MAX, SCALE_MAX),
            Phase::Exhale => (SCALE_MAX, SCALE_MIN),
        }
    }

    /// Whether the scale interpolates during this phase.
    pub fn animates(self) -> bool {
        let (from, to) = self.scale_range();
        from != to
    }

    pub fn label(self) -> &'static str {
        match self {
            Phase::Inhale => "Inhale (4s)",
            Phase::Hold => "Hold (3s)",
            Phase::Exhale => "Exhale (6s)",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::Inhale => "inhale",
            Phase::Hold => "hold",
            Phase::Exhale => "exhale",
        };
        f.write_str(name)
    }
}

/// Format elapsed seconds as `MM:SS`.
pub fn format_elapsed(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phases_cover_one_cycle() {
        let total: u64 = Phase::ALL.iter().map(|p| p.duration_ms()).sum();
        assert_eq!(total, CYCLE_MS);
        assert_eq!(Phase::Hold.offset_ms(), 4_000);
        assert_eq!(Phase::Exhale.offset_ms(), 7_000);
    }

    #[test]
    fn phases_cycle_in_order() {
        assert_eq!(Phase::Inhale.next(), Phase::Hold);
        assert_eq!(Phase::Hold.next(), Phase::Exhale);
        assert_eq!(Phase::Exhale.next(), Phase::Inhale);
    }

    #[test]
    fn hold_keeps_scale_expanded() {
        assert!(!Phase::Hold.animates());
        assert_eq!(Phase::Hold.scale_range(), (2.0, 2.0));
        assert_eq!(Phase::Exhale.scale_range().1, 1.0);
    }

    #[test]
    fn format_elapsed_pads() {
        assert_eq!(format_elapsed(0), "00:00");
        assert_eq!(format_elapsed(75), "01:15");
        assert_eq!(format_elapsed(3_600), "60:00");
    }
}
