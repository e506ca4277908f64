//! Haptic playback and scale animation tracked by the cycle engine.
//!
//! Both are pure functions of time: the engine asks them what is due at a
//! given instant instead of scheduling callbacks.

use super::phase::HapticPattern;

/// One vibration inside a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pulse {
    /// Offset from the start of the pattern.
    pub offset_ms: u64,
    pub duration_ms: u64,
}

/// Expand a wait/on pattern into pulses.
pub fn pulses(pattern: HapticPattern) -> Vec<Pulse> {
    let mut out = Vec::new();
    let mut cursor = 0u64;
    for pair in pattern.chunks(2) {
        cursor = cursor.saturating_add(pair[0]);
        if let Some(&on) = pair.get(1) {
            if on > 0 {
                out.push(Pulse {
                    offset_ms: cursor,
                    duration_ms: on,
                });
            }
            cursor = cursor.saturating_add(on);
        }
    }
    out
}

/// A pattern being played back.
#[derive(Debug, Clone)]
pub struct HapticPlayback {
    started_ms: u64,
    pulses: Vec<Pulse>,
    next: usize,
}

impl HapticPlayback {
    pub fn new(pattern: HapticPattern, started_ms: u64) -> Self {
        Self {
            started_ms,
            pulses: pulses(pattern),
            next: 0,
        }
    }

    /// Absolute time of the next pulse onset, if any remain.
    pub fn next_onset_ms(&self) -> Option<u64> {
        self.pulses
            .get(self.next)
            .map(|p| self.started_ms + p.offset_ms)
    }

    /// Consume the next pulse.
    pub fn take_next(&mut self) -> Option<Pulse> {
        let pulse = self.pulses.get(self.next).copied()?;
        self.next += 1;
        Some(pulse)
    }

    /// Absolute time at which the last pulse stops vibrating.
    pub fn ends_ms(&self) -> u64 {
        self.pulses
            .last()
            .map(|p| self.started_ms + p.offset_ms + p.duration_ms)
            .unwrap_or(self.started_ms)
    }

    /// Still has pulses to fire or a pulse still vibrating at `now_ms`.
    pub fn in_flight(&self, now_ms: u64) -> bool {
        self.next < self.pulses.len() || now_ms < self.ends_ms()
    }
}

/// Linear scale animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleAnimation {
    pub from: f64,
    pub to: f64,
    pub start_ms: u64,
    pub duration_ms: u64,
}

impl ScaleAnimation {
    /// A scale that does not move.
    pub fn fixed(value: f64, at_ms: u64) -> Self {
        Self {
            from: value,
            to: value,
            start_ms: at_ms,
            duration_ms: 0,
        }
    }

    pub fn scale_at(&self, now_ms: u64) -> f64 {
        if self.duration_ms == 0 {
            return self.to;
        }
        let elapsed = now_ms.saturating_sub(self.start_ms) as f64;
        let t = (elapsed / self.duration_ms as f64).clamp(0.0, 1.0);
        self.from + (self.to - self.from) * t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_inhale_pattern_into_two_pulses() {
        let p = pulses(&[0, 100, 50, 100]);
        assert_eq!(
            p,
            vec![
                Pulse { offset_ms: 0, duration_ms: 100 },
                Pulse { offset_ms: 150, duration_ms: 100 },
            ]
        );
    }

    #[test]
    fn expands_exhale_pattern_into_three_pulses() {
        let offsets: Vec<u64> = pulses(&[0, 100, 100, 100, 100, 100])
            .iter()
            .map(|p| p.offset_ms)
            .collect();
        assert_eq!(offsets, vec![0, 200, 400]);
    }

    #[test]
    fn playback_reports_in_flight_until_last_pulse_ends() {
        let mut pb = HapticPlayback::new(&[0, 300], 1_000);
        assert_eq!(pb.next_onset_ms(), Some(1_000));
        pb.take_next();
        assert!(pb.in_flight(1_200));
        assert!(!pb.in_flight(1_300));
        assert!(pb.take_next().is_none());
    }

    #[test]
    fn animation_interpolates_and_clamps() {
        let anim = ScaleAnimation {
            from: 1.0,
            to: 2.0,
            start_ms: 0,
            duration_ms: 4_000,
        };
        assert_eq!(anim.scale_at(0), 1.0);
        assert!((anim.scale_at(2_000) - 1.5).abs() < 1e-9);
        assert_eq!(anim.scale_at(9_000), 2.0);
        assert_eq!(ScaleAnimation::fixed(2.0, 0).scale_at(123), 2.0);
    }
}
