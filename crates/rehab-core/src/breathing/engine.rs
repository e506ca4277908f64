//! Breathing cycle engine.
//!
//! A wall-clock state machine in the same shape as a countdown timer: it
//! owns no threads and schedules no callbacks. The caller invokes `tick()`
//! periodically and receives the events that became due since the last call.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Inhale (4s) -> Hold (3s) -> Exhale (6s) -> Inhale ...
//!   ^________________________ stop() ______________________|
//! ```
//!
//! A run keeps one authoritative phase deadline. Every boundary that falls
//! at or before the tick instant is applied in order, so a late tick
//! catches up without skipping a phase. Haptics are only armed for the
//! phase still current at the tick; patterns of phases that already ended
//! are never replayed.

use serde::Serialize;

use super::feedback::{HapticPlayback, ScaleAnimation};
use super::phase::{format_elapsed, Phase, SCALE_MIN};
use crate::clock::{Clock, SystemClock};
use crate::events::Event;

/// Pulse fired when haptics are switched back on.
const CONFIRM_PULSE_MS: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BreathingState {
    Idle,
    Inhale,
    Hold,
    Exhale,
}

impl From<Phase> for BreathingState {
    fn from(phase: Phase) -> Self {
        match phase {
            Phase::Inhale => BreathingState::Inhale,
            Phase::Hold => BreathingState::Hold,
            Phase::Exhale => BreathingState::Exhale,
        }
    }
}

/// An active breathing session.
#[derive(Debug, Clone)]
struct CycleRun {
    phase: Phase,
    elapsed_secs: u64,
    cycles_completed: u32,
    /// Whole cycles after which the run ends on its own.
    cycle_limit: Option<u32>,
    phase_deadline_ms: u64,
    next_second_ms: u64,
    animation: ScaleAnimation,
    haptic: Option<HapticPlayback>,
}

/// Serializable view of the engine.
#[derive(Debug, Clone, Serialize)]
pub struct BreathingSnapshot {
    pub state: BreathingState,
    pub phase_label: Option<&'static str>,
    pub elapsed_secs: u64,
    pub elapsed: String,
    pub cycles_completed: u32,
    pub phase_remaining_ms: u64,
    pub scale: f64,
    pub haptics_enabled: bool,
}

enum Due {
    Pulse,
    Second,
    Phase,
}

pub struct CycleEngine<C: Clock = SystemClock> {
    clock: C,
    run: Option<CycleRun>,
    haptics_enabled: bool,
}

impl CycleEngine<SystemClock> {
    pub fn system() -> Self {
        Self::new(SystemClock)
    }
}

impl<C: Clock> CycleEngine<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            run: None,
            haptics_enabled: true,
        }
    }

    pub fn with_haptics(mut self, enabled: bool) -> Self {
        self.haptics_enabled = enabled;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> BreathingState {
        self.run
            .as_ref()
            .map(|r| r.phase.into())
            .unwrap_or(BreathingState::Idle)
    }

    pub fn is_running(&self) -> bool {
        self.run.is_some()
    }

    pub fn phase(&self) -> Option<Phase> {
        self.run.as_ref().map(|r| r.phase)
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.run.as_ref().map(|r| r.elapsed_secs).unwrap_or(0)
    }

    pub fn cycles_completed(&self) -> u32 {
        self.run.as_ref().map(|r| r.cycles_completed).unwrap_or(0)
    }

    pub fn haptics_enabled(&self) -> bool {
        self.haptics_enabled
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Current visual scale of the breathing circle.
    pub fn scale(&self) -> f64 {
        let now = self.clock.now_ms();
        self.run
            .as_ref()
            .map(|r| r.animation.scale_at(now))
            .unwrap_or(SCALE_MIN)
    }

    pub fn phase_remaining_ms(&self) -> u64 {
        let now = self.clock.now_ms();
        self.run
            .as_ref()
            .map(|r| r.phase_deadline_ms.saturating_sub(now))
            .unwrap_or(0)
    }

    pub fn snapshot(&self) -> BreathingSnapshot {
        let elapsed_secs = self.elapsed_secs();
        BreathingSnapshot {
            state: self.state(),
            phase_label: self.phase().map(Phase::label),
            elapsed_secs,
            elapsed: format_elapsed(elapsed_secs),
            cycles_completed: self.cycles_completed(),
            phase_remaining_ms: self.phase_remaining_ms(),
            scale: self.scale(),
            haptics_enabled: self.haptics_enabled,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin a session in Inhale. No-op while already running.
    pub fn start(&mut self) -> Vec<Event> {
        self.begin(None)
    }

    /// Begin a session that stops by itself at the end of its `cycles`-th
    /// exhale, before the next inhale is entered. `0` runs without a limit.
    pub fn start_cycles(&mut self, cycles: u32) -> Vec<Event> {
        self.begin(Some(cycles).filter(|n| *n > 0))
    }

    fn begin(&mut self, cycle_limit: Option<u32>) -> Vec<Event> {
        if self.run.is_some() {
            return Vec::new();
        }
        let now = self.clock.now_ms();
        let mut run = CycleRun {
            phase: Phase::Inhale,
            elapsed_secs: 0,
            cycles_completed: 0,
            cycle_limit,
            phase_deadline_ms: now,
            next_second_ms: now + 1_000,
            animation: ScaleAnimation::fixed(SCALE_MIN, now),
            haptic: None,
        };
        let mut events = vec![Event::BreathingStarted { at_ms: now }];
        enter_phase(&mut run, Phase::Inhale, now, now, self.haptics_enabled, &mut events);
        tracing::debug!(at_ms = now, "breathing session started");

        self.run = Some(run);
        // Fires the first pulse of the inhale pattern.
        events.extend(self.advance_to(now));
        events
    }

    /// End the session and cancel everything pending. No-op while idle.
    pub fn stop(&mut self) -> Vec<Event> {
        let Some(run) = self.run.take() else {
            return Vec::new();
        };
        let mut events = Vec::new();
        finish(&run, self.clock.now_ms(), &mut events);
        events
    }

    /// Gate haptic feedback. Turning it off silences an in-flight pattern.
    pub fn set_haptics_enabled(&mut self, enabled: bool) -> Vec<Event> {
        if enabled == self.haptics_enabled {
            return Vec::new();
        }
        let now = self.clock.now_ms();
        self.haptics_enabled = enabled;
        let mut events = vec![Event::HapticsToggled { enabled, at_ms: now }];

        if enabled {
            events.push(Event::HapticPulse {
                duration_ms: CONFIRM_PULSE_MS,
                at_ms: now,
            });
        } else if let Some(run) = self.run.as_mut() {
            if let Some(playback) = run.haptic.take() {
                if playback.in_flight(now) {
                    events.push(Event::HapticCancelled { at_ms: now });
                }
            }
        }
        events
    }

    pub fn toggle_haptics(&mut self) -> Vec<Event> {
        self.set_haptics_enabled(!self.haptics_enabled)
    }

    /// Call periodically. Returns every event due since the previous call.
    pub fn tick(&mut self) -> Vec<Event> {
        let now = self.clock.now_ms();
        self.advance_to(now)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn advance_to(&mut self, now: u64) -> Vec<Event> {
        let mut events = Vec::new();
        let haptics_enabled = self.haptics_enabled;
        let Some(run) = self.run.as_mut() else {
            return events;
        };
        // Pulses left over from a phase that ended before `now` are stale.
        if run.phase_deadline_ms <= now {
            run.haptic = None;
        }

        loop {
            let pulse_at = run.haptic.as_ref().and_then(HapticPlayback::next_onset_ms);
            // Ties resolve pulse, then second, then phase.
            let mut due: Option<(u64, Due)> = pulse_at.map(|t| (t, Due::Pulse));
            for candidate in [
                (run.next_second_ms, Due::Second),
                (run.phase_deadline_ms, Due::Phase),
            ] {
                if due.as_ref().map_or(true, |(t, _)| candidate.0 < *t) {
                    due = Some(candidate);
                }
            }

            let Some((at, kind)) = due.filter(|(t, _)| *t <= now) else {
                break;
            };

            match kind {
                Due::Pulse => {
                    if let Some(pulse) = run.haptic.as_mut().and_then(HapticPlayback::take_next) {
                        events.push(Event::HapticPulse {
                            duration_ms: pulse.duration_ms,
                            at_ms: at,
                        });
                    }
                }
                Due::Second => {
                    run.elapsed_secs += 1;
                    run.next_second_ms += 1_000;
                    events.push(Event::SecondElapsed {
                        elapsed_secs: run.elapsed_secs,
                        at_ms: at,
                    });
                }
                Due::Phase => {
                    let next = run.phase.next();
                    if next == Phase::Inhale {
                        run.cycles_completed += 1;
                        if run.cycle_limit == Some(run.cycles_completed) {
                            finish(run, at, &mut events);
                            self.run = None;
                            break;
                        }
                    }
                    enter_phase(run, next, at, now, haptics_enabled, &mut events);
                }
            }
        }
        events
    }
}

/// Emit the events that end `run` at `at`.
fn finish(run: &CycleRun, at: u64, events: &mut Vec<Event>) {
    if run.haptic.as_ref().is_some_and(|h| h.in_flight(at)) {
        events.push(Event::HapticCancelled { at_ms: at });
    }
    events.push(Event::BreathingStopped {
        elapsed_secs: run.elapsed_secs,
        cycles_completed: run.cycles_completed,
        at_ms: at,
    });
    tracing::debug!(
        elapsed_secs = run.elapsed_secs,
        cycles = run.cycles_completed,
        "breathing session stopped"
    );
}

/// Apply a phase boundary at `at`: animation, haptic pattern, next deadline.
///
/// `now` is the tick instant. A phase that is already over by then gets no
/// haptic pattern.
fn enter_phase(
    run: &mut CycleRun,
    phase: Phase,
    at: u64,
    now: u64,
    haptics: bool,
    events: &mut Vec<Event>,
) {
    let (from, to) = phase.scale_range();
    let animate_ms = if phase.animates() { phase.duration_ms() } else { 0 };
    let deadline = at + phase.duration_ms();

    run.phase = phase;
    run.phase_deadline_ms = deadline;
    run.animation = ScaleAnimation {
        from,
        to,
        start_ms: at,
        duration_ms: animate_ms,
    };
    // A new pattern replaces whatever was still playing.
    run.haptic =
        (haptics && deadline > now).then(|| HapticPlayback::new(phase.haptic_pattern(), at));

    tracing::debug!(%phase, cycle = run.cycles_completed, at_ms = at, "phase changed");
    events.push(Event::PhaseChanged {
        phase,
        cycle: run.cycles_completed,
        scale_from: from,
        scale_to: to,
        animate_ms,
        at_ms: at,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use chrono::NaiveDate;

    fn engine() -> (CycleEngine<ManualClock>, ManualClock) {
        let clock = ManualClock::new(1_000_000, NaiveDate::from_ymd_opt(2025, 5, 4).unwrap());
        (CycleEngine::new(clock.clone()), clock)
    }

    fn phases(events: &[Event]) -> Vec<Phase> {
        events
            .iter()
            .filter_map(|e| match e {
                Event::PhaseChanged { phase, .. } => Some(*phase),
                _ => None,
            })
            .collect()
    }

    fn pulses(events: &[Event]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, Event::HapticPulse { .. }))
            .count()
    }

    #[test]
    fn start_enters_inhale() {
        let (mut engine, _clock) = engine();
        assert_eq!(engine.state(), BreathingState::Idle);

        let events = engine.start();
        assert_eq!(engine.state(), BreathingState::Inhale);
        assert!(matches!(events[0], Event::BreathingStarted { .. }));
        assert_eq!(phases(&events), vec![Phase::Inhale]);
        // First pulse of the inhale pattern fires immediately.
        assert_eq!(pulses(&events), 1);
        assert_eq!(engine.scale(), 1.0);
    }

    #[test]
    fn start_is_idempotent_while_running() {
        let (mut engine, clock) = engine();
        engine.start();
        clock.advance_ms(2_500);
        engine.tick();
        assert!(engine.start().is_empty());
        assert_eq!(engine.elapsed_secs(), 2);
    }

    #[test]
    fn stop_is_noop_when_idle() {
        let (mut engine, _clock) = engine();
        assert!(engine.stop().is_empty());
    }

    #[test]
    fn phase_sequence_over_one_cycle() {
        let (mut engine, clock) = engine();
        engine.start();
        let mut observed = Vec::new();
        for _ in 0..13 {
            engine.tick();
            observed.push(engine.phase().unwrap());
            clock.advance_ms(1_000);
        }
        let mut expected = vec![Phase::Inhale; 4];
        expected.extend(vec![Phase::Hold; 3]);
        expected.extend(vec![Phase::Exhale; 6]);
        assert_eq!(observed, expected);

        engine.tick();
        assert_eq!(engine.phase(), Some(Phase::Inhale));
        assert_eq!(engine.cycles_completed(), 1);
    }

    #[test]
    fn late_tick_catches_up_every_boundary() {
        let (mut engine, clock) = engine();
        engine.start();
        clock.advance_ms(26_000);
        let events = engine.tick();
        assert_eq!(
            phases(&events),
            vec![
                Phase::Hold,
                Phase::Exhale,
                Phase::Inhale,
                Phase::Hold,
                Phase::Exhale,
                Phase::Inhale
            ]
        );
        assert_eq!(engine.elapsed_secs(), 26);
        assert_eq!(engine.cycles_completed(), 2);
    }

    #[test]
    fn long_suspend_replays_at_most_one_pattern() {
        let (mut engine, clock) = engine();
        engine.start();
        clock.advance_ms(3_600_000);
        let events = engine.tick();

        // 3_600_000 ms lands 12 s into a cycle: one second before exhale ends.
        assert_eq!(engine.phase(), Some(Phase::Exhale));
        assert_eq!(engine.elapsed_secs(), 3_600);
        assert_eq!(pulses(&events), 3);
        let exhale_start = clock.now_ms() - 5_000;
        for event in &events {
            if let Event::HapticPulse { at_ms, .. } = event {
                assert!(*at_ms >= exhale_start, "stale pulse at {at_ms}");
            }
        }
    }

    #[test]
    fn catch_up_skips_haptics_of_finished_phases() {
        let (mut engine, clock) = engine();
        engine.start();
        clock.advance_ms(7_000); // hold is over, exhale begins now
        let events = engine.tick();
        let pulse_times: Vec<u64> = events
            .iter()
            .filter(|e| matches!(e, Event::HapticPulse { .. }))
            .map(Event::at_ms)
            .collect();
        assert_eq!(pulse_times, vec![clock.now_ms()]);
    }

    #[test]
    fn limited_run_ends_before_next_inhale() {
        let (mut engine, clock) = engine();
        engine.start_cycles(2);
        clock.advance_ms(30_000);
        let events = engine.tick();

        assert_eq!(
            phases(&events),
            vec![Phase::Hold, Phase::Exhale, Phase::Inhale, Phase::Hold, Phase::Exhale]
        );
        match events.last() {
            Some(Event::BreathingStopped {
                elapsed_secs,
                cycles_completed,
                at_ms,
            }) => {
                assert_eq!(*elapsed_secs, 26);
                assert_eq!(*cycles_completed, 2);
                assert_eq!(*at_ms, 1_000_000 + 26_000);
            }
            other => panic!("expected stop, got {other:?}"),
        }
        assert!(!engine.is_running());
        assert!(engine.tick().is_empty());
    }

    #[test]
    fn boundaries_land_at_fixed_offsets() {
        let (mut engine, clock) = engine();
        let start = clock.now_ms();
        engine.start();
        clock.advance_ms(13_000);
        let offsets: Vec<u64> = engine
            .tick()
            .iter()
            .filter(|e| matches!(e, Event::PhaseChanged { .. }))
            .map(|e| e.at_ms() - start)
            .collect();
        assert_eq!(offsets, vec![4_000, 7_000, 13_000]);
    }

    #[test]
    fn scale_follows_phases() {
        let (mut engine, clock) = engine();
        engine.start();
        clock.advance_ms(2_000);
        engine.tick();
        assert!((engine.scale() - 1.5).abs() < 1e-9);

        clock.advance_ms(3_000);
        engine.tick();
        assert_eq!(engine.state(), BreathingState::Hold);
        assert_eq!(engine.scale(), 2.0);

        clock.advance_ms(5_000); // 3s into exhale
        engine.tick();
        assert!((engine.scale() - 1.5).abs() < 1e-9);
    }

    #[test]
    fn stop_resets_and_silences_everything() {
        for stop_at in 0..=13u64 {
            let (mut engine, clock) = engine();
            engine.start();
            clock.advance_ms(stop_at * 1_000);
            engine.tick();

            let events = engine.stop();
            assert!(matches!(events.last(), Some(Event::BreathingStopped { .. })));
            assert_eq!(engine.state(), BreathingState::Idle);
            assert_eq!(engine.elapsed_secs(), 0);
            assert_eq!(engine.scale(), 1.0);

            clock.advance_ms(30_000);
            assert!(engine.tick().is_empty(), "event after stop at {stop_at}s");
            assert_eq!(engine.phase(), None);
        }
    }

    #[test]
    fn stop_mid_pattern_cancels_haptics() {
        let (mut engine, clock) = engine();
        engine.start();
        clock.advance_ms(50);
        engine.tick();
        let events = engine.stop();
        assert!(matches!(events[0], Event::HapticCancelled { .. }));
    }

    #[test]
    fn disabling_haptics_mid_pattern_drops_remaining_pulses() {
        let (mut engine, clock) = engine();
        engine.start();
        clock.advance_ms(7_000); // enter exhale: three pulses at 0/200/400
        let events = engine.tick();
        assert_eq!(phases(&events).last(), Some(&Phase::Exhale));

        clock.advance_ms(100);
        let toggled = engine.set_haptics_enabled(false);
        assert!(toggled
            .iter()
            .any(|e| matches!(e, Event::HapticCancelled { .. })));

        clock.advance_ms(500);
        assert_eq!(pulses(&engine.tick()), 0);
    }

    #[test]
    fn haptics_disabled_fires_no_pulses() {
        let (engine, clock) = engine();
        let mut engine = engine.with_haptics(false);
        let mut events = engine.start();
        for _ in 0..26 {
            clock.advance_ms(1_000);
            events.extend(engine.tick());
        }
        assert_eq!(pulses(&events), 0);
        assert_eq!(phases(&events).len(), 7);
    }

    #[test]
    fn enabling_haptics_sends_confirmation_pulse() {
        let (engine, _clock) = engine();
        let mut engine = engine.with_haptics(false);
        let events = engine.toggle_haptics();
        assert!(engine.haptics_enabled());
        assert_eq!(pulses(&events), 1);
        assert!(engine.set_haptics_enabled(true).is_empty());
    }

    #[test]
    fn restart_after_stop_begins_fresh() {
        let (mut engine, clock) = engine();
        engine.start();
        clock.advance_ms(9_000);
        engine.tick();
        engine.stop();

        engine.start();
        assert_eq!(engine.state(), BreathingState::Inhale);
        assert_eq!(engine.elapsed_secs(), 0);
        assert_eq!(engine.cycles_completed(), 0);
    }

    #[test]
    fn snapshot_formats_elapsed() {
        let (mut engine, clock) = engine();
        engine.start();
        clock.advance_ms(65_000);
        engine.tick();
        let snap = engine.snapshot();
        assert_eq!(snap.elapsed, "01:05");
        assert_eq!(snap.cycles_completed, 5);
    }
}
