//! Async driver that ticks a [`CycleEngine`] on a tokio interval.
//!
//! The engine and the event sink live behind one mutex. The ticker and the
//! public commands both take it, so once `stop()` returns no tick can
//! deliver another event. Dropping the driver stops the session.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time;

use super::engine::{BreathingSnapshot, CycleEngine};
use crate::clock::Clock;
use crate::events::Event;

/// Receives every event the engine produces.
pub trait EventSink: Send + 'static {
    fn handle(&mut self, event: &Event);
}

impl<F> EventSink for F
where
    F: FnMut(&Event) + Send + 'static,
{
    fn handle(&mut self, event: &Event) {
        self(event)
    }
}

/// Device vibration.
pub trait HapticSink: Send + 'static {
    fn vibrate(&mut self, duration_ms: u64);
    fn cancel(&mut self);
}

/// Routes haptic events to a [`HapticSink`] and everything to an inner sink.
pub struct HapticForwarder<H, S> {
    haptics: H,
    inner: S,
}

impl<H: HapticSink, S: EventSink> HapticForwarder<H, S> {
    pub fn new(haptics: H, inner: S) -> Self {
        Self { haptics, inner }
    }
}

impl<H: HapticSink, S: EventSink> EventSink for HapticForwarder<H, S> {
    fn handle(&mut self, event: &Event) {
        match event {
            Event::HapticPulse { duration_ms, .. } => self.haptics.vibrate(*duration_ms),
            Event::HapticCancelled { .. } => self.haptics.cancel(),
            _ => {}
        }
        self.inner.handle(event);
    }
}

struct Inner<C: Clock> {
    engine: CycleEngine<C>,
    sink: Box<dyn EventSink>,
    /// Cycles of the most recently ended run.
    last_cycles: u32,
}

impl<C: Clock> Inner<C> {
    fn dispatch(&mut self, events: Vec<Event>) {
        for event in &events {
            if let Event::BreathingStopped {
                cycles_completed, ..
            } = event
            {
                self.last_cycles = *cycles_completed;
            }
            self.sink.handle(event);
        }
    }
}

pub struct BreathingDriver<C: Clock + 'static> {
    inner: Arc<Mutex<Inner<C>>>,
    ticker: Option<JoinHandle<()>>,
    tick_interval: Duration,
}

impl<C: Clock + 'static> BreathingDriver<C> {
    pub fn new(engine: CycleEngine<C>, sink: impl EventSink, tick_interval: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                engine,
                sink: Box::new(sink),
                last_cycles: 0,
            })),
            ticker: None,
            tick_interval: tick_interval.max(Duration::from_millis(1)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<C>> {
        lock_inner(&self.inner)
    }

    pub fn is_running(&self) -> bool {
        self.lock().engine.is_running()
    }

    pub fn snapshot(&self) -> BreathingSnapshot {
        self.lock().engine.snapshot()
    }

    /// Cycles finished by the running session, or by the last one once idle.
    pub fn completed_cycles(&self) -> u32 {
        let inner = self.lock();
        if inner.engine.is_running() {
            inner.engine.cycles_completed()
        } else {
            inner.last_cycles
        }
    }

    /// Start the session and the ticker. Must be called inside a tokio runtime.
    pub fn start(&mut self) {
        self.start_with(|engine| engine.start());
    }

    fn start_with(&mut self, begin: impl FnOnce(&mut CycleEngine<C>) -> Vec<Event>) {
        {
            let mut inner = self.lock();
            if inner.engine.is_running() {
                return;
            }
            let events = begin(&mut inner.engine);
            inner.dispatch(events);
        }
        self.spawn_ticker();
    }

    /// Stop the session. No event is delivered after this returns.
    pub fn stop(&mut self) {
        {
            let mut inner = self.lock();
            let events = inner.engine.stop();
            inner.dispatch(events);
        }
        if let Some(handle) = self.ticker.take() {
            handle.abort();
        }
    }

    pub fn set_haptics_enabled(&self, enabled: bool) {
        let mut inner = self.lock();
        let events = inner.engine.set_haptics_enabled(enabled);
        inner.dispatch(events);
    }

    /// Run whole cycles and return once the session has ended.
    ///
    /// The engine ends the run at the last exhale boundary, so the following
    /// inhale and its haptic pattern are never emitted. Returns the number of
    /// cycles completed.
    pub async fn run_cycles(&mut self, cycles: u32) -> u32 {
        if cycles == 0 {
            return 0;
        }
        self.start_with(|engine| engine.start_cycles(cycles));
        while self.is_running() {
            time::sleep(self.tick_interval).await;
        }
        self.stop();
        self.completed_cycles()
    }

    fn spawn_ticker(&mut self) {
        if let Some(handle) = self.ticker.take() {
            handle.abort();
        }

        let inner = Arc::clone(&self.inner);
        let tick_interval = self.tick_interval;

        self.ticker = Some(tokio::spawn(async move {
            let mut interval = time::interval(tick_interval);
            interval.set_missed_tick_behavior(time::MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let mut guard = lock_inner(&inner);
                if !guard.engine.is_running() {
                    break;
                }
                let events = guard.engine.tick();
                guard.dispatch(events);
            }
        }));
    }
}

impl<C: Clock + 'static> Drop for BreathingDriver<C> {
    fn drop(&mut self) {
        self.stop();
    }
}

fn lock_inner<C: Clock>(inner: &Mutex<Inner<C>>) -> MutexGuard<'_, Inner<C>> {
    // A panicking sink must not wedge teardown.
    inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
