//! Wall-clock source shared by the cycle engine and the tracker.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{Local, NaiveDate};

pub trait Clock: Send + Sync {
    /// Milliseconds since the Unix epoch.
    fn now_ms(&self) -> u64;

    /// Today's calendar date in local time.
    fn today(&self) -> NaiveDate;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Manually advanced clock. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now_ms: Arc<AtomicU64>,
    today: Arc<Mutex<NaiveDate>>,
}

impl ManualClock {
    pub fn new(start_ms: u64, today: NaiveDate) -> Self {
        Self {
            now_ms: Arc::new(AtomicU64::new(start_ms)),
            today: Arc::new(Mutex::new(today)),
        }
    }

    pub fn advance_ms(&self, ms: u64) {
        self.now_ms.fetch_add(ms, Ordering::SeqCst);
    }

    pub fn set_ms(&self, ms: u64) {
        self.now_ms.store(ms, Ordering::SeqCst);
    }

    pub fn set_today(&self, date: NaiveDate) {
        if let Ok(mut today) = self.today.lock() {
            *today = date;
        }
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now_ms.load(Ordering::SeqCst)
    }

    fn today(&self) -> NaiveDate {
        self.today
            .lock()
            .map(|d| *d)
            .unwrap_or_else(|poisoned| *poisoned.into_inner())
    }
}
