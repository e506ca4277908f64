//! # Rehab Tracker Core Library
//!
//! Core logic for a personal rehabilitation tracker: a guided breathing
//! exercise and day-by-day completion tracking with streak statistics. The
//! `rehab-cli` binary is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Cycle Engine**: A wall-clock-based inhale/hold/exhale state machine.
//!   The caller invokes `tick()` (or lets [`BreathingDriver`] do it) and
//!   receives the [`Event`]s that came due.
//! - **Completion Tracker**: Date-keyed completion sets with streak and
//!   per-day statistics.
//! - **Storage**: A key-value capability with SQLite and in-memory backends,
//!   selected once at startup, plus TOML configuration.
//!
//! ## Key Components
//!
//! - [`CycleEngine`]: Breathing cycle state machine
//! - [`BreathingDriver`]: Tokio ticker that drives an engine and delivers events
//! - [`CompletionTracker`]: Persisted completion history
//! - [`ExerciseSchedule`]: Static weekday exercise program
//! - [`Config`]: Application configuration management

pub mod breathing;
pub mod clock;
pub mod content;
pub mod error;
pub mod events;
pub mod storage;
pub mod tracker;

pub use breathing::{BreathingDriver, BreathingState, CycleEngine, Phase};
pub use clock::{Clock, ManualClock, SystemClock};
pub use content::{Exercise, ExerciseSchedule};
pub use error::{ConfigError, CoreError, StorageError, ValidationError};
pub use events::Event;
pub use storage::{open_store, Config, Database, KeyValueStore, MemoryStore, SharedStore};
pub use tracker::{
    compute_day_stat, compute_streak, CompletionTracker, DayStat, StatsSummary,
};
