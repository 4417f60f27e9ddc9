//! State management for the reaction game.
//!
//! - `phase` - Game phase state machine (pure transitions)
//! - `controller` - The game controller that drives the state machine
//! - `timer` - Clocks and the cancellable cue scheduler
//! - `store` - Best-time persistence
//! - `presenter` - Display surface and user intents
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                         ReactionGame                           │
//! │                                                                │
//! │   UserIntent ──▶ on_start / on_retry / on_user_tap             │
//! │                          │                                     │
//! │                          ▼                                     │
//! │   ┌───────────┐   GameState::transition   ┌────────────────┐   │
//! │   │ Scheduler │◀──── schedule / cancel ───│   GameState    │   │
//! │   │ (cue)     │───── poll_timers ────────▶│ Idle/Waiting/  │   │
//! │   └───────────┘      on_cue_fire          │ Ready/Result   │   │
//! │                                           └───────┬────────┘   │
//! │   ┌───────────────┐   load once / save on record  │            │
//! │   │ BestTimeStore │◀──────────────────────────────┤            │
//! │   └───────────────┘                               ▼            │
//! │                                            ┌────────────┐      │
//! │                                            │ Presenter  │      │
//! │                                            └────────────┘      │
//! └────────────────────────────────────────────────────────────────┘
//! ```

pub mod controller;
pub mod phase;
pub mod presenter;
pub mod store;
pub mod timer;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use controller::{ReactionGame, DEFAULT_DELAY_RANGE};
pub use phase::{elapsed_millis, GameEvent, GameState, InvalidTransition, Outcome};
pub use presenter::{
    format_best_time, format_millis, Presenter, Screen, UserIntent, VisualMarker,
    BEST_TIME_PLACEHOLDER, READY_MESSAGE, TOO_EARLY_TEXT, WAITING_MESSAGE,
};
pub use store::{is_new_record, BestTimeStore, FileStore, MemoryStore, StoreError, StoredBestTime};
pub use timer::{Clock, CueHandle, ManualClock, Scheduler, SystemClock, TimerQueue};
