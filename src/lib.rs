//! Reaction State Library
//!
//! This crate provides the game logic for a single-player reaction-time
//! game: wait for the cue, tap as fast as possible, beat your best time.
//!
//! # Overview
//!
//! - **Phase State Machine** - `Idle → Waiting → Ready → Result`, with
//!   validated transitions. A tap before the cue ends the round as
//!   "too early".
//!
//! - **Cue Scheduling** - A cancellable one-shot timer behind a trait,
//!   driven by an injectable clock so tests never sleep.
//!
//! - **Best Time** - One persisted scalar that only ever goes down.
//!
//! - **Presentation** - The controller writes to a `Presenter`. A plain
//!   terminal front end lives in [`terminal`].
//!
//! # Design Principles
//!
//! 1. **The state owns its data** - The start instant only exists inside
//!    `Ready` and the pending cue only inside `Waiting`.
//!
//! 2. **Leaving `Waiting` cancels the cue** - A cue that fires late is
//!    ignored.
//!
//! 3. **Nothing is fatal** - Storage failures degrade to "no best time"
//!    or "not saved", and meaningless input is ignored.
//!
//! # Example
//!
//! ```rust
//! use reaction_state::state::{
//!     ManualClock, MemoryStore, Presenter, ReactionGame, Screen, TimerQueue,
//!     UserIntent, VisualMarker,
//! };
//!
//! #[derive(Default)]
//! struct Quiet;
//!
//! impl Presenter for Quiet {
//!     fn show_screen(&mut self, _: Screen) {}
//!     fn set_game_visual_state(&mut self, _: VisualMarker) {}
//!     fn set_message(&mut self, _: &str) {}
//!     fn set_reaction_time_text(&mut self, _: &str) {}
//!     fn set_best_time_text(&mut self, _: &str) {}
//!     fn set_record_indicator_visible(&mut self, _: bool) {}
//! }
//!
//! let clock = ManualClock::new();
//! let mut game = ReactionGame::new(
//!     Quiet,
//!     MemoryStore::new(),
//!     TimerQueue::new(clock.clone()),
//!     clock.clone(),
//! );
//!
//! game.handle(UserIntent::Start);
//! clock.advance_millis(3000);
//! game.poll_timers();
//!
//! clock.advance_millis(250);
//! game.handle(UserIntent::Tap);
//! assert_eq!(game.best_time(), Some(250));
//! ```

pub mod config;
pub mod state;
pub mod terminal;

// Re-export everything from state module at crate root
pub use state::*;
