//! Display surface the controller writes to.
//!
//! The controller only ever calls out through [`Presenter`]. How a screen
//! is drawn, and how clicks or key presses turn into [`UserIntent`]s, is
//! up to the implementation.

use std::fmt;

/// Placeholder shown while no best time exists.
pub const BEST_TIME_PLACEHOLDER: &str = "---";

/// Message shown while waiting for the cue.
pub const WAITING_MESSAGE: &str = "Get ready...";

/// Message shown with the cue.
pub const READY_MESSAGE: &str = "Tap!";

/// Result text for a tap before the cue.
pub const TOO_EARLY_TEXT: &str = "Too early!";

/// Top-level screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Start,
    Game,
    Result,
}

impl Screen {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Game => "game",
            Self::Result => "result",
        }
    }
}

/// Visual marker on the game area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisualMarker {
    #[default]
    None,
    Waiting,
    Ready,
}

impl VisualMarker {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Waiting => "waiting",
            Self::Ready => "ready",
        }
    }
}

/// Input events the presentation layer delivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserIntent {
    /// start-clicked
    Start,
    /// retry-clicked
    Retry,
    /// game-area-clicked
    Tap,
}

impl fmt::Display for UserIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => write!(f, "start-clicked"),
            Self::Retry => write!(f, "retry-clicked"),
            Self::Tap => write!(f, "game-area-clicked"),
        }
    }
}

/// Rendering capability the controller drives.
pub trait Presenter {
    fn show_screen(&mut self, screen: Screen);
    fn set_game_visual_state(&mut self, marker: VisualMarker);
    fn set_message(&mut self, text: &str);
    /// Either a formatted duration or a status phrase.
    fn set_reaction_time_text(&mut self, text: &str);
    fn set_best_time_text(&mut self, text: &str);
    fn set_record_indicator_visible(&mut self, visible: bool);
}

/// Format a measured time for display.
pub fn format_millis(millis: u64) -> String {
    format!("{} ms", millis)
}

/// Format the best time, or the placeholder if there is none.
pub fn format_best_time(best: Option<u64>) -> String {
    match best {
        Some(millis) => format_millis(millis),
        None => BEST_TIME_PLACEHOLDER.to_string(),
    }
}
