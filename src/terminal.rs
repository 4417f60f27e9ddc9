//! Line-based terminal front end.
//!
//! The presenter keeps a small view model and draws the whole current
//! screen on [`TerminalPresenter::render`]. Input is one line per action;
//! a bare Enter does whatever the current screen's main button does.

use std::io::{self, Write};

use crate::state::presenter::{
    Presenter, Screen, UserIntent, VisualMarker, BEST_TIME_PLACEHOLDER,
};

/// What a line of input asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Intent(UserIntent),
    Quit,
}

/// Map a typed line to a command for the screen currently shown.
pub fn parse_input(line: &str, screen: Screen) -> Option<Command> {
    match line.trim().to_ascii_lowercase().as_str() {
        "" | "space" | " " => Some(Command::Intent(match screen {
            Screen::Start => UserIntent::Start,
            Screen::Game => UserIntent::Tap,
            Screen::Result => UserIntent::Retry,
        })),
        "s" | "start" => Some(Command::Intent(UserIntent::Start)),
        "r" | "retry" => Some(Command::Intent(UserIntent::Retry)),
        "t" | "tap" => Some(Command::Intent(UserIntent::Tap)),
        "q" | "quit" | "exit" => Some(Command::Quit),
        _ => None,
    }
}

/// Presenter that draws to any writer.
#[derive(Debug)]
pub struct TerminalPresenter<W: Write> {
    out: W,
    screen: Screen,
    marker: VisualMarker,
    message: String,
    reaction_time: String,
    best_time: String,
    record_visible: bool,
    dirty: bool,
}

impl<W: Write> TerminalPresenter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            screen: Screen::Start,
            marker: VisualMarker::None,
            message: String::new(),
            reaction_time: String::new(),
            best_time: BEST_TIME_PLACEHOLDER.to_string(),
            record_visible: false,
            dirty: true,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Draw the current screen if anything changed since the last draw.
    pub fn render(&mut self) -> io::Result<()> {
        if !self.dirty {
            return Ok(());
        }
        self.dirty = false;

        writeln!(self.out)?;
        match self.screen {
            Screen::Start => {
                writeln!(self.out, "=== Reaction Test ===")?;
                writeln!(self.out, "Best: {}", self.best_time)?;
                writeln!(self.out, "Press Enter to start, q to quit.")?;
            }
            Screen::Game => {
                let badge = match self.marker {
                    VisualMarker::Waiting => "[ WAIT ]",
                    VisualMarker::Ready => "[ GO!! ]",
                    VisualMarker::None => "[      ]",
                };
                writeln!(self.out, "{} {}", badge, self.message)?;
                if self.marker == VisualMarker::Ready {
                    writeln!(self.out, "Press Enter now!")?;
                }
            }
            Screen::Result => {
                writeln!(self.out, "Result: {}", self.reaction_time)?;
                if self.record_visible {
                    writeln!(self.out, "*** NEW RECORD! ***")?;
                }
                writeln!(self.out, "Best: {}", self.best_time)?;
                writeln!(self.out, "Enter for the start screen, s to play again.")?;
            }
        }
        self.out.flush()
    }

    fn touch(&mut self) {
        self.dirty = true;
    }
}

impl<W: Write> Presenter for TerminalPresenter<W> {
    fn show_screen(&mut self, screen: Screen) {
        self.screen = screen;
        self.touch();
    }

    fn set_game_visual_state(&mut self, marker: VisualMarker) {
        self.marker = marker;
        self.touch();
    }

    fn set_message(&mut self, text: &str) {
        self.message = text.to_string();
        self.touch();
    }

    fn set_reaction_time_text(&mut self, text: &str) {
        self.reaction_time = text.to_string();
        self.touch();
    }

    fn set_best_time_text(&mut self, text: &str) {
        self.best_time = text.to_string();
        self.touch();
    }

    fn set_record_indicator_visible(&mut self, visible: bool) {
        self.record_visible = visible;
        self.touch();
    }
}
