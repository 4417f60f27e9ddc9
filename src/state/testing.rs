//! Test doubles shared by the state tests.

use super::presenter::{Presenter, Screen, VisualMarker};

/// A single call made on the presenter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresenterCall {
    ShowScreen(Screen),
    SetVisualState(VisualMarker),
    SetMessage(String),
    SetReactionTime(String),
    SetBestTime(String),
    SetRecordVisible(bool),
}

/// Presenter that remembers every call and the resulting view.
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    pub calls: Vec<PresenterCall>,
    pub screen: Screen,
    pub marker: VisualMarker,
    pub message: String,
    pub reaction_time: String,
    pub best_time: String,
    pub record_visible: bool,
}

impl RecordingPresenter {
    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }
}

impl Presenter for RecordingPresenter {
    fn show_screen(&mut self, screen: Screen) {
        self.screen = screen;
        self.calls.push(PresenterCall::ShowScreen(screen));
    }

    fn set_game_visual_state(&mut self, marker: VisualMarker) {
        self.marker = marker;
        self.calls.push(PresenterCall::SetVisualState(marker));
    }

    fn set_message(&mut self, text: &str) {
        self.message = text.to_string();
        self.calls.push(PresenterCall::SetMessage(text.to_string()));
    }

    fn set_reaction_time_text(&mut self, text: &str) {
        self.reaction_time = text.to_string();
        self.calls.push(PresenterCall::SetReactionTime(text.to_string()));
    }

    fn set_best_time_text(&mut self, text: &str) {
        self.best_time = text.to_string();
        self.calls.push(PresenterCall::SetBestTime(text.to_string()));
    }

    fn set_record_indicator_visible(&mut self, visible: bool) {
        self.record_visible = visible;
        self.calls.push(PresenterCall::SetRecordVisible(visible));
    }
}
