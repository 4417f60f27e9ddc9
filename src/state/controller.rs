//! Reaction game controller.
//!
//! Owns the [`GameState`], the best time, and the pending cue. Every user
//! intent and timer firing comes in through a method here; every visible
//! change goes out through the [`Presenter`].
//!
//! The controller is single-threaded. Each call runs to completion, and
//! the only deferred work is the cue, which the driver hands back via
//! [`ReactionGame::poll_timers`].

use std::ops::Range;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use super::phase::{GameEvent, GameState, InvalidTransition, Outcome};
use super::presenter::{
    format_best_time, format_millis, Presenter, Screen, UserIntent, VisualMarker,
    READY_MESSAGE, TOO_EARLY_TEXT, WAITING_MESSAGE,
};
use super::store::{is_new_record, BestTimeStore};
use super::timer::{Clock, CueHandle, Scheduler};

/// Default cue delay range, 1s inclusive to 3s exclusive.
pub const DEFAULT_DELAY_RANGE: Range<Duration> =
    Duration::from_millis(1000)..Duration::from_millis(3000);

/// The game itself.
pub struct ReactionGame<P, S, T, C> {
    state: GameState,
    best_time: Option<u64>,
    presenter: P,
    store: S,
    scheduler: T,
    clock: C,
    delay_range: Range<Duration>,
    rng: StdRng,
}

impl<P, S, T, C> ReactionGame<P, S, T, C>
where
    P: Presenter,
    S: BestTimeStore,
    T: Scheduler,
    C: Clock,
{
    /// Create the game in `Idle`, loading the best time once.
    ///
    /// A store that fails or holds garbage just means no best time yet.
    pub fn new(presenter: P, store: S, scheduler: T, clock: C) -> Self {
        let best_time = match store.load() {
            Ok(best) => best,
            Err(e) => {
                warn!(error = %e, "could not load best time, starting without one");
                None
            }
        };

        let mut game = Self {
            state: GameState::Idle,
            best_time,
            presenter,
            store,
            scheduler,
            clock,
            delay_range: DEFAULT_DELAY_RANGE,
            rng: StdRng::from_entropy(),
        };

        game.presenter.set_best_time_text(&format_best_time(best_time));
        game.show_start_screen();
        game
    }

    /// Use a different cue delay range. Empty ranges are ignored.
    pub fn with_delay_range(mut self, range: Range<Duration>) -> Self {
        if range.is_empty() {
            warn!(?range, "ignoring empty cue delay range");
        } else {
            self.delay_range = range;
        }
        self
    }

    /// Use a specific RNG for cue delays.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    /// Dispatch an input event from the presentation layer.
    pub fn handle(&mut self, intent: UserIntent) {
        match intent {
            UserIntent::Start => self.on_start_requested(),
            UserIntent::Retry => self.on_retry_requested(),
            UserIntent::Tap => self.on_user_tap(),
        }
    }

    /// Begin a round from `Idle` or `Result`.
    pub fn on_start_requested(&mut self) {
        if !self.state.can_start() {
            debug!(state = %self.state, "start ignored, round in progress");
            return;
        }

        let delay = self.next_delay();
        let cue = self.scheduler.schedule(delay);

        if let Err(e) = self.apply(GameEvent::Start { cue }) {
            self.scheduler.cancel(cue);
            debug!(error = %e, "start rejected");
            return;
        }

        debug!(%cue, delay_ms = delay.as_millis() as u64, "round started");
        self.show(Screen::Game, VisualMarker::Waiting);
        self.presenter.set_message(WAITING_MESSAGE);
    }

    /// Go back to the start screen. Safe from any state.
    pub fn on_retry_requested(&mut self) {
        if let Err(e) = self.apply(GameEvent::Retry) {
            debug!(error = %e, "retry rejected");
            return;
        }
        self.show_start_screen();
    }

    /// Show the cue, if `cue` is still the live one.
    pub fn on_cue_fire(&mut self, cue: CueHandle) {
        let at = self.clock.now();
        if let Err(e) = self.apply(GameEvent::CueFired { cue, at }) {
            debug!(%cue, error = %e, "ignoring cue");
            return;
        }

        self.presenter.set_game_visual_state(VisualMarker::Ready);
        self.presenter.set_message(READY_MESSAGE);
    }

    /// Handle a tap on the game area.
    pub fn on_user_tap(&mut self) {
        let at = self.clock.now();
        if let Err(e) = self.apply(GameEvent::Tap { at }) {
            debug!(error = %e, "tap ignored");
            return;
        }

        match self.state.outcome() {
            Some(Outcome::TooEarly) => {
                self.show_result_screen();
                self.presenter.set_reaction_time_text(TOO_EARLY_TEXT);
                self.presenter.set_record_indicator_visible(false);
            }
            Some(Outcome::Measured { millis }) => {
                let record = self.record(millis);
                self.show_result_screen();
                self.presenter.set_reaction_time_text(&format_millis(millis));
                self.presenter.set_record_indicator_visible(record);
                self.presenter
                    .set_best_time_text(&format_best_time(self.best_time));
            }
            None => {}
        }
    }

    /// Deliver every due cue. Returns how many were due.
    pub fn poll_timers(&mut self) -> usize {
        let due = self.scheduler.take_due();
        let count = due.len();
        for cue in due {
            self.on_cue_fire(cue);
        }
        count
    }

    /// Current phase.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Best time in milliseconds, including an unsaved session record.
    pub fn best_time(&self) -> Option<u64> {
        self.best_time
    }

    /// Cues still waiting in the scheduler.
    pub fn pending_cues(&self) -> usize {
        self.scheduler.pending()
    }

    /// When the next cue is due, if one is pending.
    pub fn next_cue_deadline(&self) -> Option<Instant> {
        self.scheduler.next_deadline()
    }

    /// Time until the next cue is due, zero if overdue.
    pub fn time_until_next_cue(&self) -> Option<Duration> {
        let now = self.clock.now();
        self.next_cue_deadline()
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    /// Get the presenter.
    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    /// Get a mutable presenter (for drawing).
    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    /// Get the best-time store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Snapshot for logging or debugging front ends.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "state": self.state.to_json(),
            "best_time_ms": self.best_time,
            "pending_cues": self.scheduler.pending()
        })
    }

    /// Apply a transition. Leaving `Waiting` always cancels its cue.
    fn apply(&mut self, event: GameEvent) -> Result<(), InvalidTransition> {
        let next = self.state.transition(&event)?;

        if let Some(cue) = self.state.cue() {
            self.scheduler.cancel(cue);
        }

        debug!(from = %self.state, to = %next, "transition");
        self.state = next;
        Ok(())
    }

    /// Update the best time if `millis` beats it. Returns whether it did.
    fn record(&mut self, millis: u64) -> bool {
        if !is_new_record(self.best_time, millis) {
            return false;
        }

        let previous = self.best_time.replace(millis);
        match self.store.save(millis) {
            Ok(()) => info!(millis, ?previous, "new best time"),
            Err(e) => warn!(
                millis,
                error = %e,
                "new best time kept for this session only"
            ),
        }
        true
    }

    fn next_delay(&mut self) -> Duration {
        self.rng.gen_range(self.delay_range.clone())
    }

    fn show(&mut self, screen: Screen, marker: VisualMarker) {
        debug!(screen = screen.as_str(), marker = marker.as_str(), "display");
        self.presenter.show_screen(screen);
        self.presenter.set_game_visual_state(marker);
    }

    fn show_start_screen(&mut self) {
        self.show(Screen::Start, VisualMarker::None);
    }

    fn show_result_screen(&mut self) {
        self.show(Screen::Result, VisualMarker::None);
    }
}
