//! Game phase state machine.
//!
//! Pure transitions only. Side effects (timers, display, persistence)
//! live in the controller.
//!
//! # State Diagram
//!
//! ```text
//!        ┌──────────┐
//!   ┌───▶│   Idle   │◀───────────────────────────┐
//!   │    └────┬─────┘                            │
//!   │         │ start                            │
//!   │         ▼                                  │
//!   │    ┌──────────┐   cue fired   ┌─────────┐  │
//!   │    │ Waiting  │──────────────▶│  Ready  │  │ retry
//!   │    │  (cue)   │               │ (start) │  │
//!   │    └────┬─────┘               └────┬────┘  │
//!   │         │ tap (too early)          │ tap   │
//!   │         ▼                          ▼       │
//!   │    ┌───────────────────────────────────┐   │
//!   └────│        Result (outcome)           │───┘
//! retry  └───────────────┬───────────────────┘
//!  (any)                 │ start
//!                        ▼
//!                     Waiting
//! ```

use std::fmt;
use std::time::Instant;

use super::timer::CueHandle;

/// Result of a finished round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Tapped after the cue, in whole milliseconds.
    Measured { millis: u64 },
    /// Tapped before the cue.
    TooEarly,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Measured { .. } => "measured",
            Self::TooEarly => "too_early",
        }
    }

    /// Measured time, if any.
    pub fn millis(&self) -> Option<u64> {
        match self {
            Self::Measured { millis } => Some(*millis),
            Self::TooEarly => None,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Measured { millis } => serde_json::json!({
                "kind": self.as_str(),
                "millis": millis
            }),
            Self::TooEarly => serde_json::json!({"kind": self.as_str()}),
        }
    }
}

/// Current phase of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameState {
    /// Start screen, no round in progress
    #[default]
    Idle,

    /// Round started, cue not shown yet
    Waiting { cue: CueHandle },

    /// Cue shown, clock running
    Ready { started_at: Instant },

    /// Round over
    Result { outcome: Outcome },
}

impl GameState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Waiting { .. } => "waiting",
            Self::Ready { .. } => "ready",
            Self::Result { .. } => "result",
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_waiting(&self) -> bool {
        matches!(self, Self::Waiting { .. })
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready { .. })
    }

    /// A round is active between start and tap.
    pub fn is_round_active(&self) -> bool {
        matches!(self, Self::Waiting { .. } | Self::Ready { .. })
    }

    /// Whether a start request would be accepted.
    pub fn can_start(&self) -> bool {
        matches!(self, Self::Idle | Self::Result { .. })
    }

    /// Pending cue, only while waiting.
    pub fn cue(&self) -> Option<CueHandle> {
        match self {
            Self::Waiting { cue } => Some(*cue),
            _ => None,
        }
    }

    /// Start instant, only while ready.
    pub fn started_at(&self) -> Option<Instant> {
        match self {
            Self::Ready { started_at } => Some(*started_at),
            _ => None,
        }
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self {
            Self::Result { outcome } => Some(*outcome),
            _ => None,
        }
    }

    /// Apply an event, returning the next state or an error.
    pub fn transition(&self, event: &GameEvent) -> Result<GameState, InvalidTransition> {
        use GameEvent::*;
        use GameState::*;

        let invalid = |reason: &'static str| InvalidTransition {
            from: *self,
            event: *event,
            reason,
        };

        match (self, event) {
            // Start: Idle/Result -> Waiting
            (Idle | Result { .. }, Start { cue }) => Ok(Waiting { cue: *cue }),
            (_, Start { .. }) => Err(invalid("Round already in progress")),

            // CueFired: Waiting -> Ready, only for the live cue
            (Waiting { cue }, CueFired { cue: fired, at }) if cue == fired => {
                Ok(Ready { started_at: *at })
            }
            (Waiting { .. }, CueFired { .. }) => Err(invalid("Stale cue")),
            (_, CueFired { .. }) => Err(invalid("Not waiting for a cue")),

            // Tap: Waiting -> Result(TooEarly), Ready -> Result(Measured)
            (Waiting { .. }, Tap { .. }) => Ok(Result {
                outcome: Outcome::TooEarly,
            }),
            (Ready { started_at }, Tap { at }) => Ok(Result {
                outcome: Outcome::Measured {
                    millis: elapsed_millis(*started_at, *at),
                },
            }),
            (_, Tap { .. }) => Err(invalid("No round in progress")),

            // Retry: Any -> Idle
            (_, Retry) => Ok(Idle),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Result { outcome } => serde_json::json!({
                "phase": self.as_str(),
                "outcome": outcome.to_json()
            }),
            Self::Waiting { cue } => serde_json::json!({
                "phase": self.as_str(),
                "cue": cue.id()
            }),
            _ => serde_json::json!({"phase": self.as_str()}),
        }
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Waiting { cue } => write!(f, "Waiting({})", cue),
            Self::Ready { .. } => write!(f, "Ready"),
            Self::Result {
                outcome: Outcome::Measured { millis },
            } => write!(f, "Result({}ms)", millis),
            Self::Result {
                outcome: Outcome::TooEarly,
            } => write!(f, "Result(too early)"),
        }
    }
}

/// Whole milliseconds between two instants, clamped at zero.
pub fn elapsed_millis(from: Instant, to: Instant) -> u64 {
    u64::try_from(to.saturating_duration_since(from).as_millis()).unwrap_or(u64::MAX)
}

/// State transition events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Start { cue: CueHandle },
    CueFired { cue: CueHandle, at: Instant },
    Tap { at: Instant },
    Retry,
}

/// Error when a state transition is invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidTransition {
    pub from: GameState,
    pub event: GameEvent,
    pub reason: &'static str,
}

impl fmt::Display for InvalidTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid transition from {} via {:?}: {}",
            self.from, self.event, self.reason
        )
    }
}

impl std::error::Error for InvalidTransition {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::timer::{ManualClock, Scheduler, TimerQueue};
    use std::time::Duration;

    fn cues() -> (CueHandle, CueHandle) {
        let mut timers = TimerQueue::new(ManualClock::new());
        (
            timers.schedule(Duration::from_millis(1000)),
            timers.schedule(Duration::from_millis(1000)),
        )
    }

    #[test]
    fn test_initial_state() {
        let state = GameState::default();
        assert!(state.is_idle());
        assert!(state.can_start());
        assert_eq!(state.cue(), None);
        assert_eq!(state.started_at(), None);
    }

    #[test]
    fn test_full_round() {
        let (cue, _) = cues();
        let t0 = Instant::now();

        let state = GameState::Idle.transition(&GameEvent::Start { cue }).unwrap();
        assert_eq!(state, GameState::Waiting { cue });
        assert!(state.is_round_active());

        let state = state
            .transition(&GameEvent::CueFired { cue, at: t0 })
            .unwrap();
        assert_eq!(state.started_at(), Some(t0));

        let state = state
            .transition(&GameEvent::Tap {
                at: t0 + Duration::from_millis(250),
            })
            .unwrap();
        assert_eq!(
            state.outcome(),
            Some(Outcome::Measured { millis: 250 })
        );
        assert_eq!(state.started_at(), None);

        let state = state.transition(&GameEvent::Retry).unwrap();
        assert!(state.is_idle());
    }

    #[test]
    fn test_tap_while_waiting_is_too_early() {
        let (cue, _) = cues();
        let state = GameState::Waiting { cue };

        let next = state.transition(&GameEvent::Tap { at: Instant::now() }).unwrap();
        assert_eq!(next.outcome(), Some(Outcome::TooEarly));
        assert_eq!(next.outcome().and_then(|o| o.millis()), None);
    }

    #[test]
    fn test_stale_cue_rejected() {
        let (live, stale) = cues();
        let state = GameState::Waiting { cue: live };

        let err = state
            .transition(&GameEvent::CueFired {
                cue: stale,
                at: Instant::now(),
            })
            .unwrap_err();
        assert_eq!(err.reason, "Stale cue");
        assert_eq!(err.from, state);
    }

    #[test]
    fn test_invalid_transitions() {
        let (cue, _) = cues();
        let now = Instant::now();

        // Tap with no round
        assert!(GameState::Idle.transition(&GameEvent::Tap { at: now }).is_err());
        let result = GameState::Result {
            outcome: Outcome::TooEarly,
        };
        assert!(result.transition(&GameEvent::Tap { at: now }).is_err());

        // Cue outside Waiting
        assert!(GameState::Idle
            .transition(&GameEvent::CueFired { cue, at: now })
            .is_err());

        // Start during a round
        assert!(GameState::Waiting { cue }
            .transition(&GameEvent::Start { cue })
            .is_err());
        assert!(GameState::Ready { started_at: now }
            .transition(&GameEvent::Start { cue })
            .is_err());
    }

    #[test]
    fn test_retry_from_anywhere() {
        let (cue, _) = cues();
        let states = [
            GameState::Idle,
            GameState::Waiting { cue },
            GameState::Ready {
                started_at: Instant::now(),
            },
            GameState::Result {
                outcome: Outcome::Measured { millis: 300 },
            },
        ];

        for state in states {
            assert_eq!(state.transition(&GameEvent::Retry), Ok(GameState::Idle));
        }
    }

    #[test]
    fn test_elapsed_never_negative() {
        let later = Instant::now() + Duration::from_millis(50);
        assert_eq!(elapsed_millis(later, later - Duration::from_millis(10)), 0);
        assert_eq!(elapsed_millis(later - Duration::from_millis(10), later), 10);
    }

    #[test]
    fn test_display() {
        let state = GameState::Result {
            outcome: Outcome::Measured { millis: 212 },
        };
        assert_eq!(format!("{}", state), "Result(212ms)");
        assert_eq!(
            state.to_json(),
            serde_json::json!({
                "phase": "result",
                "outcome": {"kind": "measured", "millis": 212}
            })
        );
    }
}
