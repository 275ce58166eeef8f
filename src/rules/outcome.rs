//! What a transition reports back: outcome, effects, and final result.

use derive_more::Display;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::action::PassReason;
use crate::core::player::{PlayerId, PlayerMap};
use crate::tiles::{Side, Tile};

/// Something the state machine did.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Tiles dealt and the opening tile placed.
    Started { starter: PlayerId, opening: Tile },
    /// A tile was attached and the turn moved on.
    Played {
        player: PlayerId,
        tile: Tile,
        side: Side,
    },
    /// A turn passed without a tile being played.
    Passed { player: PlayerId, reason: PassReason },
    /// A player emptied their hand.
    Won { player: PlayerId, tile: Tile },
    /// Nobody could play; lowest pip-sum wins.
    Blocked { winner: PlayerId },
    /// The countdown moved down by one.
    Ticked { remaining: u32 },
    /// The table was cleared for a new deal.
    Reset,
    /// A seat was forced on turn.
    TurnForced { player: PlayerId },
}

/// Why an intent was refused. A refused intent never changes state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum Rejection {
    #[display("game is not waiting for a deal")]
    GameNotWaiting,
    #[display("game is not being played")]
    GameNotPlaying,
    #[display("no such seat")]
    UnknownPlayer,
    #[display("not this player's turn")]
    NotYourTurn,
    #[display("tile is not in the player's hand")]
    TileNotInHand,
    #[display("tile does not fit that end")]
    IllegalPlacement,
    #[display("callback belongs to an earlier turn")]
    StaleCallback,
    #[display("seat is not computer-controlled")]
    NotComputerPlayer,
    #[display("player holds a legal move")]
    PassWithLegalMove,
    #[display("the deal left nothing to open with")]
    NothingToOpen,
}

/// Result of one intent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Applied(GameEvent),
    Rejected(Rejection),
}

impl Outcome {
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied(_))
    }

    #[must_use]
    pub const fn event(&self) -> Option<GameEvent> {
        match self {
            Outcome::Applied(event) => Some(*event),
            Outcome::Rejected(_) => None,
        }
    }

    #[must_use]
    pub const fn rejection(&self) -> Option<Rejection> {
        match self {
            Outcome::Applied(_) => None,
            Outcome::Rejected(r) => Some(*r),
        }
    }
}

/// Side effects the driver must carry out after a transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Effect {
    /// Replace the running countdown with a fresh one for `epoch`.
    RestartTimer { epoch: u64 },
    /// Stop the countdown.
    StopTimer,
    /// Ask the computer seat for its move after `delay_ms`.
    ScheduleComputerMove {
        player: PlayerId,
        epoch: u64,
        delay_ms: u64,
    },
    /// Run the start sequence after `delay_ms`.
    ScheduleStart { delay_ms: u64 },
}

/// Outcome plus the effects it requires.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    pub outcome: Outcome,
    pub effects: SmallVec<[Effect; 2]>,
}

impl Transition {
    #[must_use]
    pub fn applied(event: GameEvent) -> Self {
        Self {
            outcome: Outcome::Applied(event),
            effects: SmallVec::new(),
        }
    }

    #[must_use]
    pub fn rejected(rejection: Rejection) -> Self {
        Self {
            outcome: Outcome::Rejected(rejection),
            effects: SmallVec::new(),
        }
    }

    #[must_use]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// How a finished game ended.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    /// `winner` played their last tile.
    Domino { winner: PlayerId },
    /// Nobody could move; `scores` are the remaining pip-sums.
    Blocked {
        winner: PlayerId,
        scores: PlayerMap<u32>,
    },
}

impl GameResult {
    #[must_use]
    pub fn winner(&self) -> PlayerId {
        match self {
            GameResult::Domino { winner } | GameResult::Blocked { winner, .. } => *winner,
        }
    }

    /// Check if a player won.
    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        self.winner() == player
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_accessors() {
        let applied = Outcome::Applied(GameEvent::Reset);
        assert!(applied.is_applied());
        assert_eq!(applied.event(), Some(GameEvent::Reset));
        assert_eq!(applied.rejection(), None);

        let rejected = Outcome::Rejected(Rejection::NotYourTurn);
        assert!(!rejected.is_applied());
        assert_eq!(rejected.event(), None);
        assert_eq!(rejected.rejection(), Some(Rejection::NotYourTurn));
    }

    #[test]
    fn test_rejection_display() {
        assert_eq!(Rejection::NotYourTurn.to_string(), "not this player's turn");
        assert_eq!(
            Rejection::StaleCallback.to_string(),
            "callback belongs to an earlier turn"
        );
    }

    #[test]
    fn test_transition_builder() {
        let t = Transition::applied(GameEvent::Reset)
            .with_effect(Effect::StopTimer)
            .with_effect(Effect::ScheduleStart { delay_ms: 500 });
        assert_eq!(t.effects.len(), 2);
        assert!(!t.effects.spilled());
        assert!(Transition::rejected(Rejection::GameNotPlaying).effects.is_empty());
    }

    #[test]
    fn test_game_result_is_winner() {
        let result = GameResult::Domino {
            winner: PlayerId::new(1),
        };
        assert!(!result.is_winner(PlayerId::new(0)));
        assert!(result.is_winner(PlayerId::new(1)));

        let blocked = GameResult::Blocked {
            winner: PlayerId::new(3),
            scores: PlayerMap::new(|p| p.index() as u32),
        };
        assert_eq!(blocked.winner(), PlayerId::new(3));
    }
}
