//! Intents and the move history.
//!
//! An `Intent` is a request to the state machine: from the presentation
//! (play, skip, restart), from the driver (tick, scheduled computer move,
//! deferred start), or from a debugging hook (force the current player).
//!
//! An `Action` is what actually happened to the board and is appended to
//! the history as an `ActionRecord`.

use serde::{Deserialize, Serialize};

use super::player::PlayerId;
use crate::tiles::{PlacedTile, Side, Tile, TileId};

/// A request to the state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intent {
    /// Deal and open a new game.
    Start,

    /// Place a held tile on one end.
    Play {
        player: PlayerId,
        tile: TileId,
        side: Side,
    },

    /// Pass the turn.
    Skip { player: PlayerId },

    /// Tear down and schedule a fresh deal.
    Restart,

    /// Advance the countdown by one step.
    Tick,

    /// Force a seat on turn.
    SetCurrentPlayer { player: PlayerId },

    /// Scheduled computer move for the turn tagged by `epoch`.
    ComputerMove { player: PlayerId, epoch: u64 },
}

/// Why a turn was passed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PassReason {
    /// The player had nothing to play.
    NoMove,
    /// The player chose to pass while holding a legal move.
    Voluntary,
    /// The countdown ran out.
    Timeout,
}

/// Something that happened at the table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// The first tile of the round.
    Open { tile: Tile },
    /// A tile attached to one end.
    Play { side: Side, placed: PlacedTile },
    /// A turn passed without playing.
    Pass { reason: PassReason },
}

/// A recorded action with the turn it happened on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// The player who took this action.
    pub player: PlayerId,

    /// The action taken.
    pub action: Action,

    /// Turn number when action was taken.
    pub turn: u32,
}

impl ActionRecord {
    /// Create a new action record.
    #[must_use]
    pub fn new(player: PlayerId, action: Action, turn: u32) -> Self {
        Self {
            player,
            action,
            turn,
        }
    }
}
