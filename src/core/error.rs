//! Error types for configuration and state checks.

use derive_more::{Display, Error, From};

use super::player::PlayerId;
use crate::tiles::{OpenEnds, TileId};

/// Why a `GameConfig` could not be built or loaded.
#[derive(Debug, Display, Error, From)]
pub enum ConfigError {
    /// A field holds a value the table cannot use.
    #[display("invalid config field `{field}`: {reason}")]
    #[from(ignore)]
    Invalid {
        field: &'static str,
        reason: String,
    },

    /// The TOML text did not parse into a config.
    #[display("config parse error: {_0}")]
    Parse(toml::de::Error),

    /// The config file could not be read.
    #[display("config read error: {_0}")]
    Io(std::io::Error),
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// First structural fault found in a `GameState`.
#[derive(Clone, Debug, PartialEq, Eq, Display, Error)]
pub enum InvariantViolation {
    #[display("expected one human seat, found {found}")]
    HumanSeats { found: usize },

    #[display("tile {tile} appears twice")]
    DuplicateTile { tile: TileId },

    #[display("tile {tile} is missing")]
    MissingTile { tile: TileId },

    #[display("{found} tiles in play, set has {expected}")]
    TileCount { found: usize, expected: usize },

    #[display("board chain is broken")]
    BrokenChain,

    #[display("stored ends {stored:?} do not match board {board:?}")]
    StaleEnds {
        stored: Option<OpenEnds>,
        board: Option<OpenEnds>,
    },

    /// The on-turn flags disagree with `current_player`.
    #[display("seats on turn {on_turn:?}, current player {current}")]
    OnTurn {
        on_turn: Vec<PlayerId>,
        current: PlayerId,
    },
}
