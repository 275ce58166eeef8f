//! Core table types: seats, state, intents, RNG, configuration.
//!
//! Nothing in here knows how a turn is decided; that lives in `rules`.
//! The engine reads a `GameConfig` and owns the `GameState`.

pub mod action;
pub mod config;
pub mod error;
pub mod player;
pub mod rng;
pub mod state;

pub use action::{Action, ActionRecord, Intent, PassReason};
pub use config::GameConfig;
pub use error::{ConfigError, InvariantViolation};
pub use player::{Player, PlayerId, PlayerMap, PLAYER_COUNT};
pub use rng::{GameRng, GameRngState};
pub use state::{GameState, GameStatus};
