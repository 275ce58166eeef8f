//! # gaple
//!
//! Rules engine for Gaple, a four-player block-domino game: one human seat
//! against three computer seats, a small double-six subset, and a short
//! per-turn countdown.
//!
//! ## Design Principles
//!
//! 1. **Single Writer**: `GameEngine` owns the `GameState` and is the only
//!    thing that mutates it. Everything else reads a reference or a snapshot.
//!
//! 2. **Pure Transitions**: every intent runs to completion and returns a
//!    `Transition` with an explicit outcome and the effects the caller must
//!    carry out. The engine never reads a clock.
//!
//! 3. **Epoch-Tagged Callbacks**: each turn boundary bumps a turn epoch, and
//!    scheduled computer moves from an earlier turn are rejected as stale.
//!
//! ## Modules
//!
//! - `core`: seats, state, intents, RNG, configuration
//! - `tiles`: tiles, hands, deck generation and dealing, the board chain
//! - `rules`: move legality oracle and the turn state machine
//! - `ai`: computer move policies
//! - `driver`: virtual-time scheduler and `Session`
//!
//! ## Example
//!
//! ```
//! use gaple::{GameConfig, GreedyPolicy, Session};
//!
//! let config = GameConfig::default().with_seed(7);
//! let mut session = Session::new(config, GreedyPolicy).unwrap();
//! session.start();
//!
//! // Let the greedy policy sit in for the human seat too.
//! let result = session.run_with_human(&GreedyPolicy, 10 * 60 * 1000);
//! assert!(result.is_some());
//! ```

pub mod ai;
pub mod core;
pub mod driver;
pub mod rules;
pub mod tiles;

// Re-export commonly used types
pub use crate::core::{
    Action, ActionRecord, ConfigError, GameConfig, GameRng, GameRngState, GameState, GameStatus,
    Intent, InvariantViolation, PassReason, Player, PlayerId, PlayerMap, PLAYER_COUNT,
};

pub use crate::tiles::{Board, DeckRange, Hand, OpenEnds, PlacedTile, Side, Tile, TileId};

pub use crate::rules::{
    can_play, has_legal_move, Effect, GameEngine, GameEvent, GameResult, Outcome, Placement,
    Rejection, Transition,
};

pub use crate::ai::{GreedyPolicy, HeaviestFirstPolicy, Move, MovePolicy};

pub use crate::driver::{Session, TimedEvent};
