//! Game rules: move legality and the turn state machine.
//!
//! - `oracle`: pure placement check for a tile against the open ends
//! - `engine`: `GameEngine`, the single writer of `GameState`
//! - `outcome`: what a transition reports back (events, rejections, effects)
//!
//! The engine is clock-free. Time enters only through `Intent::Tick` and
//! the scheduled intents the driver replays.

pub mod engine;
pub mod oracle;
pub mod outcome;

pub use engine::GameEngine;
pub use oracle::{can_play, has_legal_move, Placement};
pub use outcome::{Effect, GameEvent, GameResult, Outcome, Rejection, Transition};
