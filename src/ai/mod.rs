//! Computer opponents.

pub mod policy;

pub use policy::{GreedyPolicy, HeaviestFirstPolicy, Move, MovePolicy};
