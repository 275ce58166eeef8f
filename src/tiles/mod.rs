//! Tiles, hands, the deck, and the board chain.
//!
//! - `tile`: `Tile`, `TileId`, `Side`, and `PlacedTile` orientation
//! - `hand`: a player's tiles in dealt order
//! - `deck`: set generation for a `DeckRange`, shuffling, round-robin dealing
//! - `board`: the chain and its two open ends

pub mod board;
pub mod deck;
pub mod hand;
pub mod tile;

pub use board::{Board, OpenEnds};
pub use deck::{deal, DeckRange};
pub use hand::Hand;
pub use tile::{ParseTileError, PlacedTile, Side, Tile, TileId, MAX_PIP};
