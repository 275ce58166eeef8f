//! A player's hand.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::tile::{Tile, TileId};

/// Tiles held by one player, in dealt order.
///
/// Order matters: the computer policy scans the hand front to back.
/// SmallVec keeps a full double-six deal (7 tiles) off the heap.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hand {
    tiles: SmallVec<[Tile; 8]>,
}

impl Hand {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Tiles in dealt order.
    #[must_use]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Add a tile at the back.
    pub fn push(&mut self, tile: Tile) {
        self.tiles.push(tile);
    }

    /// Look up a held tile by id.
    #[must_use]
    pub fn get(&self, id: TileId) -> Option<Tile> {
        self.tiles.iter().copied().find(|t| t.id() == id)
    }

    #[must_use]
    pub fn contains(&self, id: TileId) -> bool {
        self.get(id).is_some()
    }

    /// Remove a tile, keeping the order of the rest.
    ///
    /// Returns the tile if it was held.
    pub fn remove(&mut self, id: TileId) -> Option<Tile> {
        let pos = self.tiles.iter().position(|t| t.id() == id)?;
        Some(self.tiles.remove(pos))
    }

    /// Sum of all pips still held.
    #[must_use]
    pub fn pip_sum(&self) -> u32 {
        self.tiles.iter().map(|t| t.pip_sum()).sum()
    }

    /// The highest double held, if any.
    ///
    /// Ties cannot happen within one set, but the first one in hand order
    /// wins if they ever did.
    #[must_use]
    pub fn highest_double(&self) -> Option<Tile> {
        self.tiles
            .iter()
            .copied()
            .filter(|t| t.is_double())
            .fold(None, |best: Option<Tile>, t| match best {
                Some(b) if b.left >= t.left => Some(b),
                _ => Some(t),
            })
    }
}

impl FromIterator<Tile> for Hand {
    fn from_iter<I: IntoIterator<Item = Tile>>(iter: I) -> Self {
        Self {
            tiles: iter.into_iter().collect(),
        }
    }
}
