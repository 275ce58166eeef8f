//! The chain of tiles on the table.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::tile::{PlacedTile, Side, Tile};

/// The two exposed pips of a non-empty chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OpenEnds {
    pub left: u8,
    pub right: u8,
}

impl OpenEnds {
    #[must_use]
    pub const fn new(left: u8, right: u8) -> Self {
        Self { left, right }
    }

    /// The pip exposed on one side.
    #[must_use]
    pub const fn on(self, side: Side) -> u8 {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }
}

/// Placed tiles read left to right.
///
/// Backed by `im::Vector` so both ends grow in O(1) and snapshots share
/// structure with the live board.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    chain: Vector<PlacedTile>,
}

impl Board {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.chain.len()
    }

    /// Placed tiles, leftmost first.
    pub fn iter(&self) -> impl Iterator<Item = &PlacedTile> {
        self.chain.iter()
    }

    /// Leftmost placed tile.
    #[must_use]
    pub fn front(&self) -> Option<PlacedTile> {
        self.chain.front().copied()
    }

    /// Rightmost placed tile.
    #[must_use]
    pub fn back(&self) -> Option<PlacedTile> {
        self.chain.back().copied()
    }

    /// Exposed pips, or `None` while the board is empty.
    #[must_use]
    pub fn ends(&self) -> Option<OpenEnds> {
        Some(OpenEnds::new(self.front()?.left, self.back()?.right))
    }

    /// Start the chain with its first tile, canonical side up.
    ///
    /// Replaces whatever was on the board.
    pub fn open(&mut self, tile: Tile) -> OpenEnds {
        self.chain = Vector::unit(PlacedTile::upright(tile));
        OpenEnds::new(tile.left, tile.right)
    }

    /// Attach a tile at one end.
    ///
    /// `touching` is the face that meets the chain; the caller has already
    /// established that it equals the exposed pip on `side`. Returns the
    /// new exposed pip on that side.
    pub fn attach(&mut self, tile: Tile, side: Side, touching: u8) -> u8 {
        let placed = PlacedTile::against(tile, side, touching);
        match side {
            Side::Left => {
                self.chain.push_front(placed);
                placed.left
            }
            Side::Right => {
                self.chain.push_back(placed);
                placed.right
            }
        }
    }

    /// True when every pair of neighbours touches with equal pips.
    #[must_use]
    pub fn is_contiguous(&self) -> bool {
        self.chain
            .iter()
            .zip(self.chain.iter().skip(1))
            .all(|(a, b)| a.right == b.left)
    }
}
