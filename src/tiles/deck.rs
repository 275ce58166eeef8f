//! Tile set generation, shuffling, and dealing.

use serde::{Deserialize, Serialize};

use super::hand::Hand;
use super::tile::{Tile, MAX_PIP};
use crate::core::player::{PlayerId, PlayerMap, PLAYER_COUNT};
use crate::core::rng::GameRng;

/// Range of faces the tile set is generated from.
///
/// The set enumerates `left` in `0..=max_left` and `right` in
/// `left..=max_right`. The default (3, 6) gives the 22-tile table set;
/// [`DeckRange::double_six`] gives the standard 28.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckRange {
    /// Highest value of the lower face.
    pub max_left: u8,
    /// Highest value of the higher face.
    pub max_right: u8,
}

impl Default for DeckRange {
    fn default() -> Self {
        Self {
            max_left: 3,
            max_right: 6,
        }
    }
}

impl DeckRange {
    /// The standard 28-tile double-six set.
    #[must_use]
    pub const fn double_six() -> Self {
        Self {
            max_left: 6,
            max_right: 6,
        }
    }

    /// True when the range generates at least one tile with faces in bounds.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.max_left <= self.max_right && self.max_right <= MAX_PIP
    }

    /// Number of tiles in the set.
    #[must_use]
    pub fn tile_count(self) -> usize {
        (0..=self.max_left)
            .filter(|&left| left <= self.max_right)
            .map(|left| (self.max_right - left) as usize + 1)
            .sum()
    }

    /// Every tile of the set in generation order.
    #[must_use]
    pub fn generate(self) -> Vec<Tile> {
        let mut tiles = Vec::with_capacity(self.tile_count());
        for left in 0..=self.max_left {
            for right in left..=self.max_right {
                tiles.push(Tile { left, right });
            }
        }
        tiles
    }

    /// Generate and shuffle the set.
    #[must_use]
    pub fn shuffled(self, rng: &mut GameRng) -> Vec<Tile> {
        let mut tiles = self.generate();
        rng.shuffle(&mut tiles);
        tiles
    }
}

/// Deal tiles round-robin: tile `i` goes to seat `i % 4`.
///
/// Hands are equal only when the deck size is a multiple of four; the
/// 22-tile set deals 6, 6, 5, 5.
#[must_use]
pub fn deal(tiles: &[Tile]) -> PlayerMap<Hand> {
    PlayerMap::new(|player: PlayerId| {
        tiles
            .iter()
            .skip(player.index())
            .step_by(PLAYER_COUNT)
            .copied()
            .collect()
    })
}
