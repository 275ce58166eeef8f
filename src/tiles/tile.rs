//! Domino tiles and their identifiers.

use std::str::FromStr;

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};

/// Largest pip value a face may carry.
pub const MAX_PIP: u8 = 9;

/// Stable identifier for a tile, derived from its pips.
///
/// Formats as `"<left>-<right>"` with `left <= right`. Because a tile's
/// canonical pair is unique within a set, the id is collision-free.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display)]
#[serde(from = "Faces")]
#[display("{left}-{right}")]
pub struct TileId {
    left: u8,
    right: u8,
}

impl TileId {
    /// Build an id from two faces in either order.
    #[must_use]
    pub const fn new(a: u8, b: u8) -> Self {
        if a <= b {
            Self { left: a, right: b }
        } else {
            Self { left: b, right: a }
        }
    }

    /// The tile this id names.
    #[must_use]
    pub const fn tile(self) -> Tile {
        Tile {
            left: self.left,
            right: self.right,
        }
    }
}

/// Incoming `{left, right}` pair, normalised on the way in.
#[derive(Deserialize)]
struct Faces {
    left: u8,
    right: u8,
}

impl From<Faces> for TileId {
    fn from(faces: Faces) -> Self {
        Self::new(faces.left, faces.right)
    }
}

impl From<Faces> for Tile {
    fn from(faces: Faces) -> Self {
        Self::new(faces.left, faces.right)
    }
}

/// Failure to read a tile id from text.
#[derive(Clone, Debug, PartialEq, Eq, Display, Error)]
#[display("cannot parse tile {input:?}: {reason}")]
pub struct ParseTileError {
    /// The text that was rejected.
    pub input: String,
    /// What was wrong with it.
    pub reason: &'static str,
}

impl FromStr for TileId {
    type Err = ParseTileError;

    /// Accepts `"3-5"`, `"5|3"`, `"[3-5]"` and `"35"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = |reason| ParseTileError {
            input: s.to_string(),
            reason,
        };

        let cleaned: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '[' | ']' | ' '))
            .map(|c| if c == '|' { '-' } else { c })
            .collect();

        let (a, b) = match cleaned.split_once('-') {
            Some((a, b)) => (a, b),
            None if cleaned.len() == 2 && cleaned.is_ascii() => cleaned.split_at(1),
            None => return Err(err("expected two faces")),
        };

        let a: u8 = a.parse().map_err(|_| err("face is not a number"))?;
        let b: u8 = b.parse().map_err(|_| err("face is not a number"))?;
        if a > MAX_PIP || b > MAX_PIP {
            return Err(err("face out of range"));
        }
        Ok(Self::new(a, b))
    }
}

/// A domino: two pip faces.
///
/// Tiles are canonical: `left <= right`. Use [`Tile::new`] to build one from
/// faces in any order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(from = "Faces")]
#[display("[{left}|{right}]")]
pub struct Tile {
    /// Lower face.
    pub left: u8,
    /// Higher face.
    pub right: u8,
}

impl Tile {
    /// Build a canonical tile from two faces.
    #[must_use]
    pub const fn new(a: u8, b: u8) -> Self {
        TileId::new(a, b).tile()
    }

    /// Identifier derived from the pips.
    #[inline]
    #[must_use]
    pub const fn id(self) -> TileId {
        TileId {
            left: self.left,
            right: self.right,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_double(self) -> bool {
        self.left == self.right
    }

    #[inline]
    #[must_use]
    pub const fn pip_sum(self) -> u32 {
        self.left as u32 + self.right as u32
    }

    /// True if either face shows `pip`.
    #[inline]
    #[must_use]
    pub const fn has(self, pip: u8) -> bool {
        self.left == pip || self.right == pip
    }
}

/// One end of the chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    #[display("left")]
    Left,
    #[display("right")]
    Right,
}

/// A tile on the board, as shown when the chain is read left to right.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlacedTile {
    /// The tile itself.
    pub tile: Tile,
    /// Pip shown on the left half.
    pub left: u8,
    /// Pip shown on the right half.
    pub right: u8,
}

impl PlacedTile {
    /// Lay a tile in its canonical orientation.
    #[must_use]
    pub const fn upright(tile: Tile) -> Self {
        Self {
            tile,
            left: tile.left,
            right: tile.right,
        }
    }

    /// Lay a tile so that `touching` faces the chain on `side`.
    ///
    /// Placing on the left means the chain continues to the tile's right,
    /// so the touching face is shown on the right half and the other face
    /// becomes the new left end. The right side mirrors this.
    #[must_use]
    pub const fn against(tile: Tile, side: Side, touching: u8) -> Self {
        let outer = if tile.left == touching {
            tile.right
        } else {
            tile.left
        };
        match side {
            Side::Left => Self {
                tile,
                left: outer,
                right: touching,
            },
            Side::Right => Self {
                tile,
                left: touching,
                right: outer,
            },
        }
    }

    /// True when the shown orientation reverses the canonical one.
    #[must_use]
    pub const fn is_flipped(self) -> bool {
        self.left != self.tile.left
    }
}
