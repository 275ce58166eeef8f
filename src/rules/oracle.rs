//! Move legality: where, and how, a tile fits the open ends.

use serde::{Deserialize, Serialize};

use crate::tiles::{OpenEnds, Side, Tile};

/// Where a tile can go.
///
/// `needs_flip` follows the table's orientation convention: on the left it
/// is set when the tile's `right` face is the matching one, on the right
/// when its `left` face is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Placement {
    NotPlayable,
    Left { needs_flip: bool },
    Right { needs_flip: bool },
}

impl Placement {
    #[must_use]
    pub const fn is_playable(self) -> bool {
        !matches!(self, Placement::NotPlayable)
    }

    #[must_use]
    pub const fn side(self) -> Option<Side> {
        match self {
            Placement::NotPlayable => None,
            Placement::Left { .. } => Some(Side::Left),
            Placement::Right { .. } => Some(Side::Right),
        }
    }

    #[must_use]
    pub const fn needs_flip(self) -> bool {
        match self {
            Placement::NotPlayable => false,
            Placement::Left { needs_flip } | Placement::Right { needs_flip } => needs_flip,
        }
    }

    /// The face of `tile` that meets the chain.
    ///
    /// `None` when the tile is not playable.
    #[must_use]
    pub const fn touching_face(self, tile: Tile) -> Option<u8> {
        match self {
            Placement::NotPlayable => None,
            Placement::Left { needs_flip: true } | Placement::Right { needs_flip: false } => {
                Some(tile.right)
            }
            Placement::Left { needs_flip: false } | Placement::Right { needs_flip: true } => {
                Some(tile.left)
            }
        }
    }
}

/// Decide whether `tile` can be played against `ends`.
///
/// The left end is checked first, so a tile matching both ends always
/// goes left. An empty board (`None`) never matches; the opening tile is
/// placed by the start sequence instead.
#[must_use]
pub fn can_play(tile: Tile, ends: Option<OpenEnds>) -> Placement {
    let Some(ends) = ends else {
        return Placement::NotPlayable;
    };

    if tile.has(ends.left) {
        Placement::Left {
            needs_flip: tile.right == ends.left,
        }
    } else if tile.has(ends.right) {
        Placement::Right {
            needs_flip: tile.left == ends.right,
        }
    } else {
        Placement::NotPlayable
    }
}

/// True if any tile in `tiles` fits either end.
#[must_use]
pub fn has_legal_move(tiles: &[Tile], ends: Option<OpenEnds>) -> bool {
    tiles.iter().any(|&t| can_play(t, ends).is_playable())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ends(l: u8, r: u8) -> Option<OpenEnds> {
        Some(OpenEnds::new(l, r))
    }

    #[test]
    fn test_right_face_on_left_end_needs_flip() {
        let p = can_play(Tile::new(1, 2), ends(2, 5));
        assert_eq!(p, Placement::Left { needs_flip: true });
        assert_eq!(p.touching_face(Tile::new(1, 2)), Some(2));
    }

    #[test]
    fn test_left_face_on_left_end() {
        let p = can_play(Tile::new(2, 4), ends(2, 5));
        assert_eq!(p, Placement::Left { needs_flip: false });
        assert_eq!(p.touching_face(Tile::new(2, 4)), Some(2));
    }

    #[test]
    fn test_right_end() {
        let tile = Tile::new(5, 6);
        let p = can_play(tile, ends(2, 5));
        assert_eq!(p, Placement::Right { needs_flip: true });
        assert_eq!(p.touching_face(tile), Some(5));

        let tile = Tile::new(0, 5);
        let p = can_play(tile, ends(2, 5));
        assert_eq!(p, Placement::Right { needs_flip: false });
        assert_eq!(p.touching_face(tile), Some(5));
    }

    #[test]
    fn test_left_preferred_when_both_match() {
        // [2|5] matches both ends; it must go left.
        let p = can_play(Tile::new(2, 5), ends(2, 5));
        assert_eq!(p.side(), Some(Side::Left));
        assert!(!p.needs_flip());

        // [2|5] against (5, 2): right face hits the left end.
        let p = can_play(Tile::new(2, 5), ends(5, 2));
        assert_eq!(p, Placement::Left { needs_flip: true });
    }

    #[test]
    fn test_double_on_left() {
        let p = can_play(Tile::new(3, 3), ends(3, 1));
        assert_eq!(p, Placement::Left { needs_flip: true });
        assert_eq!(p.touching_face(Tile::new(3, 3)), Some(3));
    }

    #[test]
    fn test_not_playable() {
        let p = can_play(Tile::new(0, 1), ends(2, 5));
        assert_eq!(p, Placement::NotPlayable);
        assert!(!p.is_playable());
        assert_eq!(p.side(), None);
        assert!(!p.needs_flip());
        assert_eq!(p.touching_face(Tile::new(0, 1)), None);
    }

    #[test]
    fn test_empty_board_never_matches() {
        assert_eq!(can_play(Tile::new(0, 0), None), Placement::NotPlayable);
        assert!(!has_legal_move(&[Tile::new(0, 0), Tile::new(6, 6)], None));
    }

    #[test]
    fn test_has_legal_move() {
        let hand = [Tile::new(0, 1), Tile::new(3, 4)];
        assert!(has_legal_move(&hand, ends(4, 6)));
        assert!(!has_legal_move(&hand, ends(6, 6)));
        assert!(!has_legal_move(&[], ends(1, 1)));
    }
}
