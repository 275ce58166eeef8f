//! Computer move selection.
//!
//! Policies are trait-based so the engine and driver stay generic:
//! - `GreedyPolicy`: first playable tile in hand order (the table default)
//! - `HeaviestFirstPolicy`: dump the highest pip-sum playable tile

use serde::{Deserialize, Serialize};

use crate::rules::oracle::{can_play, Placement};
use crate::tiles::{OpenEnds, Side, Tile, TileId};

/// A chosen move: which tile, which end, and the oracle's orientation flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub tile: TileId,
    pub side: Side,
    pub needs_flip: bool,
}

impl Move {
    /// Build a move from the oracle's verdict, if the tile is playable.
    #[must_use]
    pub fn from_placement(tile: Tile, placement: Placement) -> Option<Self> {
        Some(Self {
            tile: tile.id(),
            side: placement.side()?,
            needs_flip: placement.needs_flip(),
        })
    }
}

/// Chooses a move for a computer seat.
///
/// Must only return moves the oracle accepts, on the side it reports.
/// `None` means the seat passes.
pub trait MovePolicy: Send + Sync {
    /// Pick a move for `hand` against `ends`.
    fn choose(&self, hand: &[Tile], ends: Option<OpenEnds>) -> Option<Move>;

    /// Short name for logs.
    fn name(&self) -> &'static str;
}

impl<P: MovePolicy + ?Sized> MovePolicy for Box<P> {
    fn choose(&self, hand: &[Tile], ends: Option<OpenEnds>) -> Option<Move> {
        (**self).choose(hand, ends)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// First playable tile in hand order.
///
/// Deterministic for a given hand order and not strategic: no blocking,
/// no pip counting.
#[derive(Clone, Copy, Debug, Default)]
pub struct GreedyPolicy;

impl MovePolicy for GreedyPolicy {
    fn choose(&self, hand: &[Tile], ends: Option<OpenEnds>) -> Option<Move> {
        hand.iter()
            .find_map(|&tile| Move::from_placement(tile, can_play(tile, ends)))
    }

    fn name(&self) -> &'static str {
        "greedy"
    }
}

/// Playable tile with the largest pip sum; earlier in hand wins ties.
///
/// Sheds points early so a blocked round costs less.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeaviestFirstPolicy;

impl MovePolicy for HeaviestFirstPolicy {
    fn choose(&self, hand: &[Tile], ends: Option<OpenEnds>) -> Option<Move> {
        hand.iter()
            .filter_map(|&tile| {
                Move::from_placement(tile, can_play(tile, ends)).map(|m| (tile.pip_sum(), m))
            })
            .fold(None, |best: Option<(u32, Move)>, (pips, m)| match best {
                Some((best_pips, _)) if best_pips >= pips => best,
                _ => Some((pips, m)),
            })
            .map(|(_, m)| m)
    }

    fn name(&self) -> &'static str {
        "heaviest-first"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiles(pairs: &[(u8, u8)]) -> Vec<Tile> {
        pairs.iter().map(|&(a, b)| Tile::new(a, b)).collect()
    }

    fn ends(l: u8, r: u8) -> Option<OpenEnds> {
        Some(OpenEnds::new(l, r))
    }

    #[test]
    fn test_greedy_takes_first_playable() {
        let hand = tiles(&[(0, 0), (3, 6), (1, 5)]);
        let m = GreedyPolicy.choose(&hand, ends(5, 6)).unwrap();
        // [3|6] comes first and only matches the right end.
        assert_eq!(m.tile, TileId::new(3, 6));
        assert_eq!(m.side, Side::Right);
        assert!(!m.needs_flip);
    }

    #[test]
    fn test_greedy_single_tile_scenario() {
        let m = GreedyPolicy.choose(&tiles(&[(1, 2)]), ends(2, 5)).unwrap();
        assert_eq!(
            m,
            Move {
                tile: TileId::new(1, 2),
                side: Side::Left,
                needs_flip: true,
            }
        );
    }

    #[test]
    fn test_greedy_no_move() {
        assert_eq!(GreedyPolicy.choose(&tiles(&[(0, 1), (2, 3)]), ends(6, 6)), None);
        assert_eq!(GreedyPolicy.choose(&[], ends(1, 1)), None);
        assert_eq!(GreedyPolicy.choose(&tiles(&[(1, 1)]), None), None);
    }

    #[test]
    fn test_greedy_depends_on_order() {
        let a = GreedyPolicy.choose(&tiles(&[(1, 4), (4, 6)]), ends(4, 4)).unwrap();
        let b = GreedyPolicy.choose(&tiles(&[(4, 6), (1, 4)]), ends(4, 4)).unwrap();
        assert_eq!(a.tile, TileId::new(1, 4));
        assert_eq!(b.tile, TileId::new(4, 6));
    }

    #[test]
    fn test_heaviest_first() {
        let hand = tiles(&[(0, 5), (5, 6), (2, 3), (3, 5)]);
        let m = HeaviestFirstPolicy.choose(&hand, ends(5, 1)).unwrap();
        assert_eq!(m.tile, TileId::new(5, 6));
        assert_eq!(m.side, Side::Left);

        // Ties keep hand order.
        let hand = tiles(&[(1, 4), (2, 3)]);
        let m = HeaviestFirstPolicy.choose(&hand, ends(1, 3)).unwrap();
        assert_eq!(m.tile, TileId::new(1, 4));

        assert_eq!(HeaviestFirstPolicy.choose(&hand, ends(6, 6)), None);
    }

    #[test]
    fn test_boxed_policy() {
        let policy: Box<dyn MovePolicy> = Box::new(GreedyPolicy);
        assert_eq!(policy.name(), "greedy");
        assert!(policy.choose(&tiles(&[(2, 2)]), ends(2, 0)).is_some());
    }
}
