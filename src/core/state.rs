//! Game state: the single source of truth for a table.
//!
//! ## GameState
//!
//! - Four seats with hands, scores, and countdowns
//! - The board chain and its open ends
//! - Status, current seat, winner, blocked flag
//! - Shared countdown and the turn epoch
//! - Move history
//!
//! Only the engine mutates a `GameState`. Everyone else gets a shared
//! reference or a cloned snapshot; `im::Vector` keeps snapshots cheap.

use derive_more::Display;
use im::Vector;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use super::action::{Action, ActionRecord};
use super::config::GameConfig;
use super::error::InvariantViolation;
use super::player::{Player, PlayerId, PlayerMap};
use crate::tiles::{Board, DeckRange, OpenEnds, TileId};

/// Lifecycle of a table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    #[default]
    #[display("waiting")]
    Waiting,
    #[display("playing")]
    Playing,
    #[display("ended")]
    Ended,
}

/// Complete state of one table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// Seats in turn order.
    pub players: PlayerMap<Player>,

    /// The chain of placed tiles.
    pub board: Board,

    /// Seat on turn.
    pub current_player: PlayerId,

    pub status: GameStatus,

    /// Exposed pip on the left, `None` while the board is empty.
    pub left_end: Option<u8>,

    /// Exposed pip on the right, `None` while the board is empty.
    pub right_end: Option<u8>,

    /// Set once, when the game ends.
    pub winner: Option<PlayerId>,

    /// True when the game ended with nobody able to play.
    pub is_blocked: bool,

    /// Seconds left for the seat on turn.
    pub turn_timer: u32,

    /// Bumped at every turn boundary. Scheduled callbacks carry the epoch
    /// they were issued for and are stale once it moves on.
    pub turn_epoch: u64,

    /// Turn counter, starting at 1 with the opening turn.
    pub turn_number: u32,

    /// Everything that happened this game, oldest first.
    pub history: Vector<ActionRecord>,
}

impl GameState {
    /// A fresh table waiting for the deal.
    #[must_use]
    pub fn waiting(config: &GameConfig) -> Self {
        Self {
            players: PlayerMap::new(|id| {
                Player::new(
                    id,
                    config.player_name(id),
                    id == config.human_seat,
                    config.turn_seconds,
                )
            }),
            board: Board::new(),
            current_player: PlayerId::new(0),
            status: GameStatus::Waiting,
            left_end: None,
            right_end: None,
            winner: None,
            is_blocked: false,
            turn_timer: config.turn_seconds,
            turn_epoch: 0,
            turn_number: 0,
            history: Vector::new(),
        }
    }

    #[must_use]
    pub fn player(&self, id: PlayerId) -> &Player {
        &self.players[id]
    }

    /// The seat on turn.
    #[must_use]
    pub fn current(&self) -> &Player {
        &self.players[self.current_player]
    }

    /// The human seat.
    #[must_use]
    pub fn human(&self) -> Option<&Player> {
        self.players.values().find(|p| p.is_human)
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.status == GameStatus::Playing
    }

    /// Open ends as a pair, `None` while the board is empty.
    #[must_use]
    pub fn ends(&self) -> Option<OpenEnds> {
        Some(OpenEnds::new(self.left_end?, self.right_end?))
    }

    /// Store new open ends.
    pub fn set_ends(&mut self, ends: OpenEnds) {
        self.left_end = Some(ends.left);
        self.right_end = Some(ends.right);
    }

    /// Put `player` on turn: flag that seat only, refill every countdown,
    /// and start a new epoch.
    pub fn begin_turn(&mut self, player: PlayerId, turn_seconds: u32) {
        self.current_player = player;
        for (id, p) in self.players.iter_mut() {
            p.is_current_turn = id == player;
            p.time_left = turn_seconds;
        }
        self.turn_timer = turn_seconds;
        self.turn_epoch += 1;
    }

    /// Append to the history, stamped with the current turn number.
    pub fn record(&mut self, player: PlayerId, action: Action) {
        self.history
            .push_back(ActionRecord::new(player, action, self.turn_number));
    }

    /// Check the structural invariants of a running table.
    ///
    /// - hands and board together hold exactly the generated set
    /// - the chain is contiguous and the stored ends match its outer faces
    /// - exactly one human seat
    /// - while playing, exactly one seat is flagged on turn and it is
    ///   `current_player`
    ///
    /// Returns the first violation found.
    pub fn check_invariants(&self, deck: DeckRange) -> Result<(), InvariantViolation> {
        let humans = self.players.values().filter(|p| p.is_human).count();
        if humans != 1 {
            return Err(InvariantViolation::HumanSeats { found: humans });
        }

        if self.status == GameStatus::Waiting {
            return Ok(());
        }

        let mut seen: FxHashSet<TileId> = FxHashSet::default();
        let held = self.players.values().flat_map(|p| p.hand.tiles().iter());
        let placed = self.board.iter().map(|p| &p.tile);
        for tile in held.chain(placed) {
            if !seen.insert(tile.id()) {
                return Err(InvariantViolation::DuplicateTile { tile: tile.id() });
            }
        }
        if let Some(missing) = deck.generate().iter().find(|t| !seen.contains(&t.id())) {
            return Err(InvariantViolation::MissingTile { tile: missing.id() });
        }
        if seen.len() != deck.tile_count() {
            return Err(InvariantViolation::TileCount {
                found: seen.len(),
                expected: deck.tile_count(),
            });
        }

        if !self.board.is_contiguous() {
            return Err(InvariantViolation::BrokenChain);
        }
        if self.board.ends() != self.ends() {
            return Err(InvariantViolation::StaleEnds {
                stored: self.ends(),
                board: self.board.ends(),
            });
        }

        if self.status == GameStatus::Playing {
            let on_turn: Vec<_> = self
                .players
                .iter()
                .filter(|(_, p)| p.is_current_turn)
                .map(|(id, _)| id)
                .collect();
            if on_turn != [self.current_player] {
                return Err(InvariantViolation::OnTurn {
                    on_turn,
                    current: self.current_player,
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiles::{deal, Side, Tile};

    #[test]
    fn test_waiting_state() {
        let config = GameConfig::default();
        let state = GameState::waiting(&config);

        assert_eq!(state.status, GameStatus::Waiting);
        assert_eq!(state.ends(), None);
        assert_eq!(state.winner, None);
        assert!(!state.is_blocked);
        assert_eq!(state.turn_timer, 10);
        assert_eq!(state.human().map(|p| p.id), Some(PlayerId::new(0)));
        assert_eq!(state.player(PlayerId::new(2)).name, "AI 2");
        assert!(state.players.values().all(|p| !p.is_current_turn));
        assert!(state.check_invariants(config.deck).is_ok());
    }

    #[test]
    fn test_begin_turn() {
        let config = GameConfig::default();
        let mut state = GameState::waiting(&config);
        state.players[PlayerId::new(1)].time_left = 2;
        state.turn_timer = 2;

        state.begin_turn(PlayerId::new(3), 10);

        assert_eq!(state.current_player, PlayerId::new(3));
        assert!(state.current().is_current_turn);
        assert_eq!(state.players.values().filter(|p| p.is_current_turn).count(), 1);
        assert!(state.players.values().all(|p| p.time_left == 10));
        assert_eq!(state.turn_timer, 10);
        assert_eq!(state.turn_epoch, 1);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(GameStatus::Waiting.to_string(), "waiting");
        assert_eq!(GameStatus::Playing.to_string(), "playing");
        assert_eq!(
            serde_json::to_string(&GameStatus::Ended).unwrap(),
            "\"ended\""
        );
    }

    fn dealt_state() -> (GameConfig, GameState) {
        let config = GameConfig::default();
        let mut state = GameState::waiting(&config);
        let tiles = config.deck.generate();
        let mut hands = deal(&tiles);
        for (id, hand) in hands.iter_mut() {
            state.players[id].hand = std::mem::take(hand);
        }
        // 0-0 sits first in seat 0's hand.
        let opening = state.players[PlayerId::new(0)]
            .hand
            .remove(TileId::new(0, 0))
            .unwrap();
        let ends = state.board.open(opening);
        state.set_ends(ends);
        state.status = GameStatus::Playing;
        state.begin_turn(PlayerId::new(0), config.turn_seconds);
        (config, state)
    }

    #[test]
    fn test_invariants_hold_after_deal() {
        let (config, state) = dealt_state();
        assert_eq!(state.check_invariants(config.deck), Ok(()));
    }

    #[test]
    fn test_invariants_catch_lost_tile() {
        let (config, mut state) = dealt_state();
        state.players[PlayerId::new(2)].hand.remove(TileId::new(0, 2));
        assert_eq!(
            state.check_invariants(config.deck),
            Err(InvariantViolation::MissingTile {
                tile: TileId::new(0, 2)
            })
        );
    }

    #[test]
    fn test_invariants_catch_duplicate() {
        let (config, mut state) = dealt_state();
        state.players[PlayerId::new(1)].hand.push(Tile::new(0, 0));
        let err = state.check_invariants(config.deck).unwrap_err();
        assert_eq!(
            err,
            InvariantViolation::DuplicateTile {
                tile: TileId::new(0, 0)
            }
        );
        assert_eq!(err.to_string(), "tile 0-0 appears twice");
    }

    #[test]
    fn test_invariants_catch_stale_ends() {
        let (config, mut state) = dealt_state();
        state.right_end = Some(5);
        assert_eq!(
            state.check_invariants(config.deck),
            Err(InvariantViolation::StaleEnds {
                stored: Some(OpenEnds::new(0, 5)),
                board: Some(OpenEnds::new(0, 0)),
            })
        );
    }

    #[test]
    fn test_invariants_catch_two_on_turn() {
        let (config, mut state) = dealt_state();
        state.players[PlayerId::new(2)].is_current_turn = true;
        assert_eq!(
            state.check_invariants(config.deck),
            Err(InvariantViolation::OnTurn {
                on_turn: vec![PlayerId::new(0), PlayerId::new(2)],
                current: PlayerId::new(0),
            })
        );
    }

    #[test]
    fn test_invariants_catch_broken_chain() {
        let (config, mut state) = dealt_state();
        let tile = state.players[PlayerId::new(1)].hand.tiles()[0];
        state.players[PlayerId::new(1)].hand.remove(tile.id());
        // Attach against a face the chain does not show.
        let exposed = state.board.attach(tile, Side::Right, tile.right);
        state.right_end = Some(exposed);
        assert_eq!(
            state.check_invariants(config.deck),
            Err(InvariantViolation::BrokenChain)
        );
    }

    #[test]
    fn test_invariants_catch_second_human() {
        let (config, mut state) = dealt_state();
        state.players[PlayerId::new(3)].is_human = true;
        assert_eq!(
            state.check_invariants(config.deck),
            Err(InvariantViolation::HumanSeats { found: 2 })
        );
    }

    #[test]
    fn test_record_stamps_turn() {
        let (_, mut state) = dealt_state();
        state.turn_number = 4;
        state.record(
            PlayerId::new(1),
            Action::Open {
                tile: Tile::new(0, 0),
            },
        );
        assert_eq!(state.history.back().map(|r| r.turn), Some(4));
    }

    #[test]
    fn test_snapshot_serde() {
        let (_, state) = dealt_state();
        let json = serde_json::to_string(&state).unwrap();
        let back: GameState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }
}
