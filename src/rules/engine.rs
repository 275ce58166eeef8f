//! The turn/game state machine.
//!
//! `GameEngine` owns the canonical `GameState` and is its only writer.
//! Every intent runs to completion and returns a `Transition`: the outcome
//! (applied event or rejection) plus the effects the driver must perform.
//! The engine never reads a clock and never schedules anything itself.
//!
//! ## Lifecycle
//!
//! `waiting -> playing -> ended`, with `restart_game` returning to
//! `waiting` and asking the driver to run `start_game` after a delay.
//!
//! ## Stale callbacks
//!
//! Every turn boundary bumps `GameState::turn_epoch`. Scheduled computer
//! moves carry the epoch they were issued for and are rejected once it has
//! moved on. The countdown effect carries the epoch too, so the driver can
//! drop ticks from a replaced timer.

use tracing::{debug, info, instrument, trace};

use crate::ai::{GreedyPolicy, MovePolicy};
use crate::core::action::{Action, Intent, PassReason};
use crate::core::config::GameConfig;
use crate::core::error::ConfigError;
use crate::core::player::{Player, PlayerId, PlayerMap, PLAYER_COUNT};
use crate::core::rng::{GameRng, GameRngState};
use crate::core::state::{GameState, GameStatus};
use crate::tiles::{deal, Hand, Side, Tile, TileId};

use super::oracle::{can_play, has_legal_move, Placement};
use super::outcome::{Effect, GameEvent, GameResult, Rejection, Transition};

/// Rules engine and single writer of the game state.
pub struct GameEngine<P = GreedyPolicy> {
    config: GameConfig,
    state: GameState,
    rng: GameRng,
    policy: P,
}

impl GameEngine<GreedyPolicy> {
    /// Create a waiting table with the default computer policy.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        Self::with_policy(config, GreedyPolicy)
    }
}

impl<P: MovePolicy> GameEngine<P> {
    /// Create a waiting table with a custom computer policy.
    pub fn with_policy(config: GameConfig, policy: P) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng = GameRng::from_seed_or_entropy(config.seed);
        debug!(seed = rng.seed(), policy = policy.name(), "table created");
        Ok(Self {
            state: GameState::waiting(&config),
            config,
            rng,
            policy,
        })
    }

    /// Resume from an existing state, e.g. a saved game or a hand-built
    /// scenario.
    ///
    /// Passing the checkpoint from [`GameEngine::rng_state`] restores the
    /// shuffle stream, so later deals match the engine that was saved.
    /// Without one the RNG is seeded from the config as usual.
    pub fn from_state(
        config: GameConfig,
        state: GameState,
        policy: P,
        rng: Option<GameRngState>,
    ) -> Result<Self, ConfigError> {
        let mut engine = Self::with_policy(config, policy)?;
        engine.state = state;
        if let Some(rng) = rng {
            engine.rng = GameRng::from_state(&rng);
        }
        Ok(engine)
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Read-only view of the live state.
    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Owned copy of the state for presentation.
    #[must_use]
    pub fn snapshot(&self) -> GameState {
        self.state.clone()
    }

    #[must_use]
    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Checkpoint of the shuffle RNG.
    #[must_use]
    pub fn rng_state(&self) -> GameRngState {
        self.rng.state()
    }

    /// How the game ended, once it has.
    #[must_use]
    pub fn result(&self) -> Option<GameResult> {
        if self.state.status != GameStatus::Ended {
            return None;
        }
        let winner = self.state.winner?;
        Some(if self.state.is_blocked {
            GameResult::Blocked {
                winner,
                scores: PlayerMap::new(|id| self.state.players[id].score),
            }
        } else {
            GameResult::Domino { winner }
        })
    }

    /// Every held tile of `player` that fits, with where it goes.
    #[must_use]
    pub fn legal_moves(&self, player: PlayerId) -> Vec<(TileId, Placement)> {
        if player.index() >= PLAYER_COUNT {
            return Vec::new();
        }
        let ends = self.state.ends();
        self.state.players[player]
            .hand
            .tiles()
            .iter()
            .map(|&t| (t.id(), can_play(t, ends)))
            .filter(|(_, p)| p.is_playable())
            .collect()
    }

    /// Dispatch any intent.
    pub fn apply(&mut self, intent: Intent) -> Transition {
        match intent {
            Intent::Start => self.start_game(),
            Intent::Play { player, tile, side } => self.play_card(player, tile, side),
            Intent::Skip { player } => self.skip_turn(player),
            Intent::Restart => self.restart_game(),
            Intent::Tick => self.update_timer(),
            Intent::SetCurrentPlayer { player } => self.set_current_player(player),
            Intent::ComputerMove { player, epoch } => self.computer_move(player, epoch),
        }
    }

    // === Intents ===

    /// Shuffle, deal, place the opening tile, and begin play.
    ///
    /// The holder of the highest double opens with it and stays on turn.
    /// If nobody holds a double, seat 0 opens with its first tile.
    #[instrument(skip(self))]
    pub fn start_game(&mut self) -> Transition {
        if self.state.status != GameStatus::Waiting {
            return self.reject(Rejection::GameNotWaiting);
        }

        let tiles = self.config.deck.shuffled(&mut self.rng);
        let mut hands = deal(&tiles);

        let Some((starter, opening)) = opening_move(&hands) else {
            return self.reject(Rejection::NothingToOpen);
        };
        hands[starter].remove(opening.id());

        let epoch = self.state.turn_epoch;
        let mut state = GameState::waiting(&self.config);
        state.turn_epoch = epoch;
        for (id, hand) in hands.iter_mut() {
            state.players[id].hand = std::mem::take(hand);
        }
        let ends = state.board.open(opening);
        state.set_ends(ends);
        state.status = GameStatus::Playing;
        state.turn_number = 1;
        state.begin_turn(starter, self.config.turn_seconds);
        state.record(starter, Action::Open { tile: opening });
        self.state = state;

        info!(
            %starter,
            opening = %opening,
            tiles = tiles.len(),
            "game started"
        );

        let transition = Transition::applied(GameEvent::Started { starter, opening });
        self.with_turn_effects(transition)
    }

    /// Place a held tile on the requested end.
    ///
    /// The side must be exactly the one the oracle picks for this tile, so
    /// a tile that fits both ends can only go left.
    #[instrument(skip(self))]
    pub fn play_card(&mut self, player: PlayerId, tile: TileId, side: Side) -> Transition {
        if let Err(rejection) = self.check_turn(player) {
            return self.reject(rejection);
        }
        let Some(held) = self.state.players[player].hand.get(tile) else {
            return self.reject(Rejection::TileNotInHand);
        };
        let placement = can_play(held, self.state.ends());
        let touching = match (placement.side(), placement.touching_face(held)) {
            (Some(s), Some(face)) if s == side => face,
            _ => return self.reject(Rejection::IllegalPlacement),
        };

        self.state.players[player].hand.remove(tile);
        let exposed = self.state.board.attach(held, side, touching);
        match side {
            Side::Left => self.state.left_end = Some(exposed),
            Side::Right => self.state.right_end = Some(exposed),
        }
        let placed = match side {
            Side::Left => self.state.board.front(),
            Side::Right => self.state.board.back(),
        };
        if let Some(placed) = placed {
            self.state.record(player, Action::Play { side, placed });
        }
        debug!(%player, tile = %held, %side, exposed, "tile played");

        if self.state.players[player].hand.is_empty() {
            self.state.status = GameStatus::Ended;
            self.state.winner = Some(player);
            info!(winner = %player, "domino: hand emptied");
            return Transition::applied(GameEvent::Won { player, tile: held })
                .with_effect(Effect::StopTimer);
        }

        self.advance_turn();
        let transition = Transition::applied(GameEvent::Played {
            player,
            tile: held,
            side,
        });
        self.with_turn_effects(transition)
    }

    /// Pass the turn. Ends the game if nobody can move.
    ///
    /// Passing while holding a legal move is honored unless the table runs
    /// with `strict_pass`.
    #[instrument(skip(self))]
    pub fn skip_turn(&mut self, player: PlayerId) -> Transition {
        self.pass(player, false)
    }

    /// Clear the table and ask for a fresh deal after the restart delay.
    #[instrument(skip(self))]
    pub fn restart_game(&mut self) -> Transition {
        let epoch = self.state.turn_epoch + 1;
        self.state = GameState::waiting(&self.config);
        self.state.turn_epoch = epoch;
        info!("table reset");

        Transition::applied(GameEvent::Reset)
            .with_effect(Effect::StopTimer)
            .with_effect(Effect::ScheduleStart {
                delay_ms: self.config.restart_delay_ms,
            })
    }

    /// Advance the countdown by one step; at zero the seat on turn times out.
    #[instrument(skip(self))]
    pub fn update_timer(&mut self) -> Transition {
        if !self.state.is_playing() {
            return self.reject(Rejection::GameNotPlaying);
        }

        let remaining = self.state.turn_timer.saturating_sub(1);
        if remaining == 0 {
            let player = self.state.current_player;
            debug!(%player, "turn timed out");
            return self.pass(player, true);
        }

        let current = self.state.current_player;
        self.state.turn_timer = remaining;
        self.state.players[current].time_left = remaining;
        trace!(remaining, "tick");
        Transition::applied(GameEvent::Ticked { remaining })
    }

    /// Force a seat on turn, restarting its countdown.
    #[instrument(skip(self))]
    pub fn set_current_player(&mut self, player: PlayerId) -> Transition {
        if !self.state.is_playing() {
            return self.reject(Rejection::GameNotPlaying);
        }
        if player.index() >= PLAYER_COUNT {
            return self.reject(Rejection::UnknownPlayer);
        }

        self.state.begin_turn(player, self.config.turn_seconds);
        debug!(%player, "turn forced");
        let transition = Transition::applied(GameEvent::TurnForced { player });
        self.with_turn_effects(transition)
    }

    /// Scheduled move for a computer seat.
    ///
    /// Rejected unless `epoch` is still the live turn. Plays what the policy
    /// picks, or passes when it picks nothing.
    #[instrument(skip(self))]
    pub fn computer_move(&mut self, player: PlayerId, epoch: u64) -> Transition {
        if !self.state.is_playing() {
            return self.reject(Rejection::GameNotPlaying);
        }
        if epoch != self.state.turn_epoch {
            return self.reject(Rejection::StaleCallback);
        }
        if let Err(rejection) = self.check_turn(player) {
            return self.reject(rejection);
        }
        if self.state.players[player].is_human {
            return self.reject(Rejection::NotComputerPlayer);
        }

        let hand = self.state.players[player].hand.tiles();
        match self.policy.choose(hand, self.state.ends()) {
            Some(m) => {
                trace!(policy = self.policy.name(), tile = %m.tile, side = %m.side, "computer move");
                self.play_card(player, m.tile, m.side)
            }
            None => self.pass(player, false),
        }
    }

    // === Internals ===

    fn reject(&self, rejection: Rejection) -> Transition {
        debug!(%rejection, status = %self.state.status, "intent rejected");
        Transition::rejected(rejection)
    }

    fn check_turn(&self, player: PlayerId) -> Result<(), Rejection> {
        if !self.state.is_playing() {
            return Err(Rejection::GameNotPlaying);
        }
        if player.index() >= PLAYER_COUNT {
            return Err(Rejection::UnknownPlayer);
        }
        if !self.state.players[player].is_current_turn || self.state.current_player != player {
            return Err(Rejection::NotYourTurn);
        }
        Ok(())
    }

    fn pass(&mut self, player: PlayerId, timed_out: bool) -> Transition {
        if let Err(rejection) = self.check_turn(player) {
            return self.reject(rejection);
        }

        let ends = self.state.ends();
        let has_move = has_legal_move(self.state.players[player].hand.tiles(), ends);
        if has_move && !timed_out && self.config.strict_pass {
            return self.reject(Rejection::PassWithLegalMove);
        }

        let reason = match (timed_out, has_move) {
            (true, _) => PassReason::Timeout,
            (false, true) => PassReason::Voluntary,
            (false, false) => PassReason::NoMove,
        };
        self.state.record(player, Action::Pass { reason });

        if !has_move
            && self
                .state
                .players
                .values()
                .all(|p| !has_legal_move(p.hand.tiles(), ends))
        {
            return self.resolve_block();
        }

        debug!(%player, ?reason, "turn passed");
        self.advance_turn();
        let transition = Transition::applied(GameEvent::Passed { player, reason });
        self.with_turn_effects(transition)
    }

    fn resolve_block(&mut self) -> Transition {
        for (_, p) in self.state.players.iter_mut() {
            p.score = p.hand.pip_sum();
        }
        let winner = lowest_score(&self.state.players);

        self.state.status = GameStatus::Ended;
        self.state.winner = Some(winner);
        self.state.is_blocked = true;
        info!(
            %winner,
            scores = ?self.state.players.values().map(|p| p.score).collect::<Vec<_>>(),
            "round blocked"
        );

        Transition::applied(GameEvent::Blocked { winner }).with_effect(Effect::StopTimer)
    }

    fn advance_turn(&mut self) {
        let next = self.state.current_player.next();
        self.state.turn_number += 1;
        self.state.begin_turn(next, self.config.turn_seconds);
    }

    /// Attach the effects every new turn needs: a fresh countdown, and a
    /// scheduled move when the seat on turn is a computer.
    fn with_turn_effects(&self, transition: Transition) -> Transition {
        let epoch = self.state.turn_epoch;
        let current = self.state.current();
        let transition = transition.with_effect(Effect::RestartTimer { epoch });
        if current.is_human {
            transition
        } else {
            transition.with_effect(Effect::ScheduleComputerMove {
                player: current.id,
                epoch,
                delay_ms: self.config.computer_delay_ms,
            })
        }
    }
}

/// Who opens, and with what.
///
/// Scans seats in order and each hand in dealt order for the highest double;
/// the first holder found wins ties. Without any double, seat 0 opens with
/// its first tile.
fn opening_move(hands: &PlayerMap<Hand>) -> Option<(PlayerId, Tile)> {
    let best = hands
        .iter()
        .filter_map(|(id, hand)| hand.highest_double().map(|t| (id, t)))
        .fold(None, |best: Option<(PlayerId, Tile)>, (id, t)| match best {
            Some((_, b)) if b.left >= t.left => best,
            _ => Some((id, t)),
        });

    best.or_else(|| {
        let seat = PlayerId::new(0);
        hands[seat].tiles().first().map(|&t| (seat, t))
    })
}

/// Seat with the lowest score; the earliest seat wins ties.
fn lowest_score(players: &PlayerMap<Player>) -> PlayerId {
    players
        .iter()
        .fold(None, |best: Option<(PlayerId, u32)>, (id, p)| match best {
            Some((_, s)) if s <= p.score => best,
            _ => Some((id, p.score)),
        })
        .map_or(PlayerId::new(0), |(id, _)| id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hands(seats: [&[(u8, u8)]; 4]) -> PlayerMap<Hand> {
        PlayerMap::new(|id| {
            seats[id.index()]
                .iter()
                .map(|&(a, b)| Tile::new(a, b))
                .collect()
        })
    }

    #[test]
    fn test_opening_highest_double() {
        let h = hands([&[(0, 1), (1, 1)], &[(2, 2), (0, 3)], &[(3, 3)], &[(0, 0)]]);
        assert_eq!(opening_move(&h), Some((PlayerId::new(2), Tile::new(3, 3))));
    }

    #[test]
    fn test_opening_without_doubles() {
        let h = hands([&[(0, 1), (1, 2)], &[(0, 3)], &[(2, 3)], &[(1, 3)]]);
        assert_eq!(opening_move(&h), Some((PlayerId::new(0), Tile::new(0, 1))));
    }

    #[test]
    fn test_opening_nothing_dealt() {
        let h = hands([&[], &[], &[], &[]]);
        assert_eq!(opening_move(&h), None);
    }

    #[test]
    fn test_lowest_score_ties_go_to_earliest() {
        let mut players = PlayerMap::new(|id| Player::new(id, "p", id.index() == 0, 10));
        for (id, p) in players.iter_mut() {
            p.score = [9, 4, 7, 4][id.index()];
        }
        assert_eq!(lowest_score(&players), PlayerId::new(1));
    }

    #[test]
    fn test_start_game() {
        let mut engine = GameEngine::new(GameConfig::default().with_seed(42)).unwrap();
        let t = engine.start_game();

        let Some(GameEvent::Started { starter, opening }) = t.outcome.event() else {
            panic!("expected start, got {:?}", t.outcome);
        };
        let state = engine.state();
        assert_eq!(state.status, GameStatus::Playing);
        assert_eq!(state.current_player, starter);
        assert!(opening.is_double());
        assert_eq!(state.ends(), Some(crate::tiles::OpenEnds::new(opening.left, opening.right)));
        assert_eq!(state.turn_number, 1);
        assert_eq!(state.history.len(), 1);
        assert_eq!(state.check_invariants(engine.config().deck), Ok(()));
        assert!(t.effects.contains(&Effect::RestartTimer {
            epoch: state.turn_epoch
        }));
    }

    #[test]
    fn test_start_twice_rejected() {
        let mut engine = GameEngine::new(GameConfig::default().with_seed(1)).unwrap();
        assert!(engine.start_game().outcome.is_applied());
        let before = engine.snapshot();
        let t = engine.start_game();
        assert_eq!(t.outcome.rejection(), Some(Rejection::GameNotWaiting));
        assert_eq!(engine.snapshot(), before);
    }

    #[test]
    fn test_invalid_config_refused() {
        let config = GameConfig::default().with_turn_seconds(0);
        assert!(GameEngine::new(config).is_err());
    }

    #[test]
    fn test_result_only_when_ended() {
        let mut engine = GameEngine::new(GameConfig::default().with_seed(3)).unwrap();
        assert_eq!(engine.result(), None);
        engine.start_game();
        assert_eq!(engine.result(), None);
    }
}
