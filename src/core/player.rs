//! Player identification, per-seat data, and per-player storage.
//!
//! ## PlayerId
//!
//! Type-safe seat index. A Gaple table always seats four players, so ids
//! run `0..PLAYER_COUNT` and turn order is the id order, wrapping around.
//!
//! ## PlayerMap
//!
//! Per-player storage backed by a `Vec`, indexable by `PlayerId`.
//!
//! ## Player
//!
//! Everything the table shows about one seat: name, hand, score, whether
//! the seat is human, whether it is on turn, and its countdown.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

use crate::tiles::Hand;

/// Number of seats at the table.
pub const PLAYER_COUNT: usize = 4;

/// Seat identifier.
///
/// Seat indices are 0-based: the first seat is `PlayerId(0)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw seat index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The seat that plays after this one.
    ///
    /// ```
    /// use gaple::core::PlayerId;
    ///
    /// assert_eq!(PlayerId::new(0).next(), PlayerId::new(1));
    /// assert_eq!(PlayerId::new(3).next(), PlayerId::new(0));
    /// ```
    #[must_use]
    pub const fn next(self) -> Self {
        Self(((self.0 as usize + 1) % PLAYER_COUNT) as u8)
    }

    /// Iterate over every seat in turn order.
    pub fn all() -> impl Iterator<Item = PlayerId> {
        (0..PLAYER_COUNT as u8).map(PlayerId)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// Per-player data storage with O(1) access.
///
/// Always holds exactly one entry per seat.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: Vec<T>,
}

impl<T> PlayerMap<T> {
    /// Create a new PlayerMap with values from a factory function.
    pub fn new(factory: impl Fn(PlayerId) -> T) -> Self {
        Self {
            data: PlayerId::all().map(factory).collect(),
        }
    }

    /// Get a reference to a player's data.
    #[must_use]
    pub fn get(&self, player: PlayerId) -> &T {
        &self.data[player.index()]
    }

    /// Get a mutable reference to a player's data.
    pub fn get_mut(&mut self, player: PlayerId) -> &mut T {
        &mut self.data[player.index()]
    }

    /// Iterate over (PlayerId, &T) pairs in turn order.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        self.data
            .iter()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
    }

    /// Iterate over (PlayerId, &mut T) pairs in turn order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (PlayerId, &mut T)> {
        self.data
            .iter_mut()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
    }

    /// Iterate over the values in turn order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        self.get(player)
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        self.get_mut(player)
    }
}

/// One seat at the table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Stable seat id.
    pub id: PlayerId,

    /// Display name.
    pub name: String,

    /// Tiles still held, in dealt order.
    pub hand: Hand,

    /// Pip-sum of the remaining hand, filled in when a round ends blocked.
    pub score: u32,

    /// Exactly one seat per game is human.
    pub is_human: bool,

    /// True for the seat on turn while the game is playing.
    pub is_current_turn: bool,

    /// Seconds left on this seat's countdown.
    pub time_left: u32,
}

impl Player {
    /// Create an empty-handed seat.
    #[must_use]
    pub fn new(id: PlayerId, name: impl Into<String>, is_human: bool, time_left: u32) -> Self {
        Self {
            id,
            name: name.into(),
            hand: Hand::new(),
            score: 0,
            is_human,
            is_current_turn: false,
            time_left,
        }
    }
}
