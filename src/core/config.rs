//! Table configuration.
//!
//! `GameConfig` fixes everything about a table that does not change during
//! play: the tile set, the seats, and the timing the driver uses. Defaults
//! reproduce the standard table: 22 tiles (0-0 to 3-6), a human in seat 0
//! facing three computers, ten-second turns, and a 1.5 s computer delay.
//!
//! Configs can be built in code with the `with_*` methods or loaded from
//! TOML; every field is optional in TOML and falls back to the default.
//!
//! ```
//! use gaple::core::GameConfig;
//!
//! let config = GameConfig::from_toml_str("turn_seconds = 5\nseed = 7").unwrap();
//! assert_eq!(config.turn_seconds, 5);
//! assert_eq!(config.seed, Some(7));
//! assert_eq!(config.computer_delay_ms, 1500);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use super::player::{PlayerId, PLAYER_COUNT};
use crate::tiles::DeckRange;

/// Complete table configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Faces the tile set is generated from.
    pub deck: DeckRange,

    /// Display names, one per seat in turn order.
    pub player_names: Vec<String>,

    /// The one seat driven by a person.
    pub human_seat: PlayerId,

    /// Countdown length for every turn, in seconds.
    pub turn_seconds: u32,

    /// Delay before a computer seat acts, in milliseconds.
    pub computer_delay_ms: u64,

    /// Delay between a restart and the new deal, in milliseconds.
    pub restart_delay_ms: u64,

    /// Real time per countdown step, in milliseconds.
    pub tick_interval_ms: u64,

    /// Refuse a voluntary pass while the player holds a legal move.
    ///
    /// Off by default: a pass is always honored. Timeouts pass regardless.
    pub strict_pass: bool,

    /// Shuffle seed. `None` draws one from process entropy per table.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            deck: DeckRange::default(),
            player_names: vec![
                "You".to_string(),
                "AI 1".to_string(),
                "AI 2".to_string(),
                "AI 3".to_string(),
            ],
            human_seat: PlayerId::new(0),
            turn_seconds: 10,
            computer_delay_ms: 1500,
            restart_delay_ms: 500,
            tick_interval_ms: 1000,
            strict_pass: false,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Use a different tile set.
    #[must_use]
    pub fn with_deck(mut self, deck: DeckRange) -> Self {
        self.deck = deck;
        self
    }

    /// Seat the human somewhere other than seat 0.
    #[must_use]
    pub fn with_human_seat(mut self, seat: PlayerId) -> Self {
        self.human_seat = seat;
        self
    }

    /// Set the per-turn countdown.
    #[must_use]
    pub fn with_turn_seconds(mut self, seconds: u32) -> Self {
        self.turn_seconds = seconds;
        self
    }

    /// Set the computer move delay.
    #[must_use]
    pub fn with_computer_delay_ms(mut self, ms: u64) -> Self {
        self.computer_delay_ms = ms;
        self
    }

    /// Refuse voluntary passes while a legal move exists.
    #[must_use]
    pub fn with_strict_pass(mut self, strict: bool) -> Self {
        self.strict_pass = strict;
        self
    }

    /// Fix the shuffle seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Display name of a seat.
    #[must_use]
    pub fn player_name(&self, player: PlayerId) -> &str {
        self.player_names
            .get(player.index())
            .map_or("", String::as_str)
    }

    /// Check that the table can be run with these values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.deck.is_valid() {
            return Err(ConfigError::invalid(
                "deck",
                format!(
                    "max_left ({}) must not exceed max_right ({}), which must be at most {}",
                    self.deck.max_left,
                    self.deck.max_right,
                    crate::tiles::MAX_PIP
                ),
            ));
        }
        // The opener must keep at least one tile after opening.
        if self.deck.tile_count() < 2 * PLAYER_COUNT {
            return Err(ConfigError::invalid(
                "deck",
                format!("needs at least {} tiles", 2 * PLAYER_COUNT),
            ));
        }
        if self.player_names.len() != PLAYER_COUNT {
            return Err(ConfigError::invalid(
                "player_names",
                format!("expected {PLAYER_COUNT} names, got {}", self.player_names.len()),
            ));
        }
        if self.human_seat.index() >= PLAYER_COUNT {
            return Err(ConfigError::invalid(
                "human_seat",
                format!("seat {} does not exist", self.human_seat.0),
            ));
        }
        if self.turn_seconds == 0 {
            return Err(ConfigError::invalid("turn_seconds", "must be positive"));
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::invalid("tick_interval_ms", "must be positive"));
        }
        Ok(())
    }

    /// Parse and validate a TOML config.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML config file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}
