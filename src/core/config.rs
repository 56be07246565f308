//! Game configuration.
//!
//! A `GameConfiguration` arrives with the creation request and may be
//! replaced while the game is pending. It is frozen once the game starts.
//! Every field is optional on the wire; omitted fields take the defaults
//! below.
//!
//! | field              | default    | allowed        |
//! |--------------------|------------|----------------|
//! | `num_players`      | 4          | 1 to 50        |
//! | `num_tiles`        | 75         | 1 to 300       |
//! | `tiles_per_player` | false      |                |
//! | `start_size`       | 12         | 0 to 25        |
//! | `draw_size`        | 1          | 1 to 10        |
//! | `discard_penalty`  | 3          | 0 to 5         |
//! | `frequency`        | `standard` | see `Frequency`|
//!
//! On top of the per-field ranges, the derived pool must cover the opening
//! deal plus one full draw round, and must not last more than
//! [`MAX_DRAW_ROUNDS`] rounds.
//!
//! ```
//! use tile_rush::core::GameConfiguration;
//!
//! let config: GameConfiguration = serde_json::from_str("{}").unwrap();
//! assert_eq!(config, GameConfiguration::default());
//! assert!(config.validate().is_ok());
//! assert_eq!(config.total_tiles(), 75);
//! ```

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use super::player::MAX_PLAYERS;
use crate::error::{EngineError, Result};
use crate::tiles::Frequency;

/// Longest game, in draw rounds, a configuration may describe.
pub const MAX_DRAW_ROUNDS: usize = 200;

const NUM_PLAYERS: RangeInclusive<u32> = 1..=MAX_PLAYERS as u32;
const NUM_TILES: RangeInclusive<u32> = 1..=300;
const START_SIZE: RangeInclusive<u32> = 0..=25;
const DRAW_SIZE: RangeInclusive<u32> = 1..=10;
const DISCARD_PENALTY: RangeInclusive<u32> = 0..=5;

/// Rule parameters for one game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfiguration {
    /// Seats at the table.
    pub num_players: u32,

    /// Pool size, either in total or per player (see `tiles_per_player`).
    pub num_tiles: u32,

    /// Interpret `num_tiles` per player instead of in total.
    pub tiles_per_player: bool,

    /// Tiles dealt to every hand when the game starts.
    pub start_size: u32,

    /// Tiles moved into a hand by a draw (and to every hand by a peel).
    pub draw_size: u32,

    /// Extra tiles drawn on top of the replacement when discarding.
    pub discard_penalty: u32,

    /// Letter distribution of the pool.
    pub frequency: Frequency,
}

impl Default for GameConfiguration {
    fn default() -> Self {
        Self {
            num_players: 4,
            num_tiles: 75,
            tiles_per_player: false,
            start_size: 12,
            draw_size: 1,
            discard_penalty: 3,
            frequency: Frequency::Standard,
        }
    }
}

impl GameConfiguration {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_players(mut self, players: u32) -> Self {
        self.num_players = players;
        self
    }

    #[must_use]
    pub fn with_tiles(mut self, tiles: u32) -> Self {
        self.num_tiles = tiles;
        self
    }

    #[must_use]
    pub fn with_tiles_per_player(mut self, per_player: bool) -> Self {
        self.tiles_per_player = per_player;
        self
    }

    #[must_use]
    pub fn with_start_size(mut self, size: u32) -> Self {
        self.start_size = size;
        self
    }

    #[must_use]
    pub fn with_draw_size(mut self, size: u32) -> Self {
        self.draw_size = size;
        self
    }

    #[must_use]
    pub fn with_discard_penalty(mut self, penalty: u32) -> Self {
        self.discard_penalty = penalty;
        self
    }

    #[must_use]
    pub fn with_frequency(mut self, frequency: Frequency) -> Self {
        self.frequency = frequency;
        self
    }

    /// Number of seats as a `usize`.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.num_players as usize
    }

    /// Total number of tiles in the pool, after `tiles_per_player`.
    #[must_use]
    pub fn total_tiles(&self) -> usize {
        let tiles = self.num_tiles as usize;
        if self.tiles_per_player {
            tiles * self.player_count()
        } else {
            tiles
        }
    }

    /// Tiles that leave the pool when the game starts.
    #[must_use]
    pub fn opening_deal(&self) -> usize {
        self.start_size as usize * self.player_count()
    }

    /// Tiles one peel round moves out of the pool.
    #[must_use]
    pub fn round_size(&self) -> usize {
        self.draw_size as usize * self.player_count()
    }

    /// Tiles a discard draws back into the hand.
    #[must_use]
    pub fn discard_draw(&self) -> usize {
        self.discard_penalty as usize + 1
    }

    /// Check every field and the derived pool size.
    pub fn validate(&self) -> Result<()> {
        check_range("num_players", self.num_players, NUM_PLAYERS)?;
        check_range("num_tiles", self.num_tiles, NUM_TILES)?;
        check_range("start_size", self.start_size, START_SIZE)?;
        check_range("draw_size", self.draw_size, DRAW_SIZE)?;
        check_range("discard_penalty", self.discard_penalty, DISCARD_PENALTY)?;
        self.frequency.weights()?;

        let total = self.total_tiles();
        let deal = self.opening_deal();
        let round = self.round_size();
        let rounds = total.saturating_sub(deal) / round;

        if total < deal + round || rounds > MAX_DRAW_ROUNDS {
            let scope = if self.tiles_per_player { "per player" } else { "total" };
            return Err(EngineError::configuration(
                "num_tiles",
                format!("{} {}", self.num_tiles, scope),
                format!("enough for the opening deal and 1 to {MAX_DRAW_ROUNDS} draw rounds"),
            ));
        }

        Ok(())
    }
}

fn check_range(parameter: &'static str, value: u32, allowed: RangeInclusive<u32>) -> Result<()> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(EngineError::configuration(
            parameter,
            value,
            format!("{} to {}", allowed.start(), allowed.end()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario() -> GameConfiguration {
        GameConfiguration::new()
            .with_players(2)
            .with_tiles(20)
            .with_start_size(5)
            .with_draw_size(1)
            .with_discard_penalty(3)
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = GameConfiguration::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.opening_deal(), 48);
        assert_eq!(config.round_size(), 4);
        assert_eq!(config.discard_draw(), 4);
    }

    #[test]
    fn test_scenario_config() {
        let config = scenario();
        assert!(config.validate().is_ok());
        assert_eq!(config.total_tiles(), 20);
        assert_eq!(config.opening_deal(), 10);
    }

    #[test]
    fn test_tiles_per_player() {
        let config = scenario().with_tiles_per_player(true);
        assert_eq!(config.total_tiles(), 40);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_field_ranges() {
        let err = scenario().with_players(0).validate().unwrap_err();
        assert!(matches!(err, EngineError::Configuration { parameter: "num_players", .. }));

        let err = scenario().with_draw_size(0).validate().unwrap_err();
        assert!(matches!(err, EngineError::Configuration { parameter: "draw_size", .. }));

        let err = scenario().with_discard_penalty(6).validate().unwrap_err();
        assert!(matches!(err, EngineError::Configuration { parameter: "discard_penalty", .. }));

        let err = scenario().with_tiles(0).validate().unwrap_err();
        assert!(matches!(err, EngineError::Configuration { parameter: "num_tiles", .. }));
    }

    #[test]
    fn test_pool_must_cover_deal_and_one_round() {
        // 2 × (5 + 1) = 12 tiles needed.
        assert!(scenario().with_tiles(12).validate().is_ok());
        let err = scenario().with_tiles(11).validate().unwrap_err();
        assert!(err.to_string().contains("draw rounds"));
    }

    #[test]
    fn test_pool_round_limit() {
        let config = GameConfiguration::new()
            .with_players(1)
            .with_tiles(300)
            .with_start_size(0)
            .with_draw_size(1);
        assert!(config.validate().is_err());
        assert!(config.with_draw_size(2).validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: GameConfiguration =
            serde_json::from_str(r#"{"num_players": 2, "frequency": "scrabble"}"#).unwrap();

        assert_eq!(config.num_players, 2);
        assert_eq!(config.num_tiles, 75);
        assert_eq!(config.frequency, Frequency::Scrabble);
    }

    #[test]
    fn test_round_trip_field_names() {
        let json = serde_json::to_value(scenario()).unwrap();
        for key in [
            "num_players",
            "num_tiles",
            "tiles_per_player",
            "start_size",
            "draw_size",
            "discard_penalty",
            "frequency",
        ] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
    }
}
