//! The shared tile pool of one session.
//!
//! `TilePool` owns every tile that is not in a hand. It is minted once when
//! the session starts and afterwards only shrinks (draws) and grows
//! (discards). Both directions are checked against the mint record, so the
//! pool can never hold a tile it did not mint, hold one twice, or grow past
//! its original total.
//!
//! ## Drawing
//!
//! Draws pick uniformly at random among the remaining tiles. The original
//! letter frequencies are not re-applied: once the pool is minted, every
//! remaining tile is equally likely.
//!
//! A draw asking for more than remains is not an error in the usual sense.
//! The pool hands out everything it has and reports the shortfall through
//! [`PoolExhausted`], which carries the granted tiles so the caller never
//! loses them.
//!
//! ```
//! use tile_rush::core::{GameConfiguration, GameRng};
//! use tile_rush::zones::TilePool;
//!
//! let config = GameConfiguration::new().with_players(2).with_tiles(20).with_start_size(5);
//! let mut rng = GameRng::new(7);
//! let mut pool = TilePool::initialize(&config, &mut rng).unwrap();
//!
//! let hand = pool.draw(18, &mut rng).unwrap();
//! assert_eq!(hand.len(), 18);
//!
//! let short = pool.draw(5, &mut rng).unwrap_err();
//! assert_eq!(short.requested, 5);
//! assert_eq!(short.granted.len(), 2);
//! assert_eq!(pool.remaining(), 0);
//! ```

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::error;

use crate::core::{GameConfiguration, GameRng, TileId};
use crate::error::{EngineError, Result};
use crate::tiles::Tile;

/// A draw the pool could only partly cover.
///
/// `granted` holds every tile that was left; the pool is empty afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("pool exhausted: requested {requested} tiles, {} remained", granted.len())]
pub struct PoolExhausted {
    /// Tiles asked for.
    pub requested: usize,
    /// Tiles actually removed from the pool.
    pub granted: Vec<Tile>,
}

impl PoolExhausted {
    /// Take the granted tiles.
    #[must_use]
    pub fn into_granted(self) -> Vec<Tile> {
        self.granted
    }
}

impl From<PoolExhausted> for EngineError {
    fn from(short: PoolExhausted) -> Self {
        EngineError::PoolExhausted {
            requested: short.requested,
            granted: short.granted.len(),
        }
    }
}

/// Finite supply of tiles shared by the participants of one session.
#[derive(Clone, Debug)]
pub struct TilePool {
    /// Remaining tiles, in no particular order.
    tiles: Vec<Tile>,

    /// Letter of every minted tile, indexed by `TileId`.
    minted: Vec<char>,

    /// Whether each minted tile is currently in the pool.
    present: Vec<bool>,
}

impl TilePool {
    /// Mint a pool for `config`.
    ///
    /// The pool holds `num_tiles` tiles, or `num_tiles × num_players` when
    /// `tiles_per_player` is set, with letters apportioned from the
    /// configured frequency table.
    pub fn initialize(config: &GameConfiguration, rng: &mut GameRng) -> Result<Self> {
        let total = config.total_tiles();
        let distribution = config.frequency.apportion(total)?;

        let mut letters: Vec<char> = distribution
            .iter()
            .flat_map(|&(letter, count)| std::iter::repeat(letter).take(count))
            .collect();
        rng.shuffle(&mut letters);

        let tiles = letters
            .iter()
            .enumerate()
            .map(|(i, &letter)| Tile::new(TileId(i as u32), letter))
            .collect();

        Ok(Self {
            tiles,
            present: vec![true; letters.len()],
            minted: letters,
        })
    }

    /// Number of tiles still in the pool.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.tiles.len()
    }

    /// Number of tiles minted for this pool.
    #[must_use]
    pub fn total(&self) -> usize {
        self.minted.len()
    }

    /// True when nothing is left to draw.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Check whether a tile is currently in the pool.
    #[must_use]
    pub fn contains(&self, id: TileId) -> bool {
        self.present.get(id.0 as usize).copied().unwrap_or(false)
    }

    /// Count of each letter still in the pool.
    #[must_use]
    pub fn letter_counts(&self) -> BTreeMap<char, usize> {
        let mut counts = BTreeMap::new();
        for tile in &self.tiles {
            *counts.entry(tile.letter).or_insert(0) += 1;
        }
        counts
    }

    /// Count of each letter as minted.
    #[must_use]
    pub fn minted_counts(&self) -> BTreeMap<char, usize> {
        let mut counts = BTreeMap::new();
        for &letter in &self.minted {
            *counts.entry(letter).or_insert(0) += 1;
        }
        counts
    }

    /// Remove `n` tiles chosen uniformly at random.
    ///
    /// When fewer than `n` remain, every remaining tile is removed and
    /// returned inside the error.
    pub fn draw(&mut self, n: usize, rng: &mut GameRng) -> std::result::Result<Vec<Tile>, PoolExhausted> {
        let count = n.min(self.tiles.len());
        let mut drawn = Vec::with_capacity(count);

        for _ in 0..count {
            let index = rng.gen_index(self.tiles.len());
            let tile = self.tiles.swap_remove(index);
            self.present[tile.id.0 as usize] = false;
            drawn.push(tile);
        }

        if count < n {
            Err(PoolExhausted {
                requested: n,
                granted: drawn,
            })
        } else {
            Ok(drawn)
        }
    }

    /// Put tiles back into the pool.
    ///
    /// The whole batch is checked before anything is added. A tile this
    /// pool never minted, a tile already in the pool (or listed twice), or
    /// a batch that would grow the pool past its total is an
    /// `InvariantViolation` and leaves the pool untouched.
    pub fn return_tiles(&mut self, tiles: &[Tile]) -> Result<()> {
        if self.tiles.len() + tiles.len() > self.total() {
            return Err(violation(format!(
                "returning {} tiles to a pool holding {} of {}",
                tiles.len(),
                self.tiles.len(),
                self.total()
            )));
        }

        let mut seen = Vec::with_capacity(tiles.len());
        for tile in tiles {
            match self.minted.get(tile.id.0 as usize) {
                None => return Err(violation(format!("{tile} was never minted by this pool"))),
                Some(&letter) if letter != tile.letter => {
                    return Err(violation(format!("{tile} was minted as {letter}")))
                }
                Some(_) => {}
            }
            if self.contains(tile.id) || seen.contains(&tile.id) {
                return Err(violation(format!("{tile} is already in the pool")));
            }
            seen.push(tile.id);
        }

        for tile in tiles {
            self.present[tile.id.0 as usize] = true;
            self.tiles.push(*tile);
        }
        Ok(())
    }
}

fn violation(message: String) -> EngineError {
    error!(%message, "tile pool invariant violated");
    EngineError::InvariantViolation(message)
}
