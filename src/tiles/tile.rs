//! Letter tiles.
//!
//! A `Tile` is minted once when a pool is initialized and never changes.
//! Moving a tile between the pool and a hand is the only thing that ever
//! happens to it.

use serde::{Deserialize, Serialize};

use crate::core::TileId;

/// A single letter tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    /// Unique ID within the session.
    pub id: TileId,

    /// Upper-case ASCII letter printed on the tile.
    pub letter: char,
}

impl Tile {
    /// Create a tile.
    #[must_use]
    pub const fn new(id: TileId, letter: char) -> Self {
        Self { id, letter }
    }
}

impl std::fmt::Display for Tile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.letter, self.id.0)
    }
}
