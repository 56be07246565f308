//! A participant's hand.
//!
//! Hands are private: the public table only ever shows their size and the
//! counters kept here.

use serde::{Deserialize, Serialize};

use crate::core::TileId;
use crate::tiles::Tile;

/// Tiles held by one participant, plus public activity counters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerHand {
    tiles: Vec<Tile>,

    /// Draw actions taken.
    pub draws: u32,

    /// Discard actions taken.
    pub discards: u32,

    /// Peels called.
    pub peels: u32,
}

impl PlayerHand {
    /// Create an empty hand.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tiles held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Tiles held, in the order they arrived.
    #[must_use]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Check whether the hand holds a tile.
    ///
    /// This is the affordability check for a discard.
    #[must_use]
    pub fn contains(&self, id: TileId) -> bool {
        self.tiles.iter().any(|t| t.id == id)
    }

    /// Add tiles to the hand.
    pub fn add(&mut self, tiles: impl IntoIterator<Item = Tile>) {
        self.tiles.extend(tiles);
    }

    /// Remove a tile from the hand.
    ///
    /// Returns the tile, or `None` if it was not held.
    pub fn remove(&mut self, id: TileId) -> Option<Tile> {
        let pos = self.tiles.iter().position(|t| t.id == id)?;
        Some(self.tiles.remove(pos))
    }

    /// The held letters, sorted.
    ///
    /// ```
    /// use tile_rush::core::TileId;
    /// use tile_rush::tiles::Tile;
    /// use tile_rush::zones::PlayerHand;
    ///
    /// let mut hand = PlayerHand::new();
    /// hand.add([Tile::new(TileId(0), 'T'), Tile::new(TileId(1), 'A')]);
    /// assert_eq!(hand.letters(), "AT");
    /// ```
    #[must_use]
    pub fn letters(&self) -> String {
        let mut letters: Vec<char> = self.tiles.iter().map(|t| t.letter).collect();
        letters.sort_unstable();
        letters.into_iter().collect()
    }
}
