//! Tiles and the letter distributions they are minted from.
//!
//! ## Key Types
//!
//! - `Tile`: an immutable letter token with a session-unique `TileId`
//! - `Frequency`: how many of each letter a pool of a given size holds

pub mod frequency;
pub mod tile;

pub use frequency::Frequency;
pub use tile::Tile;
