//! Places a tile can be: the shared pool or a participant's hand.
//!
//! ## Key Types
//!
//! - `TilePool`: the session's finite supply, drawn from at random
//! - `PoolExhausted`: a draw the pool could only partly cover
//! - `PlayerHand`: one participant's private tiles
//!
//! A tile is owned by exactly one zone at any moment. Moving it is the
//! session's job; the zones only check that each move is possible.

pub mod hand;
pub mod pool;

pub use hand::PlayerHand;
pub use pool::{PoolExhausted, TilePool};
