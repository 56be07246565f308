//! Core engine types: ids, seats, configuration, actions, table state, RNG.
//!
//! These are the building blocks the session engine composes. Nothing in
//! here knows about locking or the registry.

pub mod ids;
pub mod player;
pub mod rng;
pub mod config;
pub mod action;
pub mod state;

pub use ids::{RoomId, SessionId, TileId, UserId};
pub use player::{PlayerId, PlayerMap, MAX_PLAYERS};
pub use rng::GameRng;
pub use config::{GameConfiguration, MAX_DRAW_ROUNDS};
pub use action::{ActionRecord, PlayerAction};
pub use state::{PublicTable, SeatView, TableState};
