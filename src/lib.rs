//! # tile-rush
//!
//! Session engine for multiplayer tile-drawing word games.
//!
//! ## Design Principles
//!
//! 1. **Tiles Are Conserved**: Every minted tile is in the pool or in
//!    exactly one hand. Each mutation is checked against this, and a breach
//!    surfaces as `InvariantViolation` rather than silent corruption.
//!
//! 2. **One Lock Per Session**: Actions on a session are linearized by that
//!    session's own lock. Sessions never contend with each other, and no
//!    code path holds two session locks.
//!
//! 3. **Styles Over Forks**: `rush` and `single` share one substrate
//!    (pool, hands, draw/discard/peel) and differ only in turn mode and
//!    win policy.
//!
//! ## Architecture
//!
//! - **Deterministic RNG**: the registry forks one ChaCha stream per
//!   session, so a seeded registry replays the same games.
//!
//! - **Persistent History**: action history lives in an `im::Vector`, so
//!   snapshots are cheap.
//!
//! ## Modules
//!
//! - `core`: IDs, seats, configuration, actions, table state, RNG
//! - `tiles`: Tiles and letter frequency tables
//! - `zones`: The tile pool and player hands
//! - `rules`: Game styles, turn modes, win policies
//! - `session`: Game sessions, lifecycle, the session registry
//! - `error`: `EngineError` and its stable `ErrorKind`
//!
//! ## Example
//!
//! ```
//! use tile_rush::{CreateGame, GameConfiguration, GameStyle, RegistryConfig, SessionRegistry, UserId};
//!
//! let registry = SessionRegistry::new(RegistryConfig::default().with_seed(1));
//! let config = GameConfiguration::new().with_players(2).with_tiles(20).with_start_size(5);
//! let game = registry
//!     .create(CreateGame::new(UserId(1)).with_style(GameStyle::Single).with_config(config))
//!     .unwrap();
//!
//! registry.join(game.id, UserId(2)).unwrap();
//! let view = registry.start(game.id).unwrap();
//! assert_eq!(view.remaining(), Some(10));
//! ```

pub mod core;
pub mod error;
pub mod rules;
pub mod session;
pub mod tiles;
pub mod zones;

// Re-export commonly used types
pub use crate::core::{
    ActionRecord, GameConfiguration, GameRng, PlayerAction, PlayerId, PlayerMap, PublicTable,
    RoomId, SeatView, SessionId, TileId, UserId,
};

pub use crate::error::{EngineError, ErrorKind, Result};

pub use crate::rules::{FewestTilesWins, GameResult, GameStyle, LastPeelWins, TurnMode, WinPolicy};

pub use crate::session::{
    ActionOutcome, CreateGame, Exhaustion, GameSession, GameView, Lifecycle, RegistryConfig,
    SessionHandle, SessionRegistry,
};

pub use crate::tiles::{Frequency, Tile};

pub use crate::zones::{PlayerHand, PoolExhausted, TilePool};
