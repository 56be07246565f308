//! Game rules: styles, turn modes and win policies.
//!
//! Every style plays on the same substrate (one pool, one hand per seat,
//! draw/discard/peel). A style picks:
//! - the turn mode (turn-based or simultaneous)
//! - the win policy consulted when the pool runs short
//!
//! Custom policies implement `WinPolicy` and are handed to the session at
//! construction.

pub mod engine;
pub mod styles;

pub use engine::{GameResult, TurnMode, WinCheck, WinPolicy};
pub use styles::{FewestTilesWins, GameStyle, LastPeelWins};
