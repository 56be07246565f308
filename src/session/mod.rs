//! Game sessions and the registry that owns them.
//!
//! ## Key Types
//!
//! - `GameSession`: one game's lifecycle, participants and table
//! - `Lifecycle`: `pending → active → finished`, or `abandoned`
//! - `GameView`: detached public snapshot of a session
//! - `SessionRegistry`: creates, finds and retires sessions
//! - `SessionHandle`: a session behind its own lock

pub mod game;
pub mod lifecycle;
pub mod registry;
pub mod view;

pub use game::{ActionOutcome, Exhaustion, GameSession};
pub use lifecycle::Lifecycle;
pub use registry::{CreateGame, RegistryConfig, SessionHandle, SessionRegistry};
pub use view::GameView;
