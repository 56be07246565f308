//! Public representation of a session.
//!
//! `GameView` is what creation, retrieval and every action hand back to the
//! transport layer. It is a detached snapshot: holding one never holds a
//! lock.

use serde::{Deserialize, Serialize};

use super::lifecycle::Lifecycle;
use crate::core::{GameConfiguration, PublicTable, RoomId, SessionId, UserId};
use crate::rules::GameStyle;

/// Snapshot of a session as anyone may see it.
///
/// ```json
/// {
///   "id": 1, "owner": 7, "style": "rush", "open": true,
///   "lifecycle": "active", "room": null,
///   "participants": [7, 9],
///   "config": { "num_players": 2, "...": "..." },
///   "table": { "remaining": 10, "seats": [{ "hand_size": 5, "...": "..." }] }
/// }
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameView {
    pub id: SessionId,
    pub owner: UserId,
    pub style: GameStyle,
    pub open: bool,
    pub lifecycle: Lifecycle,
    pub room: Option<RoomId>,

    /// Accounts in seat order.
    pub participants: Vec<UserId>,

    pub config: GameConfiguration,

    /// Present once the game has started.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<PublicTable>,

    /// Why the game was abandoned, if it was.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abandon_reason: Option<String>,
}

impl GameView {
    /// Tiles left in the pool, once the game has started.
    #[must_use]
    pub fn remaining(&self) -> Option<usize> {
        self.table.as_ref().map(|t| t.remaining)
    }
}
