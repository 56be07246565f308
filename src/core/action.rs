//! Player actions and the history records they leave behind.
//!
//! There are three verbs:
//! - `Draw`: take `draw_size` tiles from the pool
//! - `Discard`: trade one tile from the hand for `discard_penalty + 1` new ones
//! - `Peel`: every participant draws `draw_size`; only in simultaneous play
//!
//! Every applied action is appended to the session history as an
//! `ActionRecord`, including the ids of the tiles that moved.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::ids::TileId;
use super::player::PlayerId;

/// An action a participant asks the session to apply.
///
/// ## Example
///
/// ```
/// use tile_rush::core::{PlayerAction, TileId};
///
/// let action: PlayerAction = serde_json::from_str(r#"{"type":"discard","tile":4}"#).unwrap();
/// assert_eq!(action, PlayerAction::Discard { tile: TileId(4) });
/// assert_eq!(action.name(), "discard");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PlayerAction {
    /// Draw `draw_size` tiles into the actor's hand.
    Draw,

    /// Return `tile` to the pool and draw `discard_penalty + 1` tiles.
    Discard { tile: TileId },

    /// Deal `draw_size` tiles to every participant.
    ///
    /// `draw_id` must echo the session's current peel counter.
    Peel { draw_id: u32 },
}

impl PlayerAction {
    /// Lower-case verb, used in logs and error messages.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Draw => "draw",
            Self::Discard { .. } => "discard",
            Self::Peel { .. } => "peel",
        }
    }

    /// Whether this action only makes sense for simultaneous play.
    #[must_use]
    pub const fn is_peel(&self) -> bool {
        matches!(self, Self::Peel { .. })
    }
}

impl std::fmt::Display for PlayerAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Draw => write!(f, "draw"),
            Self::Discard { tile } => write!(f, "discard {tile}"),
            Self::Peel { draw_id } => write!(f, "peel #{draw_id}"),
        }
    }
}

/// An applied action with the tiles it moved.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// Position in the session history (starts at 0).
    pub sequence: u32,

    /// The seat that acted.
    pub player: PlayerId,

    /// The action applied.
    pub action: PlayerAction,

    /// Tiles that entered the actor's hand.
    /// A peel records only the actor's share.
    pub drawn: SmallVec<[TileId; 4]>,

    /// The pool could not cover the request.
    pub shortfall: bool,
}

impl ActionRecord {
    /// Create a new action record.
    #[must_use]
    pub fn new(sequence: u32, player: PlayerId, action: PlayerAction, drawn: &[TileId]) -> Self {
        Self {
            sequence,
            player,
            action,
            drawn: SmallVec::from_slice(drawn),
            shortfall: false,
        }
    }

    /// Mark the record as having hit a pool shortfall.
    #[must_use]
    pub fn with_shortfall(mut self, shortfall: bool) -> Self {
        self.shortfall = shortfall;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_names() {
        assert_eq!(PlayerAction::Draw.name(), "draw");
        assert_eq!(PlayerAction::Discard { tile: TileId(1) }.name(), "discard");
        assert_eq!(PlayerAction::Peel { draw_id: 0 }.name(), "peel");
        assert!(PlayerAction::Peel { draw_id: 3 }.is_peel());
        assert!(!PlayerAction::Draw.is_peel());
    }

    #[test]
    fn test_action_display() {
        assert_eq!(PlayerAction::Discard { tile: TileId(9) }.to_string(), "discard Tile(9)");
        assert_eq!(PlayerAction::Peel { draw_id: 2 }.to_string(), "peel #2");
    }

    #[test]
    fn test_action_wire_format() {
        let json = serde_json::to_string(&PlayerAction::Draw).unwrap();
        assert_eq!(json, r#"{"type":"draw"}"#);

        let peel: PlayerAction = serde_json::from_str(r#"{"type":"peel","draw_id":5}"#).unwrap();
        assert_eq!(peel, PlayerAction::Peel { draw_id: 5 });
    }

    #[test]
    fn test_action_record() {
        let record = ActionRecord::new(
            3,
            PlayerId::new(1),
            PlayerAction::Draw,
            &[TileId(5), TileId(8)],
        );

        assert_eq!(record.sequence, 3);
        assert_eq!(record.player, PlayerId::new(1));
        assert_eq!(record.drawn.as_slice(), &[TileId(5), TileId(8)]);
        assert!(!record.shortfall);
        assert!(record.with_shortfall(true).shortfall);
    }

    #[test]
    fn test_action_record_serialization() {
        let record = ActionRecord::new(0, PlayerId::new(0), PlayerAction::Discard { tile: TileId(2) }, &[TileId(7)]);
        let json = serde_json::to_string(&record).unwrap();
        let back: ActionRecord = serde_json::from_str(&json).unwrap();

        assert_eq!(record, back);
    }
}
