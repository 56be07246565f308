//! Game results and the win policy trait.
//!
//! The session engine fixes tile accounting and the draw/discard/peel
//! mechanics. When a game ends is left to a `WinPolicy`: the session asks
//! its policy after every action that ran the pool short, and finishes the
//! game as soon as the policy returns a result.

use serde::{Deserialize, Serialize};

use crate::core::action::PlayerAction;
use crate::core::player::{PlayerId, PlayerMap};
use crate::zones::PlayerHand;

/// Result of a completed game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameResult {
    /// Single winner.
    Winner(PlayerId),
    /// Draw (no winner).
    Draw,
    /// Multiple winners sharing the victory.
    Winners(Vec<PlayerId>),
}

impl GameResult {
    /// Check if a player won.
    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        match self {
            GameResult::Winner(p) => *p == player,
            GameResult::Winners(ps) => ps.contains(&player),
            GameResult::Draw => false,
        }
    }

    /// Build a result from a list of winning seats.
    #[must_use]
    pub fn from_winners(mut winners: Vec<PlayerId>) -> Self {
        match winners.len() {
            0 => GameResult::Draw,
            1 => GameResult::Winner(winners[0]),
            _ => {
                winners.sort_unstable();
                GameResult::Winners(winners)
            }
        }
    }
}

/// Whether participants take turns or act freely.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnMode {
    /// Only the seat at the turn pointer may draw or discard.
    TurnBased,
    /// Everyone acts whenever they like; peels are allowed.
    Simultaneous,
}

/// What a win policy gets to look at.
#[derive(Clone, Copy, Debug)]
pub struct WinCheck<'a> {
    /// The seat whose action ran the pool short.
    pub actor: PlayerId,

    /// That action.
    pub action: PlayerAction,

    /// Tiles left in the pool.
    pub remaining: usize,

    /// Every hand at the table.
    pub hands: &'a PlayerMap<PlayerHand>,
}

/// Decides whether a game is over.
///
/// Policies are consulted only after an action the pool could not fully
/// cover. Returning `None` keeps the game going.
pub trait WinPolicy: std::fmt::Debug + Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Decide the game, or `None` to continue.
    fn decide(&self, check: &WinCheck<'_>) -> Option<GameResult>;
}
