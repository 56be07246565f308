//! Game styles and their stock win policies.
//!
//! | style    | turn mode      | win policy        |
//! |----------|----------------|-------------------|
//! | `rush`   | simultaneous   | `LastPeelWins`    |
//! | `single` | turn-based     | `FewestTilesWins` |
//!
//! Both styles share the same pool, hands and actions; the style only
//! picks who may act when, and when the game is over.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::engine::{GameResult, TurnMode, WinCheck, WinPolicy};
use crate::core::PlayerAction;

/// The closed set of supported game styles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStyle {
    /// Everyone plays at once and calls peels.
    #[default]
    Rush,
    /// Participants take turns drawing and discarding.
    Single,
}

impl GameStyle {
    /// Turn mode of this style.
    #[must_use]
    pub const fn turn_mode(self) -> TurnMode {
        match self {
            Self::Rush => TurnMode::Simultaneous,
            Self::Single => TurnMode::TurnBased,
        }
    }

    /// Win policy used when a session does not supply its own.
    #[must_use]
    pub fn default_policy(self) -> Arc<dyn WinPolicy> {
        match self {
            Self::Rush => Arc::new(LastPeelWins),
            Self::Single => Arc::new(FewestTilesWins),
        }
    }
}

impl std::fmt::Display for GameStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rush => write!(f, "rush"),
            Self::Single => write!(f, "single"),
        }
    }
}

/// The participant whose peel the pool cannot honour wins.
///
/// Shortfalls on plain draws and discards do not end the game.
#[derive(Clone, Copy, Debug, Default)]
pub struct LastPeelWins;

impl WinPolicy for LastPeelWins {
    fn name(&self) -> &'static str {
        "last_peel_wins"
    }

    fn decide(&self, check: &WinCheck<'_>) -> Option<GameResult> {
        match check.action {
            PlayerAction::Peel { .. } => Some(GameResult::Winner(check.actor)),
            _ => None,
        }
    }
}

/// Once the pool runs dry, the fewest tiles in hand wins. Ties share the win.
#[derive(Clone, Copy, Debug, Default)]
pub struct FewestTilesWins;

impl WinPolicy for FewestTilesWins {
    fn name(&self) -> &'static str {
        "fewest_tiles_wins"
    }

    fn decide(&self, check: &WinCheck<'_>) -> Option<GameResult> {
        if check.remaining > 0 {
            return None;
        }

        let fewest = check.hands.values().map(|h| h.len()).min()?;
        let winners = check
            .hands
            .iter()
            .filter(|(_, hand)| hand.len() == fewest)
            .map(|(seat, _)| seat)
            .collect();

        Some(GameResult::from_winners(winners))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{PlayerId, PlayerMap, TileId};
    use crate::tiles::Tile;
    use crate::zones::PlayerHand;

    fn hands(sizes: &[usize]) -> PlayerMap<PlayerHand> {
        PlayerMap::new(sizes.len(), |seat| {
            let base = seat.index() as u32 * 100;
            let mut hand = PlayerHand::new();
            hand.add((0..sizes[seat.index()] as u32).map(|i| Tile::new(TileId(base + i), 'A')));
            hand
        })
    }

    #[test]
    fn test_style_modes() {
        assert_eq!(GameStyle::Rush.turn_mode(), TurnMode::Simultaneous);
        assert_eq!(GameStyle::Single.turn_mode(), TurnMode::TurnBased);
        assert_eq!(GameStyle::default(), GameStyle::Rush);
        assert_eq!(GameStyle::Single.default_policy().name(), "fewest_tiles_wins");
    }

    #[test]
    fn test_style_serde() {
        assert_eq!(serde_json::to_string(&GameStyle::Single).unwrap(), r#""single""#);
        let style: GameStyle = serde_json::from_str(r#""rush""#).unwrap();
        assert_eq!(style, GameStyle::Rush);
        assert!(serde_json::from_str::<GameStyle>(r#""blitz""#).is_err());
    }

    #[test]
    fn test_last_peel_wins() {
        let hands = hands(&[3, 4]);
        let peel = WinCheck {
            actor: PlayerId::new(1),
            action: PlayerAction::Peel { draw_id: 2 },
            remaining: 1,
            hands: &hands,
        };
        assert_eq!(LastPeelWins.decide(&peel), Some(GameResult::Winner(PlayerId::new(1))));

        let draw = WinCheck {
            action: PlayerAction::Draw,
            remaining: 0,
            ..peel
        };
        assert_eq!(LastPeelWins.decide(&draw), None);
    }

    #[test]
    fn test_fewest_tiles_wins() {
        let hands = hands(&[6, 4, 5]);
        let check = WinCheck {
            actor: PlayerId::new(0),
            action: PlayerAction::Draw,
            remaining: 0,
            hands: &hands,
        };
        assert_eq!(FewestTilesWins.decide(&check), Some(GameResult::Winner(PlayerId::new(1))));
        assert_eq!(FewestTilesWins.decide(&WinCheck { remaining: 2, ..check }), None);
    }

    #[test]
    fn test_fewest_tiles_tie_shares_win() {
        let hands = hands(&[4, 7, 4]);
        let check = WinCheck {
            actor: PlayerId::new(1),
            action: PlayerAction::Draw,
            remaining: 0,
            hands: &hands,
        };
        assert_eq!(
            FewestTilesWins.decide(&check),
            Some(GameResult::Winners(vec![PlayerId::new(0), PlayerId::new(2)]))
        );
    }
}
