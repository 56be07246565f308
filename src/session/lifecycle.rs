//! Session lifecycle states.
//!
//! ```text
//! pending ──start──▶ active ──win policy──▶ finished
//!    │                  │
//!    └────abandon───────┴──────────────────▶ abandoned
//! ```

use serde::{Deserialize, Serialize};

/// Coarse state of a game session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lifecycle {
    /// Gathering participants; configuration may still change.
    #[default]
    Pending,
    /// Pool minted, hands dealt, actions accepted.
    Active,
    /// A win policy decided the game.
    Finished,
    /// Cancelled before a result.
    Abandoned,
}

impl Lifecycle {
    /// True for `finished` and `abandoned`. Terminal sessions never change.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Finished | Self::Abandoned)
    }

    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }
}

impl std::fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Active => write!(f, "active"),
            Self::Finished => write!(f, "finished"),
            Self::Abandoned => write!(f, "abandoned"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(!Lifecycle::Pending.is_terminal());
        assert!(!Lifecycle::Active.is_terminal());
        assert!(Lifecycle::Finished.is_terminal());
        assert!(Lifecycle::Abandoned.is_terminal());
        assert!(Lifecycle::Active.is_active());
    }

    #[test]
    fn test_wire_names_match_display() {
        for state in [
            Lifecycle::Pending,
            Lifecycle::Active,
            Lifecycle::Finished,
            Lifecycle::Abandoned,
        ] {
            let json = serde_json::to_string(&state).unwrap();
            assert_eq!(json, format!("\"{state}\""));
        }
    }
}
