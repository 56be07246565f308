//! Table state: the private in-play state and its public projection.
//!
//! ## TableState
//!
//! Everything that exists only once a game has started:
//! - The tile pool
//! - One hand per seat
//! - Turn pointer and peel counter
//! - Action history
//!
//! ## PublicTable
//!
//! What every participant (and any spectator) may see: pool size, hand
//! sizes and counters, whose turn it is. Never hand contents.

use im::Vector;
use serde::{Deserialize, Serialize};
use tracing::error;

use super::action::{ActionRecord, PlayerAction};
use super::config::GameConfiguration;
use super::ids::{TileId, UserId};
use super::player::{PlayerId, PlayerMap};
use super::rng::GameRng;
use crate::error::{EngineError, Result};
use crate::rules::GameResult;
use crate::zones::{PlayerHand, TilePool};

/// Private state of a started game.
///
/// Uses `im::Vector` for the history so snapshots stay cheap to clone.
#[derive(Clone, Debug)]
pub struct TableState {
    /// The shared pool.
    pub pool: TilePool,

    /// Hands, one per seat in registration order.
    pub hands: PlayerMap<PlayerHand>,

    /// Seat allowed to act in turn-based play.
    pub turn: PlayerId,

    /// Peel counter; a peel must echo the current value.
    pub draw_id: u32,

    /// Every applied action, oldest first.
    pub history: Vector<ActionRecord>,
}

impl TableState {
    /// Mint the pool and deal `start_size` tiles to each seat in order.
    pub fn deal(config: &GameConfiguration, rng: &mut GameRng) -> Result<Self> {
        let mut pool = TilePool::initialize(config, rng)?;
        let mut hands: PlayerMap<PlayerHand> = PlayerMap::with_default(config.player_count());

        for (_, hand) in hands.iter_mut() {
            let tiles = pool.draw(config.start_size as usize, rng)?;
            hand.add(tiles);
        }

        Ok(Self {
            pool,
            hands,
            turn: PlayerId::new(0),
            draw_id: 0,
            history: Vector::new(),
        })
    }

    /// Get player count.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.hands.player_count()
    }

    /// Total tiles across all hands.
    #[must_use]
    pub fn tiles_in_hands(&self) -> usize {
        self.hands.values().map(PlayerHand::len).sum()
    }

    /// Verify that every minted tile is in exactly one place.
    pub fn check_conservation(&self) -> Result<()> {
        let held = self.tiles_in_hands();
        let total = self.pool.total();

        if self.pool.remaining() + held != total {
            let message = format!(
                "pool {} + hands {} != total {}",
                self.pool.remaining(),
                held,
                total
            );
            error!(%message, "tile conservation violated");
            return Err(EngineError::InvariantViolation(message));
        }

        for (seat, hand) in self.hands.iter() {
            if let Some(tile) = hand.tiles().iter().find(|t| self.pool.contains(t.id)) {
                let message = format!("{tile} is in the pool and in the hand of {seat}");
                error!(%message, "tile conservation violated");
                return Err(EngineError::InvariantViolation(message));
            }
        }

        Ok(())
    }

    /// Append an action to the history and return the record.
    pub fn record(
        &mut self,
        player: PlayerId,
        action: PlayerAction,
        drawn: &[TileId],
        shortfall: bool,
    ) -> ActionRecord {
        let record = ActionRecord::new(self.history.len() as u32, player, action, drawn)
            .with_shortfall(shortfall);
        self.history.push_back(record.clone());
        record
    }

    /// Public projection of this table.
    ///
    /// `users` maps seats to accounts; `turn` is `None` outside turn-based
    /// play or once the game is over.
    #[must_use]
    pub fn public(&self, users: &[UserId], turn: Option<PlayerId>, result: Option<&GameResult>) -> PublicTable {
        let seats = self
            .hands
            .iter()
            .zip(users)
            .map(|((seat, hand), &user)| SeatView {
                seat,
                user,
                hand_size: hand.len(),
                draws: hand.draws,
                discards: hand.discards,
                peels: hand.peels,
            })
            .collect();

        PublicTable {
            remaining: self.pool.remaining(),
            total: self.pool.total(),
            turn,
            draw_id: self.draw_id,
            actions: self.history.len(),
            seats,
            result: result.cloned(),
        }
    }
}

/// Publicly visible state of one seat.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatView {
    pub seat: PlayerId,
    pub user: UserId,
    pub hand_size: usize,
    pub draws: u32,
    pub discards: u32,
    pub peels: u32,
}

/// Publicly visible state of a started game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicTable {
    /// Tiles left in the pool.
    pub remaining: usize,

    /// Tiles minted for the pool.
    pub total: usize,

    /// Seat whose turn it is (turn-based play only).
    pub turn: Option<PlayerId>,

    /// Value the next peel must echo.
    pub draw_id: u32,

    /// Actions applied so far.
    pub actions: usize,

    /// Per-seat public state in seat order.
    pub seats: Vec<SeatView>,

    /// Set once the game is finished.
    pub result: Option<GameResult>,
}

impl PublicTable {
    /// Hand size of a seat, if the seat exists.
    #[must_use]
    pub fn hand_size(&self, seat: PlayerId) -> Option<usize> {
        self.seats.get(seat.index()).map(|s| s.hand_size)
    }
}
