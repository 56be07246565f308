//! A single game session: lifecycle, participants and the actions that
//! move tiles.
//!
//! `GameSession` is plain data with `&mut self` methods; it does no locking
//! of its own. The registry wraps each session in its own lock so actions on
//! one session are linearized and sessions never contend with each other.
//!
//! ## Actions
//!
//! | action  | effect on the actor's hand                        |
//! |---------|---------------------------------------------------|
//! | draw    | `+draw_size`                                      |
//! | discard | `-1`, then `+(discard_penalty + 1)`               |
//! | peel    | `+draw_size` for every seat (simultaneous only)   |
//!
//! A draw the pool cannot fully cover still grants what is left. The
//! outcome records the shortfall, and the session asks its win policy
//! whether that ends the game.
//!
//! ## Example
//!
//! ```
//! use tile_rush::core::{GameConfiguration, GameRng, SessionId, UserId};
//! use tile_rush::rules::GameStyle;
//! use tile_rush::session::{GameSession, Lifecycle};
//!
//! let config = GameConfiguration::new()
//!     .with_players(2)
//!     .with_tiles(20)
//!     .with_start_size(5)
//!     .with_discard_penalty(3);
//!
//! let (alice, bob) = (UserId(1), UserId(2));
//! let mut game =
//!     GameSession::new(SessionId(1), alice, GameStyle::Single, config, GameRng::new(42)).unwrap();
//! game.join(bob).unwrap();
//! game.start().unwrap();
//! assert_eq!(game.lifecycle(), Lifecycle::Active);
//! assert_eq!(game.remaining(), Some(10));
//!
//! let tile = game.hand(alice).unwrap().tiles()[0].id;
//! let outcome = game.discard(alice, tile).unwrap();
//! assert_eq!(outcome.drawn.len(), 4);
//! assert_eq!(game.hand(alice).unwrap().len(), 8);
//! assert_eq!(game.remaining(), Some(7));
//! ```

use std::sync::Arc;

use im::Vector;
use rustc_hash::FxHashSet;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use super::lifecycle::Lifecycle;
use super::view::GameView;
use crate::core::{
    ActionRecord, GameConfiguration, GameRng, PlayerAction, PlayerId, RoomId, SessionId,
    TableState, TileId, UserId,
};
use crate::error::{EngineError, Result};
use crate::rules::{GameResult, GameStyle, TurnMode, WinCheck, WinPolicy};
use crate::tiles::Tile;
use crate::zones::PlayerHand;

/// A draw that the pool could only partly cover.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Exhaustion {
    pub requested: usize,
    pub granted: usize,
}

/// Result of an applied action.
#[derive(Clone, Debug, Serialize)]
pub struct ActionOutcome {
    /// History entry written for the action.
    pub record: ActionRecord,

    /// Tiles that entered the actor's hand.
    pub drawn: Vec<Tile>,

    /// Set when the pool ran short.
    pub exhaustion: Option<Exhaustion>,

    /// Set when this action finished the game.
    pub result: Option<GameResult>,

    /// Public state after the action.
    pub view: GameView,
}

impl ActionOutcome {
    /// Treat a pool shortfall as an error.
    ///
    /// The action stays applied either way; this only changes how the
    /// caller sees it.
    pub fn exhausted(self) -> Result<Self> {
        match self.exhaustion {
            Some(Exhaustion { requested, granted }) => {
                Err(EngineError::PoolExhausted { requested, granted })
            }
            None => Ok(self),
        }
    }

    /// Tiles left in the pool after the action.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.view.remaining().unwrap_or(0)
    }
}

/// One game: its configuration, participants, lifecycle and table.
#[derive(Debug)]
pub struct GameSession {
    id: SessionId,
    owner: UserId,
    room: Option<RoomId>,
    style: GameStyle,
    open: bool,
    config: GameConfiguration,
    lifecycle: Lifecycle,

    /// Accounts in registration order; the index is the seat.
    participants: Vec<UserId>,

    /// Users the owner let into a closed game.
    admitted: FxHashSet<UserId>,

    /// Exists from `start` on.
    table: Option<TableState>,

    result: Option<GameResult>,
    abandon_reason: Option<String>,
    policy: Arc<dyn WinPolicy>,
    rng: GameRng,
}

impl GameSession {
    /// Create a pending session with `owner` in seat 0.
    ///
    /// The session is open to anyone and uses the style's default win
    /// policy; see the `with_*` methods to change either.
    pub fn new(
        id: SessionId,
        owner: UserId,
        style: GameStyle,
        config: GameConfiguration,
        rng: GameRng,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            id,
            owner,
            room: None,
            style,
            open: true,
            config,
            lifecycle: Lifecycle::Pending,
            participants: vec![owner],
            admitted: FxHashSet::default(),
            table: None,
            result: None,
            abandon_reason: None,
            policy: style.default_policy(),
            rng,
        })
    }

    /// Set whether anyone may join, or only admitted users.
    #[must_use]
    pub fn with_open(mut self, open: bool) -> Self {
        self.open = open;
        self
    }

    /// Bind the session to a room.
    #[must_use]
    pub fn with_room(mut self, room: Option<RoomId>) -> Self {
        self.room = room;
        self
    }

    /// Replace the style's default win policy.
    #[must_use]
    pub fn with_policy(mut self, policy: Arc<dyn WinPolicy>) -> Self {
        self.policy = policy;
        self
    }

    // === Accessors ===

    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub fn owner(&self) -> UserId {
        self.owner
    }

    #[must_use]
    pub fn room(&self) -> Option<RoomId> {
        self.room
    }

    #[must_use]
    pub fn style(&self) -> GameStyle {
        self.style
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    #[must_use]
    pub fn config(&self) -> &GameConfiguration {
        &self.config
    }

    #[must_use]
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    #[must_use]
    pub fn result(&self) -> Option<&GameResult> {
        self.result.as_ref()
    }

    #[must_use]
    pub fn policy(&self) -> &dyn WinPolicy {
        self.policy.as_ref()
    }

    /// Accounts in seat order.
    #[must_use]
    pub fn participants(&self) -> &[UserId] {
        &self.participants
    }

    /// Seat of a participant.
    #[must_use]
    pub fn seat_of(&self, user: UserId) -> Option<PlayerId> {
        self.participants
            .iter()
            .position(|&u| u == user)
            .map(|i| PlayerId::new(i as u8))
    }

    /// Seat allowed to act, in turn-based play while active.
    #[must_use]
    pub fn current_turn(&self) -> Option<PlayerId> {
        match (&self.table, self.lifecycle, self.style.turn_mode()) {
            (Some(table), Lifecycle::Active, TurnMode::TurnBased) => Some(table.turn),
            _ => None,
        }
    }

    /// Value the next peel must echo, once started.
    #[must_use]
    pub fn draw_id(&self) -> Option<u32> {
        self.table.as_ref().map(|t| t.draw_id)
    }

    /// Tiles left in the pool, once started.
    #[must_use]
    pub fn remaining(&self) -> Option<usize> {
        self.table.as_ref().map(|t| t.pool.remaining())
    }

    /// Applied actions, oldest first.
    #[must_use]
    pub fn history(&self) -> Vector<ActionRecord> {
        self.table
            .as_ref()
            .map(|t| t.history.clone())
            .unwrap_or_default()
    }

    /// Public snapshot of the session.
    #[must_use]
    pub fn view(&self) -> GameView {
        GameView {
            id: self.id,
            owner: self.owner,
            style: self.style,
            open: self.open,
            lifecycle: self.lifecycle,
            room: self.room,
            participants: self.participants.clone(),
            config: self.config.clone(),
            table: self
                .table
                .as_ref()
                .map(|t| t.public(&self.participants, self.current_turn(), self.result.as_ref())),
            abandon_reason: self.abandon_reason.clone(),
        }
    }

    /// A participant's own hand.
    pub fn hand(&self, user: UserId) -> Result<PlayerHand> {
        let seat = self.seat(user)?;
        match &self.table {
            Some(table) => Ok(table.hands[seat].clone()),
            None => Err(EngineError::InvalidTransition {
                from: self.lifecycle,
                action: "look at a hand",
            }),
        }
    }

    /// Verify tile conservation. Sessions that never started hold no tiles.
    pub fn check_conservation(&self) -> Result<()> {
        self.table
            .as_ref()
            .map_or(Ok(()), TableState::check_conservation)
    }

    // === Pending ===

    /// Take a seat. Joining twice returns the seat already held.
    ///
    /// Closed games only seat users the owner has admitted.
    pub fn join(&mut self, user: UserId) -> Result<PlayerId> {
        self.ensure_pending("join")?;

        if let Some(seat) = self.seat_of(user) {
            return Ok(seat);
        }
        if !self.open && !self.admitted.contains(&user) {
            return Err(EngineError::illegal(format!(
                "{} is closed and {user} has not been admitted",
                self.id
            )));
        }
        if self.participants.len() >= self.config.player_count() {
            return Err(EngineError::illegal(format!(
                "{} is full ({} players)",
                self.id, self.config.num_players
            )));
        }

        self.participants.push(user);
        let seat = PlayerId::new((self.participants.len() - 1) as u8);
        debug!(session = %self.id, %user, %seat, "player joined");
        Ok(seat)
    }

    /// Grant or revoke `user`'s admission. Only the owner may.
    ///
    /// Revoking also takes away the user's seat, if they hold one; later
    /// seats move down. The owner is always admitted.
    pub fn admit(&mut self, by: UserId, user: UserId, admitted: bool) -> Result<()> {
        self.ensure_pending("admit")?;
        self.ensure_owner(by, "change admissions")?;

        if admitted {
            self.admitted.insert(user);
            debug!(session = %self.id, %user, "player admitted");
            return Ok(());
        }

        if user == self.owner {
            return Err(EngineError::illegal("the owner is always admitted"));
        }
        self.admitted.remove(&user);
        self.unseat(user);
        debug!(session = %self.id, %user, "admission revoked");
        Ok(())
    }

    /// Give up a seat before the game starts. Later seats move down.
    ///
    /// The owner can't leave; abandoning is the owner's way out.
    pub fn leave(&mut self, user: UserId) -> Result<()> {
        self.ensure_pending("leave")?;
        self.seat(user)?;

        if user == self.owner {
            return Err(EngineError::illegal("the owner can't leave; abandon the game instead"));
        }
        self.unseat(user);
        debug!(session = %self.id, %user, "player left");
        Ok(())
    }

    /// Replace the configuration. Only the owner may, and only while pending.
    ///
    /// The new configuration is validated in full before anything changes.
    pub fn configure(&mut self, by: UserId, config: GameConfiguration) -> Result<()> {
        self.ensure_pending("configure")?;
        self.ensure_owner(by, "configure the game")?;
        config.validate()?;

        if config.player_count() < self.participants.len() {
            return Err(EngineError::configuration(
                "num_players",
                config.num_players,
                format!("at least {} (seats already taken)", self.participants.len()),
            ));
        }

        self.config = config;
        debug!(session = %self.id, "configuration replaced");
        Ok(())
    }

    /// Enter `active`: mint the pool and deal every seat.
    ///
    /// Requires every seat to be filled. Starting twice is rejected and
    /// leaves the table as the first start dealt it.
    pub fn start(&mut self) -> Result<()> {
        self.ensure_pending("start")?;

        if self.participants.len() != self.config.player_count() {
            return Err(self.reject(EngineError::InvalidTransition {
                from: self.lifecycle,
                action: "start an incomplete table",
            }));
        }

        let table = TableState::deal(&self.config, &mut self.rng)?;
        table.check_conservation()?;

        info!(
            session = %self.id,
            style = %self.style,
            players = table.player_count(),
            remaining = table.pool.remaining(),
            "game started"
        );
        self.table = Some(table);
        self.lifecycle = Lifecycle::Active;
        Ok(())
    }

    /// Cancel the game. The table is kept as it was for the final snapshot.
    pub fn abandon(&mut self, reason: impl Into<String>) -> Result<()> {
        if self.lifecycle.is_terminal() {
            return Err(self.reject(EngineError::GameClosed {
                lifecycle: self.lifecycle,
            }));
        }

        let reason = reason.into();
        info!(session = %self.id, from = %self.lifecycle, %reason, "game abandoned");
        self.lifecycle = Lifecycle::Abandoned;
        self.abandon_reason = Some(reason);
        Ok(())
    }

    // === Active ===

    pub fn draw(&mut self, user: UserId) -> Result<ActionOutcome> {
        self.apply(user, PlayerAction::Draw)
    }

    pub fn discard(&mut self, user: UserId, tile: TileId) -> Result<ActionOutcome> {
        self.apply(user, PlayerAction::Discard { tile })
    }

    pub fn peel(&mut self, user: UserId, draw_id: u32) -> Result<ActionOutcome> {
        self.apply(user, PlayerAction::Peel { draw_id })
    }

    /// Apply a player action.
    ///
    /// Rejected actions leave the session exactly as it was.
    pub fn apply(&mut self, user: UserId, action: PlayerAction) -> Result<ActionOutcome> {
        match self.lifecycle {
            Lifecycle::Active => {}
            Lifecycle::Pending => {
                return Err(self.reject(EngineError::InvalidTransition {
                    from: Lifecycle::Pending,
                    action: action.name(),
                }))
            }
            terminal => return Err(self.reject(EngineError::GameClosed { lifecycle: terminal })),
        }

        let seat = self.seat(user)?;
        let mode = self.style.turn_mode();

        let Self {
            id,
            config,
            table,
            rng,
            policy,
            ..
        } = self;
        let Some(table) = table.as_mut() else {
            error!(session = %id, "active session has no table");
            return Err(EngineError::InvariantViolation(format!("{id} is active without a table")));
        };

        if mode == TurnMode::TurnBased {
            if action.is_peel() {
                return Err(EngineError::illegal("peeling is only allowed in simultaneous play"));
            }
            if seat != table.turn {
                return Err(EngineError::NotYourTurn { expected: table.turn });
            }
        }

        let applied = match action {
            PlayerAction::Draw => {
                table.hands[seat].draws += 1;
                deal_to(table, rng, seat, config.draw_size as usize)
            }
            PlayerAction::Discard { tile } => {
                let Some(removed) = table.hands[seat].remove(tile) else {
                    return Err(EngineError::illegal(format!("{tile} is not in your hand")));
                };
                if let Err(err) = table.pool.return_tiles(&[removed]) {
                    table.hands[seat].add([removed]);
                    return Err(err);
                }
                table.hands[seat].discards += 1;
                deal_to(table, rng, seat, config.discard_draw())
            }
            PlayerAction::Peel { draw_id } => {
                if draw_id != table.draw_id {
                    return Err(EngineError::illegal(format!(
                        "stale peel: draw id is {}, got {draw_id}",
                        table.draw_id
                    )));
                }
                peel_round(table, rng, seat, config)
            }
        };

        let ids: Vec<TileId> = applied.drawn.iter().map(|t| t.id).collect();
        let record = table.record(seat, action, &ids, applied.exhaustion.is_some());
        if mode == TurnMode::TurnBased {
            table.turn = seat.next(table.player_count());
        }
        table.check_conservation()?;

        let result = applied.exhaustion.and_then(|_| {
            policy.decide(&WinCheck {
                actor: seat,
                action,
                remaining: table.pool.remaining(),
                hands: &table.hands,
            })
        });

        debug!(
            session = %id,
            player = %seat,
            %action,
            drawn = ids.len(),
            remaining = table.pool.remaining(),
            shortfall = applied.exhaustion.is_some(),
            "action applied"
        );

        if let Some(result) = &result {
            self.finish(result.clone());
        }

        Ok(ActionOutcome {
            record,
            drawn: applied.drawn,
            exhaustion: applied.exhaustion,
            result,
            view: self.view(),
        })
    }

    // === Internals ===

    fn finish(&mut self, result: GameResult) {
        info!(session = %self.id, policy = self.policy.name(), ?result, "game finished");
        self.lifecycle = Lifecycle::Finished;
        self.result = Some(result);
    }

    fn unseat(&mut self, user: UserId) {
        self.participants.retain(|&u| u != user);
    }

    fn seat(&self, user: UserId) -> Result<PlayerId> {
        self.seat_of(user)
            .ok_or_else(|| EngineError::not_found(format!("{user} in {}", self.id)))
    }

    fn ensure_pending(&self, action: &'static str) -> Result<()> {
        match self.lifecycle {
            Lifecycle::Pending => Ok(()),
            Lifecycle::Active => Err(self.reject(EngineError::InvalidTransition {
                from: Lifecycle::Active,
                action,
            })),
            terminal => Err(self.reject(EngineError::GameClosed { lifecycle: terminal })),
        }
    }

    fn ensure_owner(&self, user: UserId, what: &str) -> Result<()> {
        if user == self.owner {
            Ok(())
        } else {
            Err(EngineError::illegal(format!("only the owner may {what}")))
        }
    }

    fn reject(&self, err: EngineError) -> EngineError {
        warn!(session = %self.id, lifecycle = %self.lifecycle, error = %err, "transition rejected");
        err
    }
}

struct Applied {
    drawn: Vec<Tile>,
    exhaustion: Option<Exhaustion>,
}

/// Move up to `n` tiles from the pool into one hand.
fn deal_to(table: &mut TableState, rng: &mut GameRng, seat: PlayerId, n: usize) -> Applied {
    let (drawn, exhaustion) = match table.pool.draw(n, rng) {
        Ok(tiles) => (tiles, None),
        Err(short) => {
            let exhaustion = Exhaustion {
                requested: short.requested,
                granted: short.granted.len(),
            };
            (short.into_granted(), Some(exhaustion))
        }
    };
    table.hands[seat].add(drawn.iter().copied());
    Applied { drawn, exhaustion }
}

/// Deal `draw_size` to every seat, or nothing if the pool cannot cover all.
fn peel_round(
    table: &mut TableState,
    rng: &mut GameRng,
    peeler: PlayerId,
    config: &GameConfiguration,
) -> Applied {
    let round = config.round_size();
    if table.pool.remaining() < round {
        return Applied {
            drawn: Vec::new(),
            exhaustion: Some(Exhaustion {
                requested: round,
                granted: 0,
            }),
        };
    }

    let mut mine = Vec::new();
    for seat in PlayerId::all(table.player_count()) {
        let applied = deal_to(table, rng, seat, config.draw_size as usize);
        if seat == peeler {
            mine = applied.drawn;
        }
    }
    table.hands[peeler].peels += 1;
    table.draw_id += 1;

    Applied {
        drawn: mine,
        exhaustion: None,
    }
}
