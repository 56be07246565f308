//! Process-wide directory of game sessions.
//!
//! The registry is an ordinary value: build one at startup and share it
//! (usually behind an `Arc`) with whatever serves requests.
//!
//! ## Locking
//!
//! - The directory (live sessions, room bindings, archive) sits behind one
//!   `RwLock`. Operations on it are short and never block on a session.
//! - Every session sits behind its own `RwLock` inside a [`SessionHandle`].
//!
//! A lookup clones the handle's `Arc` and drops the directory lock before
//! touching the session. Nothing ever holds two session locks, and nothing
//! holds the directory lock while waiting for a session.
//!
//! ```
//! use tile_rush::core::{GameConfiguration, UserId};
//! use tile_rush::session::{CreateGame, RegistryConfig, SessionRegistry};
//!
//! let registry = SessionRegistry::new(RegistryConfig::default().with_seed(7));
//! let request = CreateGame::new(UserId(1)).with_config(GameConfiguration::new().with_players(1));
//!
//! let view = registry.create(request).unwrap();
//! assert_eq!(view.lifecycle.to_string(), "pending");
//!
//! registry.start(view.id).unwrap();
//! let outcome = registry.draw(view.id, UserId(1)).unwrap();
//! assert_eq!(outcome.drawn.len(), 1);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::game::{ActionOutcome, GameSession};
use super::view::GameView;
use crate::core::{GameConfiguration, GameRng, PlayerId, RoomId, SessionId, TileId, UserId};
use crate::error::{EngineError, Result};
use crate::rules::{GameStyle, WinPolicy};
use crate::zones::PlayerHand;

/// Registry-wide settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Root seed for every session RNG. `None` seeds from entropy.
    pub seed: Option<u64>,

    /// Allow a room to host more than one live game at a time.
    pub allow_concurrent_room_games: bool,

    /// Keep a read-only view of retired sessions.
    pub archive_retired: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            seed: None,
            allow_concurrent_room_games: false,
            archive_retired: true,
        }
    }
}

impl RegistryConfig {
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub fn with_concurrent_room_games(mut self, allow: bool) -> Self {
        self.allow_concurrent_room_games = allow;
        self
    }

    #[must_use]
    pub fn with_archive(mut self, archive: bool) -> Self {
        self.archive_retired = archive;
        self
    }
}

fn default_open() -> bool {
    true
}

/// A request to create a game.
///
/// Deserializes from `{owner, style, open, config, room?}`; everything but
/// `owner` may be omitted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateGame {
    pub owner: UserId,

    #[serde(default)]
    pub style: GameStyle,

    #[serde(default = "default_open")]
    pub open: bool,

    #[serde(default)]
    pub config: GameConfiguration,

    #[serde(default)]
    pub room: Option<RoomId>,
}

impl CreateGame {
    /// An open `rush` game with the default configuration.
    #[must_use]
    pub fn new(owner: UserId) -> Self {
        Self {
            owner,
            style: GameStyle::default(),
            open: true,
            config: GameConfiguration::default(),
            room: None,
        }
    }

    #[must_use]
    pub fn with_style(mut self, style: GameStyle) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub fn with_open(mut self, open: bool) -> Self {
        self.open = open;
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: GameConfiguration) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn with_room(mut self, room: RoomId) -> Self {
        self.room = Some(room);
        self
    }
}

/// Shared access to one session.
#[derive(Debug)]
pub struct SessionHandle {
    id: SessionId,
    session: RwLock<GameSession>,
}

impl SessionHandle {
    fn new(session: GameSession) -> Self {
        Self {
            id: session.id(),
            session: RwLock::new(session),
        }
    }

    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Shared lock for queries.
    pub fn read(&self) -> RwLockReadGuard<'_, GameSession> {
        self.session.read()
    }

    /// Exclusive lock for anything that mutates.
    pub fn write(&self) -> RwLockWriteGuard<'_, GameSession> {
        self.session.write()
    }
}

#[derive(Debug, Default)]
struct Directory {
    live: FxHashMap<SessionId, Arc<SessionHandle>>,
    rooms: FxHashMap<RoomId, SessionId>,
    archive: FxHashMap<SessionId, GameView>,
}

/// Lookup of live sessions by id, plus room bindings and the archive.
#[derive(Debug)]
pub struct SessionRegistry {
    config: RegistryConfig,
    next_id: AtomicU64,
    rng: Mutex<GameRng>,
    directory: RwLock<Directory>,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}

impl SessionRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new(config: RegistryConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => GameRng::new(seed),
            None => GameRng::from_entropy(),
        };

        Self {
            config,
            next_id: AtomicU64::new(1),
            rng: Mutex::new(rng),
            directory: RwLock::new(Directory::default()),
        }
    }

    #[must_use]
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Create a pending game with the style's default win policy.
    pub fn create(&self, request: CreateGame) -> Result<GameView> {
        let policy = request.style.default_policy();
        self.create_with_policy(request, policy)
    }

    /// Create a pending game with a custom win policy.
    ///
    /// Fails with `Configuration` for an invalid configuration and with
    /// `DuplicateRoomBinding` when the room already hosts a live game (unless
    /// concurrent room games are allowed).
    pub fn create_with_policy(
        &self,
        request: CreateGame,
        policy: Arc<dyn WinPolicy>,
    ) -> Result<GameView> {
        request.config.validate()?;

        let id = SessionId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        let rng = self.rng.lock().fork();
        let session = GameSession::new(id, request.owner, request.style, request.config, rng)?
            .with_open(request.open)
            .with_room(request.room)
            .with_policy(policy);
        let view = session.view();
        let handle = Arc::new(SessionHandle::new(session));

        match request.room {
            Some(room) if !self.config.allow_concurrent_room_games => {
                self.insert_bound(room, handle)?;
            }
            room => {
                let mut dir = self.directory.write();
                if let Some(room) = room {
                    dir.rooms.insert(room, id);
                }
                dir.live.insert(id, handle);
            }
        }

        info!(
            session = %id,
            owner = %request.owner,
            style = %request.style,
            room = ?request.room,
            "game created"
        );
        Ok(view)
    }

    /// Insert a session that claims `room`, unless the room has a live game.
    fn insert_bound(&self, room: RoomId, handle: Arc<SessionHandle>) -> Result<()> {
        loop {
            let (bound, existing) = {
                let dir = self.directory.read();
                let bound = dir.rooms.get(&room).copied();
                (bound, bound.and_then(|id| dir.live.get(&id).cloned()))
            };

            // Terminal is forever, so a terminal answer stays true after the
            // session lock is released.
            if let Some(existing) = existing {
                if !existing.read().lifecycle().is_terminal() {
                    return Err(EngineError::DuplicateRoomBinding {
                        room,
                        session: existing.id(),
                    });
                }
            }

            let mut dir = self.directory.write();
            if dir.rooms.get(&room).copied() != bound {
                // Someone rebound the room while we looked; look again.
                continue;
            }
            dir.rooms.insert(room, handle.id());
            dir.live.insert(handle.id(), handle);
            return Ok(());
        }
    }

    /// Look up a live session.
    pub fn get(&self, id: SessionId) -> Result<Arc<SessionHandle>> {
        self.directory
            .read()
            .live
            .get(&id)
            .cloned()
            .ok_or_else(|| EngineError::not_found(id))
    }

    /// Live session bound to a room, if any.
    #[must_use]
    pub fn by_room(&self, room: RoomId) -> Option<SessionId> {
        let dir = self.directory.read();
        dir.rooms
            .get(&room)
            .copied()
            .filter(|id| dir.live.contains_key(id))
    }

    /// Number of live sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.directory.read().live.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Views of every live session, ordered by id.
    #[must_use]
    pub fn list(&self) -> Vec<GameView> {
        let mut views: Vec<GameView> = self.handles().iter().map(|h| h.read().view()).collect();
        views.sort_by_key(|v| v.id);
        views
    }

    /// Remove a finished or abandoned session from the live set.
    ///
    /// Returns its final view, which is also archived when
    /// `archive_retired` is on.
    pub fn retire(&self, id: SessionId) -> Result<GameView> {
        let handle = self.get(id)?;
        let view = handle.read().view();

        if !view.lifecycle.is_terminal() {
            return Err(EngineError::InvalidTransition {
                from: view.lifecycle,
                action: "retire",
            });
        }

        let mut dir = self.directory.write();
        if dir.live.remove(&id).is_none() {
            return Err(EngineError::not_found(id));
        }
        if let Some(room) = view.room {
            if dir.rooms.get(&room) == Some(&id) {
                dir.rooms.remove(&room);
            }
        }
        if self.config.archive_retired {
            dir.archive.insert(id, view.clone());
        }
        drop(dir);

        info!(session = %id, lifecycle = %view.lifecycle, "game retired");
        Ok(view)
    }

    /// Read-only view of a retired session.
    pub fn archived(&self, id: SessionId) -> Result<GameView> {
        self.directory
            .read()
            .archive
            .get(&id)
            .cloned()
            .ok_or_else(|| EngineError::not_found(format!("archived {id}")))
    }

    /// Retire every terminal session. Returns how many were retired.
    pub fn reap(&self) -> usize {
        let reaped = self
            .handles()
            .iter()
            .filter(|h| h.read().lifecycle().is_terminal())
            .filter(|h| self.retire(h.id()).is_ok())
            .count();

        if reaped > 0 {
            debug!(reaped, live = self.len(), "reaped terminal sessions");
        }
        reaped
    }

    /// Snapshot of every live handle, taken without holding any session lock.
    fn handles(&self) -> Vec<Arc<SessionHandle>> {
        self.directory.read().live.values().cloned().collect()
    }

    // === Session pass-throughs ===

    fn with_session<R>(
        &self,
        id: SessionId,
        f: impl FnOnce(&mut GameSession) -> Result<R>,
    ) -> Result<R> {
        let handle = self.get(id)?;
        let mut session = handle.write();
        f(&mut *session)
    }

    /// Public view of a live session.
    pub fn view(&self, id: SessionId) -> Result<GameView> {
        Ok(self.get(id)?.read().view())
    }

    /// A participant's own hand.
    pub fn hand(&self, id: SessionId, user: UserId) -> Result<PlayerHand> {
        self.get(id)?.read().hand(user)
    }

    pub fn join(&self, id: SessionId, user: UserId) -> Result<PlayerId> {
        self.with_session(id, |s| s.join(user))
    }

    pub fn admit(&self, id: SessionId, by: UserId, user: UserId, admitted: bool) -> Result<()> {
        self.with_session(id, |s| s.admit(by, user, admitted))
    }

    pub fn leave(&self, id: SessionId, user: UserId) -> Result<GameView> {
        self.with_session(id, |s| {
            s.leave(user)?;
            Ok(s.view())
        })
    }

    pub fn configure(&self, id: SessionId, by: UserId, config: GameConfiguration) -> Result<GameView> {
        self.with_session(id, |s| {
            s.configure(by, config)?;
            Ok(s.view())
        })
    }

    pub fn start(&self, id: SessionId) -> Result<GameView> {
        self.with_session(id, |s| {
            s.start()?;
            Ok(s.view())
        })
    }

    pub fn abandon(&self, id: SessionId, reason: &str) -> Result<GameView> {
        self.with_session(id, |s| {
            s.abandon(reason)?;
            Ok(s.view())
        })
    }

    pub fn draw(&self, id: SessionId, user: UserId) -> Result<ActionOutcome> {
        self.with_session(id, |s| s.draw(user))
    }

    pub fn discard(&self, id: SessionId, user: UserId, tile: TileId) -> Result<ActionOutcome> {
        self.with_session(id, |s| s.discard(user, tile))
    }

    pub fn peel(&self, id: SessionId, user: UserId, draw_id: u32) -> Result<ActionOutcome> {
        self.with_session(id, |s| s.peel(user, draw_id))
    }
}
