//! Application state: built-in catalogs, engine config, and the live session registry.
//!
//! This module owns:
//!   - one catalog per game (riddles extended by config-provided entries)
//!   - the escape rooms, each with its own catalog
//!   - the engine config (per-game rule overrides)
//!   - live sessions keyed by their stable handle
//!
//! Sessions are torn down (timer cancelled) when removed from the registry.
//! Finished sessions nobody touches for `FINISHED_SESSION_TTL` are swept.

use std::{collections::HashMap, sync::Arc, time::Duration};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::catalog::Catalog;
use crate::config::{load_engine_config_from_env, EngineConfig};
use crate::domain::{GameKind, Room};
use crate::engine::RoundSession;
use crate::error::EngineError;
use crate::rng::GameRng;
use crate::seeds::{escape_rooms, lip_reading_challenges, riddle_challenges};
use crate::session::LiveSession;
use crate::timer::DEFAULT_TICK_PERIOD;

/// How long a failed or completed session may sit idle before it is swept.
pub const FINISHED_SESSION_TTL: Duration = Duration::from_secs(10 * 60);
pub const SWEEP_PERIOD: Duration = Duration::from_secs(60);

#[derive(Clone, Debug)]
pub struct RoomEntry {
    pub room: Room,
    pub catalog: Arc<Catalog>,
}

#[derive(Clone)]
pub struct AppState {
    pub lip_reading: Arc<Catalog>,
    pub riddles: Arc<Catalog>,
    pub rooms: Arc<Vec<RoomEntry>>,
    pub config: EngineConfig,
    pub sessions: Arc<RwLock<HashMap<Uuid, Arc<LiveSession>>>>,
    pub tick_period: Duration,
}

impl AppState {
    /// Build state from env: load config, build catalogs.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Self {
        let cfg = load_engine_config_from_env().unwrap_or_default();
        Self::with_config(cfg, DEFAULT_TICK_PERIOD)
    }

    pub fn with_config(config: EngineConfig, tick_period: Duration) -> Self {
        let mut riddles = riddle_challenges();
        for extra in config.extra_challenges() {
            // Built-in ids win; config entries never overwrite them.
            if riddles.iter().any(|c| c.id == extra.id) {
                tracing::warn!(target: "puzzle_rounds", id = %extra.id, "Config challenge id clashes with a built-in riddle; skipped");
                continue;
            }
            riddles.push(extra);
        }

        let rooms: Vec<RoomEntry> = escape_rooms()
            .into_iter()
            .map(|room| RoomEntry {
                catalog: Arc::new(Catalog::new(room.puzzles.clone())),
                room,
            })
            .collect();

        let lip_reading = Arc::new(Catalog::new(lip_reading_challenges()));
        let riddles = Arc::new(Catalog::new(riddles));

        info!(target: "puzzle_rounds", lip_reading = lip_reading.len(), riddles = riddles.len(), rooms = rooms.len(), "Startup catalog inventory");

        Self {
            lip_reading,
            riddles,
            rooms: Arc::new(rooms),
            config,
            sessions: Arc::new(RwLock::new(HashMap::new())),
            tick_period,
        }
    }

    pub fn room(&self, id: u32) -> Result<&RoomEntry, EngineError> {
        self.rooms
            .iter()
            .find(|r| r.room.id == id)
            .ok_or(EngineError::UnknownRoom(id))
    }

    /// Start a session for `game` and register it.
    #[instrument(level = "info", skip(self))]
    pub async fn create_session(
        &self,
        game: GameKind,
        room_id: Option<u32>,
        seed: Option<u64>,
    ) -> Result<Arc<LiveSession>, EngineError> {
        let (catalog, mode) = match game {
            GameKind::LipReading => (self.lip_reading.clone(), self.config.mode_for(game, None)),
            GameKind::Riddles => (self.riddles.clone(), self.config.mode_for(game, None)),
            GameKind::EscapeRoom => {
                let id = room_id.ok_or_else(|| EngineError::BadRequest("roomId is required for escape_room".into()))?;
                let entry = self.room(id)?;
                (entry.catalog.clone(), self.config.mode_for(game, Some(entry.room.time_limit_seconds)))
            }
        };
        let rng = seed.map(GameRng::new).unwrap_or_else(GameRng::from_entropy);
        let session = RoundSession::start_session(mode, catalog, rng)?;
        let live = Arc::new(LiveSession::launch(game, session, self.tick_period));
        self.sessions.write().await.insert(live.id(), live.clone());
        info!(target: "puzzle_rounds", id = %live.id(), ?game, ?room_id, "Session registered");
        Ok(live)
    }

    pub async fn get_session(&self, id: Uuid) -> Result<Arc<LiveSession>, EngineError> {
        self.sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| EngineError::UnknownSession(id.to_string()))
    }

    /// Unregister and tear down. The clock is cancelled before this returns.
    #[instrument(level = "info", skip(self))]
    pub async fn remove_session(&self, id: Uuid) -> Result<(), EngineError> {
        let live = self
            .sessions
            .write()
            .await
            .remove(&id)
            .ok_or_else(|| EngineError::UnknownSession(id.to_string()))?;
        live.shutdown().await;
        info!(target: "puzzle_rounds", %id, "Session torn down");
        Ok(())
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Tear down every finished session that has been idle for at least `ttl`.
    /// Returns how many were removed.
    pub async fn sweep_finished(&self, ttl: Duration) -> usize {
        let live: Vec<Arc<LiveSession>> = self.sessions.read().await.values().cloned().collect();
        let mut removed = 0;
        for session in live {
            if session.is_stale(ttl).await && self.remove_session(session.id()).await.is_ok() {
                removed += 1;
            }
        }
        if removed > 0 {
            let remaining = self.session_count().await;
            info!(target: "puzzle_rounds", removed, remaining, "Swept finished sessions");
        } else {
            debug!(target: "puzzle_rounds", "Sweep found nothing to remove");
        }
        removed
    }

    /// Background task running `sweep_finished` every `every`.
    pub fn spawn_sweeper(self: Arc<Self>, every: Duration, ttl: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + every, every);
            loop {
                interval.tick().await;
                self.sweep_finished(ttl).await;
            }
        })
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_config(EngineConfig::default(), DEFAULT_TICK_PERIOD)
    }
}
