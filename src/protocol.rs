//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{GameKind, Verdict};
use crate::engine::SessionSnapshot;
use crate::state::AppState;

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    Start {
        game: GameKind,
        #[serde(default, rename = "roomId")]
        room_id: Option<u32>,
        #[serde(default)]
        seed: Option<u64>,
    },
    Answer {
        answer: String,
    },
    Hint,
    Advance,
    Skip,
    Reset,
    Pause,
    Resume,
    Select {
        #[serde(rename = "challengeId")]
        challenge_id: String,
    },
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    Snapshot {
        snapshot: SessionSnapshot,
    },
    Verdict {
        verdict: Option<Verdict>,
        snapshot: SessionSnapshot,
    },
    Hint {
        text: Option<String>,
        snapshot: SessionSnapshot,
    },
    Error {
        message: String,
    },
}

//
// HTTP request/response DTOs
//

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionIn {
    pub game: GameKind,
    #[serde(default)]
    pub room_id: Option<u32>,
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionOut {
    pub id: Uuid,
    pub game: GameKind,
    pub seed: u64,
    pub snapshot: SessionSnapshot,
}

#[derive(Debug, Deserialize)]
pub struct AnswerIn {
    pub answer: String,
}

#[derive(Debug, Deserialize)]
pub struct SelectIn {
    #[serde(rename = "challengeId")]
    pub challenge_id: String,
}

/// Reply to any intent. `changed` is false when the intent was a no-op.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentOut {
    pub changed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verdict: Option<Verdict>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    pub snapshot: SessionSnapshot,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomOut {
    pub id: u32,
    pub name: String,
    pub theme: String,
    pub description: String,
    pub time_limit_seconds: u32,
    pub puzzle_count: usize,
    pub total_difficulty: u32,
    pub max_points: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameOut {
    pub game: GameKind,
    pub challenge_count: usize,
}

#[derive(Debug, Serialize)]
pub struct GamesOut {
    pub games: Vec<GameOut>,
    pub rooms: Vec<RoomOut>,
}

/// Overview of everything a client can start.
pub fn games_overview(state: &AppState) -> GamesOut {
    GamesOut {
        games: vec![
            GameOut { game: GameKind::LipReading, challenge_count: state.lip_reading.len() },
            GameOut { game: GameKind::Riddles, challenge_count: state.riddles.len() },
            GameOut { game: GameKind::EscapeRoom, challenge_count: state.rooms.len() },
        ],
        rooms: state
            .rooms
            .iter()
            .map(|r| RoomOut {
                id: r.room.id,
                name: r.room.name.clone(),
                theme: r.room.theme.clone(),
                description: r.room.description.clone(),
                time_limit_seconds: r.room.time_limit_seconds,
                puzzle_count: r.room.puzzles.len(),
                total_difficulty: r.room.puzzles.iter().map(|p| p.difficulty_tier as u32).sum(),
                max_points: r.room.puzzles.iter().map(|p| p.base_points).sum(),
            })
            .collect(),
    }
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}
