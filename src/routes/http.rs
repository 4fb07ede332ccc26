//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented and logs its parameters and basic result info.

use std::sync::Arc;

use axum::{
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
  Json,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::EngineError;
use crate::logic::{apply_intent, Intent, IntentResult};
use crate::protocol::*;
use crate::state::AppState;

fn intent_out(r: IntentResult) -> Json<IntentOut> {
  Json(IntentOut { changed: r.changed, verdict: r.verdict, hint: r.hint, snapshot: r.snapshot })
}

async fn dispatch(state: &AppState, id: Uuid, intent: Intent) -> Result<Json<IntentOut>, EngineError> {
  let live = state.get_session(id).await?;
  Ok(intent_out(apply_intent(&live, intent).await))
}

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info", skip(state))]
pub async fn http_get_games(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(games_overview(&state))
}

#[instrument(level = "info", skip(state, body), fields(game = ?body.game, room = ?body.room_id))]
pub async fn http_create_session(
  State(state): State<Arc<AppState>>,
  Json(body): Json<CreateSessionIn>,
) -> Result<impl IntoResponse, EngineError> {
  let live = state.create_session(body.game, body.room_id, body.seed).await?;
  let snapshot = live.snapshot().await;
  info!(target: "puzzle_rounds", id = %live.id(), status = ?snapshot.status, "HTTP session created");
  Ok((StatusCode::CREATED, Json(SessionOut { id: live.id(), game: live.game(), seed: live.seed(), snapshot })))
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_session(
  State(state): State<Arc<AppState>>,
  Path(id): Path<Uuid>,
) -> Result<Json<SessionOut>, EngineError> {
  let live = state.get_session(id).await?;
  Ok(Json(SessionOut { id, game: live.game(), seed: live.seed(), snapshot: live.snapshot().await }))
}

#[instrument(level = "info", skip(state))]
pub async fn http_delete_session(
  State(state): State<Arc<AppState>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, EngineError> {
  state.remove_session(id).await?;
  Ok(StatusCode::NO_CONTENT)
}

#[instrument(level = "info", skip(state, body), fields(answer_len = body.answer.len()))]
pub async fn http_post_answer(
  State(state): State<Arc<AppState>>,
  Path(id): Path<Uuid>,
  Json(body): Json<AnswerIn>,
) -> Result<Json<IntentOut>, EngineError> {
  dispatch(&state, id, Intent::Answer(body.answer)).await
}

#[instrument(level = "info", skip(state))]
pub async fn http_post_hint(State(state): State<Arc<AppState>>, Path(id): Path<Uuid>) -> Result<Json<IntentOut>, EngineError> {
  dispatch(&state, id, Intent::Hint).await
}

#[instrument(level = "info", skip(state))]
pub async fn http_post_advance(State(state): State<Arc<AppState>>, Path(id): Path<Uuid>) -> Result<Json<IntentOut>, EngineError> {
  dispatch(&state, id, Intent::Advance).await
}

#[instrument(level = "info", skip(state))]
pub async fn http_post_skip(State(state): State<Arc<AppState>>, Path(id): Path<Uuid>) -> Result<Json<IntentOut>, EngineError> {
  dispatch(&state, id, Intent::Skip).await
}

#[instrument(level = "info", skip(state))]
pub async fn http_post_reset(State(state): State<Arc<AppState>>, Path(id): Path<Uuid>) -> Result<Json<IntentOut>, EngineError> {
  dispatch(&state, id, Intent::Reset).await
}

#[instrument(level = "info", skip(state))]
pub async fn http_post_pause(State(state): State<Arc<AppState>>, Path(id): Path<Uuid>) -> Result<Json<IntentOut>, EngineError> {
  dispatch(&state, id, Intent::Pause).await
}

#[instrument(level = "info", skip(state))]
pub async fn http_post_resume(State(state): State<Arc<AppState>>, Path(id): Path<Uuid>) -> Result<Json<IntentOut>, EngineError> {
  dispatch(&state, id, Intent::Resume).await
}

#[instrument(level = "info", skip(state, body), fields(challenge = %body.challenge_id))]
pub async fn http_post_select(
  State(state): State<Arc<AppState>>,
  Path(id): Path<Uuid>,
  Json(body): Json<SelectIn>,
) -> Result<Json<IntentOut>, EngineError> {
  dispatch(&state, id, Intent::Select(body.challenge_id)).await
}
