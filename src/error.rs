//! Engine and service errors.
//!
//! Normal gameplay outcomes (wrong answers, time-outs, intents on a finished
//! session) are states, never errors. What is left ends up here.

use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
  #[error("cannot start a session on an empty catalog")]
  EmptyCatalog,

  #[error("unknown session: {0}")]
  UnknownSession(String),

  #[error("unknown room: {0}")]
  UnknownRoom(u32),

  #[error("invalid request: {0}")]
  BadRequest(String),
}

/// Converts the error into a JSON body with an appropriate HTTP status code.
impl IntoResponse for EngineError {
  fn into_response(self) -> Response {
    let status = match &self {
      EngineError::EmptyCatalog => StatusCode::UNPROCESSABLE_ENTITY,
      EngineError::UnknownSession(_) | EngineError::UnknownRoom(_) => StatusCode::NOT_FOUND,
      EngineError::BadRequest(_) => StatusCode::BAD_REQUEST,
    };
    tracing::warn!(target: "puzzle_rounds", %status, error = %self, "request rejected");
    (status, Json(json!({ "error": self.to_string() }))).into_response()
  }
}
