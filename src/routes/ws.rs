//! WebSocket upgrade + message loop. Each client message is parsed as JSON and
//! forwarded to core logic. We reply with a single JSON message per request,
//! and additionally push a snapshot whenever the countdown ticks.
//!
//! One connection drives at most one session; closing the socket tears it down.

use std::sync::Arc;
use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tokio::sync::watch;
use tracing::{info, error, instrument, debug};

use crate::engine::SessionSnapshot;
use crate::logic::{apply_intent, Intent};
use crate::protocol::{ClientWsMessage, ServerWsMessage};
use crate::session::LiveSession;
use crate::state::AppState;

#[instrument(level = "info", skip(state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "puzzle_rounds", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

/// Connection-local session binding.
#[derive(Default)]
struct Binding {
  live: Option<Arc<LiveSession>>,
  updates: Option<watch::Receiver<SessionSnapshot>>,
}

impl Binding {
  async fn release(&mut self, state: &AppState) {
    self.updates = None;
    if let Some(live) = self.live.take() {
      if let Err(e) = state.remove_session(live.id()).await {
        debug!(target: "puzzle_rounds", error = %e, "WS session already gone");
      }
    }
  }
}

/// Resolves with the next pushed snapshot; pends forever when unbound.
async fn next_update(rx: &mut Option<watch::Receiver<SessionSnapshot>>) -> Option<SessionSnapshot> {
  match rx {
    Some(r) => match r.changed().await {
      Ok(()) => Some(r.borrow_and_update().clone()),
      Err(_) => None,
    },
    None => std::future::pending().await,
  }
}

/// Mark the feed as seen only if its latest value is the one we reply with.
/// A tick that landed after the intent stays unseen and is pushed next.
fn mark_replied(rx: &mut watch::Receiver<SessionSnapshot>, replied: &SessionSnapshot) {
  let same = *rx.borrow() == *replied;
  if same {
    let _ = rx.borrow_and_update();
  }
}

#[instrument(level = "info", skip(socket, state))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  info!(target: "puzzle_rounds", "WebSocket connected");
  let mut binding = Binding::default();

  loop {
    let reply_msg = tokio::select! {
      msg = socket.recv() => match msg {
        Some(Ok(Message::Text(txt))) => {
          // Parse, dispatch, serialize response.
          match serde_json::from_str::<ClientWsMessage>(&txt) {
            Ok(incoming) => {
              debug!(target: "puzzle_rounds", "WS received: {:?}", &incoming);
              handle_client_ws(incoming, &state, &mut binding).await
            }
            Err(e) => ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) },
          }
        }
        Some(Ok(Message::Ping(payload))) => {
          let _ = socket.send(Message::Pong(payload)).await;
          continue;
        }
        Some(Ok(Message::Close(_))) | None | Some(Err(_)) => break,
        Some(Ok(_)) => continue,
      },
      pushed = next_update(&mut binding.updates) => match pushed {
        Some(snapshot) => ServerWsMessage::Snapshot { snapshot },
        None => {
          binding.updates = None;
          continue;
        }
      },
    };

    let out = serde_json::to_string(&reply_msg).unwrap_or_else(|e| {
      serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
    });

    if let Err(e) = socket.send(Message::Text(out)).await {
      error!(target: "puzzle_rounds", error = %e, "WS send error");
      break;
    }
  }

  binding.release(&state).await;
  info!(target: "puzzle_rounds", "WebSocket disconnected");
}

#[instrument(level = "info", skip(state, binding))]
async fn handle_client_ws(msg: ClientWsMessage, state: &AppState, binding: &mut Binding) -> ServerWsMessage {
  let intent = match msg {
    ClientWsMessage::Ping => return ServerWsMessage::Pong,
    ClientWsMessage::Start { game, room_id, seed } => {
      // Starting again replaces whatever this connection was playing.
      binding.release(state).await;
      return match state.create_session(game, room_id, seed).await {
        Ok(live) => {
          let mut rx = live.subscribe();
          let snapshot = rx.borrow_and_update().clone();
          info!(target: "puzzle_rounds", id = %live.id(), ?game, "WS session started");
          binding.live = Some(live);
          binding.updates = Some(rx);
          ServerWsMessage::Snapshot { snapshot }
        }
        Err(e) => ServerWsMessage::Error { message: e.to_string() },
      };
    }
    ClientWsMessage::Answer { answer } => Intent::Answer(answer),
    ClientWsMessage::Hint => Intent::Hint,
    ClientWsMessage::Advance => Intent::Advance,
    ClientWsMessage::Skip => Intent::Skip,
    ClientWsMessage::Reset => Intent::Reset,
    ClientWsMessage::Pause => Intent::Pause,
    ClientWsMessage::Resume => Intent::Resume,
    ClientWsMessage::Select { challenge_id } => Intent::Select(challenge_id),
  };

  let Some(live) = binding.live.clone() else {
    return ServerWsMessage::Error { message: "No session: send a start message first.".into() };
  };
  let result = apply_intent(&live, intent).await;
  if let Some(rx) = binding.updates.as_mut() {
    mark_replied(rx, &result.snapshot);
  }

  match (result.verdict, result.hint) {
    (Some(verdict), _) => ServerWsMessage::Verdict { verdict: Some(verdict), snapshot: result.snapshot },
    (None, Some(text)) => ServerWsMessage::Hint { text: Some(text), snapshot: result.snapshot },
    (None, None) => ServerWsMessage::Snapshot { snapshot: result.snapshot },
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::catalog::Catalog;
  use crate::domain::RoundMode;
  use crate::engine::RoundSession;
  use crate::rng::GameRng;
  use crate::seeds::riddle_challenges;

  fn session() -> RoundSession {
    let catalog = Arc::new(Catalog::new(riddle_challenges()));
    RoundSession::start_session(RoundMode::riddles(), catalog, GameRng::new(5)).unwrap()
  }

  #[test]
  fn reply_snapshot_is_not_pushed_again() {
    let mut s = session();
    let (tx, mut rx) = watch::channel(s.snapshot());
    let _ = rx.borrow_and_update();

    s.reveal_hint();
    let replied = s.snapshot();
    tx.send_replace(replied.clone());
    mark_replied(&mut rx, &replied);
    assert!(!rx.has_changed().unwrap());
  }

  #[test]
  fn tick_after_the_reply_is_still_pushed() {
    let mut s = session();
    let (tx, mut rx) = watch::channel(s.snapshot());
    let _ = rx.borrow_and_update();

    s.reveal_hint();
    let replied = s.snapshot();
    tx.send_replace(replied.clone());
    // The countdown gets the lock before the reply goes out.
    s.tick();
    tx.send_replace(s.snapshot());

    mark_replied(&mut rx, &replied);
    assert!(rx.has_changed().unwrap());
    assert_eq!(rx.borrow_and_update().remaining_seconds, replied.remaining_seconds - 1);
  }
}
