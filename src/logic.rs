//! Core behaviors shared by both HTTP and WebSocket handlers.
//!
//! Every inbound intent funnels through `apply_intent`, which forwards it to
//! the live session and packs the outcome into one reply shape.

use tracing::{info, instrument};

use crate::domain::Verdict;
use crate::engine::SessionSnapshot;
use crate::session::LiveSession;

/// Intents the presentation shell can dispatch into a running session.
#[derive(Clone, Debug)]
pub enum Intent {
  Answer(String),
  Hint,
  Advance,
  Skip,
  Reset,
  Pause,
  Resume,
  Select(String),
}

impl Intent {
  fn name(&self) -> &'static str {
    match self {
      Intent::Answer(_) => "answer",
      Intent::Hint => "hint",
      Intent::Advance => "advance",
      Intent::Skip => "skip",
      Intent::Reset => "reset",
      Intent::Pause => "pause",
      Intent::Resume => "resume",
      Intent::Select(_) => "select",
    }
  }
}

#[derive(Clone, Debug)]
pub struct IntentResult {
  pub changed: bool,
  pub verdict: Option<Verdict>,
  pub hint: Option<String>,
  pub snapshot: SessionSnapshot,
}

impl IntentResult {
  fn plain(changed: bool, snapshot: SessionSnapshot) -> Self {
    Self { changed, verdict: None, hint: None, snapshot }
  }
}

#[instrument(level = "info", skip(live, intent), fields(session = %live.id(), intent = intent.name()))]
pub async fn apply_intent(live: &LiveSession, intent: Intent) -> IntentResult {
  let result = match intent {
    Intent::Answer(answer) => {
      let (verdict, snapshot) = live.submit_answer(&answer).await;
      IntentResult { changed: verdict.is_some(), verdict, hint: None, snapshot }
    }
    Intent::Hint => {
      let (hint, snapshot) = live.reveal_hint().await;
      IntentResult { changed: hint.is_some(), verdict: None, hint, snapshot }
    }
    Intent::Advance => {
      let (changed, snapshot) = live.advance().await;
      IntentResult::plain(changed, snapshot)
    }
    Intent::Skip => {
      let (changed, snapshot) = live.skip().await;
      IntentResult::plain(changed, snapshot)
    }
    Intent::Reset => IntentResult::plain(true, live.reset().await),
    Intent::Pause => {
      let (changed, snapshot) = live.pause().await;
      IntentResult::plain(changed, snapshot)
    }
    Intent::Resume => {
      let (changed, snapshot) = live.resume().await;
      IntentResult::plain(changed, snapshot)
    }
    Intent::Select(id) => {
      let (changed, snapshot) = live.select_challenge(&id).await;
      IntentResult::plain(changed, snapshot)
    }
  };
  info!(target: "puzzle_rounds", changed = result.changed, status = ?result.snapshot.status, score = result.snapshot.cumulative_score, "intent applied");
  result
}
