// tests/ws_api.rs
//
// Serves the router on an ephemeral port and drives `/ws` with a real client.
// Sessions tick every 50ms here so pushed snapshots show up quickly.

use std::{sync::Arc, time::Duration};

use futures_util::{SinkExt, StreamExt};
use puzzle_rounds::{build_router, config::EngineConfig, state::AppState};
use serde_json::{json, Value};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::{sleep, timeout};
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn serve() -> (Arc<AppState>, String) {
    let state = Arc::new(AppState::with_config(EngineConfig::default(), Duration::from_millis(50)));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = build_router(state.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (state, format!("ws://{addr}/ws"))
}

async fn connect(url: &str) -> Client {
    connect_async(url).await.unwrap().0
}

async fn send(ws: &mut Client, v: Value) {
    ws.send(Message::Text(v.to_string())).await.unwrap();
}

async fn recv(ws: &mut Client) -> Value {
    loop {
        let msg = timeout(Duration::from_secs(5), ws.next())
            .await
            .expect("server went quiet")
            .unwrap()
            .unwrap();
        if let Message::Text(text) = msg {
            return serde_json::from_str(&text).unwrap();
        }
    }
}

/// Read until a message of type `kind` arrives, skipping pushed snapshots.
async fn recv_kind(ws: &mut Client, kind: &str) -> Value {
    loop {
        let v = recv(ws).await;
        if v["type"] == json!(kind) {
            return v;
        }
    }
}

#[tokio::test]
async fn intents_need_a_started_session() {
    let (_state, url) = serve().await;
    let mut ws = connect(&url).await;

    send(&mut ws, json!({ "type": "answer", "answer": "lion king" })).await;
    let v = recv(&mut ws).await;
    assert_eq!(v["type"], json!("error"));
    assert!(v["message"].as_str().unwrap().contains("No session"));

    send(&mut ws, json!({ "type": "ping" })).await;
    assert_eq!(recv(&mut ws).await["type"], json!("pong"));

    ws.send(Message::Text("{not json".into())).await.unwrap();
    assert_eq!(recv(&mut ws).await["type"], json!("error"));
}

#[tokio::test]
async fn start_replies_then_ticks_are_pushed() {
    let (_state, url) = serve().await;
    let mut ws = connect(&url).await;

    send(&mut ws, json!({ "type": "start", "game": "riddles", "seed": 3 })).await;
    let started = recv(&mut ws).await;
    assert_eq!(started["type"], json!("snapshot"));
    let snap = &started["snapshot"];
    assert_eq!(snap["status"], json!("in_progress"));
    let limit = snap["timeLimitSeconds"].as_u64().unwrap();
    let at_start = snap["remainingSeconds"].as_u64().unwrap();
    assert!(at_start <= limit);

    // No request in flight: this one comes from the countdown.
    let pushed = recv(&mut ws).await;
    assert_eq!(pushed["type"], json!("snapshot"));
    assert!(pushed["snapshot"]["remainingSeconds"].as_u64().unwrap() < at_start);

    send(&mut ws, json!({ "type": "hint" })).await;
    let hint = recv_kind(&mut ws, "hint").await;
    assert!(hint["text"].is_string());
    assert_eq!(hint["snapshot"]["hintsRevealed"], json!(1));
}

#[tokio::test]
async fn disconnect_tears_the_session_down() {
    let (state, url) = serve().await;
    let mut ws = connect(&url).await;

    send(&mut ws, json!({ "type": "start", "game": "escape_room", "roomId": 1 })).await;
    assert_eq!(recv(&mut ws).await["type"], json!("snapshot"));
    assert_eq!(state.session_count().await, 1);

    // Starting again replaces the connection's session.
    send(&mut ws, json!({ "type": "start", "game": "lip_reading" })).await;
    recv_kind(&mut ws, "snapshot").await;
    assert_eq!(state.session_count().await, 1);

    ws.close(None).await.unwrap();
    drop(ws);

    let mut left = state.session_count().await;
    for _ in 0..100 {
        if left == 0 {
            break;
        }
        sleep(Duration::from_millis(20)).await;
        left = state.session_count().await;
    }
    assert_eq!(left, 0);
}
