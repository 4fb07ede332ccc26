//! Puzzle round engine: timed challenges with hints, streaks and scoring,
//! shared by the lip-reading, visual-riddle and escape-room games.
//!
//! The engine core (`catalog`, `engine`, `scoring`) is synchronous and free of
//! I/O. `timer` and `session` drive it on tokio; `routes` exposes it over
//! HTTP + WebSocket.

pub mod catalog;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod logic;
pub mod protocol;
pub mod rng;
pub mod routes;
pub mod scoring;
pub mod seeds;
pub mod session;
pub mod state;
pub mod telemetry;
pub mod timer;
pub mod util;

pub use routes::build_router;
