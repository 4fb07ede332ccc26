// tests/game_modes.rs
//
// The three game presets played against their built-in catalogs.

use std::sync::Arc;

use puzzle_rounds::catalog::Catalog;
use puzzle_rounds::domain::{AttemptPolicy, RoundMode, SessionStatus, TimerScope};
use puzzle_rounds::engine::RoundSession;
use puzzle_rounds::rng::GameRng;
use puzzle_rounds::seeds::{escape_rooms, lip_reading_challenges, riddle_challenges};

fn lip_reading() -> RoundSession {
    let catalog = Arc::new(Catalog::new(lip_reading_challenges()));
    RoundSession::start_session(RoundMode::lip_reading(), catalog, GameRng::new(1)).unwrap()
}

fn answer_of(s: &RoundSession) -> String {
    s.active_challenge().unwrap().answer_key.clone()
}

#[test]
fn lip_reading_hints_cost_points() {
    let mut s = lip_reading();
    assert_eq!(s.active_challenge().unwrap().id, "lip-1");
    assert_eq!(s.remaining_seconds(), 30);

    s.reveal_hint().unwrap();
    s.reveal_hint().unwrap();
    let answer = answer_of(&s);
    let v = s.submit_answer(&answer).unwrap();
    assert!(v.correct);
    assert_eq!(v.points_awarded, 6);
    assert_eq!(s.history()[0].hints_used_at_submission, 2);
}

#[test]
fn lip_reading_levels_up_after_three_in_a_row() {
    let mut s = lip_reading();
    for _ in 0..3 {
        let answer = answer_of(&s);
        assert!(s.submit_answer(&answer).unwrap().correct);
        assert!(s.advance());
    }
    assert_eq!(s.level(), 2);
    assert_eq!(s.streak(), 3);
    // The catalog wraps around instead of ending the round.
    assert_eq!(s.active_challenge().unwrap().id, "lip-1");
    assert_eq!(s.status(), SessionStatus::InProgress);
}

#[test]
fn lip_reading_clock_runs_out() {
    let mut s = lip_reading();
    for _ in 0..29 {
        s.tick();
    }
    assert_eq!(s.status(), SessionStatus::InProgress);
    s.tick();
    assert_eq!(s.status(), SessionStatus::Failed);
    assert_eq!(s.remaining_seconds(), 0);

    let answer = answer_of(&s);
    assert!(s.submit_answer(&answer).is_none());
    assert_eq!(s.cumulative_score(), 0);
}

#[test]
fn riddles_replay_under_the_same_seed() {
    let catalog = Arc::new(Catalog::new(riddle_challenges()));
    let play = |seed: u64| {
        let mut s = RoundSession::start_session(RoundMode::riddles(), catalog.clone(), GameRng::new(seed)).unwrap();
        let mut order = vec![s.active_challenge().unwrap().id.clone()];
        for _ in 0..5 {
            let answer = answer_of(&s);
            s.submit_answer(&answer).unwrap();
            s.advance();
            order.push(s.active_challenge().unwrap().id.clone());
        }
        order
    };
    let first = play(42);
    assert_eq!(first, play(42));
    // Random selection never repeats the challenge just played.
    assert!(first.windows(2).all(|w| w[0] != w[1]));
}

#[test]
fn escape_room_runs_on_one_shared_clock() {
    let room = escape_rooms().into_iter().find(|r| r.id == 1).unwrap();
    let seconds = room.time_limit_seconds;
    let catalog = Arc::new(Catalog::new(room.puzzles));
    let mut s = RoundSession::start_session(RoundMode::escape_room(seconds), catalog, GameRng::new(3)).unwrap();
    assert_eq!(s.remaining_seconds(), seconds);
    assert_eq!(s.mode().attempts, AttemptPolicy::Unlimited);
    assert_eq!(s.mode().timer, TimerScope::Shared { seconds });

    for _ in 0..10 {
        s.tick();
    }
    let answer = answer_of(&s);
    s.submit_answer(&answer).unwrap();
    assert!(s.advance());
    // The next puzzle inherits the room's remaining time.
    assert_eq!(s.remaining_seconds(), seconds - 10);
    assert_eq!(s.solved_count(), 1);
}
