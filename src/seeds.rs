//! Built-in catalogs: the sample content every game ships with.

use crate::domain::{Challenge, Room};

const LIP_READING_PROMPT: &str = "Watch carefully and guess what's being said";
const LIP_READING_SECONDS: u32 = 30;

fn phrase(id: &str, clip: &str, answer: &str, hints: [&str; 3], tier: u8, points: u32) -> Challenge {
  Challenge {
    id: id.into(),
    title: None,
    category: "phrase".into(),
    prompt: LIP_READING_PROMPT.into(),
    visual_clue: clip.into(),
    answer_key: answer.into(),
    choices: None,
    hints: hints.iter().map(|h| h.to_string()).collect(),
    difficulty_tier: tier,
    base_points: points,
    time_limit_seconds: LIP_READING_SECONDS,
  }
}

pub fn lip_reading_challenges() -> Vec<Challenge> {
  vec![
    phrase(
      "lip-1",
      "Person saying: 'Hello, how are you today?'",
      "hello how are you today",
      ["Greeting phrase", "Question about wellbeing", "Common daily expression"],
      1,
      10,
    ),
    phrase(
      "lip-2",
      "Person saying: 'Thank you very much'",
      "thank you very much",
      ["Expression of gratitude", "Very polite", "Four words"],
      1,
      10,
    ),
    phrase(
      "lip-3",
      "Person saying: 'What time is the meeting?'",
      "what time is the meeting",
      ["Question about schedule", "Asking for specific time", "Work related"],
      2,
      20,
    ),
  ]
}

#[allow(clippy::too_many_arguments)]
fn riddle(
  id: &str,
  category: &str,
  tier: u8,
  question: &str,
  clue: &str,
  answer: &str,
  hints: [&str; 3],
  points: u32,
  seconds: u32,
) -> Challenge {
  Challenge {
    id: id.into(),
    title: None,
    category: category.into(),
    prompt: question.into(),
    visual_clue: clue.into(),
    answer_key: answer.into(),
    choices: None,
    hints: hints.iter().map(|h| h.to_string()).collect(),
    difficulty_tier: tier,
    base_points: points,
    time_limit_seconds: seconds,
  }
}

pub fn riddle_challenges() -> Vec<Challenge> {
  vec![
    riddle("riddle-1", "emoji", 1, "What movie does this represent?", "👑 + 🦁 + 🌍 = ?", "lion king",
      ["Disney movie", "African setting", "Royal animal"], 10, 30),
    riddle("riddle-2", "emoji", 1, "What phrase does this represent?", "🌧️ + 🐱 + 🐶 = ?", "raining cats and dogs",
      ["Common saying", "About weather", "Not literal"], 15, 25),
    riddle("riddle-3", "pattern", 2, "What comes next in this sequence?", "🔴 ⚫ 🔴 ⚫ 🔴 ?", "black",
      ["Alternating pattern", "Two colors", "Next should be different"], 20, 20),
    riddle("riddle-4", "emoji", 2, "What food dish is this?", "🍞 + 🧀 + 🍅 + 🔥 = ?", "grilled cheese",
      ["Cooked sandwich", "Melted dairy", "Often paired with soup"], 25, 20),
    riddle("riddle-5", "visual", 3, "What number do you see?", "⚫⚫⚫\n⚫⚪⚫\n⚫⚫⚫", "8",
      ["Look at the shape", "Digital display style", "Single digit"], 30, 15),
    riddle("riddle-6", "emoji", 3, "What movie is this?", "🕷️ + 👨 + 🏠 = ?", "spider man",
      ["Superhero movie", "Marvel character", "Web slinger"], 35, 15),
  ]
}

#[allow(clippy::too_many_arguments)]
fn puzzle(
  id: &str,
  category: &str,
  title: &str,
  description: &str,
  clue: &str,
  options: [&str; 4],
  answer: &str,
  tier: u8,
  points: u32,
  room_seconds: u32,
) -> Challenge {
  Challenge {
    id: id.into(),
    title: Some(title.into()),
    category: category.into(),
    prompt: description.into(),
    visual_clue: clue.into(),
    answer_key: answer.into(),
    choices: Some(options.iter().map(|o| o.to_string()).collect()),
    hints: vec![],
    difficulty_tier: tier,
    base_points: points,
    time_limit_seconds: room_seconds,
  }
}

pub fn escape_rooms() -> Vec<Room> {
  vec![
    Room {
      id: 1,
      name: "The Symbol Sanctuary".into(),
      theme: "Ancient Symbols".into(),
      description: "Decode mysterious symbols to unlock the chamber".into(),
      time_limit_seconds: 300,
      puzzles: vec![
        puzzle("room1-1", "symbol", "Ancient Lock", "Match the symbols to unlock the first gate",
          "🔺 + 🔴 + ⭐ = ?", ["🌟", "🔥", "⚡", "🎯"], "🌟", 1, 50, 300),
        puzzle("room1-2", "pattern", "Symbol Sequence", "Continue the pattern to reveal the next clue",
          "🌙 ➡️ ⭐ ➡️ ☀️ ➡️ ?", ["🌙", "🌍", "🔥", "💫"], "🌍", 2, 75, 300),
        puzzle("room1-3", "logic", "Final Symbol", "Use all previous clues to find the master key",
          "If 🔺=3, 🔴=1, ⭐=5, then 🔺+🔴+⭐ = ?", ["7", "8", "9", "10"], "9", 3, 100, 300),
      ],
    },
    Room {
      id: 2,
      name: "The Emoji Enigma".into(),
      theme: "Modern Puzzles".into(),
      description: "Solve emoji-based riddles and visual puzzles".into(),
      time_limit_seconds: 240,
      puzzles: vec![
        puzzle("room2-1", "sequence", "Emoji Story", "What does this emoji sequence represent?",
          "👑 + 🏰 + 🐸 + 💋 = ?", ["Fairy Tale", "Royal Wedding", "Princess Story", "Magic Spell"],
          "Princess Story", 2, 60, 240),
        puzzle("room2-2", "logic", "Emoji Math", "Solve the emoji equation",
          "🍎 + 🍎 = 10, 🍌 = 5, 🍎 + 🍌 = ?", ["10", "15", "8", "12"], "10", 2, 80, 240),
      ],
    },
  ]
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashSet;

  #[test]
  fn ids_are_unique_across_all_catalogs() {
    let mut ids = HashSet::new();
    let rooms = escape_rooms();
    let all = lip_reading_challenges()
      .into_iter()
      .chain(riddle_challenges())
      .chain(rooms.into_iter().flat_map(|r| r.puzzles));
    for c in all {
      assert!(ids.insert(c.id.clone()), "duplicate id {}", c.id);
    }
  }

  #[test]
  fn closed_form_answers_are_among_choices() {
    for room in escape_rooms() {
      for p in room.puzzles {
        let choices = p.choices.expect("escape puzzles are multiple choice");
        assert!(choices.contains(&p.answer_key), "{} answer not offered", p.id);
      }
    }
  }
}
