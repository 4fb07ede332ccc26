//! Small utility helpers used across modules.

/// Canonical form used for answer comparison:
/// trimmed, lowercased, internal whitespace runs collapsed to one space.
pub fn normalize_answer(s: &str) -> String {
  s.split_whitespace()
    .map(|w| w.to_lowercase())
    .collect::<Vec<_>>()
    .join(" ")
}

/// Log-safe truncation for large strings.
/// Avoids spamming logs with huge answer payloads.
pub fn trunc_for_log(s: &str, max: usize) -> String {
  if s.len() <= max {
    return s.to_string();
  }
  let mut cut = max;
  while !s.is_char_boundary(cut) { cut -= 1; }
  format!("{}… ({} bytes total)", &s[..cut], s.len())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn normalizes_case_padding_and_inner_spacing() {
    assert_eq!(normalize_answer(" Hello  World "), "hello world");
    assert_eq!(normalize_answer("Lion\tKing\n"), "lion king");
    assert_eq!(normalize_answer("   "), "");
  }

  #[test]
  fn emoji_answers_survive_normalization() {
    assert_eq!(normalize_answer(" 🌟 "), "🌟");
  }

  #[test]
  fn truncation_respects_char_boundaries() {
    let s = "ééééé";
    let t = trunc_for_log(s, 3);
    assert!(t.starts_with("é"));
    assert!(t.contains("10 bytes total"));
    assert_eq!(trunc_for_log("short", 10), "short");
  }
}
