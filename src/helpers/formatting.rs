//! Text formatting utilities for UI display

use std::cmp::Ordering;

/// Formats a media duration as `m:ss`, or `h:mm:ss` once it reaches an hour.
pub fn duration_string(seconds_total: u64) -> String {
    let hours = seconds_total / 3600;
    let minutes = (seconds_total % 3600) / 60;
    let seconds = seconds_total % 60;

    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}

/// First character usable as an initial: a cased letter or an ASCII digit
fn first_letter(word: &str) -> Option<char> {
    word.chars()
        .find(|c| c.is_uppercase() || c.is_lowercase() || c.is_ascii_digit())
}

/// Two-letter placeholder for a chat title, e.g. "Jane Doe" -> "JD".
///
/// Single-word titles yield `None`; the caller falls back to its own
/// rendering for those.
pub fn letters(title: &str) -> Option<String> {
    let mut words = title.split(' ');
    let first = words.next()?;
    let second = words.next()?;

    let initials: String = first_letter(first)
        .into_iter()
        .chain(first_letter(second))
        .collect();
    Some(initials)
}

/// Strict range test, `first < item < last`
pub fn between<T: PartialOrd>(item: &T, first: &T, last: &T) -> bool {
    item > first && item < last
}

/// Compares chat order keys.
///
/// Order keys are decimal strings of arbitrary length, so a longer key is
/// always larger and equal-length keys compare lexicographically.
pub fn order_compare(a: &str, b: &str) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_under_an_hour() {
        assert_eq!(duration_string(0), "0:00");
        assert_eq!(duration_string(65), "1:05");
        assert_eq!(duration_string(599), "9:59");
    }

    #[test]
    fn test_duration_with_hours() {
        assert_eq!(duration_string(3600), "1:00:00");
        assert_eq!(duration_string(3725), "1:02:05");
        assert_eq!(duration_string(36_000 + 11 * 60 + 7), "10:11:07");
    }

    #[test]
    fn test_letters_two_words() {
        assert_eq!(letters("Jane Doe").as_deref(), Some("JD"));
        assert_eq!(letters("(team) 42ers").as_deref(), Some("t4"));
    }

    #[test]
    fn test_letters_single_word_or_empty() {
        assert_eq!(letters("Saved"), None);
        assert_eq!(letters(""), None);
    }

    #[test]
    fn test_letters_skips_symbols() {
        assert_eq!(letters("🚀 Launch").as_deref(), Some("L"));
    }

    #[test]
    fn test_between_is_exclusive() {
        assert!(between(&5, &1, &10));
        assert!(!between(&1, &1, &10));
        assert!(!between(&10, &1, &10));
    }

    #[test]
    fn test_order_compare_length_first() {
        assert_eq!(order_compare("999", "1000"), Ordering::Less);
        assert_eq!(order_compare("1001", "1000"), Ordering::Greater);
        assert_eq!(order_compare("42", "42"), Ordering::Equal);
    }
}
