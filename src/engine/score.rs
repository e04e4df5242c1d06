//! Derived scoring metrics

/// Percentage of correct attempts, rounded. Zero attempts scores 0.
pub fn accuracy_percent(correct: u32, attempted: u32) -> u32 {
    if attempted == 0 {
        return 0;
    }
    ((correct as f64 / attempted as f64) * 100.0).round() as u32
}

/// Typing accuracy: typed characters matching the target at the same
/// position, as a percentage of characters typed. Nothing typed counts
/// as 100.
pub fn typing_accuracy(typed: &str, target: &str) -> u32 {
    let typed_chars: Vec<char> = typed.chars().collect();
    if typed_chars.is_empty() {
        return 100;
    }
    let correct = target
        .chars()
        .zip(typed_chars.iter())
        .filter(|(t, y)| t == *y)
        .count();
    ((correct as f64 / typed_chars.len() as f64) * 100.0).round() as u32
}

/// Words per minute: whitespace-delimited tokens over elapsed minutes,
/// rounded.
pub fn words_per_minute(typed: &str, elapsed_secs: f64) -> u32 {
    if elapsed_secs <= 0.0 {
        return 0;
    }
    let words = typed.split_whitespace().count();
    (words as f64 / (elapsed_secs / 60.0)).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accuracy_rounds() {
        assert_eq!(accuracy_percent(4, 5), 80);
        assert_eq!(accuracy_percent(1, 3), 33);
        assert_eq!(accuracy_percent(2, 3), 67);
        assert_eq!(accuracy_percent(0, 0), 0);
    }

    #[test]
    fn typing_accuracy_matches_positions() {
        assert_eq!(typing_accuracy("abXde", "abcde"), 80);
        assert_eq!(typing_accuracy("", "abcde"), 100);
        assert_eq!(typing_accuracy("abcde", "abcde"), 100);
        // Typing past the end of the target counts against accuracy.
        assert_eq!(typing_accuracy("abcdef", "abcde"), 83);
    }

    #[test]
    fn typing_accuracy_is_char_based() {
        // Cyrillic: one char per letter, not one byte.
        assert_eq!(typing_accuracy("привет", "привет"), 100);
        assert_eq!(typing_accuracy("праветт", "привет"), 71);
    }

    #[test]
    fn wpm_example() {
        // 4 words in 30 seconds -> 8 WPM
        assert_eq!(words_per_minute("the quick brown fox", 30.0), 8);
        assert_eq!(words_per_minute("", 30.0), 0);
        assert_eq!(words_per_minute("one two", 0.0), 0);
    }
}
