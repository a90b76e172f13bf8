//! Table formatting utilities for CLI output.

/// Truncates a string to at most `max_chars` characters, adding "..." if needed.
///
/// # Examples
///
/// ```rust
/// use chainchat_cli::presentation::truncate_string;
///
/// assert_eq!(truncate_string("Hello", 10), "Hello");
/// assert_eq!(truncate_string("Hello World", 8), "Hello...");
/// ```
pub fn truncate_string(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

/// Print a horizontal separator line.
pub fn print_separator(width: usize) {
    println!("{}", "-".repeat(width));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_counts_characters() {
        assert_eq!(truncate_string("Bremsklötze prüfen", 10), "Bremskl...");
        assert_eq!(truncate_string("short", 5), "short");
    }
}
