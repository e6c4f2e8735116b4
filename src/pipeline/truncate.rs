use tracing::debug;

/// Literal marker appended when input is cut to the character budget.
pub const TRUNCATION_MARKER: &str = "... [truncated]";

/// Find the largest byte index <= `index` that is a char boundary in `s`.
fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    let mut i = index;
    while i > 0 && !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

/// Bound text to `max_chars` bytes. Returns the input unchanged when it
/// fits; otherwise cuts at a UTF-8 boundary and appends the marker.
/// Output length is always <= max_chars + marker length.
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.len() <= max_chars {
        return text.to_string();
    }
    debug!("Truncating input text to {} characters", max_chars);
    let end = floor_char_boundary(text, max_chars);
    format!("{}{}", &text[..end], TRUNCATION_MARKER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_unchanged() {
        assert_eq!(truncate("hello", 10), "hello");
    }

    #[test]
    fn test_exact_length_unchanged() {
        assert_eq!(truncate("hello", 5), "hello");
    }

    #[test]
    fn test_long_text_gets_marker() {
        let out = truncate("hello world", 5);
        assert_eq!(out, format!("hello{}", TRUNCATION_MARKER));
    }

    #[test]
    fn test_length_bound_holds() {
        for max in [0usize, 1, 3, 7, 100] {
            let text = "x".repeat(200);
            let out = truncate(&text, max);
            assert!(out.len() <= max + TRUNCATION_MARKER.len());
        }
    }

    #[test]
    fn test_zero_budget() {
        let out = truncate("abc", 0);
        assert_eq!(out, TRUNCATION_MARKER);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(truncate("", 0), "");
        assert_eq!(truncate("", 100), "");
    }

    #[test]
    fn test_multibyte_boundary_not_split() {
        // 'é' is 2 bytes; cutting at byte 1 must floor to 0
        let out = truncate("étude étude étude", 1);
        assert_eq!(out, TRUNCATION_MARKER);

        // cut inside the second 'é' (bytes 3..5)
        let text = "aaé-and-much-more-text";
        let out = truncate(text, 3);
        assert!(out.starts_with("aa"));
        assert!(out.ends_with(TRUNCATION_MARKER));
        assert!(out.len() <= 3 + TRUNCATION_MARKER.len());
    }

    #[test]
    fn test_deterministic() {
        let text = "some legacy servlet code".repeat(10);
        assert_eq!(truncate(&text, 50), truncate(&text, 50));
    }
}
