//! Direct pattern matching, run before any classification or
//! generative call.
//!
//! Two patterns are recognized: an isolated 6-digit PIN code (which
//! outranks every other route) and the lexical joke trigger.

/// Extract the first maximal run of exactly six decimal digits.
///
/// Runs of any other length never match, and a qualifying run must not
/// be adjacent to further digits ("1100012" has a 7-digit run, no
/// match). Rust's regex crate has no lookbehind, so this is a plain
/// digit-run scan.
pub fn extract_pin_code(message: &str) -> Option<String> {
    let bytes = message.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i].is_ascii_digit() {
            let start = i;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            if i - start == 6 {
                return Some(message[start..i].to_string());
            }
        } else {
            i += 1;
        }
    }
    None
}

/// Lexical joke trigger: the word "joke" anywhere, case-insensitive.
pub fn is_joke_request(message: &str) -> bool {
    message.to_lowercase().contains("joke")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_pin_code() {
        assert_eq!(extract_pin_code("110001"), Some("110001".to_string()));
    }

    #[test]
    fn test_pin_code_inside_sentence() {
        assert_eq!(
            extract_pin_code("tell me about 400001 please"),
            Some("400001".to_string())
        );
    }

    #[test]
    fn test_longer_digit_run_does_not_match() {
        assert_eq!(extract_pin_code("1100012"), None);
        assert_eq!(extract_pin_code("my number is 9876543210"), None);
    }

    #[test]
    fn test_shorter_digit_run_does_not_match() {
        assert_eq!(extract_pin_code("call 110"), None);
        assert_eq!(extract_pin_code("12345"), None);
    }

    #[test]
    fn test_first_qualifying_run_wins() {
        assert_eq!(
            extract_pin_code("1234567 then 700001 then 600001"),
            Some("700001".to_string())
        );
    }

    #[test]
    fn test_digits_split_by_punctuation_are_separate_runs() {
        // "110001." ends the run at six digits; the dot is not a digit
        assert_eq!(extract_pin_code("PIN 110001."), Some("110001".to_string()));
        // two 3-digit runs, not one 6-digit run
        assert_eq!(extract_pin_code("110-001"), None);
    }

    #[test]
    fn test_no_digits() {
        assert_eq!(extract_pin_code("hello there"), None);
    }

    #[test]
    fn test_joke_trigger() {
        assert!(is_joke_request("tell me a joke"));
        assert!(is_joke_request("Got any JOKES?"));
        assert!(!is_joke_request("how do I apply for a ration card"));
    }
}
