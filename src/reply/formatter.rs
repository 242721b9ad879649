// Response formatting

use crate::sandbox::ExecutionResult;

/// Wrap text in a pre-formatted block
pub fn pre(text: &str) -> String {
    format!("```{}```", text)
}

/// Keep at most `max_chars` characters, dropping the tail
pub fn crop(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Reply body for a finished run: cropped, then pre-formatted
pub fn format_result(result: &ExecutionResult, crop_chars: usize) -> String {
    pre(crop(&result.reply_text(), crop_chars))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crop_shorter_is_unchanged() {
        assert_eq!(crop("hello", 10), "hello");
        assert_eq!(crop("hello", 5), "hello");
        assert_eq!(crop("", 3), "");
    }

    #[test]
    fn test_crop_drops_tail() {
        assert_eq!(crop("hello world", 5), "hello");
        assert_eq!(crop("abc", 0), "");
    }

    #[test]
    fn test_crop_counts_characters() {
        let text = "héllo wörld";
        let cropped = crop(text, 7);
        assert_eq!(cropped, "héllo w");
        assert_eq!(cropped.chars().count(), 7);
    }

    #[test]
    fn test_crop_never_exceeds_limit() {
        let text = "x;".repeat(400);
        for limit in [0, 1, 2, 17, 512, 799, 800, 1000] {
            assert!(crop(&text, limit).chars().count() <= limit);
        }
    }

    #[test]
    fn test_pre_wraps_text() {
        assert_eq!(pre("6"), "```6```");
    }

    #[test]
    fn test_format_result_crops_before_wrapping() {
        let result = ExecutionResult {
            combined_output: "a".repeat(20),
            stderr: String::new(),
            exit_code: 0,
        };
        assert_eq!(format_result(&result, 4), "```aaaa```");
    }
}
