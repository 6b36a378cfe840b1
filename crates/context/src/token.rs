//! Token estimation for assembled context.
//!
//! The compressor never calls a tokenizer; a ~4 characters/token heuristic
//! is close enough to size prompts and compare detail levels. Exact counts
//! come back from the provider with each completion.

/// Estimate the token count for a string. One token per four characters,
/// rounded up; the empty string is zero tokens.
pub fn estimate_tokens(text: &str) -> usize {
    if text.is_empty() {
        return 0;
    }
    (text.len() + 3) / 4
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_is_zero() {
        assert_eq!(estimate_tokens(""), 0);
    }

    #[test]
    fn rounds_up_to_whole_tokens() {
        assert_eq!(estimate_tokens("task"), 1);
        assert_eq!(estimate_tokens("tasks"), 2);
        assert_eq!(estimate_tokens(&"x".repeat(200)), 50);
    }
}
