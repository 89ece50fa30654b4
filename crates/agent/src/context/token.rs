//! Token estimation utilities.
//!
//! Uses a character-based heuristic: ~4 characters per token, rounded up.
//! This overestimates relative to BPE tokenizers on English text, which is
//! the safe direction for a budget: under-filling is acceptable, overflow
//! is not.

use super::scoring::ScoredEntry;

/// Characters per token.
const CHARS_PER_TOKEN: usize = 4;

/// Estimate the token count for a string.
///
/// Heuristic: 1 token ≈ 4 characters. Rounds up.
pub fn estimate_tokens(text: &str) -> usize {
    if text.is_empty() {
        return 0;
    }
    text.chars().count().div_ceil(CHARS_PER_TOKEN)
}

/// Sum token estimates for a slice of strings.
pub fn estimate_slice_tokens<S: AsRef<str>>(items: &[S]) -> usize {
    items.iter().map(|s| estimate_tokens(s.as_ref())).sum()
}

/// Sum the precomputed token counts of scored entries.
pub fn total_entry_tokens(entries: &[ScoredEntry]) -> usize {
    entries.iter().map(|e| e.tokens).sum()
}
