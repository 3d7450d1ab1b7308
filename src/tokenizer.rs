//! Tokenizer shared by every document in a comparison batch.
//!
//! Lowercases the text, splits on any non-alphanumeric character and drops
//! tokens shorter than [`MIN_TOKEN_CHARS`]. Content that yields no qualifying
//! token simply contributes nothing.

/// Minimum token length, counted in characters.
pub const MIN_TOKEN_CHARS: usize = 2;

/// Tokenize text into lowercase alphanumeric terms.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| token.chars().count() >= MIN_TOKEN_CHARS)
        .map(str::to_string)
        .collect()
}
