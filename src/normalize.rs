//! Item-name normalization.
//!
//! The normalized form is the sole identity rule for pantry items: two raw
//! inputs that normalize to the same string refer to the same item. There is
//! no fuzzy matching, pluralization handling, or synonym resolution.

/// Canonicalizes a raw item name: surrounding whitespace trimmed, first
/// character uppercased, the rest lowercased.
///
/// Internal whitespace, punctuation, and non-ASCII characters pass through
/// unchanged. A whitespace-only input yields the empty string; rejecting it
/// is the caller's responsibility.
pub fn normalize(raw: &str) -> String {
    let trimmed = raw.trim();
    let mut chars = trimmed.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
    }
}
