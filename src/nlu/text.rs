/// Lowercase, trim, and collapse internal whitespace. Every keyword and
/// pattern match in this module tree runs on the output of this function.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Whole-token containment, so "all" does not hide inside "call".
pub fn contains_word(haystack: &str, word: &str) -> bool {
    haystack
        .split(|c: char| !c.is_alphanumeric())
        .any(|token| token == word)
}
