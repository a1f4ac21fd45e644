//! Typo-tolerant term matching against a tokenized field.

use crate::tokenizer::tokenize;

/// Largest length difference worth running the edit-distance DP for.
/// Distance <= 1 already implies a difference <= 1, so this never rejects a hit.
const MAX_LEN_DIFF: usize = 2;
const MAX_EDITS: usize = 1;

/// Tokens of one document field plus their space-joined form.
#[derive(Debug, Clone, Default)]
pub struct FieldTokens {
    tokens: Vec<String>,
    joined: String,
}

impl FieldTokens {
    pub fn new(tokens: Vec<String>) -> Self {
        let joined = tokens.join(" ");
        Self { tokens, joined }
    }

    pub fn from_text(text: &str) -> Self { Self::new(tokenize(text)) }

    pub fn tokens(&self) -> &[String] { &self.tokens }

    pub fn is_empty(&self) -> bool { self.tokens.is_empty() }

    /// Substring of the joined field, or one edit away from a single token.
    pub fn hits(&self, term: &str) -> bool {
        if self.joined.contains(term) {
            return true;
        }
        let term_len = term.chars().count();
        self.tokens.iter().any(|t| {
            t.chars().count().abs_diff(term_len) <= MAX_LEN_DIFF && levenshtein(t, term) <= MAX_EDITS
        })
    }
}

pub fn matches<S: AsRef<str>>(doc_tokens: &[S], term: &str) -> bool {
    let tokens = doc_tokens.iter().map(|t| t.as_ref().to_string()).collect();
    FieldTokens::new(tokens).hits(term)
}

/// Unit-cost edit distance over chars, single-row DP.
pub fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.chars().count();
    }

    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, ac) in a.chars().enumerate() {
        let mut diag = row[0];
        row[0] = i + 1;
        for (j, bc) in b.iter().enumerate() {
            let above = row[j + 1];
            let cost = if ac == *bc { 0 } else { 1 };
            row[j + 1] = (above + 1).min(row[j] + 1).min(diag + cost);
            diag = above;
        }
    }
    row[b.len()]
}
