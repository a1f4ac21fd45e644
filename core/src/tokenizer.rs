use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref NON_TOKEN: Regex = Regex::new(r"[^a-z0-9.\s]").expect("valid regex");
}

/// Lowercase, blank out every character outside `[a-z0-9.]` and whitespace, trim.
/// Dots are kept so "powerconnect.ai" stays a single token.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    NON_TOKEN.replace_all(&lowered, " ").trim().to_string()
}

/// Split normalized text on whitespace runs.
pub fn tokenize(text: &str) -> Vec<String> {
    normalize(text).split_whitespace().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_tokenize() {
        assert_eq!(tokenize("PowerConnect.AI!!"), vec!["powerconnect.ai"]);
    }

    #[test]
    fn empty_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("  !!?  ").is_empty());
    }
}
