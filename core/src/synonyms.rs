//! Alias expansion for brand names.
//!
//! Each declared family maps a base term to its variants. Every normalized
//! member of a family becomes a lookup key pointing at the whole family, so a
//! query for any variant also searches for all the others.
//!
//! When a term is declared in more than one family the later declaration
//! replaces the earlier one for that key. Families are not merged.

use crate::tokenizer::normalize;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

/// Normalized members of one family.
pub type SynonymGroup = Arc<BTreeSet<String>>;

/// Brand families of the deployed corpus.
pub const BUILTIN_FAMILIES: &[(&str, &[&str])] = &[
    ("pcai", &["pcai", "powerconnect", "powerconnectai", "powerconnect.ai", "power connect ai"]),
    ("powerconnect.ai", &["powerconnect.ai", "pcai", "powerconnect", "powerconnectai", "power connect ai"]),
    ("powerconnect", &["powerconnect", "pcai", "powerconnect.ai", "powerconnectai", "power connect ai"]),
    ("bhc", &["bhc", "bhcglobal", "bhc global"]),
    ("bhc global", &["bhc global", "bhc", "bhcglobal"]),
];

/// Frozen alias -> family lookup.
#[derive(Debug, Clone, Default)]
pub struct SynonymTable {
    lookup: HashMap<String, SynonymGroup>,
}

impl SynonymTable {
    pub fn new() -> Self { Self::default() }

    pub fn builtin() -> Self {
        Self::from_families(BUILTIN_FAMILIES.iter().map(|(base, variants)| (*base, variants.iter().copied())))
    }

    /// Build the lookup from `(base, variants)` declarations in order.
    pub fn from_families<'a, F, V>(families: F) -> Self
    where
        F: IntoIterator<Item = (&'a str, V)>,
        V: IntoIterator<Item = &'a str>,
    {
        let mut lookup: HashMap<String, SynonymGroup> = HashMap::new();
        for (base, variants) in families {
            let group: BTreeSet<String> = std::iter::once(base)
                .chain(variants)
                .map(normalize)
                .filter(|term| !term.is_empty())
                .collect();
            let group = Arc::new(group);
            for term in group.iter() {
                lookup.insert(term.clone(), Arc::clone(&group));
            }
        }
        Self { lookup }
    }

    pub fn group(&self, term: &str) -> Option<&BTreeSet<String>> {
        self.lookup.get(term).map(|g| g.as_ref())
    }

    pub fn len(&self) -> usize { self.lookup.len() }

    pub fn is_empty(&self) -> bool { self.lookup.is_empty() }

    /// Union every token with its family. Output keeps first-seen order and has no duplicates.
    pub fn expand<S: AsRef<str>>(&self, tokens: &[S]) -> Vec<String> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut out: Vec<String> = Vec::new();
        for token in tokens {
            let token = token.as_ref();
            if seen.insert(token) {
                out.push(token.to_string());
            }
            if let Some(group) = self.lookup.get(token) {
                for term in group.iter() {
                    if seen.insert(term.as_str()) {
                        out.push(term.clone());
                    }
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn as_set(v: Vec<String>) -> BTreeSet<String> { v.into_iter().collect() }

    #[test]
    fn unknown_tokens_pass_through() {
        let table = SynonymTable::builtin();
        assert_eq!(table.expand(&["grid", "analytics"]), vec!["grid", "analytics"]);
    }

    #[test]
    fn expansion_is_symmetric() {
        let table = SynonymTable::builtin();
        let family = as_set(table.expand(&["pcai"]));
        for member in &family {
            assert_eq!(as_set(table.expand(&[member.as_str()])), family, "member {member}");
        }
        assert!(family.contains("power connect ai"));
        assert!(family.contains("powerconnect.ai"));
    }

    #[test]
    fn expansion_is_idempotent() {
        let table = SynonymTable::builtin();
        let once = table.expand(&["what", "is", "bhc"]);
        let twice = table.expand(&once[..]);
        assert_eq!(as_set(once), as_set(twice));
    }

    #[test]
    fn duplicates_are_dropped() {
        let table = SynonymTable::builtin();
        let out = table.expand(&["bhc", "bhcglobal", "bhc"]);
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn later_declaration_wins_for_shared_key() {
        // Known limitation: "b" belongs to both families but only keeps the second.
        let table = SynonymTable::from_families([("a", vec!["b"]), ("b", vec!["c"])]);
        assert_eq!(as_set(table.expand(&["a"])), as_set(vec!["a".into(), "b".into()]));
        assert_eq!(as_set(table.expand(&["b"])), as_set(vec!["b".into(), "c".into()]));
    }

    #[test]
    fn members_are_normalized() {
        let table = SynonymTable::from_families([("Foo-Bar", vec!["FB!"])]);
        assert!(table.group("foo bar").is_some());
        assert!(table.group("fb").is_some());
        assert!(table.group("Foo-Bar").is_none());
    }

    #[test]
    fn table_size_counts_every_alias() {
        assert!(SynonymTable::new().is_empty());
        let table = SynonymTable::builtin();
        assert!(!table.is_empty());
        // pcai, powerconnect, powerconnectai, powerconnect.ai, power connect ai, bhc, bhcglobal, bhc global
        assert_eq!(table.len(), 8);
    }
}
