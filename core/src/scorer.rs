use crate::matcher::FieldTokens;
use crate::synonyms::SynonymTable;
use crate::tokenizer::{normalize, tokenize};
use crate::{Category, Document};
use lazy_static::lazy_static;
use regex::Regex;

pub const BODY_WEIGHT: f32 = 2.0;
pub const HEADING_WEIGHT: f32 = 1.5;
pub const PCAI_BOOST: f32 = 1.25;
pub const BHC_BOOST: f32 = 1.15;

/// Content length (chars) at which heading weight starts to shrink.
const PENALTY_PIVOT: f32 = 800.0;
const PENALTY_FLOOR_LEN: usize = 200;

lazy_static! {
    static ref PCAI_TOPIC: Regex = Regex::new(r"pcai|powerconnect").expect("valid regex");
    static ref BHC_TOPIC: Regex = Regex::new(r"\bbhc(\s|$)|bhc global").expect("valid regex");
}

/// `min(1, 800 / max(200, len))`; exactly 1 up to 800 chars.
pub fn length_penalty(content: &str) -> f32 {
    let len = content.chars().count().max(PENALTY_FLOOR_LEN) as f32;
    (PENALTY_PIVOT / len).min(1.0)
}

pub fn is_pcai_topic(normalized_query: &str) -> bool { PCAI_TOPIC.is_match(normalized_query) }

pub fn is_bhc_topic(normalized_query: &str) -> bool { BHC_TOPIC.is_match(normalized_query) }

/// Multiplier for a raw query against a document category.
pub fn category_boost(query: &str, category: Category) -> f32 {
    let q = normalize(query);
    boost_for(is_pcai_topic(&q), is_bhc_topic(&q), category)
}

fn boost_for(pcai_topic: bool, bhc_topic: bool, category: Category) -> f32 {
    if pcai_topic && category == Category::Pcai {
        PCAI_BOOST
    } else if bhc_topic && category == Category::Bhc {
        BHC_BOOST
    } else {
        1.0
    }
}

/// A query tokenized, expanded and topic-tagged once, scored against many documents.
#[derive(Debug, Clone)]
pub struct PreparedQuery {
    terms: Vec<String>,
    pcai_topic: bool,
    bhc_topic: bool,
}

impl PreparedQuery {
    pub fn new(query: &str, synonyms: &SynonymTable) -> Self {
        let tokens = tokenize(query);
        let terms = synonyms.expand(&tokens);
        let normalized = normalize(query);
        Self { terms, pcai_topic: is_pcai_topic(&normalized), bhc_topic: is_bhc_topic(&normalized) }
    }

    /// Expanded query terms.
    pub fn terms(&self) -> &[String] { &self.terms }

    pub fn is_empty(&self) -> bool { self.terms.is_empty() }

    pub fn boost(&self, category: Category) -> f32 { boost_for(self.pcai_topic, self.bhc_topic, category) }

    pub fn score(&self, doc: &Document) -> f32 {
        if self.terms.is_empty() {
            return 0.0;
        }
        let head = FieldTokens::from_text(&doc.headings.join(" "));
        let body = FieldTokens::from_text(&doc.content);

        let mut body_hits = 0u32;
        let mut head_hits = 0u32;
        for term in &self.terms {
            if body.hits(term) { body_hits += 1; }
            if head.hits(term) { head_hits += 1; }
        }

        let raw = body_hits as f32 * BODY_WEIGHT + head_hits as f32 * HEADING_WEIGHT * length_penalty(&doc.content);
        raw * self.boost(doc.category)
    }
}

/// Relevance of `doc` for `query`; always >= 0.
pub fn score(query: &str, doc: &Document, synonyms: &SynonymTable) -> f32 {
    PreparedQuery::new(query, synonyms).score(doc)
}
