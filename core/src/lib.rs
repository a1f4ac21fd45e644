use serde::{Deserialize, Serialize};
use std::fmt;

pub mod matcher;
pub mod persist;
pub mod ranker;
pub mod render;
pub mod scorer;
pub mod synonyms;
pub mod tokenizer;

pub use ranker::{rank, retrieve, Retriever, ScoredDocument};
pub use scorer::{score, PreparedQuery};
pub use synonyms::SynonymTable;

/// Which site a document was scraped from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    /// bhcglobal.com
    Bhc,
    /// powerconnect.ai
    Pcai,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Bhc => "BHC",
            Category::Pcai => "PCAI",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A cleaned page as stored on disk, before it is tagged with a category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawDocument {
    pub url: String,
    #[serde(default)]
    pub headings: Vec<String>,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub url: String,
    #[serde(default)]
    pub headings: Vec<String>,
    #[serde(default)]
    pub content: String,
    pub category: Category,
}

impl Document {
    pub fn new(url: impl Into<String>, headings: Vec<String>, content: impl Into<String>, category: Category) -> Self {
        Self { url: url.into(), headings, content: content.into(), category }
    }

    pub fn from_raw(raw: RawDocument, category: Category) -> Self {
        Self { url: raw.url, headings: raw.headings, content: raw.content, category }
    }
}
