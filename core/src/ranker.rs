use crate::render::render;
use crate::scorer::PreparedQuery;
use crate::synonyms::SynonymTable;
use crate::Document;
use std::sync::Arc;

/// Results returned when the caller does not ask for a count.
pub const DEFAULT_K: usize = 8;

#[derive(Debug, Clone, Copy)]
pub struct ScoredDocument<'a> {
    pub document: &'a Document,
    pub score: f32,
}

/// Score every document, sort descending (ties keep corpus order), keep the first `k`.
pub fn rank<'a>(query: &str, corpus: &'a [Document], synonyms: &SynonymTable, k: usize) -> Vec<ScoredDocument<'a>> {
    let prepared = PreparedQuery::new(query, synonyms);
    let mut scored: Vec<ScoredDocument<'a>> = corpus
        .iter()
        .map(|document| ScoredDocument { document, score: prepared.score(document) })
        .collect();
    // sort_by is stable
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.truncate(k);
    scored
}

/// Rendered top-`k` snippets for `query`.
///
/// Falls back to the head of the corpus only when ranking produced nothing, which for
/// `k >= 1` means the corpus itself is empty. Documents scoring zero are still returned
/// in corpus order by the ranking itself.
pub fn retrieve(query: &str, corpus: &[Document], synonyms: &SynonymTable, k: usize) -> Vec<String> {
    let ranked = rank(query, corpus, synonyms, k);
    if !ranked.is_empty() {
        tracing::debug!(k, returned = ranked.len(), top_score = ranked[0].score, "ranked snippets");
        return ranked.iter().map(|s| render(s.document)).collect();
    }
    tracing::debug!(k, corpus = corpus.len(), "empty ranking, using corpus head");
    corpus.iter().take(k).map(render).collect()
}

/// Corpus and synonym table loaded once and shared across queries.
#[derive(Debug, Clone)]
pub struct Retriever {
    corpus: Arc<Vec<Document>>,
    synonyms: Arc<SynonymTable>,
}

impl Retriever {
    pub fn new(corpus: Vec<Document>, synonyms: SynonymTable) -> Self {
        Self { corpus: Arc::new(corpus), synonyms: Arc::new(synonyms) }
    }

    pub fn with_builtin_synonyms(corpus: Vec<Document>) -> Self { Self::new(corpus, SynonymTable::builtin()) }

    pub fn corpus(&self) -> &[Document] { &self.corpus }

    pub fn synonyms(&self) -> &SynonymTable { &self.synonyms }

    pub fn len(&self) -> usize { self.corpus.len() }

    pub fn is_empty(&self) -> bool { self.corpus.is_empty() }

    pub fn rank(&self, query: &str, k: usize) -> Vec<ScoredDocument<'_>> {
        rank(query, &self.corpus, &self.synonyms, k)
    }

    pub fn retrieve(&self, query: &str, k: usize) -> Vec<String> {
        retrieve(query, &self.corpus, &self.synonyms, k)
    }
}
