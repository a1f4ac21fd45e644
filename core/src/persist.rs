use crate::{Category, Document, RawDocument};
use anyhow::{Context, Result};
use std::fs::{create_dir_all, File};
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

pub const BHC_FILE: &str = "bhc_cleaned_data.json";
pub const PCAI_FILE: &str = "pcai_cleaned_data.json";

pub struct CorpusPaths {
    pub root: PathBuf,
}

impl CorpusPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    pub fn bhc(&self) -> PathBuf { self.root.join(BHC_FILE) }
    pub fn pcai(&self) -> PathBuf { self.root.join(PCAI_FILE) }
    pub fn for_category(&self, category: Category) -> PathBuf {
        match category {
            Category::Bhc => self.bhc(),
            Category::Pcai => self.pcai(),
        }
    }
}

/// Read a cleaned JSON array of pages. A missing file is an empty list.
pub fn load_records(path: &Path) -> Result<Vec<RawDocument>> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "corpus file missing, skipping");
        return Ok(Vec::new());
    }
    let f = File::open(path)?;
    let records: Vec<RawDocument> = serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("parsing {}", path.display()))?;
    Ok(records)
}

pub fn save_records(path: &Path, records: &[RawDocument]) -> Result<()> {
    if let Some(dir) = path.parent() {
        create_dir_all(dir)?;
    }
    let mut f = File::create(path)?;
    let json = serde_json::to_string_pretty(records)?;
    f.write_all(json.as_bytes())?;
    Ok(())
}

/// Load both corpora, BHC pages first, each tagged with its category.
pub fn load_corpus(paths: &CorpusPaths) -> Result<Vec<Document>> {
    let mut corpus = Vec::new();
    for category in [Category::Bhc, Category::Pcai] {
        let records = load_records(&paths.for_category(category))?;
        tracing::debug!(%category, docs = records.len(), "loaded corpus file");
        corpus.extend(records.into_iter().map(|r| Document::from_raw(r, category)));
    }
    Ok(corpus)
}
