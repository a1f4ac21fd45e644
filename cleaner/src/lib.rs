//! Turns a scraped site dump into cleaned corpus records.
//!
//! Dump format, one block per page:
//!
//! ```text
//! URL: https://www.powerconnect.ai/about-us
//! Headings:
//! About us
//! Paragraphs:
//! PowerConnect.AI helps utilities ...
//!
//! ============================================================
//! ```

use anyhow::{bail, Result};
use lazy_static::lazy_static;
use ragcore::persist::save_records;
use ragcore::RawDocument;
use regex::Regex;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

lazy_static! {
    static ref DIVIDER: Regex = Regex::new(r"^=+$").expect("valid regex");
    static ref FILLER: Regex = Regex::new(r"^[-. ]+$").expect("valid regex");
    static ref NOISE: HashSet<&'static str> = {
        let words: &[&str] = &[
            "Home", "Solutions", "Products", "Product", "About", "About us", "About Us", "Contact",
            "Book a Demo", "Privacy Policy", "Terms", "Careers", "Blog", "LinkedIn", "X",
        ];
        words.iter().copied().collect()
    };
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Section {
    Headings,
    Paragraphs,
}

#[derive(Default)]
struct Page {
    url: String,
    headings: Vec<String>,
    paragraphs: Vec<String>,
}

impl Page {
    fn flush(self, out: &mut Vec<RawDocument>) {
        if self.url.is_empty() { return; }
        out.push(RawDocument { url: self.url, headings: self.headings, content: self.paragraphs.join(" ") });
    }
}

/// Navigation labels, copyright lines and dot/dash rules.
pub fn is_garbage(line: &str) -> bool {
    line.is_empty() || FILLER.is_match(line) || line.contains('©') || NOISE.contains(line)
}

pub fn parse_dump(text: &str) -> Vec<RawDocument> {
    let mut out = Vec::new();
    let mut page = Page::default();
    let mut section: Option<Section> = None;

    for line in text.lines().map(str::trim) {
        if line.is_empty() { continue; }
        if let Some(url) = line.strip_prefix("URL:") {
            std::mem::take(&mut page).flush(&mut out);
            page.url = url.trim().to_string();
            section = None;
            continue;
        }
        if line.starts_with("Headings:") {
            section = Some(Section::Headings);
            continue;
        }
        if line.starts_with("Paragraphs:") {
            section = Some(Section::Paragraphs);
            continue;
        }
        if DIVIDER.is_match(line) {
            section = None;
            continue;
        }
        if is_garbage(line) { continue; }
        match section {
            Some(Section::Headings) => page.headings.push(line.to_string()),
            Some(Section::Paragraphs) => page.paragraphs.push(line.to_string()),
            None => {}
        }
    }
    page.flush(&mut out);
    out
}

/// `.txt` dumps under `input` in file-name order, or `input` itself when it is a file.
pub fn dump_files(input: &Path) -> Result<Vec<PathBuf>> {
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }
    if !input.is_dir() {
        bail!("input {} does not exist", input.display());
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(input).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
        let p = entry.path();
        if p.is_file() && p.extension().and_then(|s| s.to_str()) == Some("txt") {
            files.push(p.to_path_buf());
        }
    }
    Ok(files)
}

/// Parse every dump under `input` and write one cleaned JSON array to `output`.
/// Returns the number of records written.
pub fn clean_path(input: &Path, output: &Path) -> Result<usize> {
    let mut records: Vec<RawDocument> = Vec::new();
    for file in dump_files(input)? {
        let text = fs::read_to_string(&file)?;
        let parsed = parse_dump(&text);
        tracing::info!(file = %file.display(), pages = parsed.len(), "parsed dump");
        records.extend(parsed);
    }
    save_records(output, &records)?;
    Ok(records.len())
}
