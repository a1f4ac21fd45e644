use crate::Document;

pub const HEADING_SEPARATOR: &str = " • ";
/// Headings shown in a rendered snippet.
pub const MAX_HEADINGS: usize = 2;

/// `Source: <CATEGORY> — <url>`, the first two headings, then the full content, one per line.
pub fn render(doc: &Document) -> String {
    let headings = doc.headings.iter().take(MAX_HEADINGS).map(String::as_str).collect::<Vec<_>>().join(HEADING_SEPARATOR);
    format!("Source: {} — {}\n{}\n{}", doc.category, doc.url, headings, doc.content)
}
