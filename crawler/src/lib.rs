//! Page extraction, URL scoping and robots rules for the site scraper.

use scraper::{ElementRef, Html, Selector};
use std::io::Write;
use url::Url;

/// Links ending in these are never fetched.
pub const ASSET_EXTENSIONS: &[&str] = &[".pdf", ".png", ".jpg", ".jpeg", ".svg", ".webp", ".gif"];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScrapedPage {
    pub url: String,
    pub headings: Vec<String>,
    pub paragraphs: Vec<String>,
}

/// Drop the fragment and any trailing slash.
pub fn normalize_url(u: &Url) -> String {
    let mut s = u.clone();
    s.set_fragment(None);
    s.to_string().trim_end_matches('/').to_string()
}

/// Same host as `base` and under its prefix, and not a static asset.
pub fn in_scope(candidate: &str, base: &Url) -> bool {
    let Ok(u) = Url::parse(candidate) else { return false };
    if u.host_str() != base.host_str() {
        return false;
    }
    if !candidate.starts_with(&normalize_url(base)) {
        return false;
    }
    let lower = candidate.to_lowercase();
    !ASSET_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

fn element_text(el: ElementRef<'_>) -> String {
    el.text().map(str::trim).filter(|t| !t.is_empty()).collect::<Vec<_>>().join(" ")
}

/// Headings (h1-h3), paragraphs and in-scope links of one HTML page.
pub fn extract_page(html: &str, page_url: &Url, base: &Url) -> (ScrapedPage, Vec<String>) {
    let doc = Html::parse_document(html);
    let sel_headings = Selector::parse("h1, h2, h3").expect("valid selector");
    let sel_p = Selector::parse("p").expect("valid selector");
    let sel_a = Selector::parse("a[href]").expect("valid selector");

    let headings = doc.select(&sel_headings).map(element_text).filter(|t| !t.is_empty()).collect();
    let paragraphs = doc.select(&sel_p).map(element_text).filter(|t| !t.is_empty()).collect();

    let mut links: Vec<String> = Vec::new();
    for a in doc.select(&sel_a) {
        let Some(href) = a.value().attr("href") else { continue };
        let Ok(u) = page_url.join(href) else { continue };
        let key = normalize_url(&u);
        if in_scope(&key, base) && !links.contains(&key) {
            links.push(key);
        }
    }

    (ScrapedPage { url: normalize_url(page_url), headings, paragraphs }, links)
}

/// One page block of the dump read back by the cleaner.
pub fn write_page<W: Write>(out: &mut W, page: &ScrapedPage) -> std::io::Result<()> {
    writeln!(out)?;
    writeln!(out, "URL: {}", page.url)?;
    writeln!(out, "Headings:")?;
    for h in &page.headings { writeln!(out, "{h}")?; }
    writeln!(out, "Paragraphs:")?;
    for p in &page.paragraphs { writeln!(out, "{p}")?; }
    writeln!(out)?;
    writeln!(out, "{}", "=".repeat(60))?;
    Ok(())
}

#[derive(Debug, Clone, Default)]
pub struct Robots {
    pub allows: Vec<String>,
    pub disallows: Vec<String>,
    pub crawl_delay_ms: Option<u64>,
}

/// Rules of the `*` user-agent group only.
pub fn parse_robots(txt: &str) -> Robots {
    let mut active = false;
    let mut robots = Robots::default();
    for line in txt.lines() {
        let l = line.trim();
        if l.is_empty() || l.starts_with('#') { continue; }
        if let Some((k, v)) = l.split_once(':') {
            let key = k.trim().to_lowercase();
            let val = v.trim();
            match key.as_str() {
                "user-agent" => { active = val == "*"; }
                "allow" if active && !val.is_empty() => robots.allows.push(val.to_string()),
                "disallow" if active && !val.is_empty() => robots.disallows.push(val.to_string()),
                "crawl-delay" if active => {
                    if let Ok(n) = val.parse::<f64>() { robots.crawl_delay_ms = Some((n * 1000.0) as u64); }
                }
                _ => {}
            }
        }
    }
    robots
}

/// Longest matching rule wins; ties go to Allow.
pub fn path_allowed(path: &str, rules: &Robots) -> bool {
    let longest = |rules: &[String]| rules.iter().filter(|r| path.starts_with(r.as_str())).map(String::len).max();
    match (longest(&rules.allows), longest(&rules.disallows)) {
        (Some(a), Some(d)) => a >= d,
        (_, None) => true,
        (None, Some(_)) => false,
    }
}
