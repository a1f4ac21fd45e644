//! Builds a chat answer directly from retrieved snippets.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

pub const NO_SNIPPETS: &str =
    "I couldn’t find matching internal content. Try asking about services, AMI InsightAccelerator, careers, locations, or POWERCONNECT.AI.";
pub const NO_EXCERPT: &str = "I couldn’t find a clean excerpt to show.";

const BRAND: &str = "POWERCONNECT.AI";
const BODY_LIMIT: usize = 300;
const MAX_BULLETS: usize = 3;

lazy_static! {
    static ref URL: Regex = Regex::new(r"https?://\S+").expect("valid regex");
    static ref COPYRIGHT: Regex = Regex::new(r"(?i)©\s?\d{4}.*?reserved\.").expect("valid regex");
    static ref SOCIAL_TAIL: Regex = Regex::new(r"(?i)\b(LinkedIn|X|Twitter|BHC Portal|Website→)\b.*$").expect("valid regex");
    static ref SPACES: Regex = Regex::new(r"\s+").expect("valid regex");
    static ref PARTIAL_WORD: Regex = Regex::new(r"\s+\S*$").expect("valid regex");

    static ref PCAI_TOPIC: Regex = Regex::new(r"(?i)pcai|powerconnect").expect("valid regex");
    static ref BRAND_VARIANT: Regex = Regex::new(r"(?i)power\s*connect\.?ai|powerconnect\.ai").expect("valid regex");
    static ref PCAI_WORD: Regex = Regex::new(r"(?i)\bPCAI\b").expect("valid regex");

    static ref PCAI_ABOUT: Regex = Regex::new(r"(?i)powerconnect\.ai/about-us/?$").expect("valid regex");
    static ref PCAI_HOME: Regex = Regex::new(r"(?i)^https?://(www\.)?powerconnect\.ai/?$").expect("valid regex");
    static ref PCAI_FEATURES: Regex = Regex::new(r"(?i)powerconnect\.ai/features/?$").expect("valid regex");

    static ref SERVICES_INTENT: Regex = Regex::new(r"service(s)?\b").expect("valid regex");
    static ref CAREERS_INTENT: Regex = Regex::new(r"\bcareer(s)?\b|jobs?\b|hiring\b").expect("valid regex");
    static ref ABOUT_INTENT: Regex = Regex::new(r"\babout\b|who\s+are\s+you\b|what\s+is\s+bhc\b").expect("valid regex");

    static ref SERVICES_URL: Regex = Regex::new(r"bhcglobal\.com/[^ ]*services").expect("valid regex");
    static ref ABOUT_URL: Regex = Regex::new(r"bhcglobal\.com/[^ ]*about-us").expect("valid regex");
    static ref CAREERS_URL: Regex = Regex::new(r"bhcglobal\.com/[^ ]*careers").expect("valid regex");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Services,
    About,
    Careers,
}

/// A rendered snippet parsed back into its parts.
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub url: String,
    pub title: String,
    pub body: String,
}

pub fn is_pcai_topic(query: &str) -> bool { PCAI_TOPIC.is_match(query) }

pub fn intent(query: &str) -> Option<Intent> {
    let q = query.to_lowercase();
    if SERVICES_INTENT.is_match(&q) {
        Some(Intent::Services)
    } else if CAREERS_INTENT.is_match(&q) {
        Some(Intent::Careers)
    } else if ABOUT_INTENT.is_match(&q) {
        Some(Intent::About)
    } else {
        None
    }
}

fn intent_matches_url(intent: Option<Intent>, url: &str) -> bool {
    let u = url.to_lowercase();
    match intent {
        None => true,
        Some(Intent::Services) => SERVICES_URL.is_match(&u),
        Some(Intent::About) => ABOUT_URL.is_match(&u),
        Some(Intent::Careers) => CAREERS_URL.is_match(&u),
    }
}

/// Strip copyright and social-link boilerplate, collapse whitespace.
pub fn clean_body(s: &str) -> String {
    let s = COPYRIGHT.replace(s, "");
    let s = SOCIAL_TAIL.replace(&s, "");
    SPACES.replace_all(&s, " ").trim().to_string()
}

fn truncate_body(body: String) -> String {
    if body.chars().count() <= BODY_LIMIT {
        return body;
    }
    let head: String = body.chars().take(BODY_LIMIT).collect();
    PARTIAL_WORD.replace(&head, "…").into_owned()
}

/// Cards need a source line, a heading line and at least one body line.
pub fn parse_card(snippet: &str) -> Option<Card> {
    let lines: Vec<&str> = snippet.split('\n').filter(|l| !l.is_empty()).collect();
    if lines.len() < 3 {
        return None;
    }
    let url = URL.find(lines[0]).map(|m| m.as_str().to_string()).unwrap_or_default();
    let title = lines[1].trim().to_string();
    let body = clean_body(&lines[2..].join(" "));
    if body.is_empty() {
        return None;
    }
    Some(Card { url, title, body: truncate_body(body) })
}

/// Preferred powerconnect.ai page: about-us, then the homepage, then features.
pub fn pick_pcai_primary(urls: &[&str]) -> String {
    for pattern in [&*PCAI_ABOUT, &*PCAI_HOME, &*PCAI_FEATURES] {
        if let Some(u) = urls.iter().find(|u| pattern.is_match(u)) {
            return u.to_string();
        }
    }
    urls.first().map(|u| u.to_string()).unwrap_or_default()
}

pub fn compose_from_snippets(query: &str, snippets: &[String]) -> String {
    if snippets.is_empty() {
        return NO_SNIPPETS.to_string();
    }
    let cards: Vec<Card> = snippets.iter().filter_map(|s| parse_card(s)).collect();
    if cards.is_empty() {
        return NO_EXCERPT.to_string();
    }

    if is_pcai_topic(query) {
        let urls: Vec<&str> = cards.iter().map(|c| c.url.as_str()).filter(|u| !u.is_empty()).collect();
        let best = pick_pcai_primary(&urls);
        let picked = cards.iter().find(|c| c.url == best).unwrap_or(&cards[0]);
        let link = if best.is_empty() { String::new() } else { format!("\n\nLearn more: [{}]({})", BRAND, best) };
        return format!("{}{}", picked.body, link).trim().to_string();
    }

    let intent = intent(query);
    let filtered: Vec<&Card> = cards.iter().filter(|c| !c.url.is_empty() && intent_matches_url(intent, &c.url)).collect();
    let pool: Vec<&Card> = if filtered.is_empty() { cards.iter().collect() } else { filtered };

    let mut seen: HashSet<String> = HashSet::new();
    let mut bullets: Vec<String> = Vec::new();
    for card in pool {
        let key = if card.url.is_empty() { &card.title } else { &card.url }.to_lowercase();
        if !seen.insert(key) { continue; }
        let url_out = if card.url.is_empty() { String::new() } else { format!("  ({})", card.url) };
        bullets.push(format!("- **{}** — {}{}", card.title, card.body, url_out));
        if bullets.len() >= MAX_BULLETS { break; }
    }

    let mut lines = vec![format!("Here’s what I found about “{query}”:"), String::new()];
    lines.extend(bullets);
    lines.join("\n")
}

/// Upper-case every brand spelling; tag the first untagged one with "(PCAI)" when the text mentions PCAI.
pub fn enforce_brand_casing(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let mut out = BRAND_VARIANT.replace_all(text, BRAND).into_owned();
    if PCAI_WORD.is_match(&out) {
        let untagged = out
            .match_indices(BRAND)
            .map(|(i, _)| i + BRAND.len())
            .find(|&end| !out[end..].trim_start().starts_with("(PCAI)"));
        if let Some(end) = untagged {
            out.insert_str(end, " (PCAI)");
        }
    }
    out
}
