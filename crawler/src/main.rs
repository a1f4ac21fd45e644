use anyhow::{anyhow, Result};
use clap::Parser;
use crawler::{extract_page, normalize_url, parse_robots, path_allowed, write_page, Robots};
use reqwest::{header, Client, Url};
use std::collections::{HashSet, VecDeque};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::time::Duration;
use tokio::time::sleep;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "crawler")]
#[command(about = "Scrape headings and paragraphs of one site into a text dump")]
struct Cli {
    /// Site root; only links under it are followed
    #[arg(long, default_value = "https://www.powerconnect.ai")]
    base: String,
    /// Extra start pages (the base is always crawled)
    #[arg(long)]
    seed: Vec<String>,
    /// Output dump path
    #[arg(long, default_value = "./data/pcai_site_data.txt")]
    output: String,
    /// Maximum number of pages to fetch
    #[arg(long, default_value_t = 500)]
    max_pages: usize,
    /// Pause between requests in milliseconds
    #[arg(long, default_value_t = 800)]
    delay_ms: u64,
    /// Request timeout seconds
    #[arg(long, default_value_t = 12)]
    timeout_secs: u64,
    /// User-Agent string to send
    #[arg(long, default_value = "Mozilla/5.0")]
    user_agent: String,
    /// Skip robots.txt checks
    #[arg(long, default_value_t = false)]
    ignore_robots: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Cli::parse();
    if let Some(dir) = std::path::Path::new(&args.output).parent() {
        fs::create_dir_all(dir).ok();
    }

    let base = Url::parse(&args.base)?;
    let client = Client::builder()
        .user_agent(args.user_agent.clone())
        .redirect(reqwest::redirect::Policy::limited(5))
        .timeout(Duration::from_secs(args.timeout_secs))
        .build()?;

    let robots = if args.ignore_robots { Robots::default() } else { fetch_robots(&client, &base).await };
    let delay = Duration::from_millis(robots.crawl_delay_ms.unwrap_or(0).max(args.delay_ms));

    let mut frontier: VecDeque<String> = VecDeque::new();
    frontier.push_back(normalize_url(&base));
    for s in &args.seed {
        match Url::parse(s) {
            Ok(u) => frontier.push_back(normalize_url(&u)),
            Err(e) => tracing::warn!(seed = %s, error = %e, "skipping invalid seed"),
        }
    }
    tracing::info!(base = %base, seeds = frontier.len(), max_pages = args.max_pages, output = %args.output, "crawler starting");

    let mut out = BufWriter::new(File::create(&args.output)?);
    let mut visited: HashSet<String> = HashSet::new();
    let mut written = 0usize;

    while let Some(current) = frontier.pop_front() {
        if visited.len() >= args.max_pages { break; }
        if !visited.insert(current.clone()) { continue; }
        let Ok(url) = Url::parse(&current) else { continue };
        if !path_allowed(url.path(), &robots) {
            tracing::debug!(url = %current, "disallowed by robots.txt");
            continue;
        }

        tracing::info!(url = %current, "scraping");
        match fetch_html(&client, &url).await {
            Ok(html) => {
                let (page, links) = extract_page(&html, &url, &base);
                write_page(&mut out, &page)?;
                written += 1;
                for link in links {
                    if !visited.contains(&link) { frontier.push_back(link); }
                }
            }
            Err(e) => tracing::warn!(url = %current, error = %e, "failed to scrape"),
        }
        sleep(delay).await;
    }

    out.flush()?;
    tracing::info!(written, visited = visited.len(), output = %args.output, "done");
    Ok(())
}

async fn fetch_html(client: &Client, url: &Url) -> Result<String> {
    let resp = client.get(url.clone()).send().await?.error_for_status()?;
    if let Some(ct) = resp.headers().get(header::CONTENT_TYPE) {
        if let Ok(v) = ct.to_str() {
            if !v.starts_with("text/html") { return Err(anyhow!("not html: {v}")); }
        }
    }
    Ok(resp.text().await?)
}

async fn fetch_robots(client: &Client, base: &Url) -> Robots {
    let Some(host) = base.host_str() else { return Robots::default() };
    let robots_url = format!("{}://{}/robots.txt", base.scheme(), host);
    let txt = match client.get(&robots_url).send().await {
        Ok(resp) if resp.status().is_success() => resp.text().await.unwrap_or_default(),
        _ => String::new(),
    };
    parse_robots(&txt)
}
