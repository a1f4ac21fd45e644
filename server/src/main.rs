use anyhow::{bail, Result};
use clap::Parser;
use ragcore::persist::{load_corpus, CorpusPaths};
use ragcore::{Category, Retriever};
use std::net::SocketAddr;
use std::path::Path;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "server")]
#[command(about = "Serve snippet search and chat answers over a cleaned corpus")]
struct Args {
    /// Directory holding bhc_cleaned_data.json and pcai_cleaned_data.json
    #[arg(long, default_value = "./data")]
    data: String,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
    /// Refuse to start when both corpus files are missing or empty
    #[arg(long, default_value_t = false)]
    require_corpus: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    if !Path::new(&args.data).is_dir() {
        tracing::warn!(data = %args.data, "data directory not found");
    }
    let paths = CorpusPaths::new(&args.data);
    let corpus = load_corpus(&paths)?;
    let bhc = corpus.iter().filter(|d| d.category == Category::Bhc).count();
    let pcai = corpus.len() - bhc;
    tracing::info!(data = %args.data, bhc, pcai, "corpus loaded");
    if corpus.is_empty() {
        if args.require_corpus {
            bail!("no documents in {} or {}", paths.bhc().display(), paths.pcai().display());
        }
        tracing::warn!("corpus is empty; every query will return no snippets");
    }

    let app = server::router(Retriever::with_builtin_synonyms(corpus));
    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
