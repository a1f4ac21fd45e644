use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use cleaner::clean_path;
use ragcore::persist::{load_corpus, CorpusPaths};
use ragcore::ranker::DEFAULT_K;
use ragcore::Retriever;
use tracing_subscriber::{fmt, EnvFilter};

use std::path::Path;

#[derive(Parser)]
#[command(name = "cleaner")]
#[command(about = "Clean scraped site dumps into corpus JSON and query a corpus", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a site dump (file, or directory of .txt dumps) into a cleaned JSON array
    Clean {
        /// Input path (file or directory)
        #[arg(long)]
        input: String,
        /// Output JSON file, e.g. data/pcai_cleaned_data.json
        #[arg(long)]
        output: String,
    },
    /// Print the top-k rendered snippets for a query
    Query {
        /// Directory holding bhc_cleaned_data.json and pcai_cleaned_data.json
        #[arg(long, default_value = "./data")]
        data: String,
        /// Number of snippets
        #[arg(long, default_value_t = DEFAULT_K)]
        k: usize,
        /// Query text
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Clean { input, output } => clean(&input, &output),
        Commands::Query { data, k, query } => run_query(&data, k, &query.join(" ")),
    }
}

fn clean(input: &str, output: &str) -> Result<()> {
    let records = clean_path(Path::new(input), Path::new(output))?;
    tracing::info!(output, records, "saved cleaned corpus");
    Ok(())
}

fn run_query(data: &str, k: usize, query: &str) -> Result<()> {
    if k == 0 {
        bail!("--k must be at least 1");
    }
    let corpus = load_corpus(&CorpusPaths::new(data))?;
    tracing::info!(docs = corpus.len(), "corpus loaded");
    let retriever = Retriever::with_builtin_synonyms(corpus);
    for (i, snippet) in retriever.retrieve(query, k).iter().enumerate() {
        println!("({}) {}\n", i + 1, snippet);
    }
    Ok(())
}
