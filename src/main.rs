//! Command-line front end for the Boolean / TF-IDF search engine.
//!
//! ```bash
//! tfidf-search search --model boolean "cuci AND tangan NOT sabun"
//! tfidf-search search --model vsm --scheme raw_tf -k 3 "jantung dan gula"
//! tfidf-search search --model vsm            # interactive prompt
//! tfidf-search stats
//! tfidf-search eval --gold gold.json -k 10
//! ```

use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
    time::Instant,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use tfidf_search::{
    eval::{run_evaluation, GoldSet, DEFAULT_EVAL_K},
    utils::normalizer::load_stop_words,
    SearchConfig, SearchEngine, SearchHit, SearchMode, TextNormalizer, WeightScheme,
};

const DEFAULT_TOP_K: usize = 5;

/// Boolean and TF-IDF vector space search over a directory of text files.
#[derive(Parser)]
#[command(name = "tfidf-search", version, about)]
struct Cli {
    /// Directory of `*.txt` documents
    #[arg(long, global = true, env = "TFIDF_SEARCH_DOCS", default_value = "data/raw")]
    docs: PathBuf,

    /// Stop word list, one word per line (replaces the built-in list)
    #[arg(long, global = true)]
    stopwords: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a query; without QUERY, read queries interactively
    Search {
        #[arg(long, value_enum)]
        model: Model,

        /// Term weighting scheme for the vector space model
        #[arg(long, default_value = "sublinear_tf")]
        scheme: WeightScheme,

        /// Number of ranked results
        #[arg(short, long, default_value_t = DEFAULT_TOP_K)]
        k: usize,

        /// Output results as JSON
        #[arg(long)]
        json: bool,

        query: Option<String>,
    },
    /// Print corpus statistics as JSON
    Stats,
    /// Score both models against a gold set
    Eval {
        /// Gold set JSON: {qid: {query, relevant_docs_graded: {doc: grade}}}
        #[arg(long)]
        gold: PathBuf,

        #[arg(short, long, default_value_t = DEFAULT_EVAL_K)]
        k: usize,

        /// Output the report as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Model {
    Boolean,
    Vsm,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    query: &'a str,
    results: &'a [SearchHit],
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let engine = build_engine(&cli)?;

    match cli.command {
        Command::Search {
            model,
            scheme,
            k,
            json,
            query,
        } => {
            let mode = match model {
                Model::Boolean => SearchMode::Boolean,
                Model::Vsm => SearchMode::Vsm { k, scheme },
            };
            match query {
                Some(query) => run_query(&engine, &query, mode, json)?,
                None => interactive(&engine, mode, json)?,
            }
        }
        Command::Stats => {
            let stats = engine.corpus().statistics();
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        Command::Eval { gold, k, json } => {
            let gold_set = GoldSet::load(&gold).with_context(|| format!("loading gold set {}", gold.display()))?;
            let report = run_evaluation(&engine, &gold_set, k, &engine.config().schemes)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", report);
            }
        }
    }

    Ok(())
}

fn build_engine(cli: &Cli) -> Result<SearchEngine> {
    let mut normalizer = TextNormalizer::new();
    if let Some(path) = &cli.stopwords {
        normalizer = normalizer.stop_words(load_stop_words(path)?);
    }
    let start = Instant::now();
    let engine: SearchEngine = SearchEngine::from_dir(&cli.docs, normalizer, SearchConfig::default())
        .with_context(|| format!("building index from {}", cli.docs.display()))?;
    tracing::info!(
        docs = engine.doc_num(),
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "index ready"
    );
    Ok(engine)
}

fn run_query(engine: &SearchEngine, query: &str, mode: SearchMode, json: bool) -> Result<()> {
    let start = Instant::now();
    let hits = engine.search(query, mode)?;
    tracing::info!(elapsed_ms = start.elapsed().as_secs_f64() * 1000.0, "query done");

    if json {
        let output = JsonOutput { query, results: &hits };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    match mode {
        SearchMode::Boolean => println!("--- Boolean retrieval ---"),
        SearchMode::Vsm { k, scheme } => println!("--- VSM retrieval (top-{}, scheme: {}) ---", k, scheme),
    }
    if hits.is_empty() {
        println!("No relevant documents.");
    }
    for hit in &hits {
        if hit.explain.is_empty() {
            println!("-> {:<15} | score: {:<8.4}", hit.doc_id, hit.score);
        } else {
            println!(
                "-> {:<15} | score: {:<8.4} | matched: {}",
                hit.doc_id,
                hit.score,
                hit.explain.join(", ")
            );
        }
    }
    Ok(())
}

fn interactive(engine: &SearchEngine, mode: SearchMode, json: bool) -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("Query> ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let query = line.trim();
        if query.is_empty() {
            continue;
        }
        if query.eq_ignore_ascii_case("exit") || query.eq_ignore_ascii_case("quit") {
            break;
        }
        run_query(engine, query, mode, json)?;
    }
    Ok(())
}
