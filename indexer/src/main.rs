use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use rankdex_core::{DocumentStore, MemoryStore, SearchEngine, SearchError, SledStore, TokenizerConfig};
use serde::Deserialize;
use tracing_subscriber::{fmt, EnvFilter};
use walkdir::WalkDir;

use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

const DEMO_DOCUMENTS: [&str; 4] = [
    "After the medication, headache and nausea were reported by the patient.",
    "The patient reported nausea and dizziness caused by the medication.",
    "Headache and dizziness are common effects of this medication.",
    "The medication caused a headache and nausea, but no dizziness was reported.",
];
const DEMO_QUERIES: [&str; 5] = ["nausea and dizziness", "effects", "nausea was reported", "dizziness", "the medication"];

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InputDoc {
    Text(String),
    Record { content: String },
}

impl InputDoc {
    fn into_content(self) -> String {
        match self {
            InputDoc::Text(s) | InputDoc::Record { content: s } => s,
        }
    }
}

#[derive(Parser)]
#[command(name = "rankdex")]
#[command(about = "Build TF-IDF inverted indexes and rank documents against queries", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
struct TokenizerArgs {
    /// Smallest n-gram length
    #[arg(long, default_value_t = 1)]
    min_ngram: usize,
    /// Largest n-gram length
    #[arg(long, default_value_t = 3)]
    max_ngram: usize,
    /// Drop words shorter than this many characters
    #[arg(long, default_value_t = 1)]
    min_token_len: usize,
}

impl From<TokenizerArgs> for TokenizerConfig {
    fn from(a: TokenizerArgs) -> Self {
        TokenizerConfig { min_ngram: a.min_ngram, max_ngram: a.max_ngram, min_token_len: a.min_token_len }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Add documents from .txt, .json or .jsonl files (or a directory of them) to a store
    Ingest {
        /// Input path (file or directory)
        #[arg(long)]
        input: String,
        /// Document store directory
        #[arg(long)]
        store: String,
        /// Remove existing documents first
        #[arg(long, default_value_t = false)]
        reset: bool,
    },
    /// Build the index from a store and rank its documents for each query
    Query {
        #[arg(long)]
        store: String,
        /// Show at most this many documents per query
        #[arg(long)]
        top_k: Option<usize>,
        #[command(flatten)]
        tokenizer: TokenizerArgs,
        #[arg(required = true)]
        queries: Vec<String>,
    },
    /// Index the sample medication reports in memory and run the sample queries
    Demo {
        #[command(flatten)]
        tokenizer: TokenizerArgs,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Ingest { input, store, reset } => ingest(&input, &store, reset),
        Commands::Query { store, top_k, tokenizer, queries } => {
            let engine = SearchEngine::new(SledStore::open(&store)?, tokenizer.into())?;
            run_queries(&engine, &queries, top_k)
        }
        Commands::Demo { tokenizer } => {
            let engine = SearchEngine::new(MemoryStore::new(), tokenizer.into())?;
            for doc in DEMO_DOCUMENTS {
                engine.add_document(doc)?;
            }
            run_queries(&engine, &DEMO_QUERIES.map(String::from), None)
        }
    }
}

fn ingest(input: &str, store: &str, reset: bool) -> Result<()> {
    let store = SledStore::open(store)?;
    if reset {
        store.clear()?;
    }

    let mut added = 0usize;
    for file in collect_files(Path::new(input)) {
        for content in read_documents(&file)? {
            store.insert(&content)?;
            added += 1;
        }
    }
    store.flush()?;
    tracing::info!(added, total = store.count()?, "ingested documents");
    Ok(())
}

fn collect_files(input: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = Vec::new();
    if input.is_dir() {
        for entry in WalkDir::new(input).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() && matches!(extension(p), Some("txt" | "json" | "jsonl")) {
                files.push(p.to_path_buf());
            }
        }
    } else if input.is_file() {
        files.push(input.to_path_buf());
    }
    files
}

fn extension(p: &Path) -> Option<&str> {
    p.extension().and_then(|s| s.to_str())
}

fn read_documents(file: &Path) -> Result<Vec<String>> {
    match extension(file) {
        Some("jsonl") => {
            let reader = BufReader::new(File::open(file)?);
            let mut docs = Vec::new();
            for line in reader.lines() {
                let line = line?;
                if line.trim().is_empty() { continue; }
                let doc: InputDoc = serde_json::from_str(&line)?;
                docs.push(doc.into_content());
            }
            Ok(docs)
        }
        Some("json") => {
            let reader = BufReader::new(File::open(file)?);
            let json: serde_json::Value = serde_json::from_reader(reader)?;
            let docs = match json {
                serde_json::Value::Array(arr) => arr
                    .into_iter()
                    .map(|v| serde_json::from_value::<InputDoc>(v).map(InputDoc::into_content))
                    .collect::<Result<Vec<_>, _>>()?,
                other => vec![serde_json::from_value::<InputDoc>(other)?.into_content()],
            };
            Ok(docs)
        }
        _ => Ok(vec![fs::read_to_string(file)?]),
    }
}

fn run_queries<S: DocumentStore>(engine: &SearchEngine<S>, queries: &[String], top_k: Option<usize>) -> Result<()> {
    match engine.build() {
        Ok(_) => {}
        Err(SearchError::EmptyCorpus) => {
            println!("No documents found to process.");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    }

    for query in queries {
        println!("\nQuery: \"{query}\"");
        println!("-------Ranking------");
        let results = engine.search(query)?;
        for doc in results.iter().take(top_k.unwrap_or(usize::MAX)) {
            println!("Document: \"{}\", - Score: {}", doc.content, doc.score);
        }
    }
    Ok(())
}
