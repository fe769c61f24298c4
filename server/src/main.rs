use anyhow::Result;
use clap::Parser;
use rankdex_core::{SearchEngine, SearchError, SledStore, TokenizerConfig};
use rankdex_server::build_app;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
struct Args {
    /// Document store directory
    #[arg(long, default_value = "./store")]
    store: String,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
    /// Largest n-gram length
    #[arg(long, default_value_t = 3)]
    max_ngram: usize,
    /// Drop words shorter than this many characters
    #[arg(long, default_value_t = 1)]
    min_token_len: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let config = TokenizerConfig { max_ngram: args.max_ngram, min_token_len: args.min_token_len, ..Default::default() };
    let engine = Arc::new(SearchEngine::new(SledStore::open(&args.store)?, config)?);
    // An empty store is fine: documents can be added through /index/batch and /index/commit.
    match engine.build() {
        Ok(_) | Err(SearchError::EmptyCorpus) => {}
        Err(e) => return Err(e.into()),
    }

    let app = build_app(engine, std::env::var("ADMIN_TOKEN").ok());
    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
