use axum::{extract::{Path, Query, State}, http::{HeaderMap, StatusCode}, routing::{get, post}, Json, Router};
use rankdex_core::{DocId, DocumentStore, SearchEngine, SearchError, SledStore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

type ApiResult<T> = Result<Json<T>, (StatusCode, String)>;

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
    #[serde(default = "default_k")]
    pub k: usize,
}
fn default_k() -> usize { 10 }

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub generation: u64,
    pub took_s: f64,
    pub total_hits: usize,
    pub results: Vec<SearchHit>,
}

#[derive(Serialize)]
pub struct SearchHit {
    pub doc_id: DocId,
    pub score: f64,
    pub snippet: Option<String>,
}

#[derive(Deserialize)]
pub struct BatchRequest {
    pub documents: Vec<String>,
}

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<SearchEngine<SledStore>>,
    pub admin_token: Option<String>,
}

pub fn build_app(engine: Arc<SearchEngine<SledStore>>, admin_token: Option<String>) -> Router {
    let app_state = AppState { engine, admin_token };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/doc/:doc_id", get(doc_handler))
        .route("/stats", get(stats_handler))
        .route("/index/batch", post(index_batch))
        .route("/index/commit", post(index_commit))
        .with_state(app_state)
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
}

// CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
fn cors_layer() -> CorsLayer {
    let any = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);
    match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val.split(',').filter_map(|s| s.trim().parse().ok()).collect();
            if origins.is_empty() {
                any
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => any,
    }
}

fn api_error(err: SearchError) -> (StatusCode, String) {
    let status = match &err {
        SearchError::VocabularyNotBuilt => StatusCode::SERVICE_UNAVAILABLE,
        SearchError::NotFound(_) => StatusCode::NOT_FOUND,
        SearchError::EmptyCorpus | SearchError::StaleRanking { .. } => StatusCode::CONFLICT,
        SearchError::InvalidConfig(_) => StatusCode::BAD_REQUEST,
        SearchError::Storage(_) | SearchError::Codec(_) => {
            tracing::error!(error = %err, "request failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, err.to_string())
}

/// Run store I/O and ranking on the blocking pool.
async fn run_blocking<T, F>(work: F) -> Result<T, (StatusCode, String)>
where
    F: FnOnce() -> Result<T, (StatusCode, String)> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
}

pub async fn search_handler(State(state): State<AppState>, Query(params): Query<SearchParams>) -> ApiResult<SearchResponse> {
    run_blocking(move || search(&state.engine, params)).await.map(Json)
}

fn search(engine: &SearchEngine<SledStore>, params: SearchParams) -> Result<SearchResponse, (StatusCode, String)> {
    let start = std::time::Instant::now();
    let index = engine.snapshot().map_err(api_error)?;
    let hits = index.rank(&params.q);
    let total_hits = hits.len();
    let k = params.k.clamp(1, 100);

    // Words of the query, for highlighting
    let raw_terms = index.tokenizer().words(&params.q);
    let highlighter = term_pattern(&raw_terms);
    let mut results = Vec::with_capacity(k.min(total_hits));
    for hit in hits.into_iter().take(k) {
        let content = engine.store().fetch_one(hit.doc_id).map_err(api_error)?;
        let snippet = highlighter.as_ref().and_then(|re| snippet_from_text(&content, re));
        results.push(SearchHit { doc_id: hit.doc_id, score: hit.score, snippet });
    }

    Ok(SearchResponse {
        query: params.q,
        generation: index.generation(),
        took_s: start.elapsed().as_secs_f64(),
        total_hits,
        results,
    })
}

pub async fn doc_handler(State(state): State<AppState>, Path(doc_id): Path<DocId>) -> ApiResult<serde_json::Value> {
    let content = run_blocking(move || state.engine.store().fetch_one(doc_id).map_err(api_error)).await?;
    Ok(Json(serde_json::json!({ "doc_id": doc_id, "content": content })))
}

pub async fn stats_handler(State(state): State<AppState>) -> ApiResult<serde_json::Value> {
    let engine = Arc::clone(&state.engine);
    let stored = run_blocking(move || engine.store().count().map_err(api_error)).await?;
    let mut obj = serde_json::json!({ "stored_documents": stored, "generation": null });
    if let Ok(index) = state.engine.snapshot() {
        obj["generation"] = index.generation().into();
        obj["indexed_documents"] = index.num_docs().into();
        obj["vocabulary_size"] = index.vocabulary().len().into();
        obj["postings"] = index.inverted_index().num_postings().into();
        obj["tokenizer"] = serde_json::to_value(index.tokenizer().config()).unwrap_or_default();
    }
    Ok(Json(obj))
}

/// Case-insensitive alternation of the query words, longest first.
fn term_pattern(terms: &[String]) -> Option<regex::Regex> {
    let mut words: Vec<&str> = terms.iter().map(String::as_str).filter(|t| !t.is_empty()).collect();
    if words.is_empty() { return None; }
    words.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
    words.dedup();
    let alternation = words.iter().map(|w| regex::escape(w)).collect::<Vec<_>>().join("|");
    regex::RegexBuilder::new(&format!("(?:{alternation})")).case_insensitive(true).build().ok()
}

fn snippet_from_text(text: &str, pattern: &regex::Regex) -> Option<String> {
    if text.is_empty() { return None; }
    let snippet: String = match pattern.find(text) {
        Some(m) => {
            let before = text[..m.start()].chars().count();
            text.chars().skip(before.saturating_sub(100)).take(300).collect()
        }
        None => text.chars().take(200).collect(),
    };
    Some(pattern.replace_all(&snippet, "<em>$0</em>").into_owned())
}

// --- Admin endpoints ---
async fn index_batch(State(state): State<AppState>, headers: HeaderMap, Json(batch): Json<BatchRequest>) -> ApiResult<serde_json::Value> {
    authorize(&state, &headers)?;
    let engine = Arc::clone(&state.engine);
    let ids = run_blocking(move || {
        batch
            .documents
            .iter()
            .map(|content| engine.add_document(content).map_err(api_error))
            .collect::<Result<Vec<DocId>, _>>()
    })
    .await?;
    tracing::info!(added = ids.len(), "documents queued for next commit");
    Ok(Json(serde_json::json!({ "ids": ids })))
}

async fn index_commit(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<serde_json::Value> {
    authorize(&state, &headers)?;
    let engine = Arc::clone(&state.engine);
    let index = run_blocking(move || engine.build().map_err(api_error)).await?;
    Ok(Json(serde_json::json!({
        "generation": index.generation(),
        "num_docs": index.num_docs(),
        "num_terms": index.vocabulary().len(),
    })))
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), (StatusCode, String)> {
    let required = match &state.admin_token {
        Some(t) => t,
        None => return Err((StatusCode::UNAUTHORIZED, "ADMIN_TOKEN not set".into())),
    };
    let provided = headers.get("X-ADMIN-TOKEN").and_then(|v| v.to_str().ok()).unwrap_or("");
    if provided == required {
        Ok(())
    } else {
        Err((StatusCode::UNAUTHORIZED, "invalid admin token".into()))
    }
}
