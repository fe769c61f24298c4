use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use rankdex_core::{SearchEngine, SledStore, TokenizerConfig};
use serde_json::Value;
use std::sync::Arc;
use tempfile::{tempdir, TempDir};
use tower::ServiceExt;

const TOKEN: &str = "secret";

fn tiny_engine(dir: &TempDir, texts: &[&str]) -> Arc<SearchEngine<SledStore>> {
    let store = SledStore::open(dir.path()).unwrap();
    let engine = SearchEngine::new(store, TokenizerConfig::default()).unwrap();
    for t in texts {
        engine.add_document(t).unwrap();
    }
    Arc::new(engine)
}

async fn call(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn admin_post(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .header("X-ADMIN-TOKEN", TOKEN)
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn search_returns_ranked_results() {
    let dir = tempdir().unwrap();
    let engine = tiny_engine(&dir, &["Rust is great. rust systems programming.", "Learning rust.", "Cooking pasta."]);
    engine.build().unwrap();
    let app = rankdex_server::build_app(engine, None);

    let (status, json) = call(app, get("/search?q=rust&k=2")).await;
    assert_eq!(status, StatusCode::OK);
    let arr = json["results"].as_array().unwrap();
    assert_eq!(arr.len(), 2);
    assert_eq!(json["total_hits"], 2);
    let s0 = arr[0]["score"].as_f64().unwrap();
    let s1 = arr[1]["score"].as_f64().unwrap();
    assert!(s0 >= s1 && s1 > 0.0);
    assert!(arr[0]["snippet"].as_str().unwrap().contains("<em>"));
}

#[tokio::test]
async fn search_before_build_is_unavailable() {
    let dir = tempdir().unwrap();
    let app = rankdex_server::build_app(tiny_engine(&dir, &["anything"]), None);
    let (status, _) = call(app, get("/search?q=anything")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn doc_lookup_and_missing_doc() {
    let dir = tempdir().unwrap();
    let app = rankdex_server::build_app(tiny_engine(&dir, &["first doc"]), None);
    let (status, json) = call(app.clone(), get("/doc/0")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["content"], "first doc");
    let (status, _) = call(app, get("/doc/9")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn admin_batch_then_commit_rebuilds() {
    let dir = tempdir().unwrap();
    let engine = tiny_engine(&dir, &[]);
    let app = rankdex_server::build_app(engine, Some(TOKEN.to_string()));

    let (status, _) = call(app.clone(), admin_post("/index/commit", Value::Null)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let batch = serde_json::json!({ "documents": ["the cat sat", "the dog sat"] });
    let (status, json) = call(app.clone(), admin_post("/index/batch", batch)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["ids"], serde_json::json!([0, 1]));

    let (status, json) = call(app.clone(), admin_post("/index/commit", Value::Null)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["generation"], 1);

    let (_, json) = call(app.clone(), get("/search?q=dog")).await;
    assert_eq!(json["results"][0]["doc_id"], 1);

    let (_, json) = call(app, get("/stats")).await;
    assert_eq!(json["indexed_documents"], 2);
}

#[tokio::test]
async fn admin_requires_token() {
    let dir = tempdir().unwrap();
    let app = rankdex_server::build_app(tiny_engine(&dir, &[]), Some(TOKEN.to_string()));
    let req = Request::post("/index/commit").body(Body::empty()).unwrap();
    let (status, _) = call(app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn concurrent_searches_and_ingest_share_the_engine() {
    let dir = tempdir().unwrap();
    let engine = tiny_engine(&dir, &["the cat sat", "the dog sat", "the cat ran"]);
    engine.build().unwrap();
    let app = rankdex_server::build_app(engine, Some(TOKEN.to_string()));

    let batch = serde_json::json!({ "documents": ["a cat napped"] });
    let (a, b, c) = tokio::join!(
        call(app.clone(), get("/search?q=cat")),
        call(app.clone(), get("/search?q=dog")),
        call(app.clone(), admin_post("/index/batch", batch)),
    );
    assert_eq!(a.0, StatusCode::OK);
    assert_eq!(a.1["total_hits"], 2);
    assert_eq!(b.1["results"][0]["doc_id"], 1);
    assert_eq!(c.1["ids"], serde_json::json!([3]));

    let (status, json) = call(app, get("/stats")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["stored_documents"], 4);
    assert_eq!(json["indexed_documents"], 3);
}
