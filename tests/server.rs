//! Integration tests for the chart page server.

use async_trait::async_trait;
use profitable_movie::config::ServerConfig;
use profitable_movie::error::{DataError, Result};
use profitable_movie::manager::DataManager;
use profitable_movie::registry::ArtifactRegistry;
use profitable_movie::server::build_router;
use profitable_movie::traits::SearchBackend;
use serde_json::{json, Value};
use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

struct FixedBackend {
    calls: AtomicUsize,
    fail: bool,
}

#[async_trait]
impl SearchBackend for FixedBackend {
    async fn search(&self, _body: &Value) -> Result<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(DataError::Timeout("search".to_string()));
        }
        Ok(json!({
            "aggregations": { "termsAgg": { "buckets": [
                { "key": "Comedy", "doc_count": 4, "yearsAgg": { "buckets": [
                    { "key": "2016", "doc_count": 4, "avgGrossAgg": { "value": 48000000.4 } }
                ]}}
            ]}}
        }))
    }
}

/// Lay out a website, page descriptors and template under `root`.
fn setup_site(root: &std::path::Path) -> ServerConfig {
    let website = root.join("website");
    let pages = root.join("pages");
    fs::create_dir_all(website.join("assets")).unwrap();
    fs::create_dir_all(&pages).unwrap();

    fs::write(
        website.join("view.html"),
        "<h1>{{ heading }}</h1><div data-csv=\"/website/data/{{ data_file }}\" data-layer=\"{{ layer_type }}\"></div>",
    )
    .unwrap();
    fs::write(website.join("assets").join("app.js"), "console.log('chart');").unwrap();

    fs::write(
        pages.join("genre.json"),
        r#"{"data_file":"movie_gross_by_genre.csv","heading":"Gross by Genre","layer_type":"genre","nav_items":""}"#,
    )
    .unwrap();
    fs::write(
        pages.join("broken.json"),
        r#"{"data_file":"movie_gross_by_director.csv","heading":"Broken","layer_type":"x"}"#,
    )
    .unwrap();

    ServerConfig {
        bind: "127.0.0.1:0".to_string(),
        pages_dir: pages,
        website_dir: website.clone(),
        template: website.join("view.html"),
    }
}

async fn start(root: &std::path::Path, fail: bool) -> (String, Arc<FixedBackend>) {
    let server = setup_site(root);
    let backend = Arc::new(FixedBackend {
        calls: AtomicUsize::new(0),
        fail,
    });
    let manager = Arc::new(DataManager::new(
        Arc::new(ArtifactRegistry::builtin()),
        backend.clone(),
        root.join("website").join("data"),
        chrono::Duration::minutes(60),
        Duration::from_secs(5),
    ));
    let app = build_router(manager, &server).unwrap();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });
    (format!("http://{}", addr), backend)
}

#[tokio::test]
async fn test_health() {
    let tmp = TempDir::new().unwrap();
    let (base, _) = start(tmp.path(), false).await;

    let resp = reqwest::get(format!("{}/health", base)).await.unwrap();
    assert!(resp.status().is_success());
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_page_refreshes_artifact_and_renders() {
    let tmp = TempDir::new().unwrap();
    let (base, backend) = start(tmp.path(), false).await;

    let resp = reqwest::get(format!("{}/genre", base)).await.unwrap();
    assert_eq!(resp.status(), 200);
    let html = resp.text().await.unwrap();
    assert!(html.contains("<h1>Gross by Genre</h1>"));
    assert!(html.contains("/website/data/movie_gross_by_genre.csv"));

    // The artifact is now served as a static file.
    let csv = reqwest::get(format!("{}/website/data/movie_gross_by_genre.csv", base))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(csv, "key,value,date\nComedy,48000000,2016\n");

    // A second view within the TTL does not query again.
    reqwest::get(format!("{}/genre", base)).await.unwrap();
    assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_static_assets_are_served() {
    let tmp = TempDir::new().unwrap();
    let (base, _) = start(tmp.path(), false).await;

    let resp = reqwest::get(format!("{}/website/assets/app.js", base))
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "console.log('chart');");
}

#[tokio::test]
async fn test_unknown_page_is_not_found() {
    let tmp = TempDir::new().unwrap();
    let (base, backend) = start(tmp.path(), false).await;

    let resp = reqwest::get(format!("{}/nothing-here", base)).await.unwrap();
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "not_found");
    assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_page_with_unregistered_artifact_is_internal_error() {
    let tmp = TempDir::new().unwrap();
    let (base, backend) = start(tmp.path(), false).await;

    let resp = reqwest::get(format!("{}/broken", base)).await.unwrap();
    assert_eq!(resp.status(), 500);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("movie_gross_by_director.csv"));
    assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_search_timeout_maps_to_gateway_timeout() {
    let tmp = TempDir::new().unwrap();
    let (base, _) = start(tmp.path(), true).await;

    let resp = reqwest::get(format!("{}/genre", base)).await.unwrap();
    assert_eq!(resp.status(), 504);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "timeout");
    assert!(!tmp
        .path()
        .join("website/data/movie_gross_by_genre.csv")
        .exists());
}
