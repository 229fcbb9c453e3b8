//! Chart page HTTP server.
//!
//! Serves the static website and renders one chart page per JSON page
//! descriptor. Before a page is rendered, the artifact it charts is brought
//! up to date through [`DataManager::refresh`].
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/health` | Health check (returns version) |
//! | `GET` | `/website/*` | Static assets, including cached artifacts |
//! | `GET` | `/{page}` | Render `pages/{page}.json` through the view template |
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "timeout", "message": "search for movie_gross_by_genre.csv timed out" } }
//! ```
//!
//! Error codes: `not_found` (404), `cluster_unavailable` (502), `timeout` (504),
//! `internal` (500).

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tera::Tera;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::{error, info};

use crate::config::{Config, ServerConfig};
use crate::error::DataError;
use crate::manager::DataManager;

const TEMPLATE_NAME: &str = "view.html";

/// A chart page descriptor, loaded from `pages/{page}.json`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Page {
    /// Artifact the page charts; must be a registered artifact name.
    pub data_file: String,
    /// Page title, shown as the `<h1>`.
    pub heading: String,
    /// Chart layer the page script draws (`genre`, `country`, ...).
    pub layer_type: String,
    /// Pre-rendered navigation markup, inserted unescaped.
    #[serde(default)]
    pub nav_items: String,
}

/// Shared state passed to all route handlers.
#[derive(Clone)]
struct AppState {
    /// Refreshes artifacts before a page renders.
    manager: Arc<DataManager>,
    /// Directory holding `{page}.json` descriptors.
    pages_dir: Arc<PathBuf>,
    /// Compiled page template, registered as `view.html`.
    templates: Arc<Tera>,
}

/// Starts the chart server using the configured cluster and directories.
///
/// Binds to `[server].bind` and runs until the process is terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let manager = Arc::new(DataManager::from_config(config)?);
    let app = build_router(manager, &config.server)?;

    info!(bind = %config.server.bind, "chart server listening");
    println!("Listening on http://{}", config.server.bind);

    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// Build the router over an existing manager.
///
/// Fails if the page template cannot be loaded.
pub fn build_router(manager: Arc<DataManager>, server: &ServerConfig) -> anyhow::Result<Router> {
    let mut tera = Tera::default();
    tera.add_template_file(&server.template, Some(TEMPLATE_NAME))
        .map_err(|e| {
            anyhow::anyhow!(
                "failed to load page template {}: {}",
                server.template.display(),
                e
            )
        })?;

    let state = AppState {
        manager,
        pages_dir: Arc::new(server.pages_dir.clone()),
        templates: Arc::new(tera),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Ok(Router::new()
        .route("/health", get(handle_health))
        .route("/{page}", get(handle_page))
        .nest_service("/website", ServeDir::new(&server.website_dir))
        .layer(cors)
        .with_state(state))
}

/// Page names are restricted to ASCII letters, digits and `-`.
pub fn is_valid_page_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// Load and decode a page descriptor. Returns `None` if it is missing or
/// malformed.
fn load_page(pages_dir: &std::path::Path, name: &str) -> Option<Page> {
    let path = pages_dir.join(format!("{}.json", name));
    let content = std::fs::read_to_string(path).ok()?;
    serde_json::from_str(&content).ok()
}

// ============ Error response ============

/// JSON error envelope: `{ "error": { "code": ..., "message": ... } }`.
#[derive(Serialize)]
struct ErrorBody {
    /// The error detail.
    error: ErrorDetail,
}

/// Machine-readable error code and human-readable message.
#[derive(Serialize)]
struct ErrorDetail {
    /// Error code: `not_found`, `cluster_unavailable`, `timeout`, or `internal`.
    code: String,
    /// Human-readable error description.
    message: String,
}

/// Internal error type that converts to an HTTP response.
struct AppError {
    /// HTTP status code.
    status: StatusCode,
    /// Error code for the JSON body.
    code: &'static str,
    /// Human-readable error description.
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code.to_string(),
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn not_found(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::NOT_FOUND,
        code: "not_found",
        message: message.into(),
    }
}

impl From<DataError> for AppError {
    fn from(err: DataError) -> Self {
        let (status, code) = match &err {
            DataError::Timeout(_) => (StatusCode::GATEWAY_TIMEOUT, "timeout"),
            DataError::Connectivity(_) | DataError::Remote { .. } => {
                (StatusCode::BAD_GATEWAY, "cluster_unavailable")
            }
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
        };
        AppError {
            status,
            code,
            message: err.to_string(),
        }
    }
}

// ============ GET /health ============

/// Response body for `GET /health`.
#[derive(Serialize)]
struct HealthResponse {
    /// Always `"ok"` when the server is running.
    status: String,
    /// Crate version from `Cargo.toml`.
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ GET /{page} ============

/// Refresh the page's artifact, then render the page.
async fn handle_page(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Html<String>, AppError> {
    if !is_valid_page_name(&name) {
        return Err(not_found(format!("no page named: {}", name)));
    }
    let page = load_page(&state.pages_dir, &name)
        .ok_or_else(|| not_found(format!("no page named: {}", name)))?;

    if let Err(e) = state.manager.refresh(&page.data_file).await {
        error!(page = %name, artifact = %page.data_file, error = %e, "artifact refresh failed");
        return Err(e.into());
    }

    let context = tera::Context::from_serialize(&page).map_err(|e| AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        code: "internal",
        message: e.to_string(),
    })?;
    let html = state
        .templates
        .render(TEMPLATE_NAME, &context)
        .map_err(|e| AppError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: "internal",
            message: format!("failed to render page {}: {}", name, e),
        })?;

    Ok(Html(html))
}
