//! Seams between the data manager and the document store.
//!
//! The cache controller only needs to run a search; the importer only needs
//! to administer an index and put documents into it. Both are expressed as
//! traits so the core can run against [`ElasticClient`](crate::elastic::ElasticClient)
//! in production and against in-memory fakes in tests.
//!
//! ```text
//!  DataManager ──▶ SearchBackend ─┐
//!                                 ├──▶ ElasticClient ──▶ cluster
//!  import      ──▶ DocumentIndex ─┘
//! ```

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

/// Executes aggregation queries against the configured index.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Run `body` as a search request and return the raw JSON response.
    async fn search(&self, body: &Value) -> Result<Value>;
}

/// Administers the target index and stores documents in it.
#[async_trait]
pub trait DocumentIndex: Send + Sync {
    /// Liveness check against the cluster.
    async fn ping(&self) -> Result<()>;

    /// Whether the target index exists. A missing index is not an error.
    async fn index_exists(&self) -> Result<bool>;

    /// Create the target index. Returns the cluster's `acknowledged` flag.
    async fn create_index(&self) -> Result<bool>;

    async fn delete_index(&self) -> Result<()>;

    /// Store `doc` under `id`, replacing any existing document.
    async fn put_document(&self, id: &str, doc: &Value) -> Result<()>;
}
