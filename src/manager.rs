//! Cache freshness controller.
//!
//! [`DataManager`] owns the artifact registry, the search backend, and the
//! cache directory. [`DataManager::refresh`] makes sure one named artifact is
//! no older than the configured TTL, rebuilding it from the index when it is
//! missing or stale.
//!
//! # Refresh flow
//!
//! ```text
//! name ─▶ registry lookup ─▶ per-key lock ─▶ mtime check ─┬─▶ fresh: Ok(false)
//!                                                         └─▶ stale: query ─▶ flatten ─▶ write ─▶ Ok(true)
//! ```
//!
//! # Concurrency
//!
//! Refreshes of the same artifact are serialized by a per-key async mutex and
//! the staleness check runs under that lock. A caller that queued behind an
//! in-flight refresh therefore finds a fresh file and returns without issuing
//! its own query. Refreshes of different artifacts run independently.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::artifact::{is_stale, modified_at, write_artifact};
use crate::config::Config;
use crate::elastic::ElasticClient;
use crate::error::{DataError, Result};
use crate::flatten::flatten;
use crate::query::build_aggregation;
use crate::registry::ArtifactRegistry;
use crate::traits::SearchBackend;

pub struct DataManager {
    registry: Arc<ArtifactRegistry>,
    backend: Arc<dyn SearchBackend>,
    data_path: PathBuf,
    ttl: chrono::Duration,
    deadline: Duration,
    locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl DataManager {
    /// Create a manager over an explicit registry and backend.
    ///
    /// `deadline` bounds each remote search issued by [`refresh`](Self::refresh).
    pub fn new(
        registry: Arc<ArtifactRegistry>,
        backend: Arc<dyn SearchBackend>,
        data_path: impl Into<PathBuf>,
        ttl: chrono::Duration,
        deadline: Duration,
    ) -> Self {
        Self {
            registry,
            backend,
            data_path: data_path.into(),
            ttl,
            deadline,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Create a manager for the built-in artifacts backed by the configured
    /// cluster.
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = ElasticClient::new(&config.cluster)?;
        Ok(Self::new(
            Arc::new(ArtifactRegistry::builtin()),
            Arc::new(client),
            config.cache.data_path.clone(),
            config.cache.ttl(),
            config.cluster.timeout(),
        ))
    }

    pub fn registry(&self) -> &ArtifactRegistry {
        &self.registry
    }

    /// On-disk location of `artifact`.
    pub fn artifact_path(&self, artifact: &str) -> PathBuf {
        self.data_path.join(artifact)
    }

    /// Ensure `artifact` is fresh, rebuilding it if needed.
    ///
    /// Returns `true` when the artifact was rewritten and `false` when the
    /// cached copy was still within its TTL.
    pub async fn refresh(&self, artifact: &str) -> Result<bool> {
        self.refresh_with_deadline(artifact, self.deadline).await
    }

    /// Like [`refresh`](Self::refresh) with an explicit deadline for the
    /// remote search. On timeout the cached artifact is left untouched.
    pub async fn refresh_with_deadline(
        &self,
        artifact: &str,
        deadline: Duration,
    ) -> Result<bool> {
        let spec = match self.registry.lookup(artifact) {
            Ok(spec) => spec,
            Err(e) => {
                warn!(artifact, "refresh requested for unregistered artifact");
                return Err(e);
            }
        };

        let lock = self.key_lock(artifact);
        let _guard = lock.lock().await;

        let path = self.artifact_path(artifact);
        if !is_stale(modified_at(&path)?, self.ttl, Utc::now()) {
            debug!(artifact, "artifact is fresh");
            return Ok(false);
        }

        let started = Instant::now();
        let query = build_aggregation(spec);
        let response = tokio::time::timeout(deadline, self.backend.search(&query))
            .await
            .map_err(|_| DataError::Timeout(format!("search for {}", artifact)))??;

        let rows = flatten(&response)?;
        write_artifact(&rows, &path)?;

        info!(
            artifact,
            rows = rows.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "artifact refreshed"
        );
        Ok(true)
    }

    fn key_lock(&self, artifact: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        locks
            .entry(artifact.to_string())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }
}
