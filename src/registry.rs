//! Artifact registry.
//!
//! Maps each recognised artifact file name to the [`SearchSpec`] that
//! produces it. The registry is built once and shared read-only; requests
//! for any other file name are rejected before any I/O happens.
//!
//! # Built-in artifacts
//!
//! | Artifact | Group field | Groups | Years |
//! |----------|-------------|--------|-------|
//! | `movie_gross_by_country.csv` | `country.keyword` | 3 | 20 |
//! | `movie_gross_by_genre.csv` | `genres.keyword` | 6 | 30 |

use std::collections::BTreeMap;

use crate::error::{DataError, Result};
use crate::models::SearchSpec;

pub const GROSS_BY_COUNTRY: &str = "movie_gross_by_country.csv";
pub const GROSS_BY_GENRE: &str = "movie_gross_by_genre.csv";

/// Immutable mapping from artifact name to search specification.
#[derive(Debug, Clone, Default)]
pub struct ArtifactRegistry {
    specs: BTreeMap<String, SearchSpec>,
}

impl ArtifactRegistry {
    /// Build a registry from explicit entries. Later duplicates win.
    pub fn from_entries<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, SearchSpec)>,
        K: Into<String>,
    {
        Self {
            specs: entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// The artifacts served by the charts front-end.
    pub fn builtin() -> Self {
        Self::from_entries([
            (GROSS_BY_COUNTRY, SearchSpec::new("country.keyword", 3, 20)),
            (GROSS_BY_GENRE, SearchSpec::new("genres.keyword", 6, 30)),
        ])
    }

    pub fn get(&self, artifact: &str) -> Option<&SearchSpec> {
        self.specs.get(artifact)
    }

    /// Like [`get`](Self::get), but an unknown name is an error.
    pub fn lookup(&self, artifact: &str) -> Result<&SearchSpec> {
        self.get(artifact)
            .ok_or_else(|| DataError::UnrecognizedArtifact(artifact.to_string()))
    }

    /// Registered artifacts in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SearchSpec)> {
        self.specs.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}
