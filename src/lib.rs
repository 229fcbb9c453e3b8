//! # Profitable Movie
//!
//! Cached movie profitability aggregates for a small charts website.
//!
//! Movies are bulk-loaded from a CSV export into an Elasticsearch index.
//! Each chart reads a small CSV artifact (`key,value,date`) holding the
//! average gross per group per release year. Artifacts are rebuilt from the
//! index on demand once they are older than the configured TTL.
//!
//! ## Architecture
//!
//! ```text
//!  movies.csv ──▶ record ──▶ import ──▶ ┌───────────────┐
//!                              │        │ Elasticsearch │
//!                          provision ─▶ └──────┬────────┘
//!                                              │ search
//!  /{page} ──▶ server ──▶ manager ──▶ query ───┘
//!                            │
//!                            └──▶ flatten ──▶ artifact (website/data/*.csv)
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`error`] | Error taxonomy |
//! | [`models`] | Core data types |
//! | [`registry`] | Artifact name → search specification |
//! | [`record`] | Movie CSV row parsing |
//! | [`query`] | Aggregation query construction |
//! | [`flatten`] | Aggregation response decoding |
//! | [`artifact`] | Atomic artifact writes and staleness |
//! | [`traits`] | Search and index seams |
//! | [`elastic`] | Elasticsearch REST client |
//! | [`provision`] | Index provisioning |
//! | [`import`] | Bulk movie import |
//! | [`manager`] | Cache freshness controller |
//! | [`server`] | Chart page HTTP server |

pub mod artifact;
pub mod config;
pub mod elastic;
pub mod error;
pub mod flatten;
pub mod import;
pub mod manager;
pub mod models;
pub mod provision;
pub mod query;
pub mod record;
pub mod registry;
pub mod server;
pub mod traits;
