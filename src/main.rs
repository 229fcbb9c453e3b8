//! # Profitable Movie CLI (`pmovie`)
//!
//! ## Usage
//!
//! ```bash
//! pmovie --config ./config/pmovie.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `pmovie import <csv>` | Load a movie CSV into the index |
//! | `pmovie refresh <artifact>` | Rebuild a cached artifact if it is stale |
//! | `pmovie artifacts` | List registered artifacts |
//! | `pmovie serve` | Start the chart page server |
//!
//! ## Examples
//!
//! ```bash
//! # Replace the index with a fresh import
//! pmovie import data/movie_metadata.csv --overwrite
//!
//! # Make sure the genre chart data is up to date
//! pmovie refresh movie_gross_by_genre.csv
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use profitable_movie::config;
use profitable_movie::import;
use profitable_movie::manager::DataManager;
use profitable_movie::registry::ArtifactRegistry;
use profitable_movie::server;

/// Profitable Movie: cached movie profitability aggregates backed by
/// Elasticsearch.
#[derive(Parser)]
#[command(name = "pmovie", version, about)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/pmovie.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a movie CSV file into the configured index.
    ///
    /// The first row is treated as a header. Import stops at the first
    /// malformed row; rows already inserted are kept.
    Import {
        /// Path to the movie CSV file.
        path: PathBuf,

        /// Delete and recreate the index before importing.
        #[arg(long)]
        overwrite: bool,
    },

    /// Rebuild a cached artifact if it is missing or older than the TTL.
    Refresh {
        /// Artifact file name (see `pmovie artifacts`).
        artifact: String,
    },

    /// List registered artifacts and their aggregation shape.
    Artifacts,

    /// Start the chart page server.
    Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pmovie=info,profitable_movie=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    // Listing artifacts needs no configuration.
    if let Commands::Artifacts = cli.command {
        print_artifacts(&ArtifactRegistry::builtin());
        return Ok(());
    }

    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Import { path, overwrite } => {
            let summary = import::import_movies(&cfg, &path, overwrite)
                .await
                .with_context(|| format!("failed to import {}", path.display()))?;
            println!("Imported {} movies", summary.inserted);
        }
        Commands::Refresh { artifact } => {
            let manager = DataManager::from_config(&cfg)?;
            let updated = manager
                .refresh(&artifact)
                .await
                .with_context(|| format!("failed to refresh {}", artifact))?;
            println!("{} {}", artifact, if updated { "updated" } else { "fresh" });
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
        Commands::Artifacts => unreachable!(),
    }

    Ok(())
}

fn print_artifacts(registry: &ArtifactRegistry) {
    println!("{:<32} {:<20} {:>6} {:>6}", "ARTIFACT", "GROUP FIELD", "GROUPS", "YEARS");
    for (name, spec) in registry.iter() {
        println!(
            "{:<32} {:<20} {:>6} {:>6}",
            name, spec.group_field, spec.group_count, spec.year_count
        );
    }
}
