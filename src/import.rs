//! Bulk movie import.
//!
//! Reads a movie CSV (header row, then one movie per row), parses each row
//! with [`parse_record`], and stores it in the index under its 1-based row
//! number. The first malformed row or failed insert aborts the import;
//! documents inserted before that point stay in the index.

use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

use crate::config::Config;
use crate::elastic::ElasticClient;
use crate::error::{DataError, Result};
use crate::provision::{ensure_index, Provisioned};
use crate::record::parse_record;
use crate::traits::DocumentIndex;

/// Outcome of a completed import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    pub inserted: u64,
}

/// Import the movie CSV at `path` into the configured index.
///
/// Connects to the cluster, provisions the index (recreating it when
/// `overwrite` is set), then loads every row.
pub async fn import_movies(
    config: &Config,
    path: &Path,
    overwrite: bool,
) -> Result<ImportSummary> {
    // Read the input first so a bad path never touches the index. The file
    // is loaded off the async workers and parsed from memory.
    let input = tokio::fs::read(path).await?;

    let client = ElasticClient::new(&config.cluster)?;
    let provisioned = ensure_index(&client, client.index_name(), overwrite).await?;
    if provisioned == Provisioned::Recreated {
        info!(index = client.index_name(), "existing documents discarded");
    }

    let summary = import_records(input.as_slice(), &client).await?;
    info!(
        inserted = summary.inserted,
        source = %path.display(),
        "import complete"
    );
    Ok(summary)
}

/// Parse and insert every data row read from `reader`.
///
/// `reader` is read synchronously between inserts, so it should be an
/// in-memory source rather than a file or socket.
pub async fn import_records<R: Read>(
    reader: R,
    index: &dyn DocumentIndex,
) -> Result<ImportSummary> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut count: u64 = 0;
    for result in csv_reader.records() {
        count += 1;
        let abort = move |source: DataError| DataError::Import {
            record: count,
            source: Box::new(source),
        };

        let record = result.map_err(|e| abort(e.into()))?;
        let fields: Vec<&str> = record.iter().collect();
        let movie = parse_record(&fields).map_err(abort)?;
        let doc = serde_json::to_value(&movie)
            .map_err(|e| abort(DataError::UnexpectedShape(e.to_string())))?;

        index
            .put_document(&count.to_string(), &doc)
            .await
            .map_err(abort)?;
        debug!(id = count, title = %movie.movie_title, "added movie");
    }

    Ok(ImportSummary { inserted: count })
}
