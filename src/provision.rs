//! Index provisioning.
//!
//! Makes sure the target index exists before documents are loaded, optionally
//! dropping and recreating it.
//!
//! | Index exists | `overwrite` | Action |
//! |--------------|-------------|--------|
//! | no | any | create |
//! | yes | `false` | reuse |
//! | yes | `true` | delete, then create |

use tracing::info;

use crate::error::{DataError, Result};
use crate::traits::DocumentIndex;

/// What [`ensure_index`] did to the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provisioned {
    Created,
    Recreated,
    Reused,
}

/// Ping the cluster and ensure the target index exists.
///
/// # Errors
///
/// Connectivity failures surface unchanged. An index creation that the
/// cluster does not acknowledge is [`DataError::NotAcknowledged`].
pub async fn ensure_index(
    index: &dyn DocumentIndex,
    index_name: &str,
    overwrite: bool,
) -> Result<Provisioned> {
    index.ping().await?;

    let exists = index.index_exists().await?;
    if exists && !overwrite {
        info!(index = index_name, "reusing existing index");
        return Ok(Provisioned::Reused);
    }

    if exists {
        info!(index = index_name, "deleting existing index");
        index.delete_index().await?;
    }

    if !index.create_index().await? {
        return Err(DataError::NotAcknowledged(index_name.to_string()));
    }

    if exists {
        info!(index = index_name, "index recreated");
        Ok(Provisioned::Recreated)
    } else {
        info!(index = index_name, "index created");
        Ok(Provisioned::Created)
    }
}
