//! Cached artifact files.
//!
//! An artifact is a CSV file with the header `key,value,date` followed by
//! one row per [`FlatRow`]. Writes go to a temporary file in the destination
//! directory which is then renamed over the target, so readers observe
//! either the previous complete file or the new complete file.

use chrono::{DateTime, Utc};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

use crate::error::{DataError, Result};
use crate::models::FlatRow;

/// Header row of every artifact.
pub const HEADER: [&str; 3] = ["key", "value", "date"];

/// File mode of a written artifact on unix.
#[cfg(unix)]
pub const ARTIFACT_MODE: u32 = 0o644;

/// Write `rows` to `path`, replacing any existing artifact atomically.
///
/// On error the destination is left untouched and the temporary file is
/// removed.
pub fn write_artifact(rows: &[FlatRow], path: &Path) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let mut tmp = NamedTempFile::new_in(parent)?;
    {
        let mut writer = csv::Writer::from_writer(tmp.as_file_mut());
        writer.write_record(HEADER)?;
        for row in rows {
            writer.write_record([&row.key, &row.value, &row.date])?;
        }
        writer.flush()?;
    }
    tmp.as_file_mut().flush()?;
    // Temp files are created owner-only; artifacts are served to other users.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(std::fs::Permissions::from_mode(ARTIFACT_MODE))?;
    }
    tmp.as_file().sync_all()?;

    tmp.persist(path).map_err(|e| DataError::Io(e.error))?;
    Ok(())
}

/// Whether an artifact last modified at `modified` is stale at `now`.
///
/// A missing artifact (`None`) is always stale. An artifact is stale once
/// its age reaches `ttl`; a modification time in the future counts as fresh.
pub fn is_stale(
    modified: Option<DateTime<Utc>>,
    ttl: chrono::Duration,
    now: DateTime<Utc>,
) -> bool {
    match modified {
        None => true,
        Some(mtime) => now.signed_duration_since(mtime) >= ttl,
    }
}

/// Last modification time of the artifact at `path`, if it exists.
pub fn modified_at(path: &Path) -> Result<Option<DateTime<Utc>>> {
    match std::fs::metadata(path) {
        Ok(meta) => Ok(Some(DateTime::<Utc>::from(meta.modified()?))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}
