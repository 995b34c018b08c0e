//! Crash-safe JSONL file writes.
//!
//! Records go to a sibling `<name>.tmp` file first, which is flushed and then
//! renamed over the target. A rename within one filesystem is atomic on POSIX,
//! so readers see either the old snapshot or the new one, never a mix.

use crate::{JsonlWriter, Result};
use serde::Serialize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::fs::File;

/// Atomically replaces `path` with `values`, one record per line.
///
/// # Errors
///
/// Returns an error if the temporary file cannot be written or the final
/// rename fails. The original file is left untouched in either case.
pub async fn write_jsonl_atomic<T, P>(path: P, values: &[T]) -> Result<()>
where
    T: Serialize,
    P: AsRef<Path>,
{
    write_jsonl_atomic_iter(path, values.iter()).await
}

/// Iterator flavour of [`write_jsonl_atomic`].
///
/// # Errors
///
/// See [`write_jsonl_atomic`].
pub async fn write_jsonl_atomic_iter<T, I, P>(path: P, values: I) -> Result<()>
where
    T: Serialize,
    I: IntoIterator<Item = T>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let temp_path = temp_path_for(path);

    if let Err(e) = write_temp(&temp_path, values).await {
        // Best effort; the write error is the one worth reporting.
        let _ = tokio::fs::remove_file(&temp_path).await;
        return Err(e);
    }

    tokio::fs::rename(&temp_path, path).await?;
    tracing::trace!(path = %path.display(), "replaced JSONL file");
    Ok(())
}

/// `trip.jsonl` -> `trip.jsonl.tmp`, `trip` -> `trip.tmp`.
fn temp_path_for(path: &Path) -> PathBuf {
    let extension = match path.extension() {
        Some(ext) => {
            let mut ext = ext.to_os_string();
            ext.push(".tmp");
            ext
        }
        None => OsString::from("tmp"),
    };
    path.with_extension(extension)
}

async fn write_temp<T, I>(temp_path: &Path, values: I) -> Result<()>
where
    T: Serialize,
    I: IntoIterator<Item = T>,
{
    let mut writer = JsonlWriter::new(File::create(temp_path).await?);
    writer.write_all(values).await?;
    writer.flush().await?;
    writer.into_inner().into_inner().sync_all().await?;
    Ok(())
}
