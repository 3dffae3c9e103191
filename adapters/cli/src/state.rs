//! Optional JSON file that keeps the in-memory store alive between runs.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use ricochet_store::{MemoryBackend, Snapshot, StoreSettings};

/// Opens the backend stored at `path`, or an empty one when there is no file.
pub(crate) fn load(path: Option<&Path>, settings: StoreSettings) -> Result<MemoryBackend> {
    let Some(path) = path.filter(|path| path.exists()) else {
        return Ok(MemoryBackend::new(settings));
    };

    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read state file at {}", path.display()))?;
    let snapshot: Snapshot = serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse state file at {}", path.display()))?;
    Ok(MemoryBackend::restore(settings, snapshot))
}

/// Writes every table of `backend` to `path`.
pub(crate) fn save(path: &Path, backend: &MemoryBackend) -> Result<()> {
    let json = serde_json::to_string_pretty(&backend.snapshot())
        .context("failed to serialize the store")?;
    fs::write(path, json)
        .with_context(|| format!("failed to write state file at {}", path.display()))?;
    log::debug!("saved store to {}", path.display());
    Ok(())
}
