//! Session-scoped memoization of the load step.

use super::DataLoader;
use crate::error::{DashboardError, Result};
use crate::records::CanonicalRecordSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;
use tracing::{debug, info};

/// Identity of a source file: where it is and which version of it we saw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceKey {
    pub path: PathBuf,
    pub modified: Option<SystemTime>,
    pub len: u64,
}

impl SourceKey {
    /// Inspect the file at `path` without reading its content.
    pub fn probe(path: &Path) -> Result<Self> {
        let unavailable = |e: std::io::Error| DashboardError::SourceUnavailable {
            path: path.display().to_string(),
            reason: e.to_string(),
        };

        let canonical = path.canonicalize().map_err(unavailable)?;
        let metadata = std::fs::metadata(&canonical).map_err(unavailable)?;

        Ok(Self {
            path: canonical,
            modified: metadata.modified().ok(),
            len: metadata.len(),
        })
    }
}

/// Holds at most one loaded record set, keyed by its [`SourceKey`].
///
/// Repeated calls to [`DataCache::get_or_load`] are free while the file is
/// unchanged. A new path, a new modification time or a new size triggers a
/// reload. Failed loads leave the cache empty.
#[derive(Debug, Default)]
pub struct DataCache {
    entry: Option<(SourceKey, Arc<CanonicalRecordSet>)>,
    loads: usize,
}

impl DataCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached record set for `path`, loading it if needed.
    pub fn get_or_load(
        &mut self,
        path: &Path,
        loader: &DataLoader,
    ) -> Result<Arc<CanonicalRecordSet>> {
        let key = SourceKey::probe(path)?;

        if let Some((cached_key, records)) = &self.entry
            && *cached_key == key
        {
            debug!("Cache hit for {}", key.path.display());
            return Ok(Arc::clone(records));
        }

        if self.entry.is_some() {
            info!("Source changed, reloading {}", key.path.display());
        }
        self.entry = None;

        let records = Arc::new(loader.load(&key.path)?);
        self.loads += 1;
        self.entry = Some((key, Arc::clone(&records)));

        Ok(records)
    }

    /// Cached record set, if one is held.
    pub fn current(&self) -> Option<Arc<CanonicalRecordSet>> {
        self.entry.as_ref().map(|(_, records)| Arc::clone(records))
    }

    /// Drop the cached record set.
    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    /// Number of loads performed by this cache.
    pub fn load_count(&self) -> usize {
        self.loads
    }
}
