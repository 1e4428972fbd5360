//! Per-user dashboard session.

use crate::config::DashboardConfig;
use crate::error::Result;
use crate::filter::{FilterSelection, filter};
use crate::loader::{DataCache, DataLoader};
use crate::records::{CanonicalRecordSet, FilteredView};
use crate::report::{DashboardReport, build_report};
use std::sync::Arc;
use tracing::info;

/// Owns one configuration and one load cache.
///
/// Sessions share nothing: two sessions over the same file each load it once.
#[derive(Debug)]
pub struct DashboardSession {
    config: DashboardConfig,
    loader: DataLoader,
    cache: DataCache,
}

impl DashboardSession {
    pub fn new(config: DashboardConfig) -> Self {
        info!("Starting dashboard session for {}", config.source_path.display());
        Self {
            loader: DataLoader::new(&config),
            config,
            cache: DataCache::new(),
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Load the configured source, reusing the cached set while the file is
    /// unchanged.
    pub fn load(&mut self) -> Result<Arc<CanonicalRecordSet>> {
        self.cache.get_or_load(&self.config.source_path, &self.loader)
    }

    /// Apply `selection` to the current records.
    pub fn filter(&mut self, selection: &FilterSelection) -> Result<FilteredView> {
        let records = self.load()?;
        filter(records.as_ref(), selection)
    }

    /// Full dashboard for `selection`, using the configured top-N.
    pub fn report(&mut self, selection: &FilterSelection) -> Result<DashboardReport> {
        let records = self.load()?;
        build_report(&records, selection, self.config.top_n)
    }

    /// Forget the cached records so the next call reloads the file.
    pub fn invalidate(&mut self) {
        self.cache.invalidate();
    }

    /// Number of times the source has actually been read.
    pub fn load_count(&self) -> usize {
        self.cache.load_count()
    }
}
