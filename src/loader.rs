// src/loader.rs
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::cloud_handler::SheetSource;
use crate::data_types::{LoaderConfig, TableSnapshot};
use crate::error::LoadError;

// Lock is held for the whole check-fetch-store sequence.
pub type SharedLoader<S> = Arc<Mutex<RemoteTableLoader<S>>>;

#[derive(Debug, Clone)]
pub struct CacheEntry {
    snapshot: Arc<TableSnapshot>,
    created_at: Instant,
}

impl CacheEntry {
    pub fn new(snapshot: Arc<TableSnapshot>, created_at: Instant) -> Self {
        CacheEntry {
            snapshot,
            created_at,
        }
    }

    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.created_at)
    }

    pub fn is_fresh(&self, now: Instant, ttl: Duration) -> bool {
        self.age(now) < ttl
    }
}

pub struct RemoteTableLoader<S> {
    config: LoaderConfig,
    source: S,
    entry: Option<CacheEntry>,
}

impl<S: SheetSource> RemoteTableLoader<S> {
    pub fn new(config: LoaderConfig, source: S) -> Self {
        RemoteTableLoader {
            config,
            source,
            entry: None,
        }
    }

    pub fn into_shared(self) -> SharedLoader<S> {
        Arc::new(Mutex::new(self))
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Returns the cached snapshot while it is younger than the TTL, otherwise
    /// fetches the worksheet and caches the result.
    pub async fn load(&mut self) -> Result<Arc<TableSnapshot>, LoadError> {
        if let Some(snapshot) = self.cached(Instant::now()) {
            return Ok(snapshot);
        }

        // Slot is empty from here on, so a failed fetch leaves nothing cached.
        let grid = self
            .source
            .fetch_grid(&self.config.spreadsheet_id, &self.config.worksheet_name)
            .await
            .map_err(|e| {
                warn!(
                    kind = e.kind(),
                    worksheet = %self.config.worksheet_name,
                    "failed to load worksheet: {}",
                    e
                );
                e
            })?;

        let snapshot = Arc::new(TableSnapshot::from_grid(grid));
        info!(
            worksheet = %self.config.worksheet_name,
            columns = snapshot.headers.len(),
            rows = snapshot.row_count(),
            "loaded worksheet"
        );
        self.store(Arc::clone(&snapshot), Instant::now());

        Ok(snapshot)
    }

    /// Drops the cached entry; the next `load` goes to the remote sheet.
    pub fn invalidate(&mut self) {
        if self.entry.take().is_some() {
            debug!("cache invalidated");
        }
    }

    pub fn cached_age(&self) -> Option<Duration> {
        self.entry.as_ref().map(|entry| entry.age(Instant::now()))
    }

    fn cached(&mut self, now: Instant) -> Option<Arc<TableSnapshot>> {
        let entry = self.entry.as_ref()?;
        if !entry.is_fresh(now, self.config.ttl) {
            debug!(age = ?entry.age(now), "cached worksheet expired");
            self.entry = None;
            return None;
        }

        debug!(age = ?entry.age(now), "serving cached worksheet");
        Some(Arc::clone(&entry.snapshot))
    }

    fn store(&mut self, snapshot: Arc<TableSnapshot>, now: Instant) {
        self.entry = Some(CacheEntry::new(snapshot, now));
    }
}

/// Loads through the shared handle, holding the lock across the fetch.
pub async fn load_shared<S: SheetSource>(
    loader: SharedLoader<S>,
) -> Result<Arc<TableSnapshot>, LoadError> {
    let mut loader = loader.lock().await;
    loader.load().await
}

/// Invalidates and reloads under one lock so no other load can slip in between.
pub async fn refresh_shared<S: SheetSource>(
    loader: SharedLoader<S>,
) -> Result<Arc<TableSnapshot>, LoadError> {
    let mut loader = loader.lock().await;
    debug!(age = ?loader.cached_age(), "refreshing worksheet");
    loader.invalidate();
    loader.load().await
}
