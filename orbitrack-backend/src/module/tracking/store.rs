///! Catalog store with a staleness-gated refresh
use chrono::Duration;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use super::clock::Clock;
use super::error::TrackingError;
use super::ingest::Ingestor;
use super::snapshot::CatalogSnapshot;

/// Age after which a fallback snapshot is retried against the sources
pub const FALLBACK_RETRY_SECONDS: i64 = 300;

/// Holds at most one snapshot and swaps it whole on refresh.
///
/// Readers only ever clone the `Arc` under the read lock, so a refresh in
/// progress never blocks them. Refreshes are single-flight; callers that
/// find one already running keep the current snapshot, and only wait when
/// there is none yet.
pub struct CatalogStore {
    ingestor: Ingestor,
    snapshot: RwLock<Option<Arc<CatalogSnapshot>>>,
    refresh_lock: Mutex<()>,
    clock: Arc<dyn Clock>,
}

impl CatalogStore {
    pub fn new(ingestor: Ingestor, clock: Arc<dyn Clock>) -> Self {
        Self {
            ingestor,
            snapshot: RwLock::new(None),
            refresh_lock: Mutex::new(()),
            clock,
        }
    }

    pub async fn current(&self) -> Option<Arc<CatalogSnapshot>> {
        self.snapshot.read().await.clone()
    }

    /// True when there is no snapshot or it is strictly older than `interval`.
    /// A fallback snapshot also goes stale after [`FALLBACK_RETRY_SECONDS`].
    pub async fn is_stale(&self, interval: Duration) -> bool {
        match self.current().await {
            Some(snapshot) => {
                let limit = if snapshot.is_fallback() {
                    interval.min(Duration::seconds(FALLBACK_RETRY_SECONDS))
                } else {
                    interval
                };
                self.clock.now() - snapshot.built_at() > limit
            }
            None => true,
        }
    }

    /// Re-ingest when stale; returns whether a new snapshot was installed
    pub async fn refresh_if_stale(&self, interval: Duration) -> Result<bool, TrackingError> {
        if !self.is_stale(interval).await {
            return Ok(false);
        }

        let _guard = match self.refresh_lock.try_lock() {
            Ok(guard) => guard,
            Err(_) => {
                if self.current().await.is_some() {
                    tracing::debug!("Catalog refresh already running, serving current snapshot");
                    return Ok(false);
                }
                self.refresh_lock.lock().await
            }
        };
        // another caller may have refreshed while we waited
        if !self.is_stale(interval).await {
            tracing::debug!("Catalog already refreshed by a concurrent caller");
            return Ok(false);
        }

        self.refresh_locked().await?;
        Ok(true)
    }

    /// Unconditional re-ingest
    pub async fn force_refresh(&self) -> Result<Arc<CatalogSnapshot>, TrackingError> {
        let _guard = self.refresh_lock.lock().await;
        self.refresh_locked().await
    }

    async fn refresh_locked(&self) -> Result<Arc<CatalogSnapshot>, TrackingError> {
        let snapshot = Arc::new(self.ingestor.ingest().await?);
        self.install(snapshot.clone()).await;
        if snapshot.is_fallback() {
            tracing::warn!(
                "Serving fallback catalog, sources will be retried after {} seconds",
                FALLBACK_RETRY_SECONDS
            );
        }
        tracing::info!(
            "Installed catalog snapshot with {} satellites (built {})",
            snapshot.len(),
            snapshot.built_at().format("%Y-%m-%d %H:%M:%S UTC")
        );
        Ok(snapshot)
    }

    /// Publish a snapshot, replacing the current one
    pub async fn install(&self, snapshot: Arc<CatalogSnapshot>) {
        *self.snapshot.write().await = Some(snapshot);
    }
}
