///! Tracking engine facade
///!
///! Every query first passes the staleness gate, then runs against whichever
///! snapshot is current. Propagation work runs on the blocking pool.
use chrono::{DateTime, Duration, Utc};
use orbitrack_common::{CategoryMap, OrbitPoint, PassRecord, PositionRecord, SatelliteDetail};
use std::sync::Arc;

use super::clock::Clock;
use super::error::TrackingError;
use super::query::QueryService;
use super::snapshot::CatalogSnapshot;
use super::store::CatalogStore;
use super::types::CatalogId;
use crate::module::propagation::Observer;

pub const DEFAULT_ORBIT_HOURS: f64 = 2.0;
pub const DEFAULT_PASS_DAYS: f64 = 7.0;
pub const MAX_ORBIT_HOURS: f64 = 48.0;
pub const MAX_PASS_DAYS: f64 = 30.0;

/// Accept only finite windows in `(0, max]`
fn check_window(name: &str, value: f64, max: f64) -> Result<(), TrackingError> {
    if value.is_finite() && value > 0.0 && value <= max {
        Ok(())
    } else {
        Err(TrackingError::InvalidArgument(format!(
            "{} must be in (0, {}], got {}",
            name, max, value
        )))
    }
}

pub struct TrackingEngine {
    store: CatalogStore,
    clock: Arc<dyn Clock>,
    refresh_interval: Duration,
}

impl TrackingEngine {
    pub fn new(store: CatalogStore, clock: Arc<dyn Clock>, refresh_interval: Duration) -> Arc<Self> {
        Arc::new(Self {
            store,
            clock,
            refresh_interval,
        })
    }

    /// Load the first snapshot; returns the catalog size
    pub async fn initialize(&self) -> Result<usize, TrackingError> {
        tracing::info!("Initializing tracking engine...");
        let snapshot = self.store.force_refresh().await?;
        tracing::info!("Tracking engine initialized with {} satellites", snapshot.len());
        Ok(snapshot.len())
    }

    pub fn refresh_interval(&self) -> Duration {
        self.refresh_interval
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Current snapshot after the staleness gate. A failed refresh is
    /// logged and the previous snapshot is served.
    pub async fn snapshot(&self) -> Result<Arc<CatalogSnapshot>, TrackingError> {
        if let Err(e) = self.store.refresh_if_stale(self.refresh_interval).await {
            tracing::warn!("Catalog refresh failed, serving previous snapshot: {}", e);
        }
        self.store.current().await.ok_or(TrackingError::CatalogUnavailable)
    }

    async fn query_service(&self) -> Result<QueryService, TrackingError> {
        Ok(QueryService::new(self.snapshot().await?, self.clock.now()))
    }

    async fn run_query<T, F>(&self, query: F) -> Result<T, TrackingError>
    where
        T: Send + 'static,
        F: FnOnce(QueryService) -> Result<T, TrackingError> + Send + 'static,
    {
        let service = self.query_service().await?;
        tokio::task::spawn_blocking(move || query(service))
            .await
            .map_err(|e| TrackingError::Task(e.to_string()))?
    }

    pub async fn list_positions(&self) -> Result<Vec<PositionRecord>, TrackingError> {
        self.run_query(|service| Ok(service.list_positions())).await
    }

    pub async fn satellite_details(&self, id: CatalogId) -> Result<SatelliteDetail, TrackingError> {
        self.run_query(move |service| service.details(id)).await
    }

    pub async fn orbit_path(&self, id: CatalogId, hours: f64) -> Result<Vec<OrbitPoint>, TrackingError> {
        check_window("hours", hours, MAX_ORBIT_HOURS)?;
        self.run_query(move |service| service.orbit_path(id, hours)).await
    }

    pub async fn passes(
        &self,
        id: CatalogId,
        observer: Observer,
        days: f64,
    ) -> Result<Vec<PassRecord>, TrackingError> {
        check_window("days", days, MAX_PASS_DAYS)?;
        self.run_query(move |service| service.passes(id, &observer, days)).await
    }

    pub async fn category_summary(&self) -> Result<CategoryMap, TrackingError> {
        Ok(self.query_service().await?.category_summary())
    }

    /// Re-ingest regardless of age; returns the new catalog size
    pub async fn force_refresh(&self) -> Result<usize, TrackingError> {
        let snapshot = self.store.force_refresh().await?;
        Ok(snapshot.len())
    }
}
