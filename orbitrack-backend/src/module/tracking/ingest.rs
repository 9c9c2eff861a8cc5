///! Element-set ingestion with source-group fallback
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use super::category::categorize;
use super::clock::Clock;
use super::element_set::ElementSet;
use super::error::{ElementSetError, IngestionError};
use super::snapshot::{CatalogRecord, CatalogSnapshot};
use super::source::{ElementSource, SourceGroup};
use super::types::CatalogId;
use crate::module::propagation::PropagatorFactory;

pub const DEFAULT_RECORD_LIMIT: usize = 2000;

pub(crate) const FALLBACK_NAME: &str = "ISS (ZARYA)";
pub(crate) const FALLBACK_LINE1: &str =
    "1 25544U 98067A   23001.00000000  .00002182  00000-0  40768-4 0  9998";
pub(crate) const FALLBACK_LINE2: &str =
    "2 25544  51.6461 339.7939 0001220  92.8340 267.3124 15.49309239 00009";

/// Embedded record used when no source produced anything
pub fn fallback_element_set() -> Result<ElementSet, ElementSetError> {
    ElementSet::parse(FALLBACK_NAME, FALLBACK_LINE1, FALLBACK_LINE2)
}

/// Outcome of one ingestion run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestReport {
    pub groups_attempted: usize,
    pub endpoints_failed: usize,
    pub records_skipped: usize,
    pub duplicates: usize,
    pub accepted: usize,
    pub used_fallback: bool,
    /// Group that satisfied the run, if any
    pub source_group: Option<String>,
    pub duration_seconds: f64,
}

/// Builds catalog snapshots from prioritized source groups
pub struct Ingestor {
    source: Arc<dyn ElementSource>,
    factory: Arc<dyn PropagatorFactory>,
    groups: Vec<SourceGroup>,
    record_limit: usize,
    clock: Arc<dyn Clock>,
}

impl Ingestor {
    pub fn new(
        source: Arc<dyn ElementSource>,
        factory: Arc<dyn PropagatorFactory>,
        groups: Vec<SourceGroup>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            source,
            factory,
            groups,
            record_limit: DEFAULT_RECORD_LIMIT,
            clock,
        }
    }

    pub fn with_record_limit(mut self, record_limit: usize) -> Self {
        self.record_limit = record_limit.max(1);
        self
    }

    pub fn record_limit(&self) -> usize {
        self.record_limit
    }

    pub async fn ingest(&self) -> Result<CatalogSnapshot, IngestionError> {
        let (snapshot, _) = self.ingest_with_report().await?;
        Ok(snapshot)
    }

    /// Walk source groups until one contributes records, then build a
    /// snapshot. Only failure to use the fallback record is an error.
    pub async fn ingest_with_report(&self) -> Result<(CatalogSnapshot, IngestReport), IngestionError> {
        let started = Instant::now();
        let mut report = IngestReport::default();
        let mut accepted: Vec<CatalogRecord> = Vec::new();
        let mut seen: HashSet<CatalogId> = HashSet::new();

        tracing::info!("Loading element sets from {} source groups", self.groups.len());

        for group in &self.groups {
            if accepted.len() >= self.record_limit {
                break;
            }

            report.groups_attempted += 1;
            tracing::info!(
                "Trying source group '{}' ({} endpoints)",
                group.name,
                group.urls.len()
            );

            let mut contributing_endpoints = 0;
            for url in &group.urls {
                if accepted.len() >= self.record_limit {
                    break;
                }

                let body = match self.source.fetch(url).await {
                    Ok(body) => body,
                    Err(e) => {
                        tracing::warn!("Error fetching element sets: {}", e);
                        report.endpoints_failed += 1;
                        continue;
                    }
                };

                let added = self.accept_body(&body, &mut accepted, &mut seen, &mut report);
                if added > 0 {
                    contributing_endpoints += 1;
                    tracing::info!("Loaded {} satellites from {}", added, url);
                }
            }

            if contributing_endpoints > 0 {
                tracing::info!("Source group '{}' satisfied the catalog", group.name);
                report.source_group = Some(group.name.clone());
                break;
            }
            tracing::warn!("Source group '{}' produced no records, trying next", group.name);
        }

        if accepted.is_empty() {
            tracing::error!("All element sources failed, using fallback record");
            accepted.push(self.fallback_record()?);
            report.used_fallback = true;
        }

        let snapshot =
            CatalogSnapshot::build(accepted, self.clock.now()).with_fallback(report.used_fallback);
        report.accepted = snapshot.len();
        report.duration_seconds = started.elapsed().as_secs_f64();

        tracing::info!(
            "Catalog built: {} accepted, {} skipped, {} duplicates, {} failed endpoints, {:.2}s",
            report.accepted,
            report.records_skipped,
            report.duplicates,
            report.endpoints_failed,
            report.duration_seconds
        );

        Ok((snapshot, report))
    }

    /// Parse one body as name / line 1 / line 2 triplets; returns the number
    /// of newly accepted records
    fn accept_body(
        &self,
        body: &str,
        accepted: &mut Vec<CatalogRecord>,
        seen: &mut HashSet<CatalogId>,
        report: &mut IngestReport,
    ) -> usize {
        let lines: Vec<&str> = body.trim().split('\n').map(str::trim).collect();
        let mut added = 0;

        for chunk in lines.chunks_exact(3) {
            if accepted.len() >= self.record_limit {
                break;
            }
            let [name, line1, line2] = chunk else {
                continue;
            };

            let elements = match ElementSet::parse(name, line1, line2) {
                Ok(elements) => elements,
                Err(e) => {
                    tracing::debug!("Skipping record {:?}: {}", name, e);
                    report.records_skipped += 1;
                    continue;
                }
            };

            let id = elements.catalog_id();
            if seen.contains(&id) {
                report.duplicates += 1;
                continue;
            }

            let propagator = match self.factory.bind(&elements) {
                Ok(propagator) => propagator,
                Err(e) => {
                    tracing::warn!("Error creating satellite {}: {}", elements.name(), e);
                    report.records_skipped += 1;
                    continue;
                }
            };

            let category = categorize(elements.name(), id);
            seen.insert(id);
            accepted.push(CatalogRecord {
                elements,
                category,
                propagator,
            });
            added += 1;
        }

        added
    }

    fn fallback_record(&self) -> Result<CatalogRecord, IngestionError> {
        let elements = fallback_element_set().map_err(IngestionError::FallbackElements)?;
        let propagator = self
            .factory
            .bind(&elements)
            .map_err(IngestionError::FallbackPropagator)?;
        let category = categorize(elements.name(), elements.catalog_id());

        Ok(CatalogRecord {
            elements,
            category,
            propagator,
        })
    }
}
