///! Read-only queries over one catalog snapshot
///!
///! A `QueryService` is pinned to a snapshot and an instant, so every record
///! in one response is computed against the same catalog and the same time.
use chrono::{DateTime, Duration, Utc};
use orbitrack_common::{
    CategoryMap, CategorySummary, ElementLines, OrbitPoint, OrbitSummary, PassRecord,
    PositionRecord, PositionSummary, SatelliteDetail, TechnicalSummary,
};
use std::sync::Arc;

use super::category::Category;
use super::element_set::period_minutes;
use super::error::TrackingError;
use super::heuristics::{OrbitClass, agency, country, status, visibility};
use super::passes::{MAX_PASSES, MIN_PASS_ELEVATION_DEG, assemble_passes};
use super::snapshot::{CatalogRecord, CatalogSnapshot};
use super::types::CatalogId;
use crate::module::propagation::{Observer, PropagationError};

pub const ORBIT_PATH_SAMPLES: usize = 100;

/// Half of the finite-difference window used for speed
const SPEED_HALF_STEP_MS: i64 = 500;

pub struct QueryService {
    snapshot: Arc<CatalogSnapshot>,
    now: DateTime<Utc>,
}

impl QueryService {
    pub fn new(snapshot: Arc<CatalogSnapshot>, now: DateTime<Utc>) -> Self {
        Self { snapshot, now }
    }

    pub fn snapshot(&self) -> &CatalogSnapshot {
        &self.snapshot
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// `now` shifted by `millis`, or `InvalidArgument` when out of range
    fn offset(&self, millis: f64) -> Result<DateTime<Utc>, TrackingError> {
        Duration::try_milliseconds(millis.round() as i64)
            .and_then(|delta| self.now.checked_add_signed(delta))
            .ok_or_else(|| {
                TrackingError::InvalidArgument(format!("time offset of {} ms is out of range", millis))
            })
    }

    fn record(&self, id: CatalogId) -> Result<&CatalogRecord, TrackingError> {
        self.snapshot.get(id).ok_or(TrackingError::NotFound(id))
    }

    /// Distance covered in one second around `now`, in km/s
    fn speed_km_s(&self, record: &CatalogRecord) -> Result<f64, PropagationError> {
        let half = Duration::milliseconds(SPEED_HALF_STEP_MS);
        let before = record.propagator.propagate(self.now - half)?;
        let after = record.propagator.propagate(self.now + half)?;
        let seconds = (2 * SPEED_HALF_STEP_MS) as f64 / 1000.0;
        Ok((after.position_km - before.position_km).norm() / seconds)
    }

    fn position_record(&self, record: &CatalogRecord) -> Result<PositionRecord, TrackingError> {
        let state = record.propagator.propagate(self.now)?;
        let speed = self.speed_km_s(record)?;
        let period = record.elements.period_minutes()?;

        Ok(PositionRecord {
            norad_id: record.catalog_id(),
            name: record.name().to_string(),
            latitude: state.latitude_deg,
            longitude: state.longitude_deg,
            altitude: state.altitude_km,
            velocity: speed * 1000.0,
            orbital_period: period,
            category: record.category.key().to_string(),
            color: record.category.color().to_string(),
            launch_date: record.elements.launch_date_label(),
            launch_date_estimated: true,
        })
    }

    /// Current position of every record; records that fail are left out
    pub fn list_positions(&self) -> Vec<PositionRecord> {
        self.snapshot
            .records()
            .filter_map(|record| match self.position_record(record) {
                Ok(position) => Some(position),
                Err(e) => {
                    tracing::warn!(
                        "Error calculating position for satellite {}: {}",
                        record.catalog_id(),
                        e
                    );
                    None
                }
            })
            .collect()
    }

    pub fn details(&self, id: CatalogId) -> Result<SatelliteDetail, TrackingError> {
        let record = self.record(id)?;
        let elements = &record.elements;

        let state = record.propagator.propagate(self.now)?;
        let speed = self.speed_km_s(record)?;
        let orbit = elements.orbital_elements()?;

        Ok(SatelliteDetail {
            norad_id: id,
            name: record.name().to_string(),
            category: record.category.key().to_string(),
            orbit: OrbitSummary {
                altitude: state.altitude_km,
                inclination: orbit.inclination,
                eccentricity: orbit.eccentricity,
                argument_of_perigee: orbit.argument_of_perigee,
                mean_anomaly: orbit.mean_anomaly,
                period: period_minutes(orbit.mean_motion),
                velocity: speed,
                orbit_type: OrbitClass::from_altitude(state.altitude_km).label().to_string(),
            },
            position: PositionSummary {
                latitude: state.latitude_deg,
                longitude: state.longitude_deg,
                country: country(record.name(), id).to_string(),
                visibility: visibility(state.altitude_km).to_string(),
            },
            technical: TechnicalSummary {
                norad_id: id,
                launch_date: elements.launch_date_label(),
                launch_date_estimated: true,
                satellite_type: record.category.satellite_type().to_string(),
                agency: agency(record.name(), id, record.category).to_string(),
                status: status(orbit.mean_motion).to_string(),
            },
            tle_data: ElementLines {
                line1: elements.line1().to_string(),
                line2: elements.line2().to_string(),
                epoch: elements.epoch_field().to_string(),
            },
        })
    }

    /// Ground track over the next `hours`, sampled at fixed spacing
    pub fn orbit_path(&self, id: CatalogId, hours: f64) -> Result<Vec<OrbitPoint>, TrackingError> {
        let record = self.record(id)?;
        let step_ms = hours * 3_600_000.0 / ORBIT_PATH_SAMPLES as f64;
        let times = (0..ORBIT_PATH_SAMPLES)
            .map(|i| self.offset(i as f64 * step_ms))
            .collect::<Result<Vec<_>, _>>()?;

        let points = times
            .into_iter()
            .filter_map(|at| match record.propagator.propagate(at) {
                Ok(state) => Some(OrbitPoint {
                    latitude: state.latitude_deg,
                    longitude: state.longitude_deg,
                    altitude: state.altitude_km,
                }),
                Err(e) => {
                    tracing::warn!("Error calculating orbit point: {}", e);
                    None
                }
            })
            .collect();

        Ok(points)
    }

    /// Next visibility windows above the elevation threshold within `days`
    pub fn passes(
        &self,
        id: CatalogId,
        observer: &Observer,
        days: f64,
    ) -> Result<Vec<PassRecord>, TrackingError> {
        let record = self.record(id)?;
        let end = self.offset(days * 86_400_000.0)?;

        let events = match record.propagator.find_events(
            observer,
            self.now,
            end,
            MIN_PASS_ELEVATION_DEG,
        ) {
            Ok(events) => events,
            Err(e) => {
                tracing::error!("Error calculating passes for {}: {}", id, e);
                return Ok(Vec::new());
            }
        };

        Ok(assemble_passes(
            &events,
            record.propagator.as_ref(),
            observer,
            MAX_PASSES,
        ))
    }

    /// Every category in taxonomy order with its members
    pub fn category_summary(&self) -> CategoryMap {
        CategoryMap(
            Category::ALL
                .iter()
                .map(|category| {
                    let members = self.snapshot.members(*category);
                    (
                        category.key().to_string(),
                        CategorySummary {
                            name: category.display_name().to_string(),
                            color: category.color().to_string(),
                            count: members.len(),
                            satellites: members.to_vec(),
                        },
                    )
                })
                .collect(),
        )
    }
}
