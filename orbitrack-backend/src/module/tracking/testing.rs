///! Fixtures and fakes shared by the tracking tests
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use std::collections::{HashMap, HashSet};
use std::f64::consts::TAU;
use std::sync::{Arc, Mutex};

use nalgebra::Vector3;

use super::category::categorize;
use super::element_set::ElementSet;
use super::error::SourceError;
use super::snapshot::CatalogRecord;
use super::source::ElementSource;
use super::types::CatalogId;
use crate::module::propagation::{
    GeoState, LookAngles, Observer, OrbitPropagator, PassEvent, PropagationError,
    PropagatorFactory,
};

pub(crate) use super::ingest::{FALLBACK_LINE1, FALLBACK_LINE2};

pub(crate) const ISS_LINE1: &str =
    "1 25544U 98067A   20194.88612269 -.00002218  00000-0 -31515-4 0  9992";
pub(crate) const ISS_LINE2: &str =
    "2 25544  51.6461 221.2784 0001413  89.1723 280.4612 15.49507896236008";

pub(crate) const STARLINK_LINE1: &str =
    "1 44713U 19074A   24001.50000000  .00001234  00000-0  10000-3 0  9996";
pub(crate) const STARLINK_LINE2: &str =
    "2 44713  53.0540 120.0000 0001400  90.0000 270.0000 15.06400000 12340";

pub(crate) const GPS_LINE1: &str =
    "1 24876U 97035A   24002.25000000  .00001234  00000-0  10000-3 0  9990";
pub(crate) const GPS_LINE2: &str =
    "2 24876  55.6000 120.0000 0049000  90.0000 270.0000  2.00563000 12345";

pub(crate) const NOAA_LINE1: &str =
    "1 33591U 09005A   24003.75000000  .00001234  00000-0  10000-3 0  9990";
pub(crate) const NOAA_LINE2: &str =
    "2 33591  99.1000 120.0000 0013000  90.0000 270.0000 14.12345678 12348";

pub(crate) const UNKNOWN_LINE1: &str =
    "1 99999U 99999A   24004.00000000  .00001234  00000-0  10000-3 0  9994";
pub(crate) const UNKNOWN_LINE2: &str =
    "2 99999  45.0000 120.0000 0001000  90.0000 270.0000 14.50000000 12348";

/// Radius of the fake circular orbit (km)
pub(crate) const FAKE_RADIUS_KM: f64 = 6778.0;
pub(crate) const FAKE_PERIOD_SECONDS: f64 = 5400.0;
pub(crate) const FAKE_ALTITUDE_KM: f64 = 400.0;
pub(crate) const FAKE_ELEVATION_DEG: f64 = 45.0;

pub(crate) fn test_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap()
}

/// Replace the mean motion field of a line 2 with garbage of the same width
pub(crate) fn corrupt_mean_motion(line2: &str) -> String {
    let mut line = line2.to_string();
    line.replace_range(52..63, "15.49XX7896");
    line
}

/// One name / line 1 / line 2 record as served by a source
pub(crate) fn triplet(name: &str, line1: &str, line2: &str) -> String {
    format!("{}\n{}\n{}\n", name, line1, line2)
}

pub(crate) fn record(name: &str, line1: &str, line2: &str) -> CatalogRecord {
    record_with(name, line1, line2, Vec::new())
}

pub(crate) fn record_with(
    name: &str,
    line1: &str,
    line2: &str,
    events: Vec<PassEvent>,
) -> CatalogRecord {
    let elements = ElementSet::parse(name, line1, line2).unwrap();
    let category = categorize(elements.name(), elements.catalog_id());
    CatalogRecord {
        elements,
        category,
        propagator: Arc::new(FakePropagator::with_events(events)),
    }
}

/// Equatorial circular orbit with scripted pass events
#[derive(Debug, Default)]
pub(crate) struct FakePropagator {
    events: Vec<PassEvent>,
    fail_events: bool,
}

impl FakePropagator {
    pub(crate) fn with_events(events: Vec<PassEvent>) -> Self {
        Self {
            events,
            fail_events: false,
        }
    }

    pub(crate) fn failing_events() -> Self {
        Self {
            events: Vec::new(),
            fail_events: true,
        }
    }
}

impl OrbitPropagator for FakePropagator {
    fn propagate(&self, at: DateTime<Utc>) -> Result<GeoState, PropagationError> {
        let seconds = at.timestamp_millis() as f64 / 1000.0;
        let angle = (seconds / FAKE_PERIOD_SECONDS * TAU).rem_euclid(TAU);
        let mut longitude = angle.to_degrees();
        if longitude > 180.0 {
            longitude -= 360.0;
        }

        Ok(GeoState {
            position_km: Vector3::new(
                FAKE_RADIUS_KM * angle.cos(),
                FAKE_RADIUS_KM * angle.sin(),
                0.0,
            ),
            latitude_deg: 0.0,
            longitude_deg: longitude,
            altitude_km: FAKE_ALTITUDE_KM,
        })
    }

    fn find_events(
        &self,
        _observer: &Observer,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        _min_elevation_deg: f64,
    ) -> Result<Vec<PassEvent>, PropagationError> {
        if self.fail_events {
            return Err(PropagationError::Events("scripted failure".to_string()));
        }
        Ok(self
            .events
            .iter()
            .filter(|event| event.time >= start && event.time <= end)
            .copied()
            .collect())
    }

    fn topocentric_alt_az(
        &self,
        _observer: &Observer,
        at: DateTime<Utc>,
    ) -> Result<LookAngles, PropagationError> {
        // azimuth sweeps one degree per minute
        let minutes = at.timestamp() as f64 / 60.0;
        Ok(LookAngles {
            elevation_deg: FAKE_ELEVATION_DEG,
            azimuth_deg: minutes.rem_euclid(360.0),
            range_km: 1000.0,
        })
    }
}

#[derive(Debug, Default)]
pub(crate) struct FakeFactory {
    failing: HashSet<CatalogId>,
}

impl FakeFactory {
    pub(crate) fn failing(ids: &[CatalogId]) -> Self {
        Self {
            failing: ids.iter().copied().collect(),
        }
    }
}

impl PropagatorFactory for FakeFactory {
    fn bind(&self, elements: &ElementSet) -> Result<Arc<dyn OrbitPropagator>, PropagationError> {
        if self.failing.contains(&elements.catalog_id()) {
            return Err(PropagationError::Elements(format!(
                "scripted rejection of {}",
                elements.catalog_id()
            )));
        }
        Ok(Arc::new(FakePropagator::default()))
    }
}

/// Serves canned bodies and records every URL it was asked for
#[derive(Debug, Default)]
pub(crate) struct FakeSource {
    responses: Mutex<HashMap<String, Result<String, u16>>>,
    delay: Option<std::time::Duration>,
    calls: Mutex<Vec<String>>,
}

impl FakeSource {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn body(mut self, url: &str, body: impl Into<String>) -> Self {
        self.responses
            .get_mut()
            .unwrap()
            .insert(url.to_string(), Ok(body.into()));
        self
    }

    pub(crate) fn status(mut self, url: &str, status: u16) -> Self {
        self.responses
            .get_mut()
            .unwrap()
            .insert(url.to_string(), Err(status));
        self
    }

    /// Every fetch sleeps this long before answering
    pub(crate) fn delay(mut self, delay: std::time::Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Replace what `url` serves from now on
    pub(crate) fn set_body(&self, url: &str, body: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), Ok(body.into()));
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ElementSource for FakeSource {
    async fn fetch(&self, url: &str) -> Result<String, SourceError> {
        self.calls.lock().unwrap().push(url.to_string());
        let response = self.responses.lock().unwrap().get(url).cloned();
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match response {
            Some(Ok(body)) => Ok(body),
            Some(Err(status)) => Err(SourceError::Status {
                url: url.to_string(),
                status,
            }),
            None => Err(SourceError::Status {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}
