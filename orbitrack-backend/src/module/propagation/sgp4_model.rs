///! SGP4-backed propagator
///!
///! Positions come from the `sgp4` crate in the TEME frame. Sub-points and
///! look angles rotate that position by Greenwich mean sidereal time.
///! Pass events are found by sampling elevation on a coarse grid, bisecting
///! threshold crossings and refining peaks with a golden-section search.
use chrono::{DateTime, Duration, Utc};
use nalgebra::Vector3;
use std::sync::Arc;

use super::geodesy::{ecef_to_geodetic, look_angles, teme_to_ecef};
use super::{
    EventKind, GeoState, LookAngles, Observer, OrbitPropagator, PassEvent, PropagationError,
    PropagatorFactory,
};
use crate::module::tracking::ElementSet;

/// Elevation sampling step for event search
const SEARCH_STEP_SECONDS: i64 = 30;
/// Crossings are refined until the bracket is this narrow
const CROSSING_TOLERANCE_MS: i64 = 500;
const PEAK_ITERATIONS: usize = 40;

/// Factory handing out [`Sgp4Propagator`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct Sgp4Factory;

impl PropagatorFactory for Sgp4Factory {
    fn bind(&self, elements: &ElementSet) -> Result<Arc<dyn OrbitPropagator>, PropagationError> {
        Ok(Arc::new(Sgp4Propagator::new(elements)?))
    }
}

pub struct Sgp4Propagator {
    constants: sgp4::Constants,
    epoch: DateTime<Utc>,
}

impl Sgp4Propagator {
    pub fn new(elements: &ElementSet) -> Result<Self, PropagationError> {
        let parsed = sgp4::Elements::from_tle(
            Some(elements.name().to_string()),
            elements.line1().as_bytes(),
            elements.line2().as_bytes(),
        )
        .map_err(|e| PropagationError::Elements(e.to_string()))?;

        let constants = sgp4::Constants::from_elements(&parsed)
            .map_err(|e| PropagationError::Elements(e.to_string()))?;

        let epoch = elements
            .epoch()
            .map_err(|e| PropagationError::Elements(e.to_string()))?;

        Ok(Self { constants, epoch })
    }

    fn teme_position(&self, at: DateTime<Utc>) -> Result<Vector3<f64>, PropagationError> {
        let minutes = (at - self.epoch).num_milliseconds() as f64 / 60_000.0;
        let prediction = self
            .constants
            .propagate(sgp4::MinutesSinceEpoch(minutes))
            .map_err(|e| PropagationError::Propagate {
                at,
                reason: e.to_string(),
            })?;

        Ok(Vector3::from(prediction.position))
    }

    fn elevation_above(
        &self,
        observer: &Observer,
        at: DateTime<Utc>,
        threshold_deg: f64,
    ) -> Result<f64, PropagationError> {
        Ok(self.topocentric_alt_az(observer, at)?.elevation_deg - threshold_deg)
    }

    /// Narrow a bracket known to contain a threshold crossing
    fn refine_crossing(
        &self,
        observer: &Observer,
        threshold_deg: f64,
        mut low: DateTime<Utc>,
        mut high: DateTime<Utc>,
        rising: bool,
    ) -> Result<DateTime<Utc>, PropagationError> {
        while (high - low).num_milliseconds() > CROSSING_TOLERANCE_MS {
            let mid = low + (high - low) / 2;
            let above = self.elevation_above(observer, mid, threshold_deg)? > 0.0;
            if above == rising {
                high = mid;
            } else {
                low = mid;
            }
        }
        Ok(low + (high - low) / 2)
    }

    /// Golden-section search for the elevation peak inside `[low, high]`
    fn refine_peak(
        &self,
        observer: &Observer,
        low: DateTime<Utc>,
        high: DateTime<Utc>,
    ) -> Result<DateTime<Utc>, PropagationError> {
        let ratio = (5.0_f64.sqrt() - 1.0) / 2.0;
        let origin = low;
        let offset = |seconds: f64| origin + Duration::milliseconds((seconds * 1000.0).round() as i64);
        let elevation = |seconds: f64| -> Result<f64, PropagationError> {
            Ok(self.topocentric_alt_az(observer, offset(seconds))?.elevation_deg)
        };

        let mut a = 0.0;
        let mut b = (high - low).num_milliseconds() as f64 / 1000.0;
        let mut c = b - ratio * (b - a);
        let mut d = a + ratio * (b - a);
        let mut fc = elevation(c)?;
        let mut fd = elevation(d)?;

        for _ in 0..PEAK_ITERATIONS {
            if fc > fd {
                b = d;
                d = c;
                fd = fc;
                c = b - ratio * (b - a);
                fc = elevation(c)?;
            } else {
                a = c;
                c = d;
                fc = fd;
                d = a + ratio * (b - a);
                fd = elevation(d)?;
            }
        }

        Ok(offset((a + b) / 2.0))
    }
}

impl OrbitPropagator for Sgp4Propagator {
    fn propagate(&self, at: DateTime<Utc>) -> Result<GeoState, PropagationError> {
        let position_km = self.teme_position(at)?;
        let (latitude_deg, longitude_deg, altitude_km) =
            ecef_to_geodetic(&teme_to_ecef(&position_km, at));

        Ok(GeoState {
            position_km,
            latitude_deg,
            longitude_deg,
            altitude_km,
        })
    }

    fn find_events(
        &self,
        observer: &Observer,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        min_elevation_deg: f64,
    ) -> Result<Vec<PassEvent>, PropagationError> {
        if end <= start {
            return Ok(Vec::new());
        }

        let step = Duration::seconds(SEARCH_STEP_SECONDS);
        let mut samples = Vec::new();
        let mut t = start;
        loop {
            let at = t.min(end);
            samples.push((at, self.elevation_above(observer, at, min_elevation_deg)?));
            if at >= end {
                break;
            }
            t += step;
        }

        let mut events = Vec::new();
        for k in 1..samples.len() {
            let (t0, v0) = samples[k - 1];
            let (t1, v1) = samples[k];

            if v0 <= 0.0 && v1 > 0.0 {
                let at = self.refine_crossing(observer, min_elevation_deg, t0, t1, true)?;
                events.push(PassEvent::new(at, EventKind::Rise));
            } else if v0 > 0.0 && v1 <= 0.0 {
                let at = self.refine_crossing(observer, min_elevation_deg, t0, t1, false)?;
                events.push(PassEvent::new(at, EventKind::Set));
            }

            if k + 1 < samples.len() {
                let (t2, v2) = samples[k + 1];
                if v1 > 0.0 && v1 >= v0 && v1 > v2 {
                    let at = self.refine_peak(observer, t0, t2)?;
                    events.push(PassEvent::new(at, EventKind::Culmination));
                }
            }
        }

        events.sort_by_key(|event| event.time);
        Ok(events)
    }

    fn topocentric_alt_az(
        &self,
        observer: &Observer,
        at: DateTime<Utc>,
    ) -> Result<LookAngles, PropagationError> {
        let ecef = teme_to_ecef(&self.teme_position(at)?, at);
        Ok(look_angles(observer, &ecef))
    }
}
