///! Orbit propagation seam
///!
///! The tracking engine never does orbital mechanics itself. It binds each
///! element set to an [`OrbitPropagator`] through a [`PropagatorFactory`] and
///! consumes three operations from it:
///! - geocentric position and sub-point at an instant
///! - rise / culmination / set events seen from an observer
///! - topocentric elevation, azimuth and range
///!
///! `Sgp4Factory` is the production implementation.

use chrono::{DateTime, Utc};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

use super::tracking::ElementSet;

mod geodesy;
pub use geodesy::{ecef_to_geodetic, gmst_radians, look_angles, observer_ecef, teme_to_ecef};

mod sgp4_model;
pub use sgp4_model::{Sgp4Factory, Sgp4Propagator};

/// Ground location used as query input
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Observer {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub altitude_m: f64,
}

impl Observer {
    pub fn new(latitude_deg: f64, longitude_deg: f64, altitude_m: f64) -> Self {
        Self {
            latitude_deg,
            longitude_deg,
            altitude_m,
        }
    }
}

/// Geocentric state of an object at one instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoState {
    /// Inertial position (km)
    pub position_km: Vector3<f64>,
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub altitude_km: f64,
}

/// Where an object appears in an observer's sky
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LookAngles {
    pub elevation_deg: f64,
    pub azimuth_deg: f64,
    pub range_km: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Rise,
    Culmination,
    Set,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassEvent {
    pub time: DateTime<Utc>,
    pub kind: EventKind,
}

impl PassEvent {
    pub fn new(time: DateTime<Utc>, kind: EventKind) -> Self {
        Self { time, kind }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PropagationError {
    #[error("element set rejected by the propagation model: {0}")]
    Elements(String),

    #[error("propagation failed at {at}: {reason}")]
    Propagate { at: DateTime<Utc>, reason: String },

    #[error("event search failed: {0}")]
    Events(String),
}

/// Propagator bound to one element set
pub trait OrbitPropagator: Send + Sync {
    fn propagate(&self, at: DateTime<Utc>) -> Result<GeoState, PropagationError>;

    /// Events are returned in time order; a window that opens or closes
    /// mid-pass may produce a culmination or set without its rise.
    fn find_events(
        &self,
        observer: &Observer,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        min_elevation_deg: f64,
    ) -> Result<Vec<PassEvent>, PropagationError>;

    fn topocentric_alt_az(
        &self,
        observer: &Observer,
        at: DateTime<Utc>,
    ) -> Result<LookAngles, PropagationError>;
}

/// Binds element sets to propagators
pub trait PropagatorFactory: Send + Sync {
    fn bind(&self, elements: &ElementSet) -> Result<Arc<dyn OrbitPropagator>, PropagationError>;
}
