///! Frame conversions used by the SGP4 adapter
use chrono::{DateTime, Utc};
use nalgebra::{Rotation3, Vector3};
use std::f64::consts::TAU;

use super::{LookAngles, Observer};

/// WGS-84 equatorial radius (km)
pub const WGS84_A_KM: f64 = 6378.137;
/// WGS-84 flattening
pub const WGS84_F: f64 = 1.0 / 298.257_223_563;

const UNIX_EPOCH_JD: f64 = 2_440_587.5;
const J2000_JD: f64 = 2_451_545.0;
const SECONDS_PER_DAY: f64 = 86_400.0;

fn eccentricity_squared() -> f64 {
    WGS84_F * (2.0 - WGS84_F)
}

pub fn julian_date(at: DateTime<Utc>) -> f64 {
    at.timestamp_millis() as f64 / (SECONDS_PER_DAY * 1000.0) + UNIX_EPOCH_JD
}

/// Greenwich mean sidereal time (IAU 1982), radians in `[0, 2π)`
pub fn gmst_radians(at: DateTime<Utc>) -> f64 {
    let t = (julian_date(at) - J2000_JD) / 36_525.0;
    let seconds = 67_310.548_41
        + (876_600.0 * 3600.0 + 8_640_184.812_866) * t
        + 0.093_104 * t * t
        - 6.2e-6 * t * t * t;
    seconds.rem_euclid(SECONDS_PER_DAY) / SECONDS_PER_DAY * TAU
}

/// Rotate a TEME position into the Earth-fixed frame (polar motion ignored)
pub fn teme_to_ecef(position: &Vector3<f64>, at: DateTime<Utc>) -> Vector3<f64> {
    Rotation3::from_axis_angle(&Vector3::z_axis(), -gmst_radians(at)) * *position
}

/// Earth-fixed position (km) to geodetic latitude°, longitude°, altitude km
pub fn ecef_to_geodetic(position: &Vector3<f64>) -> (f64, f64, f64) {
    let e2 = eccentricity_squared();
    let p = position.x.hypot(position.y);
    let longitude = position.y.atan2(position.x);

    let mut latitude = position.z.atan2(p * (1.0 - e2));
    for _ in 0..6 {
        let sin_lat = latitude.sin();
        let n = WGS84_A_KM / (1.0 - e2 * sin_lat * sin_lat).sqrt();
        latitude = (position.z + e2 * n * sin_lat).atan2(p);
    }

    let sin_lat = latitude.sin();
    let cos_lat = latitude.cos();
    let n = WGS84_A_KM / (1.0 - e2 * sin_lat * sin_lat).sqrt();
    let altitude = if cos_lat.abs() > 1e-10 {
        p / cos_lat - n
    } else {
        position.z.abs() - WGS84_A_KM * (1.0 - WGS84_F)
    };

    (latitude.to_degrees(), longitude.to_degrees(), altitude)
}

/// Observer location in the Earth-fixed frame (km)
pub fn observer_ecef(observer: &Observer) -> Vector3<f64> {
    let e2 = eccentricity_squared();
    let latitude = observer.latitude_deg.to_radians();
    let longitude = observer.longitude_deg.to_radians();
    let height = observer.altitude_m / 1000.0;

    let (sin_lat, cos_lat) = latitude.sin_cos();
    let (sin_lon, cos_lon) = longitude.sin_cos();
    let n = WGS84_A_KM / (1.0 - e2 * sin_lat * sin_lat).sqrt();

    Vector3::new(
        (n + height) * cos_lat * cos_lon,
        (n + height) * cos_lat * sin_lon,
        (n * (1.0 - e2) + height) * sin_lat,
    )
}

/// Elevation, azimuth (clockwise from north) and range of an Earth-fixed target
pub fn look_angles(observer: &Observer, target_ecef: &Vector3<f64>) -> LookAngles {
    let rho = target_ecef - observer_ecef(observer);

    let (sin_lat, cos_lat) = observer.latitude_deg.to_radians().sin_cos();
    let (sin_lon, cos_lon) = observer.longitude_deg.to_radians().sin_cos();

    let east = -sin_lon * rho.x + cos_lon * rho.y;
    let north = -sin_lat * cos_lon * rho.x - sin_lat * sin_lon * rho.y + cos_lat * rho.z;
    let up = cos_lat * cos_lon * rho.x + cos_lat * sin_lon * rho.y + sin_lat * rho.z;

    let range_km = rho.norm();
    let elevation = if range_km > 0.0 {
        (up / range_km).clamp(-1.0, 1.0).asin()
    } else {
        std::f64::consts::FRAC_PI_2
    };
    let azimuth = east.atan2(north).rem_euclid(TAU);

    LookAngles {
        elevation_deg: elevation.to_degrees(),
        azimuth_deg: azimuth.to_degrees(),
        range_km,
    }
}
