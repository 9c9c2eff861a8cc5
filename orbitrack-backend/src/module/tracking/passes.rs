///! Pass assembly from rise / culmination / set events
use chrono::{DateTime, Utc};
use orbitrack_common::{PassRecord, iso_seconds};

use crate::module::propagation::{
    EventKind, Observer, OrbitPropagator, PassEvent, PropagationError,
};

pub const MIN_PASS_ELEVATION_DEG: f64 = 10.0;
pub const MAX_PASSES: usize = 3;

struct Culmination {
    time: DateTime<Utc>,
    elevation_deg: f64,
    azimuth_deg: f64,
}

struct OpenPass {
    rise: DateTime<Utc>,
    culmination: Option<Culmination>,
}

/// Fold an ordered event stream into complete passes.
///
/// A rise opens a pass and a set closes it. Culminations and sets seen while
/// no pass is open are ignored, as is a pass still open when the events end.
/// A pass whose look angles cannot be computed is dropped.
pub fn assemble_passes(
    events: &[PassEvent],
    propagator: &dyn OrbitPropagator,
    observer: &Observer,
    limit: usize,
) -> Vec<PassRecord> {
    let mut passes = Vec::new();
    let mut open: Option<OpenPass> = None;

    for event in events {
        if passes.len() >= limit {
            break;
        }

        match event.kind {
            EventKind::Rise => {
                open = Some(OpenPass {
                    rise: event.time,
                    culmination: None,
                });
            }
            EventKind::Culmination => {
                let Some(pass) = open.as_mut() else {
                    continue;
                };
                match propagator.topocentric_alt_az(observer, event.time) {
                    Ok(look) => {
                        let higher = pass
                            .culmination
                            .as_ref()
                            .is_none_or(|c| look.elevation_deg > c.elevation_deg);
                        if higher {
                            pass.culmination = Some(Culmination {
                                time: event.time,
                                elevation_deg: look.elevation_deg,
                                azimuth_deg: look.azimuth_deg,
                            });
                        }
                    }
                    Err(e) => tracing::debug!("Culmination look angles unavailable: {}", e),
                }
            }
            EventKind::Set => {
                let Some(pass) = open.take() else {
                    continue;
                };
                match close_pass(pass, event.time, propagator, observer) {
                    Ok(record) => passes.push(record),
                    Err(e) => tracing::warn!("Dropping pass: {}", e),
                }
            }
        }
    }

    passes
}

fn close_pass(
    pass: OpenPass,
    set: DateTime<Utc>,
    propagator: &dyn OrbitPropagator,
    observer: &Observer,
) -> Result<PassRecord, PropagationError> {
    let rise_look = propagator.topocentric_alt_az(observer, pass.rise)?;
    let set_look = propagator.topocentric_alt_az(observer, set)?;
    let duration_minutes = (set - pass.rise).num_milliseconds() as f64 / 60_000.0;

    let (culmination_time, max_elevation, culmination_azimuth) = match pass.culmination {
        Some(c) => (Some(iso_seconds(c.time)), Some(c.elevation_deg), Some(c.azimuth_deg)),
        None => (None, None, None),
    };

    Ok(PassRecord {
        rise_time: iso_seconds(pass.rise),
        rise_azimuth: rise_look.azimuth_deg,
        culmination_time,
        max_elevation,
        culmination_azimuth,
        set_time: iso_seconds(set),
        set_azimuth: set_look.azimuth_deg,
        duration_minutes,
    })
}
