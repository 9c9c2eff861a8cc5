use chrono::{DateTime, SecondsFormat, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Format a UTC instant as ISO-8601 with microseconds and a trailing `Z`.
pub fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Format a UTC instant as ISO-8601 truncated to whole seconds, e.g. `2024-03-01T10:15:00Z`.
pub fn iso_seconds(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Current position of one catalog object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionRecord {
    pub norad_id: u32,
    pub name: String,
    /// Sub-point latitude (degrees)
    pub latitude: f64,
    /// Sub-point longitude (degrees)
    pub longitude: f64,
    /// Altitude above the ellipsoid (km)
    pub altitude: f64,
    /// Speed (m/s)
    pub velocity: f64,
    /// Orbital period (minutes)
    pub orbital_period: f64,
    pub category: String,
    pub color: String,
    /// Derived from the element-set epoch, not from a launch registry
    pub launch_date: String,
    pub launch_date_estimated: bool,
}

/// Full detail view of one catalog object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SatelliteDetail {
    pub norad_id: u32,
    pub name: String,
    pub category: String,
    pub orbit: OrbitSummary,
    pub position: PositionSummary,
    pub technical: TechnicalSummary,
    pub tle_data: ElementLines,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrbitSummary {
    /// km
    pub altitude: f64,
    /// degrees
    pub inclination: f64,
    pub eccentricity: f64,
    /// degrees
    pub argument_of_perigee: f64,
    /// degrees
    pub mean_anomaly: f64,
    /// minutes
    pub period: f64,
    /// km/s
    pub velocity: f64,
    pub orbit_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionSummary {
    pub latitude: f64,
    pub longitude: f64,
    pub country: String,
    pub visibility: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalSummary {
    pub norad_id: u32,
    pub launch_date: String,
    pub launch_date_estimated: bool,
    #[serde(rename = "type")]
    pub satellite_type: String,
    pub agency: String,
    pub status: String,
}

/// Raw element lines echoed back to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementLines {
    pub line1: String,
    pub line2: String,
    pub epoch: String,
}

/// One ground-track sample; its time is implied by its index
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbitPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
}

/// One visibility window above the elevation threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassRecord {
    pub rise_time: String,
    pub rise_azimuth: f64,
    pub culmination_time: Option<String>,
    pub max_elevation: Option<f64>,
    pub culmination_azimuth: Option<f64>,
    pub set_time: String,
    pub set_azimuth: f64,
    pub duration_minutes: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub name: String,
    pub color: String,
    pub count: usize,
    pub satellites: Vec<u32>,
}

/// Category summaries keyed by category key, serialized as a JSON object
/// that keeps taxonomy order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryMap(pub Vec<(String, CategorySummary)>);

impl CategoryMap {
    pub fn get(&self, key: &str) -> Option<&CategorySummary> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for CategoryMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, summary) in &self.0 {
            map.serialize_entry(key, summary)?;
        }
        map.end()
    }
}

// ============ Response envelopes ============

#[derive(Debug, Clone, Serialize)]
pub struct SatellitesResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub satellites: Vec<PositionRecord>,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DetailResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub satellite: Option<SatelliteDetail>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrbitResponse {
    pub success: bool,
    pub orbit: Vec<OrbitPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PassesResponse {
    pub success: bool,
    pub passes: Vec<PassRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoriesResponse {
    pub success: bool,
    pub categories: CategoryMap,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
