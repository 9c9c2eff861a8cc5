///! Two-line element sets
///!
///! All fixed-column decoding of element lines lives here. Columns below are
///! zero-based, end-exclusive byte ranges; lines are validated as ASCII
///! before any slicing happens.
use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};
use std::ops::Range;

use super::error::ElementSetError;
use super::types::CatalogId;

pub const LINE_LENGTH: usize = 69;

const CATALOG_ID: Range<usize> = 2..7;
const EPOCH: Range<usize> = 18..32;
const INCLINATION: Range<usize> = 8..16;
const ECCENTRICITY: Range<usize> = 26..33;
const ARGUMENT_OF_PERIGEE: Range<usize> = 34..42;
const MEAN_ANOMALY: Range<usize> = 43..51;
const MEAN_MOTION: Range<usize> = 52..63;

const MINUTES_PER_DAY: f64 = 1440.0;

/// Validated element set with its display name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementSet {
    name: String,
    line1: String,
    line2: String,
    catalog_id: CatalogId,
}

/// Angular elements decoded from line 2
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitalElements {
    /// degrees
    pub inclination: f64,
    pub eccentricity: f64,
    /// degrees
    pub argument_of_perigee: f64,
    /// degrees
    pub mean_anomaly: f64,
    /// revolutions per day
    pub mean_motion: f64,
}

/// Orbital period in minutes, 0 when the mean motion is not positive
pub fn period_minutes(mean_motion: f64) -> f64 {
    if mean_motion > 0.0 {
        MINUTES_PER_DAY / mean_motion
    } else {
        0.0
    }
}

fn check_line(line: &str, number: u8) -> Result<(), ElementSetError> {
    let malformed = |reason: String| ElementSetError::Malformed { line: number, reason };

    if !line.is_ascii() {
        return Err(malformed("contains non-ASCII characters".to_string()));
    }
    if line.len() != LINE_LENGTH {
        return Err(malformed(format!(
            "expected {} characters, found {}",
            LINE_LENGTH,
            line.len()
        )));
    }
    let prefix = format!("{} ", number);
    if !line.starts_with(&prefix) {
        return Err(malformed(format!("does not start with {:?}", prefix)));
    }
    Ok(())
}

fn decode(line: &str, columns: Range<usize>, field: &'static str) -> Result<f64, ElementSetError> {
    let raw = line[columns].trim();
    raw.parse::<f64>().map_err(|_| ElementSetError::Field {
        field,
        raw: raw.to_string(),
    })
}

/// Split an epoch field into its four-digit year and fractional day of year
fn split_epoch(field: &str) -> Result<(i32, f64), ElementSetError> {
    let invalid = || ElementSetError::Field {
        field: "epoch",
        raw: field.to_string(),
    };

    if field.len() < 3 || !field.is_ascii() {
        return Err(invalid());
    }
    let two_digit: i32 = field[..2].parse().map_err(|_| invalid())?;
    let day: f64 = field[2..].parse().map_err(|_| invalid())?;
    if !(1.0..367.0).contains(&day) {
        return Err(invalid());
    }

    let year = if two_digit < 57 { 2000 + two_digit } else { 1900 + two_digit };
    Ok((year, day))
}

impl ElementSet {
    /// Validate both lines and extract the catalog id from line 1
    pub fn parse(name: &str, line1: &str, line2: &str) -> Result<Self, ElementSetError> {
        check_line(line1, 1)?;
        check_line(line2, 2)?;

        let raw_id = line1[CATALOG_ID].trim();
        let catalog_id = raw_id
            .parse::<CatalogId>()
            .map_err(|_| ElementSetError::CatalogId(raw_id.to_string()))?;

        Ok(Self {
            name: name.trim().to_string(),
            line1: line1.to_string(),
            line2: line2.to_string(),
            catalog_id,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn line1(&self) -> &str {
        &self.line1
    }

    pub fn line2(&self) -> &str {
        &self.line2
    }

    pub fn catalog_id(&self) -> CatalogId {
        self.catalog_id
    }

    /// Raw epoch field of line 1 (`YYDDD.DDDDDDDD`)
    pub fn epoch_field(&self) -> &str {
        self.line1[EPOCH].trim()
    }

    pub fn mean_motion(&self) -> Result<f64, ElementSetError> {
        decode(&self.line2, MEAN_MOTION, "mean_motion")
    }

    pub fn period_minutes(&self) -> Result<f64, ElementSetError> {
        Ok(period_minutes(self.mean_motion()?))
    }

    pub fn orbital_elements(&self) -> Result<OrbitalElements, ElementSetError> {
        let raw_eccentricity = self.line2[ECCENTRICITY].trim();
        let eccentricity = format!("0.{}", raw_eccentricity)
            .parse::<f64>()
            .map_err(|_| ElementSetError::Field {
                field: "eccentricity",
                raw: raw_eccentricity.to_string(),
            })?;

        Ok(OrbitalElements {
            inclination: decode(&self.line2, INCLINATION, "inclination")?,
            eccentricity,
            argument_of_perigee: decode(&self.line2, ARGUMENT_OF_PERIGEE, "argument_of_perigee")?,
            mean_anomaly: decode(&self.line2, MEAN_ANOMALY, "mean_anomaly")?,
            mean_motion: self.mean_motion()?,
        })
    }

    /// Reference epoch of the element set
    pub fn epoch(&self) -> Result<DateTime<Utc>, ElementSetError> {
        let (year, day) = split_epoch(self.epoch_field())?;
        let start = Utc
            .with_ymd_and_hms(year, 1, 1, 0, 0, 0)
            .single()
            .ok_or_else(|| ElementSetError::Field {
                field: "epoch",
                raw: self.epoch_field().to_string(),
            })?;
        let offset_ms = ((day - 1.0) * 86_400_000.0).round() as i64;
        Ok(start + Duration::milliseconds(offset_ms))
    }

    /// Calendar date of the epoch, used as a stand-in for the launch date
    pub fn approximate_launch_date(&self) -> Option<NaiveDate> {
        let (year, day) = split_epoch(self.epoch_field()).ok()?;
        let start = NaiveDate::from_ymd_opt(year, 1, 1)?;
        let date = start.checked_add_signed(Duration::days(day.trunc() as i64 - 1))?;
        (date.year() == year).then_some(date)
    }

    /// `YYYY-MM-DD`, or `Unknown` when the epoch field cannot be read
    pub fn launch_date_label(&self) -> String {
        self.approximate_launch_date()
            .map(|date| date.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "Unknown".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::tracking::testing::*;

    fn iss() -> ElementSet {
        ElementSet::parse("ISS (ZARYA)", ISS_LINE1, ISS_LINE2).unwrap()
    }

    #[test]
    fn test_parse_valid_lines() {
        let elements = iss();
        assert_eq!(elements.catalog_id(), 25544);
        assert_eq!(elements.name(), "ISS (ZARYA)");
        assert_eq!(elements.epoch_field(), "20194.88612269");
    }

    #[test]
    fn test_name_is_trimmed() {
        let elements = ElementSet::parse("  STARLINK-1007  ", STARLINK_LINE1, STARLINK_LINE2).unwrap();
        assert_eq!(elements.name(), "STARLINK-1007");
        assert_eq!(elements.catalog_id(), 44713);
    }

    #[test]
    fn test_rejects_wrong_length() {
        let short = &ISS_LINE1[..68];
        assert!(matches!(
            ElementSet::parse("ISS", short, ISS_LINE2),
            Err(ElementSetError::Malformed { line: 1, .. })
        ));
    }

    #[test]
    fn test_rejects_swapped_lines() {
        assert!(matches!(
            ElementSet::parse("ISS", ISS_LINE2, ISS_LINE1),
            Err(ElementSetError::Malformed { line: 1, .. })
        ));
    }

    #[test]
    fn test_rejects_non_ascii() {
        let mut line = ISS_LINE2.to_string();
        line.replace_range(0..3, "2 é");
        assert!(ElementSet::parse("ISS", ISS_LINE1, &line).is_err());
    }

    #[test]
    fn test_rejects_bad_catalog_id() {
        let mut line = ISS_LINE1.to_string();
        line.replace_range(2..7, "25X44");
        assert_eq!(
            ElementSet::parse("ISS", &line, ISS_LINE2),
            Err(ElementSetError::CatalogId("25X44".to_string()))
        );
    }

    #[test]
    fn test_cross_line_id_mismatch_is_accepted() {
        let elements = ElementSet::parse("MIXED", ISS_LINE1, STARLINK_LINE2).unwrap();
        assert_eq!(elements.catalog_id(), 25544);
    }

    #[test]
    fn test_orbital_elements() {
        let orbit = iss().orbital_elements().unwrap();
        assert!((orbit.inclination - 51.6461).abs() < 1e-9);
        assert!((orbit.eccentricity - 0.0001413).abs() < 1e-12);
        assert!((orbit.argument_of_perigee - 89.1723).abs() < 1e-9);
        assert!((orbit.mean_anomaly - 280.4612).abs() < 1e-9);
        assert!((orbit.mean_motion - 15.49507896).abs() < 1e-9);
    }

    #[test]
    fn test_period() {
        let period = iss().period_minutes().unwrap();
        assert!((period - 1440.0 / 15.49507896).abs() < 1e-9);

        let gps = ElementSet::parse("GPS BIIR-2  (PRN 13)", GPS_LINE1, GPS_LINE2).unwrap();
        assert!((gps.period_minutes().unwrap() - 717.98).abs() < 0.01);

        assert_eq!(period_minutes(0.0), 0.0);
        assert_eq!(period_minutes(-1.0), 0.0);
    }

    #[test]
    fn test_corrupted_mean_motion() {
        let line2 = corrupt_mean_motion(ISS_LINE2);
        let elements = ElementSet::parse("ISS (ZARYA)", ISS_LINE1, &line2).unwrap();
        assert!(matches!(
            elements.mean_motion(),
            Err(ElementSetError::Field { field: "mean_motion", .. })
        ));
    }

    #[test]
    fn test_epoch() {
        let epoch = iss().epoch().unwrap();
        assert_eq!(epoch.date_naive(), NaiveDate::from_ymd_opt(2020, 7, 12).unwrap());
        // .88612269 of a day is 76561.0 s
        assert_eq!(epoch.format("%H:%M:%S").to_string(), "21:16:01");
    }

    #[test]
    fn test_launch_date_label() {
        assert_eq!(iss().launch_date_label(), "2020-07-12");

        let starlink = ElementSet::parse("STARLINK-1007", STARLINK_LINE1, STARLINK_LINE2).unwrap();
        assert_eq!(starlink.launch_date_label(), "2024-01-01");
    }

    #[test]
    fn test_two_digit_year_pivot() {
        assert_eq!(split_epoch("56001.0").unwrap().0, 2056);
        assert_eq!(split_epoch("57001.0").unwrap().0, 1957);
        assert_eq!(split_epoch("98067.5").unwrap().0, 1998);
    }

    #[test]
    fn test_unreadable_epoch_is_unknown() {
        let mut line = ISS_LINE1.to_string();
        line.replace_range(18..32, "2019X.88612269");
        let elements = ElementSet::parse("ISS", &line, ISS_LINE2).unwrap();
        assert_eq!(elements.launch_date_label(), "Unknown");
        assert!(elements.epoch().is_err());
    }
}
