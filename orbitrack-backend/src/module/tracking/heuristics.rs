///! Name-based heuristics for the detail view
///!
///! Country and agency are guesses from the object name, not registry data.
use super::category::Category;
use super::rules::{Pattern, Rule, Subject, first_match};
use super::types::CatalogId;
use Pattern::{CatalogId as Id, InCategory, Keyword as Kw};

const LEO_CEILING_KM: f64 = 2000.0;
const MEO_CEILING_KM: f64 = 35000.0;
const NAKED_EYE_CEILING_KM: f64 = 1000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrbitClass {
    Leo,
    Meo,
    Geo,
}

impl OrbitClass {
    pub fn from_altitude(altitude_km: f64) -> Self {
        if altitude_km < LEO_CEILING_KM {
            OrbitClass::Leo
        } else if altitude_km < MEO_CEILING_KM {
            OrbitClass::Meo
        } else {
            OrbitClass::Geo
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            OrbitClass::Leo => "LEO (Low Earth Orbit)",
            OrbitClass::Meo => "MEO (Medium Earth Orbit)",
            OrbitClass::Geo => "GEO (Geostationary Orbit)",
        }
    }
}

pub static COUNTRY_RULES: &[Rule<&str>] = &[
    Rule {
        outcome: "International",
        patterns: &[Id(25544)],
    },
    Rule {
        outcome: "United States",
        patterns: &[
            Kw("usa"),
            Kw("noaa"),
            Kw("goes"),
            Kw("landsat"),
            Kw("aqua"),
            Kw("terra"),
        ],
    },
    Rule {
        outcome: "Russia",
        patterns: &[Kw("cosmos"), Kw("glonass"), Kw("meteor"), Kw("resurs")],
    },
    Rule {
        outcome: "China",
        patterns: &[Kw("beidou"), Kw("fengyun"), Kw("yaogan"), Kw("tiangong")],
    },
    Rule {
        outcome: "Europe (ESA)",
        patterns: &[
            Kw("galileo"),
            Kw("sentinel"),
            Kw("meteosat"),
            Kw("eutelsat"),
        ],
    },
    Rule {
        outcome: "Japan",
        patterns: &[Kw("himawari"), Kw("jaxa"), Kw("mtsat")],
    },
    Rule {
        outcome: "India",
        patterns: &[Kw("insat"), Kw("cartosat"), Kw("resourcesat")],
    },
    Rule {
        outcome: "Commercial",
        patterns: &[Kw("starlink"), Kw("oneweb"), Kw("iridium")],
    },
];

pub static AGENCY_RULES: &[Rule<&str>] = &[
    Rule {
        outcome: "SpaceX",
        patterns: &[Kw("starlink")],
    },
    Rule {
        outcome: "OneWeb",
        patterns: &[Kw("oneweb")],
    },
    Rule {
        outcome: "Iridium Communications",
        patterns: &[Kw("iridium")],
    },
    Rule {
        outcome: "NASA/NOAA",
        patterns: &[Kw("noaa"), Kw("goes"), Kw("landsat")],
    },
    Rule {
        outcome: "Roscosmos",
        patterns: &[Kw("glonass")],
    },
    Rule {
        outcome: "ESA",
        patterns: &[Kw("galileo")],
    },
    Rule {
        outcome: "CNSA",
        patterns: &[Kw("beidou")],
    },
    Rule {
        outcome: "NASA/Roscosmos/ESA/JAXA",
        patterns: &[InCategory(Category::Iss)],
    },
    Rule {
        outcome: "Defense Department",
        patterns: &[InCategory(Category::Military)],
    },
];

pub fn country(name: &str, catalog_id: CatalogId) -> &'static str {
    first_match(COUNTRY_RULES, &Subject::new(name, catalog_id)).unwrap_or("Unknown")
}

pub fn agency(name: &str, catalog_id: CatalogId, category: Category) -> &'static str {
    let subject = Subject::new(name, catalog_id).with_category(category);
    first_match(AGENCY_RULES, &subject).unwrap_or("Various")
}

pub fn visibility(altitude_km: f64) -> &'static str {
    if altitude_km < NAKED_EYE_CEILING_KM {
        "Visible"
    } else {
        "Telescope Required"
    }
}

pub fn status(mean_motion: f64) -> &'static str {
    if mean_motion > 0.0 { "Active" } else { "Inactive" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orbit_class_boundaries() {
        assert_eq!(OrbitClass::from_altitude(420.0), OrbitClass::Leo);
        assert_eq!(OrbitClass::from_altitude(1999.9), OrbitClass::Leo);
        assert_eq!(OrbitClass::from_altitude(2000.0), OrbitClass::Meo);
        assert_eq!(OrbitClass::from_altitude(20200.0), OrbitClass::Meo);
        assert_eq!(OrbitClass::from_altitude(35000.0), OrbitClass::Geo);
        assert_eq!(OrbitClass::Geo.label(), "GEO (Geostationary Orbit)");
    }

    #[test]
    fn test_country() {
        assert_eq!(country("ISS (ZARYA)", 25544), "International");
        assert_eq!(country("NOAA 19", 33591), "United States");
        assert_eq!(country("COSMOS 2545", 45358), "Russia");
        assert_eq!(country("FENGYUN 3D", 43010), "China");
        assert_eq!(country("SENTINEL-2A", 40697), "Europe (ESA)");
        assert_eq!(country("HIMAWARI-9", 41836), "Japan");
        assert_eq!(country("CARTOSAT-3", 44804), "India");
        assert_eq!(country("STARLINK-1007", 44713), "Commercial");
        assert_eq!(country("UNKNOWNSAT-1", 99999), "Unknown");
    }

    #[test]
    fn test_agency() {
        assert_eq!(agency("STARLINK-1007", 44713, Category::Starlink), "SpaceX");
        assert_eq!(agency("NOAA 19", 33591, Category::Weather), "NASA/NOAA");
        assert_eq!(agency("ISS (ZARYA)", 25544, Category::Iss), "NASA/Roscosmos/ESA/JAXA");
        assert_eq!(agency("USA 224", 37348, Category::Military), "Defense Department");
        assert_eq!(agency("UNKNOWNSAT-1", 99999, Category::Other), "Various");
    }

    #[test]
    fn test_visibility_and_status() {
        assert_eq!(visibility(420.0), "Visible");
        assert_eq!(visibility(1000.0), "Telescope Required");
        assert_eq!(status(15.5), "Active");
        assert_eq!(status(0.0), "Inactive");
    }
}
