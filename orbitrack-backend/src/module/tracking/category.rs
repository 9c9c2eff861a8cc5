///! Fixed object taxonomy and its rule table
use serde::{Deserialize, Serialize};

use super::rules::{Pattern, Rule, Subject, first_match};
use super::types::CatalogId;
use Pattern::{AllOf, CatalogId as Id, Keyword as Kw};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "ISS")]
    Iss,
    #[serde(rename = "GPS")]
    Gps,
    #[serde(rename = "GLONASS")]
    Glonass,
    Galileo,
    BeiDou,
    Weather,
    #[serde(rename = "Earth_Observation")]
    EarthObservation,
    Communication,
    Starlink,
    OneWeb,
    Iridium,
    Scientific,
    #[serde(rename = "Space_Telescopes")]
    SpaceTelescopes,
    Military,
    CubeSats,
    #[serde(rename = "Amateur_Radio")]
    AmateurRadio,
    #[serde(rename = "Technology_Demo")]
    TechnologyDemo,
    #[serde(rename = "Debris_Tracking")]
    DebrisTracking,
    Geostationary,
    #[serde(rename = "LEO_Constellation")]
    LeoConstellation,
    Commercial,
    #[serde(rename = "Rocket_Bodies")]
    RocketBodies,
    Other,
}

impl Category {
    /// Every category in taxonomy order
    pub const ALL: [Category; 23] = [
        Category::Iss,
        Category::Gps,
        Category::Glonass,
        Category::Galileo,
        Category::BeiDou,
        Category::Weather,
        Category::EarthObservation,
        Category::Communication,
        Category::Starlink,
        Category::OneWeb,
        Category::Iridium,
        Category::Scientific,
        Category::SpaceTelescopes,
        Category::Military,
        Category::CubeSats,
        Category::AmateurRadio,
        Category::TechnologyDemo,
        Category::DebrisTracking,
        Category::Geostationary,
        Category::LeoConstellation,
        Category::Commercial,
        Category::RocketBodies,
        Category::Other,
    ];

    /// Stable key used on the wire
    pub fn key(self) -> &'static str {
        match self {
            Category::Iss => "ISS",
            Category::Gps => "GPS",
            Category::Glonass => "GLONASS",
            Category::Galileo => "Galileo",
            Category::BeiDou => "BeiDou",
            Category::Weather => "Weather",
            Category::EarthObservation => "Earth_Observation",
            Category::Communication => "Communication",
            Category::Starlink => "Starlink",
            Category::OneWeb => "OneWeb",
            Category::Iridium => "Iridium",
            Category::Scientific => "Scientific",
            Category::SpaceTelescopes => "Space_Telescopes",
            Category::Military => "Military",
            Category::CubeSats => "CubeSats",
            Category::AmateurRadio => "Amateur_Radio",
            Category::TechnologyDemo => "Technology_Demo",
            Category::DebrisTracking => "Debris_Tracking",
            Category::Geostationary => "Geostationary",
            Category::LeoConstellation => "LEO_Constellation",
            Category::Commercial => "Commercial",
            Category::RocketBodies => "Rocket_Bodies",
            Category::Other => "Other",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Category::Iss => "International Space Station",
            Category::Gps => "GPS Constellation",
            Category::Glonass => "GLONASS Navigation",
            Category::Galileo => "Galileo Navigation",
            Category::BeiDou => "BeiDou Navigation",
            Category::Weather => "Weather Satellites",
            Category::EarthObservation => "Earth Observation",
            Category::Communication => "Communication Satellites",
            Category::Starlink => "Starlink Constellation",
            Category::OneWeb => "OneWeb Constellation",
            Category::Iridium => "Iridium Constellation",
            Category::Scientific => "Scientific Satellites",
            Category::SpaceTelescopes => "Space Telescopes",
            Category::Military => "Military Satellites",
            Category::CubeSats => "CubeSats",
            Category::AmateurRadio => "Amateur Radio",
            Category::TechnologyDemo => "Technology Demo",
            Category::DebrisTracking => "Debris & Tracking",
            Category::Geostationary => "Geostationary Orbit",
            Category::LeoConstellation => "LEO Constellations",
            Category::Commercial => "Commercial Satellites",
            Category::RocketBodies => "Rocket Bodies",
            Category::Other => "Other Satellites",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Category::Iss => "#FF6B6B",
            Category::Gps => "#4ECDC4",
            Category::Glonass => "#FF8C42",
            Category::Galileo => "#6A4C93",
            Category::BeiDou => "#F25C54",
            Category::Weather => "#45B7D1",
            Category::EarthObservation => "#52B788",
            Category::Communication => "#96CEB4",
            Category::Starlink => "#E9C46A",
            Category::OneWeb => "#F4A261",
            Category::Iridium => "#E76F51",
            Category::Scientific => "#FFEAA7",
            Category::SpaceTelescopes => "#264653",
            Category::Military => "#DDA0DD",
            Category::CubeSats => "#F72585",
            Category::AmateurRadio => "#4CC9F0",
            Category::TechnologyDemo => "#7209B7",
            Category::DebrisTracking => "#A44A3F",
            Category::Geostationary => "#F77F00",
            Category::LeoConstellation => "#FCBF49",
            Category::Commercial => "#FFB347",
            Category::RocketBodies => "#8B5A3C",
            Category::Other => "#A8A8A8",
        }
    }

    /// Satellite type label shown in detail views
    pub fn satellite_type(self) -> &'static str {
        match self {
            Category::Iss => "Space Station",
            Category::Gps | Category::Glonass | Category::Galileo | Category::BeiDou => {
                "Navigation"
            }
            Category::Weather => "Weather/Climate",
            Category::EarthObservation => "Earth Observation",
            Category::Communication | Category::Iridium => "Communication",
            Category::Starlink | Category::OneWeb => "Internet Constellation",
            Category::Scientific => "Scientific Research",
            Category::SpaceTelescopes => "Space Observatory",
            Category::Military => "Defense/Intelligence",
            Category::CubeSats => "Small Satellite",
            Category::AmateurRadio => "Amateur Radio",
            Category::TechnologyDemo => "Technology Demo",
            Category::DebrisTracking => "Debris/Inactive",
            Category::Geostationary => "Communication/Broadcasting",
            Category::LeoConstellation => "Constellation",
            Category::Commercial => "Commercial",
            Category::RocketBodies => "Rocket Stage/Debris",
            Category::Other => "Unknown",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Evaluated top to bottom; anything unmatched is `Other`
pub static CATEGORY_RULES: &[Rule<Category>] = &[
    Rule {
        outcome: Category::Iss,
        patterns: &[Id(25544), Kw("iss")],
    },
    Rule {
        outcome: Category::Gps,
        patterns: &[Kw("gps"), Kw("navstar")],
    },
    Rule {
        outcome: Category::Glonass,
        patterns: &[Kw("glonass")],
    },
    Rule {
        outcome: Category::Galileo,
        patterns: &[Kw("galileo")],
    },
    Rule {
        outcome: Category::BeiDou,
        patterns: &[Kw("beidou"), Kw("compass")],
    },
    Rule {
        outcome: Category::Starlink,
        patterns: &[Kw("starlink")],
    },
    Rule {
        outcome: Category::OneWeb,
        patterns: &[Kw("oneweb")],
    },
    Rule {
        outcome: Category::Iridium,
        patterns: &[Kw("iridium")],
    },
    Rule {
        outcome: Category::Weather,
        patterns: &[
            Kw("noaa"),
            Kw("goes"),
            Kw("meteosat"),
            Kw("weather"),
            Kw("metop"),
            Kw("himawari"),
        ],
    },
    Rule {
        outcome: Category::EarthObservation,
        patterns: &[
            Kw("landsat"),
            Kw("sentinel"),
            Kw("terra"),
            Kw("aqua"),
            Kw("modis"),
            Kw("worldview"),
        ],
    },
    Rule {
        outcome: Category::SpaceTelescopes,
        patterns: &[
            Kw("hubble"),
            Kw("kepler"),
            Kw("tess"),
            Kw("chandra"),
            Kw("spitzer"),
            Kw("jwst"),
            Kw("telescope"),
            Kw("observatory"),
        ],
    },
    Rule {
        outcome: Category::Scientific,
        patterns: &[
            Kw("science"),
            Kw("research"),
            Kw("explorer"),
            Kw("mission"),
            Kw("experiment"),
        ],
    },
    Rule {
        outcome: Category::CubeSats,
        patterns: &[
            Kw("cubesat"),
            Kw("cube"),
            Kw("picosatellite"),
            Kw("nanosat"),
            Kw("microsat"),
        ],
    },
    Rule {
        outcome: Category::AmateurRadio,
        patterns: &[Kw("amateur"), Kw("ham"), AllOf(&["radio", "sat"])],
    },
    Rule {
        outcome: Category::TechnologyDemo,
        patterns: &[
            Kw("demo"),
            Kw("test"),
            Kw("technology"),
            Kw("experimental"),
        ],
    },
    Rule {
        outcome: Category::Military,
        patterns: &[
            Kw("usa"),
            Kw("nro"),
            Kw("dscs"),
            Kw("milstar"),
            Kw("sbirs"),
            Kw("lacrosse"),
        ],
    },
    Rule {
        outcome: Category::RocketBodies,
        patterns: &[Kw("rocket"), Kw("r/b"), Kw("debris"), Kw("stage")],
    },
    Rule {
        outcome: Category::Communication,
        patterns: &[
            Kw("intelsat"),
            Kw("eutelsat"),
            Kw("ses"),
            Kw("communication"),
            Kw("telecom"),
            Kw("broadcast"),
        ],
    },
    Rule {
        outcome: Category::Geostationary,
        patterns: &[Kw("geo"), Kw("geostationary")],
    },
];

/// Assign one category to an object from its name and catalog id
pub fn categorize(name: &str, catalog_id: CatalogId) -> Category {
    first_match(CATEGORY_RULES, &Subject::new(name, catalog_id)).unwrap_or(Category::Other)
}
