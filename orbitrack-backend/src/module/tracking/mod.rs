///! Tracking engine
///!
///! Maintains a live catalog of orbiting objects built from element sets
///! fetched out of redundant source groups, classifies every object and
///! answers position, ground-track and pass queries against it.
///!
///! ## Architecture
///! - `Ingestor`: fetches source groups in priority order with fallback
///! - `CatalogStore`: holds one immutable `CatalogSnapshot`, swapped whole
///! - `QueryService`: derives payloads from a snapshot at one instant
///! - `TrackingEngine`: applies the staleness gate in front of every query
///!
///! Propagation is delegated to `module::propagation`.

// ============ Core Data Structures ============
mod types;
pub use types::CatalogId;

mod error;
pub use error::{ElementSetError, IngestionError, SourceError, TrackingError};

mod element_set;
pub use element_set::{ElementSet, OrbitalElements, period_minutes};

// ============ Classification ============
mod rules;
pub use rules::{Pattern, Rule, Subject, first_match};

mod category;
pub use category::{CATEGORY_RULES, Category, categorize};

mod heuristics;
pub use heuristics::{AGENCY_RULES, COUNTRY_RULES, OrbitClass, agency, country, status, visibility};

// ============ Time ============
mod clock;
pub use clock::{Clock, SystemClock};
#[cfg(test)]
pub use clock::FixedClock;

// ============ Data Sources ============
mod source;
pub use source::{ElementSource, HttpElementSource, SourceGroup, default_source_groups};

// ============ Catalog ============
mod snapshot;
pub use snapshot::{CatalogRecord, CatalogSnapshot};

mod ingest;
pub use ingest::{DEFAULT_RECORD_LIMIT, IngestReport, Ingestor, fallback_element_set};

mod store;
pub use store::{CatalogStore, FALLBACK_RETRY_SECONDS};

// ============ Queries ============
mod passes;
pub use passes::{MIN_PASS_ELEVATION_DEG, MAX_PASSES, assemble_passes};

mod query;
pub use query::{ORBIT_PATH_SAMPLES, QueryService};

mod engine;
pub use engine::{DEFAULT_ORBIT_HOURS, DEFAULT_PASS_DAYS, MAX_ORBIT_HOURS, MAX_PASS_DAYS, TrackingEngine};

#[cfg(test)]
pub(crate) mod testing;
