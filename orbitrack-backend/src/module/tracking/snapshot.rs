///! Immutable catalog snapshot
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use super::category::Category;
use super::element_set::ElementSet;
use super::types::CatalogId;
use crate::module::propagation::OrbitPropagator;

/// One accepted catalog object with its bound propagator
#[derive(Clone)]
pub struct CatalogRecord {
    pub elements: ElementSet,
    pub category: Category,
    pub propagator: Arc<dyn OrbitPropagator>,
}

impl CatalogRecord {
    pub fn catalog_id(&self) -> CatalogId {
        self.elements.catalog_id()
    }

    pub fn name(&self) -> &str {
        self.elements.name()
    }
}

impl fmt::Debug for CatalogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogRecord")
            .field("elements", &self.elements)
            .field("category", &self.category)
            .finish_non_exhaustive()
    }
}

/// Records keyed by catalog id plus the derived category membership.
///
/// The membership index is only ever computed in [`CatalogSnapshot::build`],
/// so it always partitions the records exactly.
#[derive(Debug)]
pub struct CatalogSnapshot {
    records: BTreeMap<CatalogId, CatalogRecord>,
    membership: BTreeMap<Category, Vec<CatalogId>>,
    built_at: DateTime<Utc>,
    fallback: bool,
}

impl CatalogSnapshot {
    /// Build from records in acceptance order; a repeated catalog id keeps
    /// the first record.
    pub fn build(records: impl IntoIterator<Item = CatalogRecord>, built_at: DateTime<Utc>) -> Self {
        let mut by_id = BTreeMap::new();
        let mut membership: BTreeMap<Category, Vec<CatalogId>> =
            Category::ALL.iter().map(|c| (*c, Vec::new())).collect();

        for record in records {
            let id = record.catalog_id();
            if by_id.contains_key(&id) {
                continue;
            }
            membership.entry(record.category).or_default().push(id);
            by_id.insert(id, record);
        }

        Self {
            records: by_id,
            membership,
            built_at,
            fallback: false,
        }
    }

    /// Flag a snapshot that holds only the built-in fallback record
    pub fn with_fallback(mut self, fallback: bool) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn is_fallback(&self) -> bool {
        self.fallback
    }

    pub fn get(&self, id: CatalogId) -> Option<&CatalogRecord> {
        self.records.get(&id)
    }

    pub fn records(&self) -> impl Iterator<Item = &CatalogRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Members of one category in acceptance order
    pub fn members(&self, category: Category) -> &[CatalogId] {
        self.membership
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn built_at(&self) -> DateTime<Utc> {
        self.built_at
    }
}
