///! Shared identifiers

/// Catalog number of a tracked object, primary key of the catalog
pub type CatalogId = u32;
