//! Core domain layer. No external I/O dependencies.
//!
//! Trees, ads and selection state live here. Dependencies flow inward.

pub mod ad;
pub mod catalog;
pub mod errors;
pub mod filters;
pub mod location;
pub mod selection;
pub mod taxonomy;

pub use ad::{Ad, AdsResponse};
pub use catalog::Catalog;
pub use errors::DomainError;
pub use filters::{parse_price_bound, FilterSet, SortKey, DEFAULT_PAGE_SIZE};
pub use location::{
    AddressIndex, District, LocalLevel, LocalLevelKind, LocationKey, LocationLevel, Locations,
    Province, Ward,
};
pub use selection::{CategorySelection, LocationSelection};
pub use taxonomy::{DomainCategory, FieldCategory, ItemCategory, Taxonomy, TaxonomyLevel};
