//! Application use cases.
//!
//! The selection engines, the counter and the pipeline are pure functions over a
//! [`Catalog`](crate::domain::Catalog) snapshot; the services orchestrate them.

pub mod ad_counter;
pub mod browse_session;
pub mod catalog_service;
pub mod location_selection;
pub mod pipeline;
pub mod taxonomy_selection;

pub use ad_counter::{count_ads, count_location_ads};
pub use browse_session::BrowseSession;
pub use catalog_service::CatalogService;
pub use pipeline::{compute_visible_ads, search, SearchResults};
