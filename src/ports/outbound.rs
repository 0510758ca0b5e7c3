//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::{Ad, DomainError, FilterSet, Locations, Taxonomy};

/// Marketplace REST backend. Each resource is fetched once per session.
#[async_trait::async_trait]
pub trait MarketplaceGateway: Send + Sync {
    /// `GET /api/categories`: the domain → field → item tree.
    async fn fetch_categories(&self) -> Result<Taxonomy, DomainError>;

    /// `GET /api/locations`: the province → ward tree.
    async fn fetch_locations(&self) -> Result<Locations, DomainError>;

    /// `GET /api/ads`: the flat listing.
    async fn fetch_ads(&self) -> Result<Vec<Ad>, DomainError>;
}

/// Filter state port. Remembers the last filters between runs.
#[async_trait::async_trait]
pub trait FilterStatePort: Send + Sync {
    /// Last saved filters, or `None` if nothing was saved yet.
    async fn load(&self) -> Result<Option<FilterSet>, DomainError>;

    /// Replace the saved filters.
    async fn save(&self, filters: &FilterSet) -> Result<(), DomainError>;
}
