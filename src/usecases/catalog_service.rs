//! Load the browsing snapshot: categories, locations and ads in one go.
//!
//! The three requests run concurrently; the engine only starts once all of them
//! have succeeded, and then works on the immutable [`Catalog`].

use crate::domain::{Catalog, DomainError};
use crate::ports::MarketplaceGateway;
use std::sync::Arc;
use tracing::info;

pub struct CatalogService {
    gateway: Arc<dyn MarketplaceGateway>,
}

impl CatalogService {
    pub fn new(gateway: Arc<dyn MarketplaceGateway>) -> Self {
        Self { gateway }
    }

    /// Fetch all three resources. Fails if any of them fails.
    pub async fn load(&self) -> Result<Catalog, DomainError> {
        let (taxonomy, locations, ads) = tokio::try_join!(
            self.gateway.fetch_categories(),
            self.gateway.fetch_locations(),
            self.gateway.fetch_ads(),
        )?;

        info!(
            domains = taxonomy.domains.len(),
            items = taxonomy.items().count(),
            provinces = locations.provinces.len(),
            wards = locations.wards().count(),
            ads = ads.len(),
            "catalog loaded"
        );

        Ok(Catalog::new(taxonomy, locations, ads))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Ad, DomainCategory, Locations, Taxonomy};

    struct StubGateway {
        fail_ads: bool,
    }

    #[async_trait::async_trait]
    impl MarketplaceGateway for StubGateway {
        async fn fetch_categories(&self) -> Result<Taxonomy, DomainError> {
            Ok(Taxonomy::new(vec![DomainCategory {
                id: 1,
                name: "Property".into(),
                field_categories: vec![],
                item_categories: vec![],
            }]))
        }

        async fn fetch_locations(&self) -> Result<Locations, DomainError> {
            Ok(Locations::default())
        }

        async fn fetch_ads(&self) -> Result<Vec<Ad>, DomainError> {
            if self.fail_ads {
                return Err(DomainError::Gateway("ads unavailable".into()));
            }
            Ok(vec![])
        }
    }

    #[tokio::test]
    async fn test_load_builds_snapshot() {
        let service = CatalogService::new(Arc::new(StubGateway { fail_ads: false }));
        let catalog = service.load().await.unwrap();
        assert_eq!(catalog.taxonomy.domains.len(), 1);
        assert!(catalog.ads.is_empty());
    }

    #[tokio::test]
    async fn test_load_fails_when_any_resource_fails() {
        let service = CatalogService::new(Arc::new(StubGateway { fail_ads: true }));
        let err = service.load().await.unwrap_err();
        assert!(matches!(err, DomainError::Gateway(_)));
    }
}
