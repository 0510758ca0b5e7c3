//! Offline gateway that reads the three API responses from JSON files.
//!
//! Expects `categories.json`, `locations.json` and `ads.json` in one directory,
//! each holding exactly what the matching endpoint returns. Handy for demos and
//! for working against a captured backend snapshot.

use super::http_gateway::decode_body;
use crate::domain::{Ad, AdsResponse, DomainError, Locations, Taxonomy};
use crate::ports::MarketplaceGateway;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

pub struct FixtureGateway {
    dir: PathBuf,
}

impl FixtureGateway {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    async fn read_json<T: DeserializeOwned>(&self, file: &str) -> Result<T, DomainError> {
        let path = self.dir.join(file);
        let body = fs::read_to_string(&path)
            .await
            .map_err(|e| DomainError::Gateway(format!("read {}: {}", path.display(), e)))?;
        decode_body(file, &body)
    }
}

#[async_trait::async_trait]
impl MarketplaceGateway for FixtureGateway {
    async fn fetch_categories(&self) -> Result<Taxonomy, DomainError> {
        self.read_json("categories.json").await
    }

    async fn fetch_locations(&self) -> Result<Locations, DomainError> {
        self.read_json("locations.json").await
    }

    async fn fetch_ads(&self) -> Result<Vec<Ad>, DomainError> {
        let response: AdsResponse = self.read_json("ads.json").await?;
        info!(dir = %self.dir.display(), ads = response.ads.len(), "fixture ads loaded");
        Ok(response.ads)
    }
}
