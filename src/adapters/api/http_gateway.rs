//! HTTP adapter for the marketplace REST backend.
//!
//! Implements `MarketplaceGateway` over `GET /api/categories`, `/api/locations`
//! and `/api/ads`. No retries: a failed fetch is reported to the caller.

use crate::domain::{Ad, AdsResponse, DomainError, Locations, Taxonomy};
use crate::ports::MarketplaceGateway;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info, warn};

pub struct HttpMarketplaceGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpMarketplaceGateway {
    /// Create a gateway for `base_url` (e.g. "https://market.example.com").
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("market-sift/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DomainError::Gateway(format!("HTTP client setup failed: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, DomainError> {
        let url = self.endpoint(path);
        debug!(url = %url, "GET");

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| DomainError::Gateway(format!("GET {} failed: {}", url, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            warn!(status = %status, url = %url, "marketplace API returned error");
            return Err(DomainError::Gateway(format!(
                "API error {} for {}: {}",
                status,
                path,
                text.chars().take(200).collect::<String>()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| DomainError::Gateway(format!("Failed to read {} body: {}", path, e)))?;
        decode_body(path, &body)
    }
}

/// Decode a JSON body, naming the resource in the error.
pub(crate) fn decode_body<T: DeserializeOwned>(
    resource: &str,
    body: &str,
) -> Result<T, DomainError> {
    serde_json::from_str(body).map_err(|e| {
        let snippet: String = body.chars().take(200).collect();
        warn!(resource, error = %e, body = %snippet, "JSON decode failed");
        DomainError::decode(resource, e)
    })
}

#[async_trait::async_trait]
impl MarketplaceGateway for HttpMarketplaceGateway {
    async fn fetch_categories(&self) -> Result<Taxonomy, DomainError> {
        let taxonomy: Taxonomy = self.get_json("categories").await?;
        info!(domains = taxonomy.domains.len(), "categories fetched");
        Ok(taxonomy)
    }

    async fn fetch_locations(&self) -> Result<Locations, DomainError> {
        let locations: Locations = self.get_json("locations").await?;
        info!(provinces = locations.provinces.len(), "locations fetched");
        Ok(locations)
    }

    async fn fetch_ads(&self) -> Result<Vec<Ad>, DomainError> {
        let response: AdsResponse = self.get_json("ads").await?;
        info!(ads = response.ads.len(), "ads fetched");
        Ok(response.ads)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_cleanly() {
        let gw =
            HttpMarketplaceGateway::new("http://localhost:8000/", Duration::from_secs(1)).unwrap();
        assert_eq!(gw.endpoint("ads"), "http://localhost:8000/api/ads");
        assert_eq!(gw.endpoint("/categories"), "http://localhost:8000/api/categories");
    }

    #[test]
    fn test_decode_ads_envelope() {
        let body = r#"{"ads":[{"id":1,"title":"Land","price":"100","category_id":10}]}"#;
        let response: AdsResponse = decode_body("ads", body).unwrap();
        assert_eq!(response.ads.len(), 1);
        assert_eq!(response.ads[0].price, Some(100.0));
    }

    #[test]
    fn test_decode_error_names_resource() {
        let err = decode_body::<Locations>("locations", "<html>").unwrap_err();
        assert!(err.to_string().contains("locations"));
    }
}
