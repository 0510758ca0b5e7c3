//! Marketplace API adapters. Implement MarketplaceGateway.
//!
//! HTTP against the live backend, or JSON fixtures from disk.

pub mod fixture_gateway;
pub mod http_gateway;

pub use fixture_gateway::FixtureGateway;
pub use http_gateway::HttpMarketplaceGateway;
