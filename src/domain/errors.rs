//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into these. The filter engine itself never
//! fails: lookup misses degrade to no-ops, zero counts or excluded ads.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Marketplace gateway error: {0}")]
    Gateway(String),

    #[error("Failed to decode {resource}: {message}")]
    Decode { resource: String, message: String },

    #[error("Filter state error: {0}")]
    State(String),

    #[error("Input error: {0}")]
    Input(String),
}

impl DomainError {
    pub fn decode(resource: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::Decode {
            resource: resource.into(),
            message: err.to_string(),
        }
    }
}
