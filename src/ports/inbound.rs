//! Inbound port. UI (adapter) calls into the application.

use crate::domain::DomainError;

/// Input port: UI/CLI drives a browsing session.
#[async_trait::async_trait]
pub trait InputPort: Send + Sync {
    /// Run the interactive browse loop until the user quits.
    async fn run_browse(&self) -> Result<(), DomainError>;
}
