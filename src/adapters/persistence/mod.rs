//! Local persistence adapters.

pub mod filter_state_json;

pub use filter_state_json::FilterStateJson;
