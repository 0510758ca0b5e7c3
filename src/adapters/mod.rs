//! Infrastructure adapters. Implement ports.
//!
//! Marketplace API, local filter state, terminal UI. Map errors to DomainError.

pub mod api;
pub mod persistence;
pub mod ui;
