//! Cross-cutting helpers shared by adapters and `main`.

pub mod config;
