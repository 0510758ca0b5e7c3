//! market-sift: classified-ads browser with hierarchical category and location
//! filters, per-node ad counts and a filter/sort/paginate pipeline.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod shared;
pub mod usecases;
