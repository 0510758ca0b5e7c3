//! Filter inputs for the visible-ads pipeline.

use super::selection::{CategorySelection, LocationSelection};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default number of ads per page.
pub const DEFAULT_PAGE_SIZE: usize = 12;

/// Sort order for the result list. `Unsorted` keeps the incoming order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Unsorted,
    LowestPrice,
    HighestPrice,
    Title,
    Newest,
}

impl SortKey {
    pub const ALL: [SortKey; 5] = [
        SortKey::Unsorted,
        SortKey::LowestPrice,
        SortKey::HighestPrice,
        SortKey::Title,
        SortKey::Newest,
    ];

    /// Parse a user-facing label. Unknown labels fall back to `Unsorted`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "lowest price" | "lowest_price" | "price_asc" => SortKey::LowestPrice,
            "highest price" | "highest_price" | "price_desc" => SortKey::HighestPrice,
            "title" | "alphabetical" | "a-z" => SortKey::Title,
            "newest" | "latest" => SortKey::Newest,
            _ => SortKey::Unsorted,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Unsorted => "relevance",
            SortKey::LowestPrice => "lowest price",
            SortKey::HighestPrice => "highest price",
            SortKey::Title => "title",
            SortKey::Newest => "newest",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Read a price bound typed by the user. Blank or non-numeric input means "no bound".
pub fn parse_price_bound(input: &str) -> Option<f64> {
    input
        .trim()
        .replace(',', "")
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
}

/// Everything the pipeline needs to derive the visible page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterSet {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub categories: CategorySelection,
    #[serde(default)]
    pub locations: LocationSelection,
    #[serde(default)]
    pub price_min: Option<f64>,
    #[serde(default)]
    pub price_max: Option<f64>,
    #[serde(default)]
    pub sort_by: SortKey,
    #[serde(default = "first_page")]
    pub page: usize,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn first_page() -> usize {
    1
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl Default for FilterSet {
    fn default() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }
}

impl FilterSet {
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            text: String::new(),
            categories: CategorySelection::default(),
            locations: LocationSelection::default(),
            price_min: None,
            price_max: None,
            sort_by: SortKey::Unsorted,
            page: 1,
            page_size: page_size.max(1),
        }
    }

    /// True when any predicate narrows the ad list.
    pub fn is_narrowing(&self) -> bool {
        !self.text.is_empty()
            || !self.categories.is_empty()
            || !self.locations.is_empty()
            || self.price_min.is_some()
            || self.price_max.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_labels() {
        assert_eq!(SortKey::from_label("Lowest Price"), SortKey::LowestPrice);
        assert_eq!(SortKey::from_label("highest price"), SortKey::HighestPrice);
        assert_eq!(SortKey::from_label("newest"), SortKey::Newest);
        assert_eq!(SortKey::from_label("most viewed"), SortKey::Unsorted);
        for key in SortKey::ALL {
            assert_eq!(SortKey::from_label(key.label()), key);
        }
    }

    #[test]
    fn test_parse_price_bound_ignores_junk() {
        assert_eq!(parse_price_bound(" 1,500 "), Some(1500.0));
        assert_eq!(parse_price_bound(""), None);
        assert_eq!(parse_price_bound("cheap"), None);
        assert_eq!(parse_price_bound("NaN"), None);
        assert_eq!(parse_price_bound("inf"), None);
    }

    #[test]
    fn test_filter_set_deserializes_with_defaults() {
        let f: FilterSet = serde_json::from_str(r#"{"text":"car"}"#).unwrap();
        assert_eq!(f.page, 1);
        assert_eq!(f.page_size, DEFAULT_PAGE_SIZE);
        assert!(f.is_narrowing());
        assert!(!FilterSet::default().is_narrowing());
    }
}
