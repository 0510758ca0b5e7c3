//! Browse session: owns the filter state for one page view and dispatches user
//! actions into the selection engines.
//!
//! Any change to a filter puts the pager back on page 1.

use crate::domain::{
    parse_price_bound, Catalog, FilterSet, LocationKey, LocationLevel, SortKey, TaxonomyLevel,
};
use crate::usecases::pipeline::{self, SearchResults};
use crate::usecases::{ad_counter, location_selection, taxonomy_selection};
use std::sync::Arc;
use tracing::{debug, info};

pub struct BrowseSession {
    catalog: Arc<Catalog>,
    filters: FilterSet,
}

impl BrowseSession {
    pub fn new(catalog: Arc<Catalog>, page_size: usize) -> Self {
        Self {
            catalog,
            filters: FilterSet::with_page_size(page_size),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Category selection
    // ─────────────────────────────────────────────────────────────────────────

    pub fn toggle_category(&mut self, level: TaxonomyLevel, id: i64) -> bool {
        let taxonomy = &self.catalog.taxonomy;
        let selection = &mut self.filters.categories;
        let applied = match level {
            TaxonomyLevel::Domain => taxonomy_selection::toggle_domain(taxonomy, selection, id),
            TaxonomyLevel::Field => taxonomy_selection::toggle_field(taxonomy, selection, id),
            TaxonomyLevel::Item => taxonomy_selection::toggle_item(taxonomy, selection, id),
        };
        self.filters_changed();
        applied
    }

    pub fn is_category_checked(&self, level: TaxonomyLevel, id: i64) -> bool {
        taxonomy_selection::is_fully_selected(
            &self.catalog.taxonomy,
            &self.filters.categories,
            level,
            id,
        )
    }

    pub fn is_category_partial(&self, level: TaxonomyLevel, id: i64) -> bool {
        taxonomy_selection::is_partially_selected(
            &self.catalog.taxonomy,
            &self.filters.categories,
            level,
            id,
        )
    }

    /// Ads under a category node, resolved by the node's name and id.
    pub fn category_count(&self, level: TaxonomyLevel, id: i64) -> usize {
        let taxonomy = &self.catalog.taxonomy;
        let name = match level {
            TaxonomyLevel::Domain => taxonomy.domain(id).map(|d| d.name.as_str()),
            TaxonomyLevel::Field => taxonomy.field(id).map(|(_, f)| f.name.as_str()),
            TaxonomyLevel::Item => taxonomy.item(id).map(|i| i.name.as_str()),
        }
        .unwrap_or_default();
        ad_counter::count_ads(id, name, &self.catalog.ads, taxonomy)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Location selection
    // ─────────────────────────────────────────────────────────────────────────

    pub fn toggle_location(&mut self, level: LocationLevel, id: i64) -> bool {
        let applied = location_selection::toggle(
            &self.catalog.locations,
            &mut self.filters.locations,
            level,
            id,
        );
        self.filters_changed();
        applied
    }

    pub fn toggle_address(&mut self, ward_id: i64, index: usize) -> bool {
        let applied = location_selection::toggle_address(
            &self.catalog.locations,
            &mut self.filters.locations,
            ward_id,
            index,
        );
        self.filters_changed();
        applied
    }

    pub fn is_location_checked(&self, level: LocationLevel, id: i64) -> bool {
        location_selection::is_fully_selected(
            &self.catalog.locations,
            &self.filters.locations,
            level,
            id,
        )
    }

    pub fn is_location_partial(&self, level: LocationLevel, id: i64) -> bool {
        location_selection::is_partially_selected(
            &self.catalog.locations,
            &self.filters.locations,
            level,
            id,
        )
    }

    pub fn is_address_checked(&self, ward_id: i64, index: usize) -> bool {
        self.filters
            .locations
            .contains(&LocationKey::Address { ward_id, index })
    }

    /// Ads at a location node. Wards count every address; ancestors count every ward.
    pub fn location_count(&self, level: LocationLevel, id: i64) -> usize {
        match level {
            LocationLevel::Ward => {
                ad_counter::count_location_ads(&LocationKey::Ward(id), &self.catalog.ads)
            }
            _ => ad_counter::count_location_subtree(
                level,
                id,
                &self.catalog.ads,
                &self.catalog.locations,
            ),
        }
    }

    pub fn address_count(&self, ward_id: i64, index: usize) -> usize {
        ad_counter::count_location_ads(
            &LocationKey::Address { ward_id, index },
            &self.catalog.ads,
        )
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Text, price, sort
    // ─────────────────────────────────────────────────────────────────────────

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.filters.text = text.into();
        self.filters_changed();
    }

    /// Set bounds from raw user input; non-numeric input clears that bound.
    pub fn set_price_range(&mut self, min: &str, max: &str) {
        self.filters.price_min = parse_price_bound(min);
        self.filters.price_max = parse_price_bound(max);
        self.filters_changed();
    }

    pub fn set_sort(&mut self, sort_by: SortKey) {
        self.filters.sort_by = sort_by;
        self.filters_changed();
    }

    /// Drop every filter and go back to page 1. Page size is kept.
    pub fn reset(&mut self) {
        self.filters = FilterSet::with_page_size(self.filters.page_size);
        info!("filters reset");
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Results & paging
    // ─────────────────────────────────────────────────────────────────────────

    pub fn results(&self) -> SearchResults {
        pipeline::search(&self.catalog.ads, &self.filters)
    }

    pub fn total_pages(&self) -> usize {
        let matched = pipeline::filter_ads(&self.catalog.ads, &self.filters);
        pipeline::total_pages(matched.len(), self.filters.page_size)
    }

    /// Jump to a page, clamped to `1..=total_pages`.
    pub fn set_page(&mut self, page: usize) {
        self.filters.page = page.clamp(1, self.total_pages());
    }

    pub fn next_page(&mut self) -> bool {
        let before = self.filters.page;
        self.set_page(before + 1);
        self.filters.page != before
    }

    pub fn prev_page(&mut self) -> bool {
        let before = self.filters.page;
        self.set_page(before.saturating_sub(1));
        self.filters.page != before
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Persistence
    // ─────────────────────────────────────────────────────────────────────────

    /// Apply saved filters. Ids and keys that no longer exist in the current trees
    /// are dropped; page size stays the session's own.
    pub fn restore(&mut self, saved: FilterSet) {
        let taxonomy = &self.catalog.taxonomy;
        let locations = &self.catalog.locations;
        let mut filters = saved;

        filters.categories.domains.retain(|id| taxonomy.domain(*id).is_some());
        filters.categories.fields.retain(|id| taxonomy.field(*id).is_some());
        filters.categories.items.retain(|id| taxonomy.item(*id).is_some());
        let before = filters.locations.keys.len();
        filters.locations.keys.retain(|k| locations.contains_key(k));
        let dropped_keys = before - filters.locations.keys.len();

        filters.price_min = filters.price_min.filter(|n| n.is_finite());
        filters.price_max = filters.price_max.filter(|n| n.is_finite());
        filters.page = 1;
        filters.page_size = self.filters.page_size;

        debug!(dropped_keys, "saved filters restored");
        self.filters = filters;
    }

    fn filters_changed(&mut self) {
        self.filters.page = 1;
    }
}
