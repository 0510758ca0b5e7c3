//! Visible-ads pipeline: text → category → location → price → sort → page.
//!
//! Every stage only narrows the previous one, so the final set does not depend on
//! stage order; text runs first because it is the cheapest eliminator.

use crate::domain::{Ad, CategorySelection, FilterSet, LocationSelection, SortKey};
use std::cmp::Ordering;
use std::collections::HashSet;
use tracing::debug;

/// One page of results plus totals for the pager.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResults {
    pub ads: Vec<Ad>,
    pub total_matches: usize,
    pub page: usize,
    pub total_pages: usize,
}

/// The ads shown on the current page.
pub fn compute_visible_ads(ads: &[Ad], filters: &FilterSet) -> Vec<Ad> {
    search(ads, filters).ads
}

/// Run the whole pipeline and keep the totals.
pub fn search(ads: &[Ad], filters: &FilterSet) -> SearchResults {
    let mut matched = filter_ads(ads, filters);
    sort_ads(&mut matched, filters.sort_by);

    let total_matches = matched.len();
    let total_pages = total_pages(total_matches, filters.page_size);
    let ads = paginate(&matched, filters.page, filters.page_size)
        .iter()
        .map(|ad| (*ad).clone())
        .collect();

    SearchResults {
        ads,
        total_matches,
        page: filters.page.max(1),
        total_pages,
    }
}

/// All matching ads in incoming order.
pub fn filter_ads<'a>(ads: &'a [Ad], filters: &FilterSet) -> Vec<&'a Ad> {
    let needle = filters.text.to_lowercase();
    let mut stage: Vec<&Ad> = if needle.is_empty() {
        ads.iter().collect()
    } else {
        ads.iter().filter(|ad| ad.mentions(&needle)).collect()
    };
    debug!(remaining = stage.len(), "text filter");

    if let Some(allowed) = category_filter(&filters.categories) {
        stage.retain(|ad| ad.category_id.is_some_and(|c| allowed.contains(&c)));
        debug!(
            allowed = allowed.len(),
            remaining = stage.len(),
            "category filter"
        );
    }

    if !filters.locations.is_empty() {
        stage.retain(|ad| location_matches(&filters.locations, ad));
        debug!(remaining = stage.len(), "location filter");
    }

    if filters.price_min.is_some() || filters.price_max.is_some() {
        stage.retain(|ad| price_matches(ad, filters.price_min, filters.price_max));
        debug!(remaining = stage.len(), "price filter");
    }

    stage
}

/// Item ids an ad may carry to pass the category stage, or `None` when no
/// category is selected. Only the item set is consulted: domain and field flags
/// switch the stage on but never widen it, since group toggles already wrote
/// their items. An empty set means "show nothing".
pub fn category_filter(selection: &CategorySelection) -> Option<HashSet<i64>> {
    if selection.is_empty() {
        return None;
    }
    Some(selection.items.iter().copied().collect())
}

fn location_matches(selection: &LocationSelection, ad: &Ad) -> bool {
    selection.matches(ad.location_id, ad.selected_local_address_index)
}

/// Bounds that are `None` are not applied. An ad without a usable price fails any
/// active bound.
pub fn price_matches(ad: &Ad, min: Option<f64>, max: Option<f64>) -> bool {
    let min = min.filter(|m| m.is_finite());
    let max = max.filter(|m| m.is_finite());
    if min.is_none() && max.is_none() {
        return true;
    }
    let Some(price) = ad.price.filter(|p| p.is_finite()) else {
        return false;
    };
    min.is_none_or(|m| price >= m) && max.is_none_or(|m| price <= m)
}

/// Stable sort. Ads without a price sort after priced ones in both price orders.
pub fn sort_ads(ads: &mut [&Ad], key: SortKey) {
    match key {
        SortKey::LowestPrice => ads.sort_by(|a, b| by_price(a, b, false)),
        SortKey::HighestPrice => ads.sort_by(|a, b| by_price(a, b, true)),
        SortKey::Title => ads.sort_by(|a, b| a.title.cmp(&b.title)),
        SortKey::Newest => ads.sort_by(|a, b| b.id.cmp(&a.id)),
        SortKey::Unsorted => {}
    }
}

fn by_price(a: &Ad, b: &Ad, descending: bool) -> Ordering {
    match (a.price, b.price) {
        (Some(x), Some(y)) => {
            let ord = x.partial_cmp(&y).unwrap_or(Ordering::Equal);
            if descending { ord.reverse() } else { ord }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Slice `[(page-1)*size, page*size)`. Page 0 is read as page 1.
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    let page_size = page_size.max(1);
    let start = (page.max(1) - 1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

pub fn total_pages(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size.max(1)).max(1)
}
