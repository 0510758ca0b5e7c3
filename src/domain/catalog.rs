//! Immutable snapshot of everything fetched for one browsing session.

use super::ad::Ad;
use super::location::Locations;
use super::taxonomy::Taxonomy;

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub taxonomy: Taxonomy,
    pub locations: Locations,
    pub ads: Vec<Ad>,
}

impl Catalog {
    pub fn new(taxonomy: Taxonomy, locations: Locations, ads: Vec<Ad>) -> Self {
        Self {
            taxonomy,
            locations,
            ads,
        }
    }
}
