//! Category taxonomy: domain → field → item.
//!
//! Only item ids are stored on ads. Domain, field and item ids come from three
//! independently issued sequences, so the same number can name unrelated nodes
//! on different levels. Lookups here are always level-scoped.

use serde::{Deserialize, Serialize};

/// Top level of the taxonomy. Items may hang off a domain directly or through a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainCategory {
    pub id: i64,
    pub name: String,
    #[serde(default, alias = "field_categories")]
    pub field_categories: Vec<FieldCategory>,
    #[serde(default, alias = "item_categories")]
    pub item_categories: Vec<ItemCategory>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldCategory {
    pub id: i64,
    pub name: String,
    #[serde(default, alias = "item_categories")]
    pub item_categories: Vec<ItemCategory>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemCategory {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaxonomyLevel {
    Domain,
    Field,
    Item,
}

impl DomainCategory {
    /// True when the node actually carries children. Used to reject an id match
    /// that really belongs to an item on another level.
    pub fn has_children(&self) -> bool {
        !self.field_categories.is_empty() || !self.item_categories.is_empty()
    }

    /// Every item id under this domain: items of each field, then direct items.
    pub fn item_ids(&self) -> Vec<i64> {
        self.field_categories
            .iter()
            .flat_map(|f| f.item_categories.iter())
            .chain(self.item_categories.iter())
            .map(|i| i.id)
            .collect()
    }
}

impl FieldCategory {
    pub fn item_ids(&self) -> Vec<i64> {
        self.item_categories.iter().map(|i| i.id).collect()
    }
}

/// The fetched category tree. Immutable for the session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Taxonomy {
    pub domains: Vec<DomainCategory>,
}

impl Taxonomy {
    pub fn new(domains: Vec<DomainCategory>) -> Self {
        Self { domains }
    }

    pub fn domain(&self, id: i64) -> Option<&DomainCategory> {
        self.domains.iter().find(|d| d.id == id)
    }

    /// First field with this id, together with its owning domain.
    pub fn field(&self, id: i64) -> Option<(&DomainCategory, &FieldCategory)> {
        self.domains.iter().find_map(|d| {
            d.field_categories
                .iter()
                .find(|f| f.id == id)
                .map(|f| (d, f))
        })
    }

    pub fn item(&self, id: i64) -> Option<&ItemCategory> {
        self.items().find(|i| i.id == id)
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldCategory> {
        self.domains.iter().flat_map(|d| d.field_categories.iter())
    }

    /// All items in tree order: per domain, field items first, then direct items.
    pub fn items(&self) -> impl Iterator<Item = &ItemCategory> {
        self.domains.iter().flat_map(|d| {
            d.field_categories
                .iter()
                .flat_map(|f| f.item_categories.iter())
                .chain(d.item_categories.iter())
        })
    }

    pub fn domain_by_name(&self, name: &str) -> Option<&DomainCategory> {
        let name = name.trim();
        self.domains.iter().find(|d| d.name.trim() == name)
    }

    pub fn field_by_name(&self, name: &str) -> Option<&FieldCategory> {
        let name = name.trim();
        self.fields().find(|f| f.name.trim() == name)
    }

    pub fn item_by_name(&self, name: &str) -> Option<&ItemCategory> {
        let name = name.trim();
        self.items().find(|i| i.name.trim() == name)
    }

    /// Item ids under a node on the given level. `None` when the node does not exist.
    pub fn subtree_item_ids(&self, level: TaxonomyLevel, id: i64) -> Option<Vec<i64>> {
        match level {
            TaxonomyLevel::Domain => self.domain(id).map(DomainCategory::item_ids),
            TaxonomyLevel::Field => self.field(id).map(|(_, f)| f.item_ids()),
            TaxonomyLevel::Item => self.item(id).map(|i| vec![i.id]),
        }
    }
}
