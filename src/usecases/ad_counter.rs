//! Ad counts per tree node.
//!
//! Domain, field and item ids are issued from separate sequences and collide, so a
//! bare id cannot tell which level a node belongs to. Resolution goes by name first
//! and only then by id, in this fixed order (first hit wins):
//!
//! 1. item by name  → ads with `category_id == node_id`
//! 2. field by name → ads under the field's items
//! 3. domain by name, then by id (id hit only if the domain has children)
//! 4. field by id
//! 5. item by id
//!
//! Changing the order changes which node an ambiguous id resolves to.

use crate::domain::{Ad, LocationKey, LocationLevel, Locations, Taxonomy};
use std::collections::HashSet;
use tracing::debug;

/// Which tier resolved a taxonomy node, with the item ids its count covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    ItemByName(i64),
    FieldByName(Vec<i64>),
    Domain(Vec<i64>),
    FieldById(Vec<i64>),
    ItemById(i64),
    Unresolved,
}

/// Resolve a node to the item ids it covers, following the tier order above.
pub fn resolve(node_id: i64, node_name: &str, taxonomy: &Taxonomy) -> Resolution {
    if taxonomy.item_by_name(node_name).is_some() {
        return Resolution::ItemByName(node_id);
    }
    if let Some(field) = taxonomy.field_by_name(node_name) {
        return Resolution::FieldByName(field.item_ids());
    }
    let domain = taxonomy
        .domain_by_name(node_name)
        .or_else(|| taxonomy.domain(node_id).filter(|d| d.has_children()));
    if let Some(domain) = domain {
        return Resolution::Domain(domain.item_ids());
    }
    if let Some((_, field)) = taxonomy.field(node_id) {
        return Resolution::FieldById(field.item_ids());
    }
    if taxonomy.item(node_id).is_some() {
        return Resolution::ItemById(node_id);
    }
    Resolution::Unresolved
}

/// Number of ads whose category falls under the node. Lookup misses count 0.
pub fn count_ads(node_id: i64, node_name: &str, ads: &[Ad], taxonomy: &Taxonomy) -> usize {
    let resolution = resolve(node_id, node_name, taxonomy);
    let count = match &resolution {
        Resolution::ItemByName(id) | Resolution::ItemById(id) => {
            ads.iter().filter(|ad| ad.category_id == Some(*id)).count()
        }
        Resolution::FieldByName(items)
        | Resolution::Domain(items)
        | Resolution::FieldById(items) => count_in(ads, items),
        Resolution::Unresolved => 0,
    };
    debug!(node_id, node_name, ?resolution, count, "category ad count");
    count
}

fn count_in(ads: &[Ad], items: &[i64]) -> usize {
    if items.is_empty() {
        return 0;
    }
    let items: HashSet<i64> = items.iter().copied().collect();
    ads.iter()
        .filter(|ad| ad.category_id.is_some_and(|c| items.contains(&c)))
        .count()
}

/// Ads at a ward (any address) or at one address of a ward.
///
/// Ward and address counts come from the same predicate and are never summed:
/// the ward count already includes every address.
pub fn count_location_ads(key: &LocationKey, ads: &[Ad]) -> usize {
    ads.iter()
        .filter(|ad| key.matches(ad.location_id, ad.selected_local_address_index))
        .count()
}

/// Ads in any ward under a province, district, local level or ward.
pub fn count_location_subtree(
    level: LocationLevel,
    id: i64,
    ads: &[Ad],
    locations: &Locations,
) -> usize {
    let Some(wards) = locations.subtree_wards(level, id) else {
        return 0;
    };
    let ward_ids: HashSet<i64> = wards.iter().map(|w| w.id).collect();
    ads.iter()
        .filter(|ad| ad.location_id.is_some_and(|l| ward_ids.contains(&l)))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        AddressIndex, District, DomainCategory, FieldCategory, ItemCategory, LocalLevel,
        LocalLevelKind, Province, Ward,
    };

    fn ad(id: i64, category_id: Option<i64>) -> Ad {
        Ad {
            id: Some(id),
            title: format!("ad {}", id),
            description: String::new(),
            price: Some(100.0),
            category_id,
            location_id: None,
            selected_local_address_index: AddressIndex::Legacy,
            created_at: None,
        }
    }

    fn located(id: i64, location_id: i64, index: Option<i64>) -> Ad {
        Ad {
            location_id: Some(location_id),
            selected_local_address_index: index.into(),
            ..ad(id, None)
        }
    }

    fn item(id: i64, name: &str) -> ItemCategory {
        ItemCategory {
            id,
            name: name.to_string(),
        }
    }

    /// Domain 5 "Electronics" collides with item 5 "Mobile" (under domain 1 / field 1).
    /// Field 3 "Laptops" under domain 5 collides with item 3 "Tablet".
    fn tree() -> Taxonomy {
        Taxonomy::new(vec![
            DomainCategory {
                id: 1,
                name: "Gadgets".into(),
                field_categories: vec![FieldCategory {
                    id: 1,
                    name: "Handheld".into(),
                    item_categories: vec![item(5, "Mobile"), item(3, "Tablet")],
                }],
                item_categories: vec![],
            },
            DomainCategory {
                id: 5,
                name: "Electronics".into(),
                field_categories: vec![
                    FieldCategory {
                        id: 3,
                        name: "Laptops".into(),
                        item_categories: vec![item(30, "Gaming laptop"), item(31, "Ultrabook")],
                    },
                    FieldCategory {
                        id: 4,
                        name: "Cameras".into(),
                        item_categories: vec![],
                    },
                ],
                item_categories: vec![item(32, "Chargers")],
            },
        ])
    }

    fn ads() -> Vec<Ad> {
        vec![
            ad(1, Some(5)),
            ad(2, Some(5)),
            ad(3, Some(30)),
            ad(4, Some(31)),
            ad(5, Some(32)),
            ad(6, Some(3)),
            ad(7, None),
        ]
    }

    #[test]
    fn test_name_drives_resolution_on_id_collision() {
        let tax = tree();
        let ads = ads();
        // Item "Mobile" and domain "Electronics" both have id 5.
        assert_eq!(count_ads(5, "Mobile", &ads, &tax), 2);
        assert_eq!(count_ads(5, "Electronics", &ads, &tax), 3);
    }

    #[test]
    fn test_field_by_name_counts_its_items() {
        let tax = tree();
        assert_eq!(count_ads(3, "Laptops", &ads(), &tax), 2);
        assert_eq!(count_ads(3, "Tablet", &ads(), &tax), 1);
    }

    #[test]
    fn test_empty_field_counts_zero() {
        let tax = tree();
        assert_eq!(count_ads(4, "Cameras", &ads(), &tax), 0);
    }

    #[test]
    fn test_id_fallbacks_when_name_unknown() {
        let tax = tree();
        let ads = ads();
        assert_eq!(resolve(5, "renamed", &tax), Resolution::Domain(vec![30, 31, 32]));
        assert_eq!(count_ads(1, "renamed", &ads, &tax), 3);
        assert_eq!(resolve(4, "renamed", &tax), Resolution::FieldById(vec![]));
        assert_eq!(resolve(30, "renamed", &tax), Resolution::ItemById(30));
        assert_eq!(count_ads(30, "renamed", &ads, &tax), 1);
    }

    #[test]
    fn test_item_name_beats_field_name() {
        let mut tax = tree();
        tax.domains[0].item_categories.push(item(40, "Laptops"));
        let mut ads = ads();
        ads.push(ad(8, Some(40)));
        assert_eq!(resolve(40, "Laptops", &tax), Resolution::ItemByName(40));
        assert_eq!(count_ads(40, "Laptops", &ads, &tax), 1);
    }

    #[test]
    fn test_field_name_beats_domain_id() {
        let tax = tree();
        assert_eq!(resolve(5, "Laptops", &tax), Resolution::FieldByName(vec![30, 31]));
        assert_eq!(count_ads(5, "Laptops", &ads(), &tax), 2);
    }

    #[test]
    fn test_domain_id_beats_field_id() {
        let mut tax = tree();
        tax.domains[0].field_categories.push(FieldCategory {
            id: 5,
            name: "Drones".into(),
            item_categories: vec![item(50, "Quadcopter")],
        });
        let mut ads = ads();
        ads.push(ad(8, Some(50)));
        assert_eq!(resolve(5, "renamed", &tax), Resolution::Domain(vec![30, 31, 32]));
        assert_eq!(count_ads(5, "renamed", &ads, &tax), 3);
    }

    #[test]
    fn test_field_id_beats_item_id() {
        let tax = tree();
        // Id 3 is field "Laptops" (items 30, 31) and item "Tablet".
        assert_eq!(resolve(3, "renamed", &tax), Resolution::FieldById(vec![30, 31]));
        assert_eq!(count_ads(3, "renamed", &ads(), &tax), 2);
    }

    #[test]
    fn test_childless_domain_id_does_not_swallow_item() {
        let mut tax = tree();
        tax.domains.push(DomainCategory {
            id: 31,
            name: "Placeholder".into(),
            field_categories: vec![],
            item_categories: vec![],
        });
        assert_eq!(resolve(31, "", &tax), Resolution::ItemById(31));
        assert_eq!(count_ads(31, "", &ads(), &tax), 1);
    }

    #[test]
    fn test_unknown_node_counts_zero() {
        let tax = tree();
        assert_eq!(count_ads(999, "Nothing", &ads(), &tax), 0);
    }

    #[test]
    fn test_legacy_ads_count_for_ward_and_first_address() {
        let ads = vec![
            located(1, 7, None),
            located(2, 7, Some(1)),
            located(3, 8, Some(0)),
            ad(4, None),
        ];
        assert_eq!(count_location_ads(&LocationKey::Ward(7), &ads), 2);
        assert_eq!(count_location_ads(&"7-0".parse().unwrap(), &ads), 1);
        assert_eq!(count_location_ads(&"7-1".parse().unwrap(), &ads), 1);
        assert_eq!(count_location_ads(&"8-0".parse().unwrap(), &ads), 1);
        assert_eq!(count_location_ads(&"9".parse().unwrap(), &ads), 0);
    }

    #[test]
    fn test_unreadable_address_counts_for_ward_only() {
        let mut unreadable = located(1, 7, None);
        unreadable.selected_local_address_index = AddressIndex::Unreadable;
        let ads = vec![unreadable];
        assert_eq!(count_location_ads(&LocationKey::Ward(7), &ads), 1);
        assert_eq!(count_location_ads(&"7-0".parse().unwrap(), &ads), 0);
    }

    #[test]
    fn test_subtree_location_count() {
        let locs = Locations::new(vec![Province {
            id: 1,
            name: "Bagmati".into(),
            districts: vec![District {
                id: 2,
                name: "Kathmandu".into(),
                local_levels: vec![LocalLevel {
                    id: 3,
                    name: "Kathmandu Metropolitan".into(),
                    kind: LocalLevelKind::Municipality,
                    wards: vec![
                        Ward {
                            id: 7,
                            ward_number: 1,
                            local_addresses: vec![],
                        },
                        Ward {
                            id: 8,
                            ward_number: 2,
                            local_addresses: vec![],
                        },
                    ],
                }],
            }],
        }]);
        let ads = vec![located(1, 7, None), located(2, 8, Some(0)), located(3, 9, None)];
        assert_eq!(count_location_subtree(LocationLevel::Province, 1, &ads, &locs), 2);
        assert_eq!(count_location_subtree(LocationLevel::Ward, 8, &ads, &locs), 1);
        assert_eq!(count_location_subtree(LocationLevel::District, 9, &ads, &locs), 0);
    }
}
