//! Location selection engine.
//!
//! Same group-toggle discipline as the category engine, over one key set. A ward
//! expands to its own key plus one key per local address; any ancestor expands to
//! every ward and address key below it.

use crate::domain::selection::{flip, group_toggle};
use crate::domain::{LocationKey, LocationLevel, LocationSelection, Locations};
use tracing::{debug, warn};

/// Group-toggle the whole subtree of a node. Returns false when the node is unknown.
pub fn toggle(
    locations: &Locations,
    selection: &mut LocationSelection,
    level: LocationLevel,
    id: i64,
) -> bool {
    let Some(keys) = locations.subtree_keys(level, id) else {
        warn!(?level, id, "toggle for unknown location ignored");
        return false;
    };
    if keys.is_empty() {
        debug!(?level, id, "location has no wards; nothing to toggle");
        return true;
    }
    let now = group_toggle(&mut selection.keys, &keys);
    debug!(?level, id, keys = keys.len(), selected = now, "location toggled");
    true
}

pub fn toggle_province(locations: &Locations, selection: &mut LocationSelection, id: i64) -> bool {
    toggle(locations, selection, LocationLevel::Province, id)
}

pub fn toggle_district(locations: &Locations, selection: &mut LocationSelection, id: i64) -> bool {
    toggle(locations, selection, LocationLevel::District, id)
}

pub fn toggle_local_level(
    locations: &Locations,
    selection: &mut LocationSelection,
    id: i64,
) -> bool {
    toggle(locations, selection, LocationLevel::LocalLevel, id)
}

pub fn toggle_ward(locations: &Locations, selection: &mut LocationSelection, id: i64) -> bool {
    toggle(locations, selection, LocationLevel::Ward, id)
}

/// Flip one address of a ward.
pub fn toggle_address(
    locations: &Locations,
    selection: &mut LocationSelection,
    ward_id: i64,
    index: usize,
) -> bool {
    let key = LocationKey::Address { ward_id, index };
    if !locations.contains_key(&key) {
        warn!(%key, "toggle for unknown local address ignored");
        return false;
    }
    let now = flip(&mut selection.keys, key);
    debug!(%key, selected = now, "local address toggled");
    true
}

/// Every ward key and address key under the node is selected.
/// Unknown nodes and nodes without wards are unchecked.
pub fn is_fully_selected(
    locations: &Locations,
    selection: &LocationSelection,
    level: LocationLevel,
    id: i64,
) -> bool {
    locations
        .subtree_keys(level, id)
        .is_some_and(|keys| !keys.is_empty() && keys.iter().all(|k| selection.contains(k)))
}

/// Some but not all keys under the node are selected.
pub fn is_partially_selected(
    locations: &Locations,
    selection: &LocationSelection,
    level: LocationLevel,
    id: i64,
) -> bool {
    let Some(keys) = locations.subtree_keys(level, id) else {
        return false;
    };
    let selected = keys.iter().filter(|k| selection.contains(k)).count();
    selected > 0 && selected < keys.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{District, LocalLevel, LocalLevelKind, Province, Ward};

    fn ward(id: i64, addresses: &[&str]) -> Ward {
        Ward {
            id,
            ward_number: id % 10,
            local_addresses: addresses.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Province 1 → district 1 → local level 1 with wards 7 (two addresses) and 8 (none);
    /// local level 2 has no wards.
    fn tree() -> Locations {
        Locations::new(vec![Province {
            id: 1,
            name: "Bagmati".into(),
            districts: vec![District {
                id: 1,
                name: "Lalitpur".into(),
                local_levels: vec![
                    LocalLevel {
                        id: 1,
                        name: "Lalitpur Metropolitan".into(),
                        kind: LocalLevelKind::Municipality,
                        wards: vec![ward(7, &["Jhamsikhel", "Sanepa"]), ward(8, &[])],
                    },
                    LocalLevel {
                        id: 2,
                        name: "Bagmati Rural".into(),
                        kind: LocalLevelKind::RuralMunicipality,
                        wards: vec![],
                    },
                ],
            }],
        }])
    }

    fn addr(ward_id: i64, index: usize) -> LocationKey {
        LocationKey::Address { ward_id, index }
    }

    #[test]
    fn test_ward_toggle_is_atomic_with_addresses() {
        let locs = tree();
        let mut sel = LocationSelection::default();
        assert!(toggle_ward(&locs, &mut sel, 7));
        assert!(sel.contains(&LocationKey::Ward(7)));
        assert!(sel.contains(&addr(7, 0)));
        assert!(sel.contains(&addr(7, 1)));
        assert_eq!(sel.keys.len(), 3);
        assert!(is_fully_selected(&locs, &sel, LocationLevel::Ward, 7));

        toggle_ward(&locs, &mut sel, 7);
        assert!(sel.is_empty());
    }

    #[test]
    fn test_partial_ward_toggle_selects_all() {
        let locs = tree();
        let mut sel = LocationSelection::default();
        toggle_address(&locs, &mut sel, 7, 1);
        assert!(is_partially_selected(&locs, &sel, LocationLevel::Ward, 7));
        toggle_ward(&locs, &mut sel, 7);
        assert_eq!(sel.keys.len(), 3);
    }

    #[test]
    fn test_province_expands_to_whole_subtree() {
        let locs = tree();
        let mut sel = LocationSelection::default();
        toggle_province(&locs, &mut sel, 1);
        assert_eq!(sel.keys.len(), 4);
        assert!(sel.contains(&LocationKey::Ward(8)));
        assert!(is_fully_selected(&locs, &sel, LocationLevel::District, 1));
        assert!(is_fully_selected(&locs, &sel, LocationLevel::LocalLevel, 1));

        toggle_district(&locs, &mut sel, 1);
        assert!(sel.is_empty());
    }

    #[test]
    fn test_double_toggle_restores_state() {
        let locs = tree();
        let mut sel = LocationSelection::default();
        toggle_address(&locs, &mut sel, 7, 0);
        let before = sel.clone();
        toggle_local_level(&locs, &mut sel, 1);
        toggle_local_level(&locs, &mut sel, 1);
        // From a partial state the first toggle selects everything, the second clears it.
        assert!(sel.is_empty());

        let mut sel = before.clone();
        toggle_ward(&locs, &mut sel, 8);
        toggle_ward(&locs, &mut sel, 8);
        assert_eq!(sel, before);
    }

    #[test]
    fn test_unknown_nodes_are_noops() {
        let locs = tree();
        let mut sel = LocationSelection::default();
        assert!(!toggle_ward(&locs, &mut sel, 99));
        assert!(!toggle_address(&locs, &mut sel, 7, 5));
        assert!(!toggle_province(&locs, &mut sel, 2));
        assert!(sel.is_empty());
    }

    #[test]
    fn test_empty_local_level_is_never_checked() {
        let locs = tree();
        let mut sel = LocationSelection::default();
        assert!(toggle_local_level(&locs, &mut sel, 2));
        assert!(sel.is_empty());
        assert!(!is_fully_selected(&locs, &sel, LocationLevel::LocalLevel, 2));
    }
}
