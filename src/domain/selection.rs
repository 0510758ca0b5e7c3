//! Selection state value objects.
//!
//! Item ids and location keys decide what is checked. The domain and field sets
//! are advisory: the selection engine keeps them in step with their descendants.

use super::location::{AddressIndex, LocationKey};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySelection {
    #[serde(default)]
    pub domains: BTreeSet<i64>,
    #[serde(default)]
    pub fields: BTreeSet<i64>,
    #[serde(default)]
    pub items: BTreeSet<i64>,
}

impl CategorySelection {
    pub fn is_empty(&self) -> bool {
        self.domains.is_empty() && self.fields.is_empty() && self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.domains.clear();
        self.fields.clear();
        self.items.clear();
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationSelection {
    pub keys: BTreeSet<LocationKey>,
}

impl LocationSelection {
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn contains(&self, key: &LocationKey) -> bool {
        self.keys.contains(key)
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    /// Does the ad location match at least one selected key?
    pub fn matches(&self, location_id: Option<i64>, address: AddressIndex) -> bool {
        self.keys
            .iter()
            .any(|k| k.matches(location_id, address))
    }
}

/// Insert every key when the group is not fully present, otherwise remove every key.
/// Returns the new state of the group.
pub(crate) fn group_toggle<T: Ord + Clone>(set: &mut BTreeSet<T>, group: &[T]) -> bool {
    let all_selected = group.iter().all(|k| set.contains(k));
    if all_selected {
        for k in group {
            set.remove(k);
        }
    } else {
        set.extend(group.iter().cloned());
    }
    !all_selected
}

/// Flip one member. Returns whether it is now present.
pub(crate) fn flip<T: Ord>(set: &mut BTreeSet<T>, value: T) -> bool {
    if set.remove(&value) {
        false
    } else {
        set.insert(value);
        true
    }
}
