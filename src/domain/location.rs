//! Administrative location tree: province → district → local level → ward → address.
//!
//! Ward ids are stored on ads. Addresses have no id of their own and are addressed
//! positionally inside their ward, see [`LocationKey::Address`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Province {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub districts: Vec<District>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct District {
    pub id: i64,
    pub name: String,
    #[serde(default, alias = "local_levels")]
    pub local_levels: Vec<LocalLevel>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalLevel {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: LocalLevelKind,
    #[serde(default)]
    pub wards: Vec<Ward>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocalLevelKind {
    Municipality,
    RuralMunicipality,
    #[default]
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ward {
    pub id: i64,
    #[serde(default, alias = "ward_number")]
    pub ward_number: i64,
    #[serde(default, alias = "local_addresses")]
    pub local_addresses: Vec<String>,
}

impl Ward {
    /// The ward key followed by one address key per local address.
    pub fn keys(&self) -> Vec<LocationKey> {
        std::iter::once(LocationKey::Ward(self.id))
            .chain(self.address_keys())
            .collect()
    }

    pub fn address_keys(&self) -> impl Iterator<Item = LocationKey> + '_ {
        (0..self.local_addresses.len()).map(|index| LocationKey::Address {
            ward_id: self.id,
            index,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationLevel {
    Province,
    District,
    LocalLevel,
    Ward,
}

/// One entry of the location selection set.
///
/// String form is `"{wardId}"` for a ward and `"{wardId}-{index}"` for an address,
/// which is also how it is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LocationKey {
    Ward(i64),
    Address { ward_id: i64, index: usize },
}

impl LocationKey {
    pub fn ward_id(&self) -> i64 {
        match *self {
            LocationKey::Ward(id) => id,
            LocationKey::Address { ward_id, .. } => ward_id,
        }
    }

    /// Does an ad stored at `location_id` / `address` fall under this key?
    pub fn matches(&self, location_id: Option<i64>, address: AddressIndex) -> bool {
        let Some(location_id) = location_id else {
            return false;
        };
        match *self {
            LocationKey::Ward(id) => location_id == id,
            LocationKey::Address { ward_id, index } => {
                location_id == ward_id && address.is_address(index)
            }
        }
    }
}

/// Address index stored on an ad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddressIndex {
    /// Absent or null. Records from before addresses existed; they count as address 0.
    #[default]
    Legacy,
    Index(i64),
    /// Present but not an integer. Matches no address, only the ward.
    Unreadable,
}

impl AddressIndex {
    pub fn is_address(self, index: usize) -> bool {
        match self {
            AddressIndex::Legacy => index == 0,
            AddressIndex::Index(stored) => usize::try_from(stored).is_ok_and(|s| s == index),
            AddressIndex::Unreadable => false,
        }
    }
}

impl From<Option<i64>> for AddressIndex {
    fn from(value: Option<i64>) -> Self {
        value.map_or(AddressIndex::Legacy, AddressIndex::Index)
    }
}

impl Serialize for AddressIndex {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            AddressIndex::Index(i) => serializer.serialize_some(i),
            AddressIndex::Legacy | AddressIndex::Unreadable => serializer.serialize_none(),
        }
    }
}

impl fmt::Display for LocationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationKey::Ward(id) => write!(f, "{}", id),
            LocationKey::Address { ward_id, index } => write!(f, "{}-{}", ward_id, index),
        }
    }
}

impl FromStr for LocationKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        // Split on the last '-' so a negative ward id still parses as a ward.
        match s.rsplit_once('-') {
            Some((ward, index)) if !ward.is_empty() => {
                let ward_id = ward
                    .parse()
                    .map_err(|_| format!("invalid ward id in location key '{}'", s))?;
                let index = index
                    .parse()
                    .map_err(|_| format!("invalid address index in location key '{}'", s))?;
                Ok(LocationKey::Address { ward_id, index })
            }
            _ => s
                .parse()
                .map(LocationKey::Ward)
                .map_err(|_| format!("invalid location key '{}'", s)),
        }
    }
}

impl TryFrom<String> for LocationKey {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<LocationKey> for String {
    fn from(key: LocationKey) -> Self {
        key.to_string()
    }
}

/// The fetched location tree (`{ "provinces": [...] }`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Locations {
    #[serde(default)]
    pub provinces: Vec<Province>,
}

impl Locations {
    pub fn new(provinces: Vec<Province>) -> Self {
        Self { provinces }
    }

    pub fn province(&self, id: i64) -> Option<&Province> {
        self.provinces.iter().find(|p| p.id == id)
    }

    pub fn districts(&self) -> impl Iterator<Item = &District> {
        self.provinces.iter().flat_map(|p| p.districts.iter())
    }

    pub fn local_levels(&self) -> impl Iterator<Item = &LocalLevel> {
        self.districts().flat_map(|d| d.local_levels.iter())
    }

    pub fn wards(&self) -> impl Iterator<Item = &Ward> {
        self.local_levels().flat_map(|l| l.wards.iter())
    }

    pub fn district(&self, id: i64) -> Option<&District> {
        self.districts().find(|d| d.id == id)
    }

    pub fn local_level(&self, id: i64) -> Option<&LocalLevel> {
        self.local_levels().find(|l| l.id == id)
    }

    pub fn ward(&self, id: i64) -> Option<&Ward> {
        self.wards().find(|w| w.id == id)
    }

    /// Wards under a node on the given level. `None` when the node does not exist.
    pub fn subtree_wards(&self, level: LocationLevel, id: i64) -> Option<Vec<&Ward>> {
        match level {
            LocationLevel::Province => self.province(id).map(|p| {
                p.districts
                    .iter()
                    .flat_map(|d| d.local_levels.iter())
                    .flat_map(|l| l.wards.iter())
                    .collect()
            }),
            LocationLevel::District => self.district(id).map(|d| {
                d.local_levels
                    .iter()
                    .flat_map(|l| l.wards.iter())
                    .collect()
            }),
            LocationLevel::LocalLevel => self.local_level(id).map(|l| l.wards.iter().collect()),
            LocationLevel::Ward => self.ward(id).map(|w| vec![w]),
        }
    }

    /// Ward and address keys under a node. `None` when the node does not exist.
    pub fn subtree_keys(&self, level: LocationLevel, id: i64) -> Option<Vec<LocationKey>> {
        self.subtree_wards(level, id)
            .map(|wards| wards.into_iter().flat_map(Ward::keys).collect())
    }

    /// Does a key still point at something in this tree?
    pub fn contains_key(&self, key: &LocationKey) -> bool {
        match *key {
            LocationKey::Ward(id) => self.ward(id).is_some(),
            LocationKey::Address { ward_id, index } => self
                .ward(ward_id)
                .is_some_and(|w| index < w.local_addresses.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_string_forms() {
        assert_eq!(LocationKey::Ward(7).to_string(), "7");
        assert_eq!(
            LocationKey::Address {
                ward_id: 7,
                index: 2
            }
            .to_string(),
            "7-2"
        );
        assert_eq!("7".parse::<LocationKey>(), Ok(LocationKey::Ward(7)));
        assert_eq!(
            "7-0".parse::<LocationKey>(),
            Ok(LocationKey::Address {
                ward_id: 7,
                index: 0
            })
        );
        assert!("7-x".parse::<LocationKey>().is_err());
        assert!("ward".parse::<LocationKey>().is_err());
    }

    #[test]
    fn test_key_serializes_as_string() {
        let keys = vec![
            LocationKey::Ward(3),
            LocationKey::Address {
                ward_id: 3,
                index: 1,
            },
        ];
        let json = serde_json::to_string(&keys).unwrap();
        assert_eq!(json, r#"["3","3-1"]"#);
        let back: Vec<LocationKey> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, keys);
    }

    #[test]
    fn test_legacy_record_matches_first_address_only() {
        let first = LocationKey::Address {
            ward_id: 7,
            index: 0,
        };
        let second = LocationKey::Address {
            ward_id: 7,
            index: 1,
        };
        assert!(LocationKey::Ward(7).matches(Some(7), AddressIndex::Legacy));
        assert!(first.matches(Some(7), AddressIndex::Legacy));
        assert!(!second.matches(Some(7), AddressIndex::Legacy));
        assert!(second.matches(Some(7), AddressIndex::Index(1)));
        assert!(!first.matches(None, AddressIndex::Index(0)));
    }

    #[test]
    fn test_unreadable_index_matches_ward_only() {
        let first = LocationKey::Address {
            ward_id: 7,
            index: 0,
        };
        assert!(LocationKey::Ward(7).matches(Some(7), AddressIndex::Unreadable));
        assert!(!first.matches(Some(7), AddressIndex::Unreadable));
        assert!(!first.matches(Some(7), AddressIndex::Index(-1)));
    }

    #[test]
    fn test_unknown_local_level_type_decodes() {
        let level: LocalLevel = serde_json::from_value(serde_json::json!({
            "id": 1, "name": "Somewhere", "type": "metropolitan", "wards": []
        }))
        .unwrap();
        assert_eq!(level.kind, LocalLevelKind::Other);
    }
}
