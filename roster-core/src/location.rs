//! Work locations. The index fixes the column block a location occupies on the grid.

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use crate::error::{RosterError, RosterResult};

#[derive(Debug, PartialEq, Eq, Hash)]
pub struct Location {
    pub name: &'static str,
    pub index: u32,
}

static CATALOG: [Location; 4] = [
    Location { name: "Ammergasse", index: 0 },
    Location { name: "Office", index: 1 },
    Location { name: "Marktgasse", index: 2 },
    Location { name: "Xtras", index: 3 },
];

static BY_NAME: LazyLock<HashMap<&'static str, &'static Location>> =
    LazyLock::new(|| CATALOG.iter().map(|l| (l.name, l)).collect());

impl Location {
    pub fn all() -> &'static [Location] {
        &CATALOG
    }

    pub fn by_index(index: u32) -> Option<&'static Location> {
        CATALOG.get(index as usize)
    }

    pub fn by_name(name: &str) -> Option<&'static Location> {
        BY_NAME.get(name).copied()
    }

    pub fn require(name: &str) -> RosterResult<&'static Location> {
        Location::by_name(name).ok_or_else(|| RosterError::UnknownLocation(name.to_string()))
    }

    /// Catalog locations ordered by name, the order slots compare in.
    pub fn by_name_order() -> Vec<&'static Location> {
        let mut locations: Vec<_> = CATALOG.iter().collect();
        locations.sort_by_key(|l| l.name);
        locations
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indices_follow_catalog_order() {
        for (i, location) in Location::all().iter().enumerate() {
            assert_eq!(location.index as usize, i);
            assert_eq!(Location::by_index(location.index), Some(location));
        }
        assert!(Location::by_index(4).is_none());
    }

    #[test]
    fn test_lookup_by_name() {
        assert_eq!(Location::by_name("Office").map(|l| l.index), Some(1));
        assert!(matches!(Location::require("Attic"), Err(RosterError::UnknownLocation(_))));
    }
}
