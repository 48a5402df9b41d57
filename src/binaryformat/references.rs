//! Object id to record position mapping.
//!
//! Records never own or point at each other. Cross-record relations (`MemberReference`,
//! `ClassWithId`) carry object ids, and the [`ReferenceTable`] maps each id to the position of
//! the record that introduced it. Records decoded as class members live inside their parent,
//! so a position is the index of the top-level record plus the member path leading to the
//! nested record.

use std::collections::BTreeMap;

use crate::{Error, Result};

/// Position of a record inside a document.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RecordLocation {
    /// Index into the document's record sequence
    pub record_index: usize,
    /// Member indices leading from that record to a nested one; empty for top-level records
    pub path: Vec<usize>,
}

impl RecordLocation {
    /// Location of a top-level record.
    #[must_use]
    pub fn top_level(record_index: usize) -> Self {
        RecordLocation {
            record_index,
            path: Vec::new(),
        }
    }

    /// Returns true if the record is a direct element of the record sequence.
    #[must_use]
    pub fn is_top_level(&self) -> bool {
        self.path.is_empty()
    }
}

/// Mapping from object id to the location of its defining record.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReferenceTable {
    entries: BTreeMap<i32, RecordLocation>,
}

impl ReferenceTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        ReferenceTable::default()
    }

    /// Register `object_id` at `location`, returning the location it replaced, if any.
    pub fn register(&mut self, object_id: i32, location: RecordLocation) -> Option<RecordLocation> {
        self.entries.insert(object_id, location)
    }

    /// Index of the top-level record containing the definition of `object_id`.
    ///
    /// # Errors
    /// Returns [`Error::UnresolvedReference`] if the id was never registered.
    pub fn resolve(&self, object_id: i32) -> Result<usize> {
        self.locate(object_id).map(|location| location.record_index)
    }

    /// Full location of the record defining `object_id`.
    ///
    /// # Errors
    /// Returns [`Error::UnresolvedReference`] if the id was never registered.
    pub fn locate(&self, object_id: i32) -> Result<&RecordLocation> {
        self.entries
            .get(&object_id)
            .ok_or(Error::UnresolvedReference { object_id })
    }

    /// Returns true if `object_id` is registered.
    #[must_use]
    pub fn contains(&self, object_id: i32) -> bool {
        self.entries.contains_key(&object_id)
    }

    /// Number of registered ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no id is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All registrations, ordered by object id.
    pub fn iter(&self) -> impl Iterator<Item = (i32, &RecordLocation)> {
        self.entries.iter().map(|(id, location)| (*id, location))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_and_resolve() {
        let mut table = ReferenceTable::new();
        assert!(table.is_empty());

        assert!(table.register(1, RecordLocation::top_level(0)).is_none());
        assert!(table
            .register(
                10,
                RecordLocation {
                    record_index: 1,
                    path: vec![2, 0],
                },
            )
            .is_none());

        assert_eq!(table.len(), 2);
        assert_eq!(table.resolve(1).unwrap(), 0);
        assert_eq!(table.resolve(10).unwrap(), 1);
        assert_eq!(table.locate(10).unwrap().path, vec![2, 0]);
        assert!(!table.locate(10).unwrap().is_top_level());
        assert!(table.contains(10));

        let ids: Vec<i32> = table.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![1, 10]);
    }

    #[test]
    fn unresolved() {
        let table = ReferenceTable::new();
        assert!(matches!(
            table.resolve(42),
            Err(Error::UnresolvedReference { object_id: 42 })
        ));
    }

    #[test]
    fn duplicate_replaces() {
        let mut table = ReferenceTable::new();
        table.register(5, RecordLocation::top_level(1));
        let previous = table.register(5, RecordLocation::top_level(3));
        assert_eq!(previous, Some(RecordLocation::top_level(1)));
        assert_eq!(table.resolve(5).unwrap(), 3);
    }

    #[test]
    fn ids_are_signed() {
        let mut table = ReferenceTable::new();
        table.register(-1, RecordLocation::top_level(0));
        table.register(i32::MAX, RecordLocation::top_level(1));
        assert_eq!(table.resolve(-1).unwrap(), 0);
        assert_eq!(table.resolve(i32::MAX).unwrap(), 1);
        assert!(table.resolve(1).is_err());
    }
}
