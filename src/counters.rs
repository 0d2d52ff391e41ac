//! Per-table row counters.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::tables::Table;

/// Rows written so far, one counter per [`Table`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counters {
    counts: [u64; Table::COUNT],
}

impl Counters {
    /// Creates a zeroed counter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one to a table's counter.
    pub fn increment(&mut self, table: Table) {
        self.counts[table.index()] += 1;
    }

    /// Current count for a table.
    pub fn get(&self, table: Table) -> u64 {
        self.counts[table.index()]
    }

    /// Iterates over (table, count) pairs in registry order.
    pub fn iter(&self) -> impl Iterator<Item = (Table, u64)> + '_ {
        Table::ALL.iter().map(move |&t| (t, self.get(t)))
    }
}

impl Serialize for Counters {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Table::COUNT))?;
        for (table, count) in self.iter() {
            map.serialize_entry(table.name(), &count)?;
        }
        map.end()
    }
}
