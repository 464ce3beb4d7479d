use crate::dependency::DependencyRecord;
use std::collections::HashSet;

/// Ordered, de-duplicated dependency set
///
/// The first record seen for an identity key wins; later records with the
/// same `group:artifact` are dropped even when their version differs. One
/// accumulator is owned by a single migration run.
#[derive(Debug, Clone, Default)]
pub struct DependencyAccumulator {
    seen: HashSet<String>,
    records: Vec<DependencyRecord>,
}

impl DependencyAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the record was new
    pub fn insert(&mut self, record: DependencyRecord) -> bool {
        if self.seen.insert(record.identity_key()) {
            self.records.push(record);
            true
        } else {
            false
        }
    }

    /// Inserts every record in order, returning how many were new
    pub fn merge(&mut self, records: impl IntoIterator<Item = DependencyRecord>) -> usize {
        records
            .into_iter()
            .map(|r| self.insert(r))
            .filter(|added| *added)
            .count()
    }

    pub fn contains_key(&self, identity_key: &str) -> bool {
        self.seen.contains(identity_key)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[DependencyRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<DependencyRecord> {
        self.records
    }
}

impl FromIterator<DependencyRecord> for DependencyAccumulator {
    fn from_iter<I: IntoIterator<Item = DependencyRecord>>(iter: I) -> Self {
        let mut acc = Self::new();
        acc.merge(iter);
        acc
    }
}
