//! Per-run rejection of structurally duplicate parameter records.

use std::collections::HashSet;

use crate::record::ParameterRecord;

/// Remembers the canonical keys of every record accepted in the current run.
#[derive(Debug, Default)]
pub struct InstanceDeduplicator {
    seen: HashSet<String>,
}

impl InstanceDeduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget every record seen so far.
    pub fn reset(&mut self) {
        self.seen.clear();
    }

    /// Record `record` if it is new.
    ///
    /// Returns `false`, leaving the set untouched, when a record with the
    /// same canonical key was already added.
    pub fn try_add(&mut self, record: &ParameterRecord) -> bool {
        self.seen.insert(record.canonical_key())
    }

    pub fn contains(&self, record: &ParameterRecord) -> bool {
        self.seen.contains(&record.canonical_key())
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rejects_reordered_duplicate() {
        let mut dedup = InstanceDeduplicator::new();
        let first = ParameterRecord::new().with("a", 1).with("b", json!([1, 2]));
        let reordered = ParameterRecord::new().with("b", json!([1, 2])).with("a", 1);

        assert!(dedup.try_add(&first));
        assert!(!dedup.try_add(&reordered));
        assert_eq!(dedup.len(), 1);
        assert!(dedup.contains(&reordered));
    }

    #[test]
    fn test_distinct_values_accepted() {
        let mut dedup = InstanceDeduplicator::new();
        assert!(dedup.try_add(&ParameterRecord::new().with("n", 1)));
        assert!(dedup.try_add(&ParameterRecord::new().with("n", 2)));
        // Same digits but a string is not the number
        assert!(dedup.try_add(&ParameterRecord::new().with("n", "1")));
        assert_eq!(dedup.len(), 3);
    }

    #[test]
    fn test_reset_forgets_everything() {
        let mut dedup = InstanceDeduplicator::new();
        let record = ParameterRecord::new().with("s", "");
        assert!(dedup.try_add(&record));
        dedup.reset();
        assert!(dedup.is_empty());
        assert!(dedup.try_add(&record));
    }
}
