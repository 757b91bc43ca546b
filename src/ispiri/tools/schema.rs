use std::collections::HashMap;

use crate::ispiri::tools::config::DuplicateLabelPolicy;
use crate::ispiri::tools::labels::normalize_labels;
use crate::ispiri::tools::model::Cell;

/// Ordered header labels read from a sheet's header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderSchema {
    labels: Vec<String>,
}

impl HeaderSchema {
    pub fn new(labels: Vec<String>) -> Self {
        Self { labels }
    }

    /// Reads labels from a header row; blank cells become empty labels.
    pub fn from_row(row: &[Cell]) -> Self {
        Self::new(row.iter().map(Cell::label).collect())
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Returns a copy with `.N` duplicate suffixes removed from every label.
    pub fn without_suffixes(&self) -> Self {
        Self::new(normalize_labels(&self.labels))
    }

    /// Builds the label → column index lookup. Empty labels are not indexed.
    pub fn index(&self, policy: DuplicateLabelPolicy) -> HashMap<&str, usize> {
        let mut index = HashMap::with_capacity(self.labels.len());
        for (position, label) in self.labels.iter().enumerate() {
            if label.is_empty() {
                continue;
            }
            match policy {
                DuplicateLabelPolicy::First => {
                    index.entry(label.as_str()).or_insert(position);
                }
                DuplicateLabelPolicy::Last => {
                    index.insert(label.as_str(), position);
                }
            }
        }
        index
    }

    /// Resolves every label of `self` to a source column of `source`.
    pub fn map_onto(&self, source: &HeaderSchema, policy: DuplicateLabelPolicy) -> ColumnMapping {
        let index = source.index(policy);
        let sources = self
            .labels
            .iter()
            .map(|label| {
                if label.is_empty() {
                    None
                } else {
                    index.get(label.as_str()).copied()
                }
            })
            .collect();
        ColumnMapping { sources }
    }
}

/// For each output column, the source column it is copied from, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    sources: Vec<Option<usize>>,
}

impl ColumnMapping {
    pub fn sources(&self) -> &[Option<usize>] {
        &self.sources
    }

    pub fn width(&self) -> usize {
        self.sources.len()
    }

    /// Number of output columns with no source.
    pub fn unmatched(&self) -> usize {
        self.sources.iter().filter(|source| source.is_none()).count()
    }

    /// Projects a source row onto the output layout. Unmapped or out-of-range
    /// columns yield [`Cell::Empty`].
    pub fn project(&self, row: &[Cell]) -> Vec<Cell> {
        self.sources
            .iter()
            .map(|source| {
                source
                    .and_then(|column| row.get(column))
                    .cloned()
                    .unwrap_or_default()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema(labels: &[&str]) -> HeaderSchema {
        HeaderSchema::new(labels.iter().map(|label| label.to_string()).collect())
    }

    #[test]
    fn repeated_base_labels_share_one_source() {
        let base = schema(&["Owner", "Status", "Owner"]);
        let target = schema(&["Status", "Owner"]);

        let mapping = base.map_onto(&target, DuplicateLabelPolicy::First);
        assert_eq!(mapping.sources(), &[Some(1), Some(0), Some(1)]);
    }

    #[test]
    fn duplicate_target_labels_follow_policy() {
        let base = schema(&["Owner"]);
        let target = schema(&["Owner", "Status", "Owner"]);

        let first = base.map_onto(&target, DuplicateLabelPolicy::First);
        let last = base.map_onto(&target, DuplicateLabelPolicy::Last);
        assert_eq!(first.sources(), &[Some(0)]);
        assert_eq!(last.sources(), &[Some(2)]);
    }

    #[test]
    fn empty_labels_never_match() {
        let base = schema(&["", "Status"]);
        let target = schema(&["", "Status"]);

        let mapping = base.map_onto(&target, DuplicateLabelPolicy::First);
        assert_eq!(mapping.sources(), &[None, Some(1)]);
        assert_eq!(mapping.unmatched(), 1);
    }

    #[test]
    fn project_fills_missing_and_short_rows_with_empty() {
        let base = schema(&["Date", "Name", "Status"]);
        let target = schema(&["Name", "Date"]);
        let mapping = base.map_onto(&target, DuplicateLabelPolicy::First);

        let row = vec![Cell::from("Alice")];
        assert_eq!(
            mapping.project(&row),
            vec![Cell::Empty, Cell::from("Alice"), Cell::Empty]
        );
    }
}
