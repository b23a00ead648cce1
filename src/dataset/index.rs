// Reverse lookup from compat key to feature record
//
// Built once from a Dataset and read-only afterwards. Every feature id and
// every one of its compat keys point at the same shared record.

use super::{BaselineStatus, Dataset};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Canonical feature record shared by all of its keys
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureRecord {
    pub feature_id: String,
    pub name: String,
    pub baseline_status: BaselineStatus,
}

#[derive(Debug, Default)]
pub struct DatasetIndex {
    by_key: HashMap<String, Arc<FeatureRecord>>,
    /// (lowercase key, key) for `api.` / `javascript.` keys, sorted by key
    fuzzy_keys: Vec<(String, String)>,
    /// One entry per indexed feature, sorted by feature id
    records: Vec<Arc<FeatureRecord>>,
}

impl DatasetIndex {
    /// Build the key -> record map. Cost is O(total compat keys).
    ///
    /// Key collisions across features are last-write-wins in feature id order;
    /// the dataset does not declare them as errors.
    pub fn build(dataset: &Dataset) -> Self {
        let mut by_key = HashMap::new();
        let mut records = Vec::new();

        for (feature_id, entry) in &dataset.features {
            let Some(status) = &entry.status else {
                debug!("Skipping feature '{}' without a baseline status", feature_id);
                continue;
            };

            let record = Arc::new(FeatureRecord {
                feature_id: feature_id.clone(),
                name: entry.name.clone().unwrap_or_else(|| feature_id.clone()),
                baseline_status: status.baseline,
            });

            by_key.insert(feature_id.clone(), Arc::clone(&record));
            for key in &entry.compat_features {
                by_key.insert(key.clone(), Arc::clone(&record));
            }
            records.push(record);
        }

        let mut fuzzy_keys: Vec<(String, String)> = by_key
            .keys()
            .filter(|key| key.starts_with("api.") || key.starts_with("javascript."))
            .map(|key| (key.to_lowercase(), key.clone()))
            .collect();
        fuzzy_keys.sort_by(|a, b| a.1.cmp(&b.1));

        debug!(
            "Built dataset index: {} features, {} keys",
            records.len(),
            by_key.len()
        );

        Self {
            by_key,
            fuzzy_keys,
            records,
        }
    }

    /// Exact key match only
    pub fn get(&self, key: &str) -> Option<&FeatureRecord> {
        self.by_key.get(key).map(|record| record.as_ref())
    }

    /// Case-insensitive substring search over `api.` / `javascript.` keys.
    ///
    /// When several keys contain the term the shortest wins, then the
    /// lexicographically smallest, so the result never depends on hash order.
    pub fn fuzzy_find(&self, term: &str) -> Option<(&str, &FeatureRecord)> {
        let needle = term.to_lowercase();
        if needle.is_empty() {
            return None;
        }

        self.fuzzy_keys
            .iter()
            .filter(|(lowered, _)| lowered.contains(&needle))
            .map(|(_, key)| key)
            .min_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)))
            .and_then(|key| self.get(key).map(|record| (key.as_str(), record)))
    }

    pub fn records(&self) -> impl Iterator<Item = &FeatureRecord> {
        self.records.iter().map(|record| record.as_ref())
    }

    pub fn feature_count(&self) -> usize {
        self.records.len()
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset(json: &str) -> Dataset {
        Dataset::from_json(json).unwrap()
    }

    #[test]
    fn test_id_and_compat_keys_resolve_to_same_record() {
        let index = DatasetIndex::build(&dataset(
            r#"{"features": {"grid": {"name": "Grid", "status": {"baseline": "high"},
                "compat_features": ["css.properties.display.grid", "css.properties.grid-area"]}}}"#,
        ));

        let by_id = index.get("grid").unwrap();
        let by_key = index.get("css.properties.grid-area").unwrap();
        assert_eq!(by_id, by_key);
        assert_eq!(by_key.feature_id, "grid");
        assert_eq!(index.len(), 3);
        assert_eq!(index.feature_count(), 1);
    }

    #[test]
    fn test_features_without_status_are_skipped() {
        let index = DatasetIndex::build(&dataset(
            r#"{"features": {"old": {"kind": "moved", "redirect_target": "new"},
                "new": {"name": "New", "status": {"baseline": false}, "compat_features": []}}}"#,
        ));

        assert!(index.get("old").is_none());
        assert_eq!(
            index.get("new").map(|record| record.baseline_status),
            Some(BaselineStatus::Limited)
        );
    }

    #[test]
    fn test_colliding_keys_are_last_write_wins() {
        let index = DatasetIndex::build(&dataset(
            r#"{"features": {
                "a-first": {"status": {"baseline": "high"}, "compat_features": ["api.Shared"]},
                "b-second": {"status": {"baseline": "low"}, "compat_features": ["api.Shared"]}}}"#,
        ));

        assert_eq!(index.get("api.Shared").unwrap().feature_id, "b-second");
    }

    #[test]
    fn test_lookup_is_exact_only() {
        let index = DatasetIndex::build(&Dataset::bundled().unwrap());
        assert!(index.get("css.properties.display.grid").is_some());
        assert!(index.get("css.properties.display.gri").is_none());
        assert!(index.get("CSS.PROPERTIES.DISPLAY.GRID").is_none());
    }

    #[test]
    fn test_fuzzy_find_prefers_shortest_then_sorted_key() {
        let index = DatasetIndex::build(&dataset(
            r#"{"features": {
                "long": {"status": {"baseline": "high"}, "compat_features": ["api.Widget.frobnicateAll"]},
                "short": {"status": {"baseline": "low"}, "compat_features": ["api.Widget.frobnicate"]},
                "css": {"status": {"baseline": "low"}, "compat_features": ["css.frobnicate"]}}}"#,
        ));

        let (key, record) = index.fuzzy_find("FROBNICATE").unwrap();
        assert_eq!(key, "api.Widget.frobnicate");
        assert_eq!(record.feature_id, "short");
        assert!(index.fuzzy_find("nothing-like-this").is_none());
    }
}
