use std::collections::HashSet;

use tracing::debug;

use crate::{
    cache::PaperCache,
    model::Paper,
    parser::ArxivResult
};

/// Ids inserted or updated during the current run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ChangeSet(HashSet<String>);

impl ChangeSet {
    pub fn contains(&self, id: &str) -> bool {
        self.0.contains(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn record(&mut self, id: String) {
        self.0.insert(id);
    }
}

/// Folds fetched results into the cache.
///
/// A result is skipped when the cache already holds its id with the exact
/// same formatted `updated` string. Anything else, including a semantically
/// equal instant rendered differently, replaces the cached entry.
pub struct Merger<'a> {
    cache: &'a mut PaperCache,
    changed: ChangeSet
}

impl<'a> Merger<'a> {
    pub fn new(cache: &'a mut PaperCache) -> Self {
        Merger {
            cache,
            changed: ChangeSet::default()
        }
    }

    /// Returns whether the cache changed.
    pub fn merge(&mut self, result: ArxivResult) -> bool {
        self.merge_paper(Paper::from_result(result))
    }

    /// Same rule as [`Merger::merge`] for an already normalized paper.
    pub fn merge_paper(&mut self, paper: Paper) -> bool {
        if self.cache.get(&paper.id).is_some_and(|cached| cached.updated == paper.updated) {
            debug!(id = %paper.id, updated = %paper.updated, "unchanged");
            return false;
        }
        debug!(id = %paper.id, updated = %paper.updated, "merging");
        self.changed.record(paper.id.clone());
        self.cache.insert(paper);
        true
    }

    pub fn finish(self) -> ChangeSet {
        self.changed
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn merge_all(cache: &mut PaperCache, results: Vec<ArxivResult>) -> ChangeSet {
        let mut merger = Merger::new(cache);
        for result in results {
            merger.merge(result);
        }
        merger.finish()
    }

    fn result(entry_id: &str, day: u32) -> ArxivResult {
        ArxivResult {
            entry_id: entry_id.to_string(),
            title: String::from("Fresh title"),
            summary: String::from("Fresh abstract."),
            authors: vec![String::from("Grace Hopper")],
            published: Utc.with_ymd_and_hms(2023, 6, 1, 0, 0, 0).unwrap(),
            updated: Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap(),
            comment: None,
            links: vec![String::from("http://arxiv.org/abs/x")]
        }
    }

    fn cached(id: &str, updated: &str) -> Paper {
        Paper {
            id: id.to_string(),
            title: String::from("Stale title"),
            authors: vec![],
            published: String::from("2023-06-01 00:00:00"),
            updated: updated.to_string(),
            summary: String::new(),
            comment: None,
            links: vec![]
        }
    }

    #[test]
    fn test_newer_timestamp_overwrites() {
        let mut cache = PaperCache::from_papers(vec![cached("1234.5678", "2024-01-01 00:00:00")]);
        let changed = merge_all(&mut cache, vec![result("http://arxiv.org/abs/1234.5678v2", 2)]);

        assert!(changed.contains("1234.5678"));
        assert_eq!(changed.len(), 1);
        let paper = cache.get("1234.5678").unwrap();
        assert_eq!(paper.updated, "2024-01-02 00:00:00");
        assert_eq!(paper.title, "Fresh title");
        assert!(paper.links.is_empty());
    }

    #[test]
    fn test_identical_timestamp_is_skipped() {
        let mut cache = PaperCache::from_papers(vec![cached("1234.5678", "2024-01-01 00:00:00")]);
        let changed = merge_all(&mut cache, vec![result("http://arxiv.org/abs/1234.5678v1", 1)]);

        assert!(changed.is_empty());
        assert_eq!(cache.get("1234.5678").unwrap().title, "Stale title");
    }

    #[test]
    fn test_new_id_is_inserted() {
        let mut cache = PaperCache::new();
        let changed = merge_all(&mut cache, vec![
            result("http://arxiv.org/abs/1111.1111v1", 5),
            result("http://arxiv.org/abs/2222.2222v3", 4)
        ]);
        assert_eq!(changed.len(), 2);
        assert_eq!(cache.len(), 2);
        assert!(cache.contains("2222.2222"));
    }

    #[test]
    fn test_second_run_is_idempotent() {
        let batch = || vec![
            result("http://arxiv.org/abs/1111.1111v1", 5),
            result("http://arxiv.org/abs/2222.2222v3", 4)
        ];
        let mut cache = PaperCache::new();
        merge_all(&mut cache, batch());
        let snapshot = cache.iter().cloned().collect::<Vec<_>>();

        let changed = merge_all(&mut cache, batch());
        assert!(changed.is_empty());
        assert_eq!(cache.iter().cloned().collect::<Vec<_>>(), snapshot);
    }

    #[test]
    fn test_format_difference_counts_as_change() {
        let mut cache = PaperCache::from_papers(vec![cached("1234.5678", "2024-01-01T00:00:00")]);
        let changed = merge_all(&mut cache, vec![result("http://arxiv.org/abs/1234.5678v1", 1)]);
        assert!(changed.contains("1234.5678"));
    }

    #[test]
    fn test_merge_reports_whether_cache_changed() {
        let mut cache = PaperCache::from_papers(vec![cached("1234.5678", "2024-01-01 00:00:00")]);
        let mut merger = Merger::new(&mut cache);
        assert!(!merger.merge(result("http://arxiv.org/abs/1234.5678v1", 1)));
        assert!(merger.merge(result("http://arxiv.org/abs/1234.5678v2", 3)));
        assert!(!merger.merge(result("http://arxiv.org/abs/1234.5678v2", 3)));
        let changed = merger.finish();
        assert_eq!(changed.len(), 1);
        assert_eq!(cache.get("1234.5678").unwrap().updated, "2024-01-03 00:00:00");
    }
}
