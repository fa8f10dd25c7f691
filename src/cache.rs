use std::{collections::HashMap, path::Path};

use tracing::debug;

use crate::{
    error::Result,
    model::Paper,
    storage::LocalSaver
};

/// Papers keyed by normalized id, kept in insertion order.
///
/// Replacing an entry keeps its original position, which is what the stable
/// sort in [`PaperCache::sorted`] falls back on for equal `updated` values.
#[derive(Debug, Default, Clone)]
pub struct PaperCache {
    papers: Vec<Paper>,
    index: HashMap<String, usize>
}

impl PaperCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the cache file, or starts empty when it is missing or unreadable.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::new();
        }
        match LocalSaver::load_jsonl(path) {
            Ok(papers) => Self::from_papers(papers),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "ignoring unreadable cache");
                Self::new()
            }
        }
    }

    pub fn from_papers(papers: impl IntoIterator<Item = Paper>) -> Self {
        let mut cache = Self::new();
        for paper in papers {
            cache.insert(paper);
        }
        cache
    }

    pub fn get(&self, id: &str) -> Option<&Paper> {
        self.index.get(id).map(|&idx| &self.papers[idx])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Inserts or overwrites the entry under `paper.id`.
    pub fn insert(&mut self, paper: Paper) {
        match self.index.get(&paper.id) {
            Some(&idx) => self.papers[idx] = paper,
            None => {
                self.index.insert(paper.id.clone(), self.papers.len());
                self.papers.push(paper);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.papers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.papers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Paper> {
        self.papers.iter()
    }

    /// Newest `updated` first; ties keep insertion order.
    pub fn sorted(&self) -> Vec<&Paper> {
        let mut papers = self.papers.iter().collect::<Vec<_>>();
        papers.sort_by(|a, b| b.updated.cmp(&a.updated));
        papers
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        LocalSaver::save_jsonl(path, self.sorted())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    fn paper(id: &str, updated: &str) -> Paper {
        Paper {
            id: id.to_string(),
            title: format!("Paper {}", id),
            authors: vec![],
            published: String::from("2023-01-01 00:00:00"),
            updated: updated.to_string(),
            summary: String::new(),
            comment: None,
            links: vec![]
        }
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let cache = PaperCache::load(&dir.path().join("nope.jsonl"));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_malformed_file_is_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cache.jsonl");
        let good = serde_json::to_string(&paper("1", "2024-01-01 00:00:00")).unwrap();
        fs::write(&path, format!("{}\nnot json at all\n", good)).unwrap();
        assert!(PaperCache::load(&path).is_empty());
    }

    #[test]
    fn test_unreadable_path_is_empty() {
        let dir = tempdir().unwrap();
        assert!(PaperCache::load(dir.path()).is_empty());
    }

    #[test]
    fn test_duplicate_ids_keep_first_position() {
        let cache = PaperCache::from_papers(vec![
            paper("a", "2024-01-01 00:00:00"),
            paper("b", "2024-01-01 00:00:00"),
            paper("a", "2024-01-01 00:00:00")
        ]);
        assert_eq!(cache.len(), 2);
        let ids = cache.iter().map(|p| p.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_sorted_descending_by_updated() {
        let cache = PaperCache::from_papers(vec![
            paper("march", "2024-03-01 00:00:00"),
            paper("old", "2023-01-01 00:00:00"),
            paper("january", "2024-01-01 00:00:00")
        ]);
        let ids = cache.sorted().iter().map(|p| p.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["march", "january", "old"]);
    }

    #[test]
    fn test_sorted_ties_keep_insertion_order() {
        let mut cache = PaperCache::from_papers(vec![
            paper("x", "2024-01-01 00:00:00"),
            paper("y", "2024-01-01 00:00:00"),
            paper("z", "2024-01-01 00:00:00")
        ]);
        cache.insert(paper("x", "2024-01-01 00:00:00"));
        let ids = cache.sorted().iter().map(|p| p.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["x", "y", "z"]);
    }

    #[test]
    fn test_save_writes_sorted() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cache.jsonl");
        let cache = PaperCache::from_papers(vec![
            paper("old", "2023-01-01 00:00:00"),
            paper("new", "2024-03-01 00:00:00")
        ]);
        cache.save(&path).unwrap();

        let reloaded = PaperCache::load(&path);
        let ids = reloaded.iter().map(|p| p.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["new", "old"]);
    }
}
