use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::parser::ArxivResult;

/// Links whose URL contains this are dropped; they point back at the source itself.
pub const SOURCE_DOMAIN: &str = "arxiv";

/// Fixed-width, so string order is chronological order.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

static VERSION_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"v\d+$").expect("version suffix pattern is valid"));

// one normalized paper entry, as stored in the cache file.

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Paper {
    #[serde(rename = "entry_id")]
    pub id: String,
    pub title: String,
    pub authors: Vec<String>,
    pub published: String,
    pub updated: String,
    pub summary: String,
    pub comment: Option<String>,
    pub links: Vec<String>,
}

impl Paper {
    pub fn from_result(result: ArxivResult) -> Self {
        Paper {
            id: normalize_id(&result.entry_id),
            title: result.title,
            authors: result.authors,
            published: format_timestamp(&result.published),
            updated: format_timestamp(&result.updated),
            summary: result.summary,
            comment: result.comment,
            links: filter_links(result.links),
        }
    }

    /// Leading four characters of `published`.
    pub fn year(&self) -> &str {
        let end = self.published.char_indices()
            .nth(4)
            .map(|(idx, _)| idx)
            .unwrap_or(self.published.len());
        &self.published[..end]
    }
}

/// `https://arxiv.org/abs/1234.5678v3` -> `1234.5678`.
pub fn normalize_id(entry_id: &str) -> String {
    let tail = entry_id.trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(entry_id);
    VERSION_SUFFIX.replace(tail, "").into_owned()
}

pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

pub fn filter_links(links: Vec<String>) -> Vec<String> {
    links.into_iter()
        .filter(|link| !link.contains(SOURCE_DOMAIN))
        .collect()
}
