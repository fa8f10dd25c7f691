use std::io;

use thiserror::Error;

/// Errors surfaced by the fetch, merge and report stages.
///
/// Cache-read failures never show up here: the loader swallows them and
/// starts from an empty cache.
#[derive(Debug, Error)]
pub enum PaperError {
    #[error("arXiv request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("arXiv returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("invalid arXiv endpoint {url:?}: {message}")]
    Endpoint { url: String, message: String },

    #[error("arXiv API error: {0}")]
    Api(String),

    #[error("failed to parse arXiv feed: {0}")]
    Feed(#[from] quick_xml::DeError),

    #[error("arXiv returned an empty page at offset {offset} of {total}")]
    EmptyPage { offset: usize, total: usize },

    #[error("invalid timestamp {value:?}: {source}")]
    Timestamp {
        value: String,
        source: chrono::ParseError,
    },

    #[error("failed to encode paper: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to draw chart: {0}")]
    Chart(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, PaperError>;
