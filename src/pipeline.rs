use tracing::info;

use crate::{
    cache::PaperCache,
    config::Config,
    error::Result,
    merge::Merger,
    parser::ArxivParser,
    report::Reporter
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub changed: usize,
    pub total: usize
}

/// Load the cache, fold in every search result, then write the cache,
/// chart and document. Fetch and write failures end the run; a bad cache
/// file does not.
pub async fn run(config: &Config) -> Result<RunSummary> {
    let mut cache = PaperCache::load(&config.output.cache_path);
    info!(papers = cache.len(), "cache loaded");

    let parser = ArxivParser::new(config.arxiv.clone())?;
    let mut results = parser.results();
    let mut merger = Merger::new(&mut cache);
    while let Some(result) = results.next().await? {
        merger.merge(result);
    }
    let changed = merger.finish();

    Reporter::new(&config.output).report(&cache, &changed)?;

    let summary = RunSummary {
        changed: changed.len(),
        total: cache.len()
    };
    info!("Found {} new papers. Total papers: {}", summary.changed, summary.total);
    Ok(summary)
}
