use chrono::{DateTime, Local};
use tracing::info;

use crate::{
    cache::PaperCache,
    chart,
    config::OutputConfig,
    error::Result,
    format::Formatter,
    merge::ChangeSet,
    model::Paper,
    storage::LocalSaver
};

/// Writes everything a run leaves behind: the cache file, the trend chart and
/// the Markdown listing. Each file is rewritten in full.
pub struct Reporter<'a> {
    output: &'a OutputConfig
}

impl<'a> Reporter<'a> {
    pub fn new(output: &'a OutputConfig) -> Self {
        Reporter {
            output
        }
    }

    pub fn report(&self, cache: &PaperCache, changed: &ChangeSet) -> Result<()> {
        let papers = cache.sorted();
        self.write_cache(&papers)?;
        self.write_chart(&papers)?;
        self.write_document(&papers, changed, &Local::now())?;
        Ok(())
    }

    pub fn write_cache(&self, papers: &[&Paper]) -> Result<()> {
        LocalSaver::save_jsonl(&self.output.cache_path, papers.iter().copied())?;
        info!(path = %self.output.cache_path.display(), papers = papers.len(), "cache written");
        Ok(())
    }

    pub fn write_chart(&self, papers: &[&Paper]) -> Result<()> {
        let counts = chart::count_by_year(papers.iter().copied());
        chart::draw_year_trend(&self.output.chart_path, &counts, &self.output.chart)?;
        info!(path = %self.output.chart_path.display(), years = counts.len(), "chart written");
        Ok(())
    }

    pub fn write_document(&self, papers: &[&Paper], changed: &ChangeSet, generated_at: &DateTime<Local>) -> Result<()> {
        let document = Formatter::to_document(self.output, generated_at, papers.iter().copied(), changed);
        LocalSaver::save_markdown(&self.output.document_path, &document)?;
        info!(path = %self.output.document_path.display(), "document written");
        Ok(())
    }
}
