use std::{path::PathBuf, time::Duration};

const ARXIV_API_URL: &str = "https://export.arxiv.org/api/query";

const CACHE_FILE: &str = "arxiv_visual_reasoning.jsonl";
const CHART_FILE: &str = "arxiv_trends_year.png";
const DOCUMENT_FILE: &str = "arxiv_visual_reasoning.md";
const GENERATOR_LINK: &str = "./src/bin/update_arxiv.rs";

/// Phrases matched anywhere in an entry. Joined into one disjunctive query.
pub const SEARCH_PHRASES: [&str; 5] = [
    "visual reasoning",
    "visual abductive reasoning",
    "visual abstract reasoning",
    "visual commonsense reasoning",
    "visual spatial reasoning",
];

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub arxiv: ArxivConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone)]
pub struct ArxivConfig {
    pub base_url: String,
    pub phrases: Vec<String>,
    pub page_size: usize,
    /// Minimum gap between two consecutive requests.
    pub delay: Duration,
    /// Extra attempts per page after the first one fails.
    pub num_retries: u32,
    pub timeout: Duration,
}

impl Default for ArxivConfig {
    fn default() -> Self {
        ArxivConfig {
            base_url: String::from(ARXIV_API_URL),
            phrases: SEARCH_PHRASES.iter().map(|p| p.to_string()).collect(),
            page_size: 1000,
            delay: Duration::from_secs(3),
            num_retries: 3,
            timeout: Duration::from_secs(60),
        }
    }
}

impl ArxivConfig {
    pub fn new(base_url: &str, phrases: Vec<String>, page_size: usize, delay: Duration, num_retries: u32) -> Self {
        ArxivConfig {
            base_url: base_url.to_string(),
            phrases,
            page_size,
            delay,
            num_retries,
            ..Self::default()
        }
    }

    /// `all:"a" OR all:"b" ...`, left unencoded.
    pub fn search_query(&self) -> String {
        self.phrases.iter()
            .map(|phrase| format!("all:\"{}\"", phrase))
            .collect::<Vec<_>>()
            .join(" OR ")
    }
}

#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub cache_path: PathBuf,
    pub chart_path: PathBuf,
    pub document_path: PathBuf,
    pub generator_link: String,
    pub chart: ChartConfig,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            cache_path: PathBuf::from(CACHE_FILE),
            chart_path: PathBuf::from(CHART_FILE),
            document_path: PathBuf::from(DOCUMENT_FILE),
            generator_link: String::from(GENERATOR_LINK),
            chart: ChartConfig::default(),
        }
    }
}

impl OutputConfig {
    /// Same file names, rooted at `dir`.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        OutputConfig {
            cache_path: dir.join(CACHE_FILE),
            chart_path: dir.join(CHART_FILE),
            document_path: dir.join(DOCUMENT_FILE),
            ..Self::default()
        }
    }

    /// Image reference used inside the document, relative to it.
    pub fn chart_reference(&self) -> String {
        let name = self.chart_path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| CHART_FILE.to_string());
        format!("./{}", name)
    }
}

/// Sizes are given the way a print figure is: inches, points and dots per inch.
#[derive(Debug, Clone)]
pub struct ChartConfig {
    pub dpi: u32,
    pub width_inches: f64,
    pub height_inches: f64,
    pub pad_inches: f64,
    pub label_font_pt: f64,
    pub tick_font_pt: f64,
    pub font_family: String,
    pub marker_size_pt: f64,
    pub line_width_pt: f64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        ChartConfig {
            dpi: 300,
            width_inches: 6.4,
            height_inches: 4.8,
            pad_inches: 0.1,
            label_font_pt: 14.0,
            tick_font_pt: 12.0,
            font_family: String::from("sans-serif"),
            marker_size_pt: 6.0,
            line_width_pt: 1.5,
        }
    }
}

impl ChartConfig {
    pub fn pixels(&self, points: f64) -> u32 {
        (points * self.dpi as f64 / 72.0).round() as u32
    }

    pub fn size(&self) -> (u32, u32) {
        let dpi = self.dpi as f64;
        ((self.width_inches * dpi).round() as u32, (self.height_inches * dpi).round() as u32)
    }

    pub fn padding(&self) -> u32 {
        (self.pad_inches * self.dpi as f64).round() as u32
    }
}
