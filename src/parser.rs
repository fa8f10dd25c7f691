use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use quick_xml::de::from_str;
use reqwest::{Client, Url};
use serde::Deserialize;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, warn};

use crate::{
    config::ArxivConfig,
    error::{PaperError, Result}
};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

// marks error entries the API returns in place of results.
const API_ERROR_MARKER: &str = "arxiv.org/api/errors";

#[derive(Debug)]
pub struct ArxivParser {
    config: ArxivConfig,
    endpoint: Url,
    client: Client
}

impl ArxivParser {
    pub fn new(config: ArxivConfig) -> Result<Self> {
        let endpoint = Url::parse(&config.base_url)
            .map_err(|e| PaperError::Endpoint {
                url: config.base_url.clone(),
                message: e.to_string()
            })?;
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()?;
        Ok(ArxivParser {
            config,
            endpoint,
            client
        })
    }

    fn create_query_url(&self, start: usize) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("search_query", &self.config.search_query())
            .append_pair("start", &start.to_string())
            .append_pair("max_results", &self.config.page_size.to_string())
            .append_pair("sortBy", "lastUpdatedDate")
            .append_pair("sortOrder", "descending");
        url
    }

    async fn get_raw_xml(&self, start: usize) -> Result<String> {
        let url = self.create_query_url(start);
        debug!(url = url.as_str(), "requesting arXiv page");
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(PaperError::Status {
                status: status.as_u16(),
                message: message.chars().take(200).collect()
            });
        }
        Ok(response.text().await?)
    }

    async fn fetch_page(&self, start: usize) -> Result<ArxivPage> {
        let xml = self.get_raw_xml(start).await?;
        parse_feed(&xml)
    }

    /// Lazily pages through every entry matching the configured query.
    pub fn results(&self) -> ArxivResults<'_> {
        ArxivResults {
            parser: self,
            buffer: VecDeque::new(),
            offset: 0,
            total: None,
            done: false,
            last_request: None
        }
    }
}

/// Pager over the search results. Pages are requested on demand, one at a
/// time, honoring the configured delay and retry count.
pub struct ArxivResults<'a> {
    parser: &'a ArxivParser,
    buffer: VecDeque<ArxivResult>,
    offset: usize,
    total: Option<usize>,
    done: bool,
    last_request: Option<Instant>
}

impl ArxivResults<'_> {
    pub async fn next(&mut self) -> Result<Option<ArxivResult>> {
        loop {
            if let Some(result) = self.buffer.pop_front() {
                return Ok(Some(result));
            }
            if self.done {
                return Ok(None);
            }
            self.fill().await?;
        }
    }

    async fn fill(&mut self) -> Result<()> {
        let page = self.fetch_with_retries().await?;
        let received = page.entries.len();
        if self.total.is_none() {
            self.total = page.total_results;
        }
        self.offset += received;
        debug!(offset = self.offset, total = ?self.total, received, "arXiv page fetched");
        self.buffer.extend(page.entries);
        self.done = match self.total {
            Some(total) => self.offset >= total || received == 0,
            None => received < self.parser.config.page_size
        };
        Ok(())
    }

    async fn fetch_with_retries(&mut self) -> Result<ArxivPage> {
        let mut attempt = 0;
        loop {
            self.wait_turn().await;
            let outcome = self.parser.fetch_page(self.offset).await
                .and_then(|page| self.check_page(page));
            match outcome {
                Ok(page) => return Ok(page),
                Err(e) if attempt < self.parser.config.num_retries => {
                    attempt += 1;
                    warn!(offset = self.offset, attempt, error = %e, "retrying arXiv page");
                }
                Err(e) => return Err(e)
            }
        }
    }

    // an empty page before the announced total is a transient API failure.
    fn check_page(&self, page: ArxivPage) -> Result<ArxivPage> {
        match self.total {
            Some(total) if page.entries.is_empty() && self.offset < total => {
                Err(PaperError::EmptyPage { offset: self.offset, total })
            }
            _ => Ok(page)
        }
    }

    async fn wait_turn(&mut self) {
        if let Some(last) = self.last_request {
            sleep_until(last + self.parser.config.delay).await;
        }
        self.last_request = Some(Instant::now());
    }
}

fn parse_feed(xml: &str) -> Result<ArxivPage> {
    let document: ArxivDocument = from_str(xml)?;
    let entries = document.entries.into_iter()
        .map(ArxivResult::from_entry)
        .collect::<Result<Vec<_>>>()?;
    Ok(ArxivPage {
        total_results: document.total_results,
        entries
    })
}

#[derive(Debug)]
struct ArxivPage {
    total_results: Option<usize>,
    entries: Vec<ArxivResult>
}

// Arxiv Data Model

/// One raw search hit, before normalization into a cached paper.
#[derive(Debug, Clone, PartialEq)]
pub struct ArxivResult {
    pub entry_id: String,
    pub title: String,
    pub summary: String,
    pub authors: Vec<String>,
    pub published: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub comment: Option<String>,
    pub links: Vec<String>
}

impl ArxivResult {
    fn from_entry(entry: ArxivEntry) -> Result<Self> {
        if entry.id.contains(API_ERROR_MARKER) {
            return Err(PaperError::Api(entry.summary.trim().to_string()));
        }
        Ok(ArxivResult {
            entry_id: entry.id.trim().to_string(),
            title: collapse_whitespace(&entry.title),
            summary: entry.summary.trim().to_string(),
            authors: entry.authors.into_iter()
                .map(|a| a.name.trim().to_string())
                .collect(),
            published: parse_timestamp(&entry.published)?,
            updated: parse_timestamp(&entry.updated)?,
            comment: entry.comment
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
            links: entry.links.into_iter()
                .map(|l| l.href)
                .filter(|href| !href.is_empty())
                .collect()
        })
    }
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|source| PaperError::Timestamp {
            value: value.to_string(),
            source
        })
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

// end Arxiv Data Model

// Arxiv Raw XML Model

#[derive(Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
struct ArxivDocument {
    #[serde(rename = "totalResults", alias = "opensearch:totalResults")]
    total_results: Option<usize>,
    #[serde(rename = "entry")]
    entries: Vec<ArxivEntry>
}

#[derive(Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
struct ArxivEntry {
    id: String,
    updated: String,
    published: String,
    title: String,
    summary: String,
    #[serde(rename = "author")]
    authors: Vec<AuthorField>,
    #[serde(alias = "arxiv:comment")]
    comment: Option<String>,
    #[serde(rename = "link")]
    links: Vec<LinkField>
}

#[derive(Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
struct AuthorField {
    name: String
}

#[derive(Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
struct LinkField {
    #[serde(rename = "@href")]
    href: String
}

// end Arxiv Raw XML Model
