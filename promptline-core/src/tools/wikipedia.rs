//! Encyclopedia lookup tool backed by the Wikipedia APIs

use super::{required_str, Tool, ToolError, ToolOutcome};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

/// Public English Wikipedia
pub const DEFAULT_WIKIPEDIA_URL: &str = "https://en.wikipedia.org";

const SUMMARY_SENTENCES: usize = 3;
const MAX_OPTIONS: usize = 5;

#[derive(Debug, Error)]
enum LookupError {
    #[error("{0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("base URL cannot carry a path: {0}")]
    BaseUrl(String),
    #[error("HTTP {status} from {endpoint}")]
    Status { status: StatusCode, endpoint: String },
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    query: Option<SearchQuery>,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    search: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    title: String,
}

#[derive(Debug, Deserialize)]
struct PageSummary {
    #[serde(rename = "type", default)]
    page_type: String,
    #[serde(default)]
    extract: String,
}

#[derive(Debug, Deserialize)]
struct ParseResponse {
    #[serde(default)]
    parse: Option<ParsedPage>,
}

#[derive(Debug, Deserialize)]
struct ParsedPage {
    #[serde(default)]
    wikitext: String,
}

static WIKILINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[([^\]|#]+)(?:#[^\]|]*)?(?:\|[^\]]*)?\]\]").unwrap());

/// Looks a topic up on Wikipedia and answers with the first sentences of
/// its summary
#[derive(Debug, Clone)]
pub struct WikipediaSearch {
    client: Client,
    base_url: String,
}

impl WikipediaSearch {
    pub fn new(client: Client) -> Self {
        Self::with_base_url(client, DEFAULT_WIKIPEDIA_URL)
    }

    /// Point the tool at another MediaWiki installation
    pub fn with_base_url(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, LookupError> {
        let mut url = Url::parse(&self.base_url)?;
        url.path_segments_mut()
            .map_err(|_| LookupError::BaseUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<Option<T>, LookupError> {
        let endpoint = url.path().to_string();
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(LookupError::Status { status, endpoint });
        }
        Ok(Some(response.json::<T>().await?))
    }

    async fn best_title(&self, query: &str) -> Result<Option<String>, LookupError> {
        let mut url = self.endpoint(&["w", "api.php"])?;
        url.query_pairs_mut()
            .append_pair("action", "query")
            .append_pair("list", "search")
            .append_pair("srsearch", query)
            .append_pair("srlimit", "1")
            .append_pair("format", "json");

        let response: Option<SearchResponse> = self.get_json(url).await?;
        Ok(response
            .and_then(|r| r.query)
            .and_then(|q| q.search.into_iter().next())
            .map(|hit| hit.title))
    }

    async fn summary(&self, title: &str) -> Result<Option<PageSummary>, LookupError> {
        let page = title.replace(' ', "_");
        let url = self.endpoint(&["api", "rest_v1", "page", "summary", &page])?;
        self.get_json(url).await
    }

    /// Entries of a disambiguation page, in page order
    async fn disambiguation_options(&self, title: &str) -> Result<Vec<String>, LookupError> {
        let mut url = self.endpoint(&["w", "api.php"])?;
        url.query_pairs_mut()
            .append_pair("action", "parse")
            .append_pair("page", title)
            .append_pair("prop", "wikitext")
            .append_pair("formatversion", "2")
            .append_pair("format", "json");

        let response: Option<ParseResponse> = self.get_json(url).await?;
        let wikitext = response.and_then(|r| r.parse).map(|p| p.wikitext).unwrap_or_default();
        Ok(list_entry_titles(&wikitext, MAX_OPTIONS))
    }

    async fn lookup(&self, query: &str) -> Result<ToolOutcome, LookupError> {
        let not_found = || ToolOutcome::NotFound {
            query: query.to_string(),
        };

        let Some(title) = self.best_title(query).await? else {
            return Ok(not_found());
        };
        debug!(query, %title, "resolved wikipedia title");

        let Some(summary) = self.summary(&title).await? else {
            return Ok(not_found());
        };

        if summary.page_type == "disambiguation" {
            let options = self.disambiguation_options(&title).await?;
            return Ok(ToolOutcome::Disambiguation {
                query: query.to_string(),
                options,
            });
        }

        if summary.extract.trim().is_empty() {
            return Ok(not_found());
        }
        Ok(ToolOutcome::success(first_sentences(&summary.extract, SUMMARY_SENTENCES)))
    }
}

#[async_trait]
impl Tool for WikipediaSearch {
    fn name(&self) -> &str {
        "search_wikipedia"
    }

    fn description(&self) -> &str {
        "Search Wikipedia for information about a topic. Use this when you need to find factual information about people, places, or things."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The topic to look up"
                }
            },
            "required": ["query"]
        })
    }

    async fn invoke(&self, arguments: Value) -> Result<ToolOutcome, ToolError> {
        let query = required_str(self.name(), &arguments, "query")?.trim();

        match self.lookup(query).await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                warn!(query, error = %e, "wikipedia lookup failed");
                Ok(ToolOutcome::failed(format!("Error searching Wikipedia: {}", e)))
            }
        }
    }
}

/// Target of the first article link on each bulleted line.
///
/// Intro prose and "See also" links carry no bullet, so only list entries
/// count. Namespaced targets (`File:`, `Category:`) are skipped.
fn list_entry_titles(wikitext: &str, limit: usize) -> Vec<String> {
    let mut titles: Vec<String> = Vec::new();
    for line in wikitext.lines().map(str::trim_start) {
        if !line.starts_with('*') {
            continue;
        }
        let target = WIKILINK
            .captures_iter(line)
            .map(|cap| cap[1].trim().to_string())
            .find(|target| !target.is_empty() && !target.contains(':'));
        if let Some(target) = target {
            if !titles.contains(&target) {
                titles.push(target);
                if titles.len() == limit {
                    break;
                }
            }
        }
    }
    titles
}

/// The first `count` sentences of `text`
fn first_sentences(text: &str, count: usize) -> String {
    let text = text.trim();
    let mut seen = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if matches!(c, '.' | '!' | '?') {
            let at_boundary = chars.peek().map_or(true, |(_, next)| next.is_whitespace());
            if at_boundary {
                seen += 1;
                if seen == count {
                    return text[..i + c.len_utf8()].to_string();
                }
            }
        }
    }
    text.to_string()
}
