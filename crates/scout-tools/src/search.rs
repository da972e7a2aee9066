use crate::tool::{Tool, ToolDescriptor};
use scout_core::{ScoutResult, ToolCall, ToolResult};
use async_trait::async_trait;
use regex::Regex;
use std::time::Duration;
use tracing::info;

const MAX_RESPONSE_SIZE: usize = 2 * 1024 * 1024; // 2MB
const MAX_RESULTS: usize = 5;
const DEFAULT_ENDPOINT: &str = "https://html.duckduckgo.com/html/";

/// Web search tool backed by the DuckDuckGo HTML endpoint.
///
/// Free-text query in, free-text result digest out. No retries and no
/// rate limiting: upstream failures come back as error results for the
/// model to react to.
pub struct SearchTool {
    descriptor: ToolDescriptor,
    client: reqwest::Client,
    endpoint: String,
}

impl SearchTool {
    /// Creates the tool against the public DuckDuckGo endpoint.
    pub fn new() -> Self {
        Self::with_endpoint(DEFAULT_ENDPOINT)
    }

    /// Creates the tool against a custom endpoint (used by tests).
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        #[allow(clippy::expect_used)]
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(20))
            .redirect(reqwest::redirect::Policy::limited(3))
            .user_agent("scout-chat/0.3")
            .build()
            .expect("Failed to create HTTP client");

        Self {
            descriptor: ToolDescriptor {
                name: "Search".to_string(),
                description: "Search the web for current information. \
                              Use this for questions about recent events, facts you are \
                              unsure of, or anything requiring up-to-date data."
                    .to_string(),
                parameters_schema: serde_json::json!({
                    "type": "object",
                    "properties": {
                        "query": {
                            "type": "string",
                            "description": "The search query"
                        }
                    },
                    "required": ["query"]
                }),
            },
            client,
            endpoint: endpoint.into(),
        }
    }
}

impl Default for SearchTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for SearchTool {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    async fn invoke(&self, call: ToolCall) -> ScoutResult<ToolResult> {
        let query = call.arguments["query"]
            .as_str()
            .unwrap_or_default()
            .trim()
            .to_string();

        if query.is_empty() {
            return Ok(ToolResult::error(&call.id, "Empty search query"));
        }

        info!(query = %query, "Web search");

        let response = match self
            .client
            .get(&self.endpoint)
            .query(&[("q", query.as_str())])
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                return Ok(ToolResult::error(
                    &call.id,
                    format!("Search request failed: {e}"),
                ));
            }
        };

        let status = response.status();
        if !status.is_success() {
            return Ok(ToolResult::error(
                &call.id,
                format!("Search provider returned HTTP {status}"),
            ));
        }

        let body_bytes = match response.bytes().await {
            Ok(b) => b,
            Err(e) => {
                return Ok(ToolResult::error(
                    &call.id,
                    format!("Failed to read search response: {e}"),
                ));
            }
        };

        if body_bytes.len() > MAX_RESPONSE_SIZE {
            return Ok(ToolResult::error(
                &call.id,
                format!("Search response too large: {} bytes", body_bytes.len()),
            ));
        }

        let html = String::from_utf8_lossy(&body_bytes);
        let hits = parse_results(&html);

        if hits.is_empty() {
            return Ok(ToolResult::success(&call.id, "No results found."));
        }

        let digest = hits
            .iter()
            .take(MAX_RESULTS)
            .map(|h| format!("{}: {}", h.title, h.snippet))
            .collect::<Vec<_>>()
            .join("\n");

        Ok(ToolResult::success(&call.id, digest))
    }
}

/// One parsed search result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    /// Result title text.
    pub title: String,
    /// Result snippet text.
    pub snippet: String,
}

/// Extracts result titles and snippets from a DuckDuckGo HTML result page.
///
/// Titles and snippets appear as parallel anchor sequences; they are
/// paired by position. Missing snippets pair with an empty string.
pub fn parse_results(html: &str) -> Vec<SearchHit> {
    // Compiled per call; search pages are small and searches rare.
    #[allow(clippy::unwrap_used)]
    let title_re = Regex::new(r#"(?s)<a[^>]*class="result__a"[^>]*>(.*?)</a>"#).unwrap();
    #[allow(clippy::unwrap_used)]
    let snippet_re = Regex::new(r#"(?s)<a[^>]*class="result__snippet"[^>]*>(.*?)</a>"#).unwrap();

    let titles: Vec<String> = title_re
        .captures_iter(html)
        .map(|c| clean_fragment(&c[1]))
        .collect();
    let snippets: Vec<String> = snippet_re
        .captures_iter(html)
        .map(|c| clean_fragment(&c[1]))
        .collect();

    titles
        .into_iter()
        .enumerate()
        .map(|(i, title)| SearchHit {
            title,
            snippet: snippets.get(i).cloned().unwrap_or_default(),
        })
        .filter(|h| !h.title.is_empty())
        .collect()
}

/// Strips markup and decodes the handful of entities DuckDuckGo emits.
fn clean_fragment(fragment: &str) -> String {
    #[allow(clippy::unwrap_used)]
    let tag_re = Regex::new(r"<[^>]+>").unwrap();
    let text = tag_re.replace_all(fragment, "");
    text.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&nbsp;", " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
