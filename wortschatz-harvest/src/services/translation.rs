//! Wiktionary translation lookup
//!
//! German→English translation candidates for a lemma, scraped from the
//! Wiktionary API. Lookups are rate limited and retried with exponential
//! backoff on transient network failures; a lookup that ultimately fails
//! degrades to "no translation available" at the provider seam, never to a
//! fatal error.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

const WIKTIONARY_API_URL: &str = "https://en.wiktionary.org/w/api.php";
const USER_AGENT: &str = "wortschatz/0.1.0 (vocabulary harvester)";
const RATE_LIMIT_MS: u64 = 500; // be polite to the API between lookups
const REQUEST_TIMEOUT_SECS: u64 = 10;
const MAX_RETRIES: u32 = 3;

/// Translation lookup errors
#[derive(Debug, Error)]
pub enum TranslationError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Word not found: {0}")]
    WordNotFound(String),

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

impl TranslationError {
    /// Transient failures are worth retrying; the rest fail immediately
    fn is_transient(&self) -> bool {
        match self {
            TranslationError::NetworkError(_) => true,
            TranslationError::ApiError(status, _) => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// Translation collaborator contract.
///
/// Returns the translation to store with a staged candidate, or None when
/// lookup failed or produced nothing — the pipeline continues either way.
#[async_trait]
pub trait TranslationProvider: Send + Sync {
    async fn translate(&self, lemma: &str, pos: Option<&str>) -> Option<String>;
}

/// Inter-request rate limiter
struct RateLimiter {
    last_request: Mutex<Option<Instant>>,
    min_interval: Duration,
}

impl RateLimiter {
    fn new(min_interval_ms: u64) -> Self {
        Self {
            last_request: Mutex::new(None),
            min_interval: Duration::from_millis(min_interval_ms),
        }
    }

    /// Wait if necessary to comply with the rate limit
    async fn wait(&self) {
        let mut last = self.last_request.lock().await;

        if let Some(last_time) = *last {
            let elapsed = last_time.elapsed();
            if elapsed < self.min_interval {
                let wait_time = self.min_interval - elapsed;
                debug!("Rate limiting: waiting {:?}", wait_time);
                tokio::time::sleep(wait_time).await;
            }
        }

        *last = Some(Instant::now());
    }
}

/// Wiktionary API client
pub struct WiktionaryClient {
    http_client: reqwest::Client,
    rate_limiter: Arc<RateLimiter>,
}

impl WiktionaryClient {
    pub fn new() -> Result<Self, TranslationError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| TranslationError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            rate_limiter: Arc::new(RateLimiter::new(RATE_LIMIT_MS)),
        })
    }

    /// Look up translation candidates for a lemma.
    ///
    /// Up to `MAX_RETRIES` attempts with exponential backoff on transient
    /// failures.
    pub async fn lookup(&self, lemma: &str) -> Result<Vec<String>, TranslationError> {
        let lemma = lemma.trim().to_lowercase();
        if lemma.is_empty() {
            return Ok(Vec::new());
        }

        self.rate_limiter.wait().await;

        let mut last_error = TranslationError::NetworkError("no attempt made".to_string());

        for attempt in 1..=MAX_RETRIES {
            match self.fetch_page_content(&lemma).await {
                Ok(content) => {
                    let translations = extract_translations(&content);
                    if !translations.is_empty() {
                        info!(
                            lemma = %lemma,
                            count = translations.len(),
                            "found translations"
                        );
                    }
                    return Ok(translations);
                }
                Err(err) if err.is_transient() && attempt < MAX_RETRIES => {
                    let backoff = Duration::from_secs(1 << (attempt - 1));
                    warn!(
                        lemma = %lemma,
                        attempt,
                        error = %err,
                        "translation lookup failed, retrying after {:?}",
                        backoff
                    );
                    tokio::time::sleep(backoff).await;
                    last_error = err;
                }
                Err(err) => return Err(err),
            }
        }

        Err(last_error)
    }

    /// One API request returning the raw wikitext of the lemma's page
    async fn fetch_page_content(&self, lemma: &str) -> Result<String, TranslationError> {
        let response = self
            .http_client
            .get(WIKTIONARY_API_URL)
            .query(&[
                ("action", "query"),
                ("format", "json"),
                ("titles", lemma),
                ("prop", "revisions"),
                ("rvprop", "content"),
                ("rvslots", "main"),
            ])
            .send()
            .await
            .map_err(|e| TranslationError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TranslationError::ApiError(status.as_u16(), body));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| TranslationError::ParseError(e.to_string()))?;

        let pages = payload
            .get("query")
            .and_then(|q| q.get("pages"))
            .and_then(|p| p.as_object())
            .ok_or_else(|| TranslationError::ParseError("no page data in response".to_string()))?;

        let page = pages
            .values()
            .next()
            .ok_or_else(|| TranslationError::ParseError("empty page set".to_string()))?;

        if page.get("missing").is_some() {
            return Err(TranslationError::WordNotFound(lemma.to_string()));
        }

        page.get("revisions")
            .and_then(|r| r.get(0))
            .and_then(|rev| rev.get("slots"))
            .and_then(|s| s.get("main"))
            .and_then(|m| m.get("*"))
            .and_then(|c| c.as_str())
            .map(str::to_string)
            .ok_or_else(|| TranslationError::ParseError("no revision content".to_string()))
    }
}

#[async_trait]
impl TranslationProvider for WiktionaryClient {
    async fn translate(&self, lemma: &str, pos: Option<&str>) -> Option<String> {
        match self.lookup(lemma).await {
            Ok(translations) if !translations.is_empty() => {
                Some(translations.into_iter().take(3).collect::<Vec<_>>().join(", "))
            }
            Ok(_) => {
                debug!(lemma = %lemma, pos = ?pos, "no translations found");
                None
            }
            Err(err) => {
                warn!(lemma = %lemma, pos = ?pos, error = %err, "translation unavailable");
                None
            }
        }
    }
}

/// Extract English translation candidates from raw wikitext.
///
/// Three passes, first hit wins: the English entry's Translations section
/// ("German:" rows), the German entry's definition lines, and finally any
/// short wiki links on the page.
fn extract_translations(content: &str) -> Vec<String> {
    let mut translations = Vec::new();

    // Pass 1: ==English== → ===Translations=== → "German:" rows
    let mut in_english = false;
    let mut in_translations = false;
    for line in content.lines() {
        let line = line.trim();

        if heading_level(line) == 2 {
            in_english = heading_title(line) == "English";
            in_translations = false;
            continue;
        }
        if in_english && heading_level(line) >= 3 {
            in_translations = heading_title(line) == "Translations";
            continue;
        }

        if in_translations {
            for marker in ["German:", "german:"] {
                if let Some((_, tail)) = line.split_once(marker) {
                    translations.extend(wiki_links(tail));
                    break;
                }
            }
        }
    }

    // Pass 2: ==German== definition lines ("# ...")
    if translations.is_empty() {
        let mut in_german = false;
        for line in content.lines() {
            let line = line.trim();

            if heading_level(line) == 2 {
                in_german = heading_title(line) == "German";
                continue;
            }

            if in_german && line.starts_with('#') && !line.starts_with("##") {
                let definition = strip_templates(&line[1..].replace("[[", "").replace("]]", ""));
                for part in definition.split([',', ';']).take(3) {
                    let part = part.trim();
                    if !part.is_empty() && part.split_whitespace().count() <= 2 {
                        translations.push(part.to_string());
                    }
                }
            }
        }
    }

    // Pass 3: any short link on the page
    if translations.is_empty() {
        translations.extend(
            wiki_links(content)
                .into_iter()
                .filter(|link| link.split_whitespace().count() <= 2)
                .take(5),
        );
    }

    tidy(translations)
}

/// Heading level of a wikitext line, 0 when the line is not a heading
fn heading_level(line: &str) -> usize {
    let leading = line.chars().take_while(|&c| c == '=').count();
    let trailing = line.chars().rev().take_while(|&c| c == '=').count();
    if leading >= 2 && line.chars().count() > leading + trailing {
        leading.min(trailing)
    } else {
        0
    }
}

fn heading_title(line: &str) -> &str {
    line.trim_matches('=').trim()
}

/// Targets of all `[[...]]` links, display text stripped
fn wiki_links(text: &str) -> Vec<String> {
    let mut links = Vec::new();
    let mut rest = text;

    while let Some(start) = rest.find("[[") {
        let after = &rest[start + 2..];
        let Some(end) = after.find("]]") else { break };
        let target = after[..end].split('|').next().unwrap_or("").trim();
        if !target.is_empty() {
            links.push(target.to_string());
        }
        rest = &after[end + 2..];
    }

    links
}

/// Drop `{{...}}` template markup
fn strip_templates(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => rest = &after[end + 2..],
            None => {
                rest = "";
            }
        }
    }
    out.push_str(rest);

    out
}

/// Normalize, filter and deduplicate candidates, capped at five
fn tidy(raw: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();

    for candidate in raw {
        let candidate = candidate.trim().to_lowercase();
        if candidate.is_empty() || candidate.len() > 20 {
            continue;
        }
        if !candidate
            .chars()
            .all(|c| c.is_ascii_alphabetic() || c == ' ')
        {
            continue;
        }
        if !out.contains(&candidate) {
            out.push(candidate);
        }
        if out.len() == 5 {
            break;
        }
    }

    out
}
