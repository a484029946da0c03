//! Startup pipeline: resolve → fetch → parse → normalize → truncate.

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info};
use url::Url;

use crate::catalog::Catalog;
use crate::error::LoadError;

/// Keys that may carry the listings array when the body is an object.
pub const ENVELOPE_KEYS: &[&str] = &["listings", "results", "data"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

impl FetchResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self { status: 200, body: body.into() }
    }

    pub fn is_success(&self) -> bool { (200..300).contains(&self.status) }
}

/// A single GET. Transport failures are errors; HTTP error statuses are not.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn get(&self, url: &Url) -> Result<FetchResponse>;
}

/// `http(s)://` through reqwest, `file://` from disk (a missing file answers 404).
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder().user_agent(user_agent).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn get(&self, url: &Url) -> Result<FetchResponse> {
        match url.scheme() {
            "http" | "https" => {
                let resp = self.client.get(url.clone()).send().await?;
                let status = resp.status().as_u16();
                let body = resp.text().await?;
                Ok(FetchResponse { status, body })
            }
            "file" => {
                let path = url
                    .to_file_path()
                    .map_err(|_| anyhow!("not a local file path: {url}"))?;
                match tokio::fs::read_to_string(&path).await {
                    Ok(body) => Ok(FetchResponse::ok(body)),
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                        Ok(FetchResponse { status: 404, body: String::new() })
                    }
                    Err(e) => Err(e).with_context(|| format!("reading {}", path.display())),
                }
            }
            other => bail!("unsupported scheme `{other}` in {url}"),
        }
    }
}

/// How the data source location is chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceStrategy {
    /// One fixed location.
    Fixed(String),
    /// Locations tried in order; the first successful response wins.
    Candidates(Vec<String>),
}

pub struct CatalogLoader<F> {
    fetcher: F,
    base: Url,
    strategy: SourceStrategy,
}

impl<F: Fetcher> CatalogLoader<F> {
    pub fn new(fetcher: F, base: Url, strategy: SourceStrategy) -> Self {
        Self { fetcher, base, strategy }
    }

    pub async fn load(&self) -> Result<Catalog, LoadError> {
        let (location, url, response) = self.resolve().await?;
        if !response.is_success() {
            return Err(LoadError::Status { url: url.to_string(), status: response.status });
        }
        let value = parse_body(&url, &response.body)?;
        let records = extract_listings(value);
        if records.is_empty() {
            return Err(LoadError::Empty {
                url: url.to_string(),
                file: location.trim_start_matches("./").to_string(),
            });
        }
        let total = records.len();
        let catalog = Catalog::from_records(url.to_string(), records);
        info!(url = %url, total, kept = catalog.len(), "catalog loaded");
        Ok(catalog)
    }

    async fn resolve(&self) -> Result<(String, Url, FetchResponse), LoadError> {
        match &self.strategy {
            SourceStrategy::Fixed(location) => {
                let url = join(&self.base, location)?;
                let response = self.fetcher.get(&url).await.map_err(|e| LoadError::Fetch {
                    url: url.to_string(),
                    reason: format!("{e:#}"),
                })?;
                Ok((location.clone(), url, response))
            }
            SourceStrategy::Candidates(candidates) => {
                for location in candidates {
                    let url = match join(&self.base, location) {
                        Ok(url) => url,
                        Err(e) => {
                            debug!(candidate = %location, error = %e, "skipping candidate");
                            continue;
                        }
                    };
                    match self.fetcher.get(&url).await {
                        Ok(resp) if resp.is_success() => {
                            info!(url = %url, "using data source");
                            return Ok((location.clone(), url, resp));
                        }
                        Ok(resp) => debug!(url = %url, status = resp.status, "candidate not usable"),
                        Err(e) => debug!(url = %url, error = %format!("{e:#}"), "candidate failed"),
                    }
                }
                Err(LoadError::Unresolved { candidates: candidates.clone() })
            }
        }
    }
}

fn join(base: &Url, location: &str) -> Result<Url, LoadError> {
    base.join(location).map_err(|e| LoadError::BadLocation {
        location: location.to_string(),
        reason: e.to_string(),
    })
}

pub fn parse_body(url: &Url, body: &str) -> Result<Value, LoadError> {
    serde_json::from_str(body).map_err(|source| LoadError::Malformed { url: url.to_string(), source })
}

/// A bare array, or the first non-null envelope key. Anything else is empty.
pub fn extract_listings(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        Value::Object(mut map) => ENVELOPE_KEYS
            .iter()
            .find_map(|k| map.remove(*k).filter(|v| !v.is_null()))
            .and_then(|v| match v {
                Value::Array(items) => Some(items),
                _ => None,
            })
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}
