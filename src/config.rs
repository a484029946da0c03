use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;
use serde::Deserialize;
use url::Url;

use crate::favorites::DEFAULT_FAVORITES_KEY;
use crate::loader::SourceStrategy;

pub const DEFAULT_CANDIDATES: &[&str] = &["./package.json", "./package-lock.json"];

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum SourceConfig {
    Fixed { path: String },
    Candidates { urls: Vec<String> },
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig::Candidates { urls: DEFAULT_CANDIDATES.iter().map(|s| s.to_string()).collect() }
    }
}

impl SourceConfig {
    pub fn strategy(&self) -> SourceStrategy {
        match self {
            SourceConfig::Fixed { path } => SourceStrategy::Fixed(path.clone()),
            SourceConfig::Candidates { urls } => SourceStrategy::Candidates(urls.clone()),
        }
    }
}

/// `stayboard.toml`; every field is optional.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    /// Base that relative source paths are resolved against: a URL or a directory.
    pub base_url: Option<String>,
    pub source: SourceConfig,
    pub favorites_key: String,
    pub database_url: Option<String>,
    pub user_agent: String,
    pub search_input: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: None,
            source: SourceConfig::default(),
            favorites_key: DEFAULT_FAVORITES_KEY.to_string(),
            database_url: None,
            user_agent: concat!("stayboard/", env!("CARGO_PKG_VERSION")).to_string(),
            search_input: true,
        }
    }
}

impl Config {
    /// An explicit path must exist; otherwise the default location is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let cfg = match explicit {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };
        Ok(cfg.with_env_overrides())
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config: {}", path.display()))?;
        Self::from_toml(&raw).with_context(|| format!("parsing config: {}", path.display()))
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    fn with_env_overrides(mut self) -> Self {
        let var = |k: &str| std::env::var(k).ok().filter(|v| !v.trim().is_empty());
        if let Some(v) = var("STAYBOARD_BASE_URL") { self.base_url = Some(v); }
        if let Some(v) = var("STAYBOARD_DATABASE_URL") { self.database_url = Some(v); }
        if let Some(v) = var("STAYBOARD_FAVORITES_KEY") { self.favorites_key = v; }
        self
    }

    /// Base URL for source resolution; defaults to the working directory.
    pub fn base(&self) -> Result<Url> {
        match self.base_url.as_deref() {
            Some(raw) => parse_base(raw),
            None => {
                let cwd = std::env::current_dir().context("resolving working directory")?;
                dir_url(&cwd)
            }
        }
    }
}

/// `scheme://...` is taken as a URL; anything else is a directory path.
pub fn parse_base(raw: &str) -> Result<Url> {
    if raw.contains("://") {
        return Url::parse(raw).with_context(|| format!("invalid base URL: {raw}"));
    }
    let path = PathBuf::from(raw);
    let abs = if path.is_absolute() {
        path
    } else {
        std::env::current_dir().context("resolving working directory")?.join(path)
    };
    dir_url(&abs)
}

fn dir_url(dir: &Path) -> Result<Url> {
    Url::from_directory_path(dir).map_err(|_| anyhow!("not an absolute directory: {}", dir.display()))
}

pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("dev", "stayboard", "stayboard").map(|p| p.config_dir().join("stayboard.toml"))
}
