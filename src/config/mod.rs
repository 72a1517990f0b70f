//! Site configuration management for `kawara.toml`.
//!
//! # Sections
//!
//! | Section   | Purpose                                              |
//! |-----------|------------------------------------------------------|
//! | `[site]`  | Site metadata (title, description, author, url, ...) |
//! | `[build]` | Content/output directories, draft handling           |
//! | `[feed]`  | Feed generation (enable, rss/atom, output path)      |
//!
//! The config file is found by searching upward from the current working
//! directory; the project root is the config file's parent directory.
//! Unknown keys are warned about (and ignored) rather than rejected.

mod error;

pub use error::ConfigError;

use crate::{cli::Cli, log};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing kawara.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SiteConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Site metadata
    pub site: SiteSection,

    /// Build settings
    pub build: BuildSection,

    /// Feed settings
    pub feed: FeedSection,
}

/// `[site]` - metadata used in page shells and feeds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SiteSection {
    /// Site title.
    pub title: String,

    /// Site description.
    pub description: String,

    /// Author name.
    pub author: String,

    /// Author email (used for RSS author normalization).
    pub email: String,

    /// Site URL (e.g., "https://example.com"). Required when the feed is
    /// enabled, since feed items need absolute links.
    pub url: Option<String>,

    /// Language code (e.g., "en", "ja").
    pub language: String,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            author: String::new(),
            email: String::new(),
            url: None,
            language: "en".into(),
        }
    }
}

/// `[build]` - paths and draft handling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct BuildSection {
    /// Content directory (relative to project root).
    pub content: PathBuf,

    /// Output directory (relative to project root).
    pub output: PathBuf,

    /// Skip draft posts when rendering pages. Drafts are always excluded
    /// from the feed and the search index.
    pub skip_drafts: bool,
}

impl Default for BuildSection {
    fn default() -> Self {
        Self {
            content: PathBuf::from("content"),
            output: PathBuf::from("public"),
            skip_drafts: false,
        }
    }
}

/// Feed output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedFormat {
    #[default]
    Rss,
    Atom,
}

/// `[feed]` - syndication feed settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FeedSection {
    /// Enable feed generation.
    pub enable: bool,

    /// Feed format (rss or atom).
    pub format: FeedFormat,

    /// Output path relative to the output directory.
    pub path: PathBuf,
}

impl Default for FeedSection {
    fn default() -> Self {
        Self {
            enable: true,
            format: FeedFormat::Rss,
            path: PathBuf::from("rss.xml"),
        }
    }
}

impl SiteConfig {
    /// Load configuration from CLI arguments.
    ///
    /// Searches upward from cwd to find the config file; the project root
    /// is the config file's parent directory.
    pub fn load(cli: &Cli) -> Result<Self> {
        let config_path = find_config_file(&cli.config).with_context(|| {
            format!(
                "config file '{}' not found in this or any parent directory",
                cli.config.display()
            )
        })?;

        let mut config = Self::from_path(&config_path)?;
        config.root = config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        config.config_path = config_path;

        config.apply_cli(cli);
        config.validate()?;

        Ok(config)
    }

    /// Parse a config file, warning about unknown keys instead of failing.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw =
            fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;

        let deserializer = toml::Deserializer::new(&raw);
        let mut unknown = Vec::new();
        let config: Self = serde_ignored::deserialize(deserializer, |key: serde_ignored::Path| {
            unknown.push(key.to_string());
        })
        .map_err(ConfigError::Toml)?;

        for key in unknown {
            log!("config"; "ignoring unknown key '{}' in {}", key, path.display());
        }

        Ok(config)
    }

    /// Apply CLI overrides after loading.
    fn apply_cli(&mut self, cli: &Cli) {
        if let Some(content) = &cli.content {
            self.build.content = content.clone();
        }
        if let Some(output) = &cli.output {
            self.build.output = output.clone();
        }
    }

    /// Validate the loaded configuration.
    ///
    /// # Checks
    /// - content directory must exist
    /// - if the feed is enabled, `site.url` must be set
    /// - `site.url` must be a valid http(s) URL with a host
    pub fn validate(&self) -> Result<()> {
        let content_dir = self.content_dir();
        if !content_dir.is_dir() {
            return Err(ConfigError::Validation(format!(
                "content directory '{}' does not exist",
                content_dir.display()
            ))
            .into());
        }

        if self.feed.enable && self.site.url.is_none() {
            return Err(ConfigError::Validation(
                "feed.enable is set but site.url is not configured; \
                 set site.url, e.g.: \"https://example.com\""
                    .to_string(),
            )
            .into());
        }

        if let Some(url_str) = &self.site.url {
            let parsed = url::Url::parse(url_str).map_err(|e| {
                ConfigError::Validation(format!("invalid site.url '{url_str}': {e}"))
            })?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(ConfigError::Validation(format!(
                    "site.url scheme '{}' not supported, must be http or https",
                    parsed.scheme()
                ))
                .into());
            }
            if parsed.host_str().is_none() {
                return Err(ConfigError::Validation(
                    "site.url must have a valid host".to_string(),
                )
                .into());
            }
        }

        Ok(())
    }

    /// Absolute content directory.
    pub fn content_dir(&self) -> PathBuf {
        self.root.join(&self.build.content)
    }

    /// Absolute output directory.
    pub fn output_dir(&self) -> PathBuf {
        self.root.join(&self.build.output)
    }

    /// Site URL without trailing slash, for building absolute links.
    pub fn base_url(&self) -> &str {
        self.site
            .url
            .as_deref()
            .unwrap_or_default()
            .trim_end_matches('/')
    }
}

/// Find config file by searching upward from current directory
///
/// Starts from cwd and walks up parent directories until finding
/// `config_name`. Returns the absolute path to the config file if found.
fn find_config_file(config_name: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }

    let cwd = std::env::current_dir().ok()?;
    let mut current = cwd.as_path();
    loop {
        let candidate = current.join(config_name);
        if candidate.exists() {
            return Some(candidate);
        }

        match current.parent() {
            Some(parent) => current = parent,
            None => return None, // Reached filesystem root
        }
    }
}

// ============================================================================
// tests
// ============================================================================
