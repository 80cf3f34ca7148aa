//! Site configuration module.
//!
//! Handles loading, validating, and merging `site.toml`. The file is sparse:
//! stock defaults are the base layer and the user file overrides only the keys
//! it names.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! # Public origin of the site. Omit for local development
//! # (falls back to http://localhost:4321).
//! # site_url = "https://example.com"
//! site_name = "Guidepost"
//!
//! [organization]
//! name = "Guidepost"
//! # logo_url = "/logo.png"
//! social_links = []
//!
//! [content]
//! source = "mock"           # "mock" (built-in dataset) or "file"
//! path = "content.json"     # JSON export, used when source = "file"
//! preview = false           # include future-dated blog posts
//!
//! [build]
//! # assets_dir = "assets"   # copied verbatim into the output root
//! ```
//!
//! Unknown keys are rejected to catch typos early.
//!
//! The site origin can also come from the `SITE_URL` environment variable.
//! That lookup happens once in the binary, which hands the value to
//! [`SiteConfig::with_site_url_override`]; library code only ever sees the
//! resolved config value.

use crate::schema::SchemaConfig;
use crate::sitemap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `site.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Public origin (scheme + host) of the deployed site.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_url: Option<String>,
    /// Human-readable site name used in titles and the WebSite schema.
    pub site_name: String,
    /// Publisher identity injected into structured data.
    pub organization: OrganizationConfig,
    /// Where content records come from.
    pub content: ContentConfig,
    /// Output settings.
    pub build: BuildConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site_url: None,
            site_name: "Guidepost".to_string(),
            organization: OrganizationConfig::default(),
            content: ContentConfig::default(),
            build: BuildConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(url) = self.site_url.as_deref().filter(|u| !sitemap::validate_url(u)) {
            return Err(ConfigError::Validation(format!(
                "site_url must be an http(s) URL, got {url:?}"
            )));
        }
        if self.site_name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "site_name must not be empty".into(),
            ));
        }
        if self.organization.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "organization.name must not be empty".into(),
            ));
        }
        if let Some(link) = self
            .organization
            .social_links
            .iter()
            .find(|l| !sitemap::validate_url(l))
        {
            return Err(ConfigError::Validation(format!(
                "organization.social_links entries must be http(s) URLs, got {link:?}"
            )));
        }
        if self.content.source == ContentSourceKind::File && self.content.path.is_empty() {
            return Err(ConfigError::Validation(
                "content.path is required when content.source = \"file\"".into(),
            ));
        }
        Ok(())
    }

    /// Replace `site_url` when an override is present (e.g. from `SITE_URL`).
    ///
    /// Empty overrides are ignored so an exported-but-blank variable does not
    /// wipe the configured origin.
    pub fn with_site_url_override(mut self, site_url: Option<String>) -> Self {
        if let Some(url) = site_url.filter(|u| !u.trim().is_empty()) {
            self.site_url = Some(url);
        }
        self
    }

    /// Identity fields handed to the structured-data generator.
    pub fn schema_config(&self) -> SchemaConfig {
        SchemaConfig {
            site_url: sitemap::base_url(self),
            site_name: self.site_name.clone(),
            organization_name: self.organization.name.clone(),
            logo_url: self.organization.logo_url.clone(),
            social_links: self.organization.social_links.clone(),
        }
    }
}

/// Publisher identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OrganizationConfig {
    pub name: String,
    /// Absolute or site-relative logo URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    /// Profile URLs emitted as `sameAs`.
    pub social_links: Vec<String>,
}

impl Default for OrganizationConfig {
    fn default() -> Self {
        Self {
            name: "Guidepost".to_string(),
            logo_url: None,
            social_links: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentSourceKind {
    /// Built-in sample dataset.
    #[default]
    Mock,
    /// JSON content export on disk.
    File,
}

/// Content source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContentConfig {
    pub source: ContentSourceKind,
    /// Path of the JSON export, relative to the working directory.
    pub path: String,
    /// Include blog posts whose publication date is still in the future.
    pub preview: bool,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            source: ContentSourceKind::Mock,
            path: "content.json".to_string(),
            preview: false,
        }
    }
}

/// Output settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Directory copied verbatim into the output root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assets_dir: Option<String>,
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(SiteConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from the given `site.toml` path.
///
/// A missing file yields the stock defaults.
pub fn load_config(path: &Path) -> Result<SiteConfig, ConfigError> {
    let overlay = load_raw_config(path)?;
    resolve_config(overlay)
}

/// Returns a fully-commented stock `site.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Guidepost Configuration
# =======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# Public origin of the deployed site, used for canonical URLs, sitemaps and
# structured data. When omitted, http://localhost:4321 is used.
# The SITE_URL environment variable overrides this value.
# site_url = "https://example.com"

# Site name shown in page titles and the WebSite schema.
site_name = "Guidepost"

# ---------------------------------------------------------------------------
# Publisher identity (Organization schema)
# ---------------------------------------------------------------------------
[organization]
name = "Guidepost"

# Logo URL, absolute or relative to site_url.
# logo_url = "/logo.png"

# Profile URLs emitted as sameAs.
social_links = []

# ---------------------------------------------------------------------------
# Content source
# ---------------------------------------------------------------------------
[content]
# "mock" uses the built-in sample dataset; "file" reads a JSON export.
source = "mock"

# JSON export path, used when source = "file".
path = "content.json"

# Include blog posts whose publication date is in the future.
preview = false

# ---------------------------------------------------------------------------
# Build output
# ---------------------------------------------------------------------------
[build]
# Directory copied verbatim into the output root (favicon, images, ...).
# assets_dir = "assets"
"##
}
