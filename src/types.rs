//! Content records shared by the content source, the structured-data
//! generator, the sitemap builders, and the page renderer.
//!
//! Field names follow the camelCase shape a CMS export delivers, so the same
//! types deserialize the built-in mock dataset and a JSON export on disk.
//! Every record is read-only once it leaves the content source.

use serde::{Deserialize, Serialize};

/// System identity attached to every content record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sys {
    pub id: String,
    /// ISO-8601 creation timestamp
    pub created_at: String,
    /// ISO-8601 last-modified timestamp
    pub updated_at: String,
}

/// A blog article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub sys: Sys,
    pub title: String,
    /// URL-safe identifier (lowercase, hyphenated)
    pub slug: String,
    pub excerpt: String,
    /// Markdown body
    pub content: String,
    pub author: Author,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// ISO-8601 publication timestamp
    pub published_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<Asset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo: Option<SeoFields>,
}

/// Per-post overrides for `<head>` metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub og_image: Option<Asset>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<Asset>,
}

/// A step-by-step how-to article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guide {
    pub sys: Sys,
    pub title: String,
    pub slug: String,
    pub description: String,
    /// Markdown introduction shown above the steps
    pub content: String,
    pub difficulty: Difficulty,
    /// Minutes needed to complete the guide
    pub estimated_time: u32,
    /// Ordered steps; display number is index + 1
    #[serde(default)]
    pub steps: Vec<GuideStep>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<Asset>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuideStep {
    pub title: String,
    /// Markdown body of the step
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<Asset>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub sys: Sys,
    pub name: String,
    pub slug: String,
    pub description: String,
    /// Accent color as `#RRGGBB`
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<Asset>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaqEntry {
    pub sys: Sys,
    pub question: String,
    pub answer: String,
    /// Free-form grouping label (not a [`Category`] reference)
    pub category: String,
    /// Ascending sort key
    pub order: i32,
}

/// A media file hosted by the CMS.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub sys: Sys,
    pub fields: AssetFields,
}

impl Asset {
    /// Raw file URL as stored by the CMS (may be relative or protocol-relative).
    pub fn url(&self) -> &str {
        &self.fields.file.url
    }

    pub fn dimensions(&self) -> Option<ImageDimensions> {
        self.fields.file.details.image
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetFields {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub file: AssetFile,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetFile {
    pub url: String,
    pub file_name: String,
    pub content_type: String,
    pub details: FileDetails,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDetails {
    /// Size in bytes
    pub size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageDimensions>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

/// One `<url>` row of a sitemap.
#[derive(Debug, Clone, PartialEq)]
pub struct SitemapEntry {
    /// Absolute page URL
    pub url: String,
    /// W3C datetime, already formatted
    pub lastmod: Option<String>,
    pub changefreq: Option<ChangeFreq>,
    /// 0.0 to 1.0
    pub priority: Option<f32>,
}

impl SitemapEntry {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            lastmod: None,
            changefreq: None,
            priority: None,
        }
    }

    pub fn lastmod(mut self, lastmod: impl Into<String>) -> Self {
        self.lastmod = Some(lastmod.into());
        self
    }

    pub fn changefreq(mut self, changefreq: ChangeFreq) -> Self {
        self.changefreq = Some(changefreq);
        self
    }

    /// Set the priority, clamped into `0.0..=1.0`. NaN and infinities clear it.
    pub fn priority(mut self, priority: f32) -> Self {
        self.priority = priority.is_finite().then(|| priority.clamp(0.0, 1.0));
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeFreq {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFreq {
    pub fn as_str(self) -> &'static str {
        match self {
            ChangeFreq::Always => "always",
            ChangeFreq::Hourly => "hourly",
            ChangeFreq::Daily => "daily",
            ChangeFreq::Weekly => "weekly",
            ChangeFreq::Monthly => "monthly",
            ChangeFreq::Yearly => "yearly",
            ChangeFreq::Never => "never",
        }
    }
}

/// One `<sitemap>` row of a sitemap index.
#[derive(Debug, Clone, PartialEq)]
pub struct SitemapIndexEntry {
    /// Absolute URL of the child sitemap
    pub sitemap: String,
    pub lastmod: Option<String>,
}
