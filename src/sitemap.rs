//! URL normalization and XML sitemap rendering.
//!
//! Search engines consume these documents byte-for-byte, so every function
//! here either produces valid output or fails loudly:
//!
//! - URLs are joined against the site origin with exactly one `/`.
//! - Timestamps are normalized to W3C datetime (`YYYY-MM-DDTHH:mm:ss.sssZ`);
//!   unparseable input is an error, never a silently dropped `<lastmod>`.
//! - All element text is XML-escaped.
//! - An empty entry list still renders a well-formed document.
//!
//! ## Output Files
//!
//! ```text
//! dist/
//! ├── sitemap-index.xml    # <sitemapindex> referencing the three below
//! ├── sitemap-pages.xml    # home, listings, FAQ, category pages
//! ├── sitemap-blog.xml     # one <url> per blog post
//! └── sitemap-guides.xml   # one <url> per guide
//! ```
//!
//! Building these from content can fail (bad `updatedAt` in the CMS). The page
//! generator catches that and writes [`SitemapDocument::fallback`] instead: a
//! homepage-only `urlset` served with a short cache lifetime so the problem
//! heals on the next build.

use crate::config::SiteConfig;
use crate::types::{
    BlogPost, Category, ChangeFreq, Guide, SitemapEntry, SitemapIndexEntry,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use quick_xml::escape::escape;
use quick_xml::events::Event;
use std::borrow::Cow;
use std::fmt::Write as _;
use thiserror::Error;
use url::Url;

/// Origin used when no `site_url` is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:4321";

/// `Content-Type` for every sitemap document.
pub const CONTENT_TYPE: &str = "application/xml; charset=utf-8";

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";
const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Path fragments that never belong in a sitemap.
///
/// Matched as plain substrings of the whole URL, so `/blog/admin-tips` is
/// excluded too.
const EXCLUDED_PATTERNS: &[&str] = &["/preview/", "/search", "/api/", "/_", "/admin"];

#[derive(Error, Debug)]
pub enum SitemapError {
    #[error("Invalid timestamp: {0:?}")]
    InvalidTimestamp(String),
    #[error("Malformed sitemap XML: {0}")]
    Xml(#[from] quick_xml::Error),
}

// ============================================================================
// URL primitives
// ============================================================================

/// Resolve `url` against `base_url`.
///
/// Absolute `http(s)` URLs are returned unchanged. Otherwise one leading `/`
/// is stripped from `url`, one trailing `/` from `base_url`, and the two are
/// joined with a single `/`.
pub fn format_url(url: &str, base_url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        return url.to_string();
    }
    let path = url.strip_prefix('/').unwrap_or(url);
    let base = base_url.strip_suffix('/').unwrap_or(base_url);
    format!("{base}/{path}")
}

/// True only for syntactically valid `http` or `https` URLs.
pub fn validate_url(url: &str) -> bool {
    Url::parse(url)
        .map(|u| matches!(u.scheme(), "http" | "https"))
        .unwrap_or(false)
}

/// The configured site origin, or [`DEFAULT_BASE_URL`] when unset.
///
/// A trailing `/` on the configured value is dropped so callers can append
/// paths directly.
pub fn base_url(config: &SiteConfig) -> String {
    config
        .site_url
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .map(|u| u.trim_end_matches('/').to_string())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
}

/// Whether a URL may appear in a sitemap.
pub fn is_sitemap_eligible(url: &str) -> bool {
    !EXCLUDED_PATTERNS.iter().any(|p| url.contains(p))
}

// ============================================================================
// Timestamps
// ============================================================================

/// Input accepted by [`format_timestamp`].
#[derive(Debug, Clone, Copy)]
pub enum Timestamp<'a> {
    Text(&'a str),
    Utc(DateTime<Utc>),
}

impl<'a> From<&'a str> for Timestamp<'a> {
    fn from(s: &'a str) -> Self {
        Timestamp::Text(s)
    }
}

impl<'a> From<&'a String> for Timestamp<'a> {
    fn from(s: &'a String) -> Self {
        Timestamp::Text(s)
    }
}

impl From<DateTime<Utc>> for Timestamp<'_> {
    fn from(dt: DateTime<Utc>) -> Self {
        Timestamp::Utc(dt)
    }
}

/// Format a timestamp as a W3C datetime in UTC with millisecond precision.
///
/// Accepted text forms:
/// - RFC 3339 with offset: `2024-01-15T10:00:00+02:00`, `2024-01-15T10:00:00Z`
/// - datetime without offset, read as UTC: `2024-01-15T10:00:00`
/// - bare date, read as midnight UTC: `2024-01-15`
pub fn format_timestamp<'a>(input: impl Into<Timestamp<'a>>) -> Result<String, SitemapError> {
    let dt = match input.into() {
        Timestamp::Utc(dt) => dt,
        Timestamp::Text(text) => parse_timestamp(text)?,
    };
    Ok(dt.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Parse any accepted timestamp form into UTC.
pub(crate) fn parse_timestamp(text: &str) -> Result<DateTime<Utc>, SitemapError> {
    let trimmed = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| SitemapError::InvalidTimestamp(text.to_string()))
}

// ============================================================================
// XML rendering
// ============================================================================

/// Escape the five XML special characters.
pub fn escape_xml(text: &str) -> Cow<'_, str> {
    escape(text)
}

fn push_element(out: &mut String, name: &str, text: &str) {
    let _ = writeln!(out, "    <{name}>{}</{name}>", escape_xml(text));
}

/// Render one `<url>` element. Absent optional fields are not emitted.
pub fn render_sitemap_entry(entry: &SitemapEntry) -> String {
    let mut out = String::from("  <url>\n");
    push_element(&mut out, "loc", &entry.url);
    if let Some(lastmod) = &entry.lastmod {
        push_element(&mut out, "lastmod", lastmod);
    }
    if let Some(changefreq) = entry.changefreq {
        push_element(&mut out, "changefreq", changefreq.as_str());
    }
    // The fields are public, so re-check what the builder guarantees.
    if let Some(priority) = entry.priority.filter(|p| p.is_finite()) {
        let priority = priority.clamp(0.0, 1.0);
        push_element(&mut out, "priority", &format!("{priority:.1}"));
    }
    out.push_str("  </url>\n");
    out
}

/// Render one `<sitemap>` element of a sitemap index.
pub fn render_sitemap_index_entry(entry: &SitemapIndexEntry) -> String {
    let mut out = String::from("  <sitemap>\n");
    push_element(&mut out, "loc", &entry.sitemap);
    if let Some(lastmod) = &entry.lastmod {
        push_element(&mut out, "lastmod", lastmod);
    }
    out.push_str("  </sitemap>\n");
    out
}

fn render_document(root: &str, children: impl Iterator<Item = String>) -> String {
    let mut out = format!("{XML_DECLARATION}\n<{root} xmlns=\"{SITEMAP_NS}\">\n");
    out.extend(children);
    let _ = writeln!(out, "</{root}>");
    out
}

/// Render a complete `urlset` document.
pub fn render_sitemap(entries: &[SitemapEntry]) -> String {
    render_document("urlset", entries.iter().map(render_sitemap_entry))
}

/// Render a complete `sitemapindex` document.
pub fn render_sitemap_index(entries: &[SitemapIndexEntry]) -> String {
    render_document("sitemapindex", entries.iter().map(render_sitemap_index_entry))
}

/// Parse a rendered sitemap or sitemap index and return its `<loc>` values, unescaped.
///
/// Used by `check` to prove a document is well-formed before it ships.
pub fn parse_locs(xml: &str) -> Result<Vec<String>, SitemapError> {
    let mut reader = quick_xml::Reader::from_str(xml);
    reader.config_mut().check_end_names = true;
    let mut locs = Vec::new();
    let mut in_loc = false;
    let mut current = String::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) if e.name().as_ref() == b"loc" => {
                in_loc = true;
                current.clear();
            }
            Event::Text(e) if in_loc => {
                current.push_str(&e.unescape()?);
            }
            Event::End(e) if e.name().as_ref() == b"loc" => {
                in_loc = false;
                locs.push(std::mem::take(&mut current));
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(locs)
}

// ============================================================================
// Site sitemaps
// ============================================================================

/// The four sitemap documents a build publishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SitemapKind {
    Index,
    Pages,
    Blog,
    Guides,
}

impl SitemapKind {
    /// Child sitemaps referenced from the index, in index order.
    pub const CHILDREN: [SitemapKind; 3] =
        [SitemapKind::Pages, SitemapKind::Blog, SitemapKind::Guides];

    pub fn file_name(self) -> &'static str {
        match self {
            SitemapKind::Index => "sitemap-index.xml",
            SitemapKind::Pages => "sitemap-pages.xml",
            SitemapKind::Blog => "sitemap-blog.xml",
            SitemapKind::Guides => "sitemap-guides.xml",
        }
    }
}

/// How long a served sitemap may be cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    /// Built from content without errors.
    Fresh,
    /// Minimal replacement after a build failure.
    Fallback,
}

impl CachePolicy {
    pub fn max_age(self) -> u32 {
        match self {
            CachePolicy::Fresh => 3600,
            CachePolicy::Fallback => 300,
        }
    }

    pub fn cache_control(self) -> String {
        format!("public, max-age={}", self.max_age())
    }
}

/// A rendered sitemap plus the headers it should be served with.
#[derive(Debug, Clone, PartialEq)]
pub struct SitemapDocument {
    pub kind: SitemapKind,
    pub body: String,
    pub cache: CachePolicy,
}

impl SitemapDocument {
    pub fn fresh(kind: SitemapKind, body: String) -> Self {
        Self {
            kind,
            body,
            cache: CachePolicy::Fresh,
        }
    }

    /// Homepage-only `urlset`, served when building `kind` failed.
    pub fn fallback(kind: SitemapKind, base_url: &str) -> Self {
        let home = SitemapEntry::new(format_url("/", base_url))
            .changefreq(ChangeFreq::Daily)
            .priority(1.0);
        Self {
            kind,
            body: render_sitemap(&[home]),
            cache: CachePolicy::Fallback,
        }
    }

    pub fn file_name(&self) -> &'static str {
        self.kind.file_name()
    }
}

fn eligible(entries: Vec<SitemapEntry>) -> Vec<SitemapEntry> {
    entries
        .into_iter()
        .filter(|e| is_sitemap_eligible(&e.url))
        .collect()
}

/// Entries for the static pages and category listings.
///
/// Static pages carry no `<lastmod>`: they change whenever content does, and
/// the build time would claim a change on every deploy.
pub fn pages_sitemap(
    base_url: &str,
    categories: &[Category],
) -> Result<Vec<SitemapEntry>, SitemapError> {
    let mut entries = vec![
        SitemapEntry::new(format_url("/", base_url))
            .changefreq(ChangeFreq::Daily)
            .priority(1.0),
        SitemapEntry::new(format_url("/blog", base_url))
            .changefreq(ChangeFreq::Daily)
            .priority(0.9),
        SitemapEntry::new(format_url("/guides", base_url))
            .changefreq(ChangeFreq::Weekly)
            .priority(0.9),
        SitemapEntry::new(format_url("/faq", base_url))
            .changefreq(ChangeFreq::Monthly)
            .priority(0.6),
    ];
    for category in categories {
        entries.push(
            SitemapEntry::new(format_url(&format!("/categories/{}", category.slug), base_url))
                .lastmod(format_timestamp(&category.sys.updated_at)?)
                .changefreq(ChangeFreq::Weekly)
                .priority(0.7),
        );
    }
    Ok(eligible(entries))
}

/// One entry per blog post, `<lastmod>` from the record's `updatedAt`.
pub fn blog_sitemap(base_url: &str, posts: &[BlogPost]) -> Result<Vec<SitemapEntry>, SitemapError> {
    let entries = posts
        .iter()
        .map(|post| {
            Ok(
                SitemapEntry::new(format_url(&format!("/blog/{}", post.slug), base_url))
                    .lastmod(format_timestamp(&post.sys.updated_at)?)
                    .changefreq(ChangeFreq::Monthly)
                    .priority(0.8),
            )
        })
        .collect::<Result<Vec<_>, SitemapError>>()?;
    Ok(eligible(entries))
}

/// One entry per guide, `<lastmod>` from the record's `updatedAt`.
pub fn guides_sitemap(base_url: &str, guides: &[Guide]) -> Result<Vec<SitemapEntry>, SitemapError> {
    let entries = guides
        .iter()
        .map(|guide| {
            Ok(
                SitemapEntry::new(format_url(&format!("/guides/{}", guide.slug), base_url))
                    .lastmod(format_timestamp(&guide.sys.updated_at)?)
                    .changefreq(ChangeFreq::Monthly)
                    .priority(0.8),
            )
        })
        .collect::<Result<Vec<_>, SitemapError>>()?;
    Ok(eligible(entries))
}

/// Index entries for the child sitemaps, stamped with the build time.
pub fn sitemap_index(base_url: &str, built_at: DateTime<Utc>) -> Vec<SitemapIndexEntry> {
    let lastmod = built_at.to_rfc3339_opts(SecondsFormat::Millis, true);
    SitemapKind::CHILDREN
        .iter()
        .map(|kind| SitemapIndexEntry {
            sitemap: format_url(kind.file_name(), base_url),
            lastmod: Some(lastmod.clone()),
        })
        .collect()
}
