//! # Guidepost
//!
//! A static site generator for a content site: a blog, step-by-step how-to
//! guides, category listings and an FAQ. Alongside the HTML it produces the
//! machine-readable layer search engines consume: XML sitemaps and
//! schema.org JSON-LD.
//!
//! # Architecture
//!
//! ```text
//! content source  →  ContentStore  →  generate  →  dist/
//!  (CMS export        (validated,      (maud pages,   (HTML, sitemaps,
//!   or mock data)      drafts hidden)   sitemaps)      robots.txt, _headers)
//! ```
//!
//! Page rendering reads records only through the [`content::ContentSource`]
//! trait. Everything downstream of it is a pure function of the records and
//! [`config::SiteConfig`]: the sitemap and structured-data layers never touch
//! the filesystem or process environment, so unit tests exercise them
//! directly with in-memory records.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`types`] | Content records (`BlogPost`, `Guide`, `Category`, `FaqEntry`, `Asset`) and sitemap entries |
//! | [`sitemap`] | URL normalization, W3C timestamps, XML sitemap and sitemap-index rendering |
//! | [`schema`] | Schema.org JSON-LD objects for organization, site, posts, guides, breadcrumbs, FAQ |
//! | [`seo`] | `<head>` meta tags: title, description, canonical, Open Graph |
//! | [`content`] | The `ContentSource` trait, content validation, mock and file-backed stores |
//! | [`generate`] | Renders every page with Maud and writes sitemaps, `robots.txt`, `_headers` |
//! | [`config`] | `site.toml` loading, merging over stock defaults, validation |
//! | [`output`] | CLI output formatting for build and check |
//!
//! # Design Decisions
//!
//! ## Sitemaps Never Fail the Build
//!
//! A sitemap that cannot be built from content (usually an unparseable
//! `updatedAt` coming from the CMS) is replaced with a homepage-only document
//! served with a five-minute cache lifetime instead of the usual hour. The
//! failure is logged with `tracing::warn!`. Crawlers always get valid XML, and
//! the bad document is gone after the next build. `guidepost check` reports
//! the same failures without the fallback.
//!
//! ## Typed Structured Data
//!
//! Every JSON-LD object is a `Serialize` struct rather than a hand-built
//! `serde_json::Value`. Optional properties are `Option`s skipped when absent,
//! so a page never carries `"image": null`.
//!
//! ## One Read of Process State
//!
//! `SITE_URL` is read once, in `main`, and folded into the config value.
//! Library code takes the resolved origin as an argument, which keeps every
//! URL-producing function deterministic under test.

pub mod config;
pub mod content;
pub mod generate;
pub mod output;
pub mod schema;
pub mod seo;
pub mod sitemap;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
