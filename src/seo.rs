//! `<head>` metadata: title, description, canonical link, Open Graph and
//! Twitter card tags.
//!
//! Blog posts may carry per-post SEO overrides; those win over the post's own
//! title and excerpt. Optional tags are left out entirely when there is no
//! value for them.

use crate::schema::StructuredData;
use crate::types::{BlogPost, Guide};
use maud::{Markup, html};

#[derive(Debug, Clone, PartialEq)]
pub struct MetaTags {
    pub title: String,
    pub description: String,
    /// Absolute canonical URL
    pub canonical: String,
    /// `og:type`: `website` or `article`
    pub og_type: &'static str,
    /// Absolute image URL
    pub og_image: Option<String>,
    pub noindex: bool,
}

impl MetaTags {
    /// Metadata for a listing or static page.
    pub fn page(title: &str, description: &str, canonical: String) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            canonical,
            og_type: "website",
            og_image: None,
            noindex: false,
        }
    }

    /// Metadata for a blog post, honoring its SEO overrides.
    pub fn for_post(post: &BlogPost, canonical: String, schema: &StructuredData) -> Self {
        let seo = post.seo.as_ref();
        let image = seo
            .and_then(|s| s.og_image.as_ref())
            .or(post.featured_image.as_ref());
        Self {
            title: seo
                .and_then(|s| s.title.clone())
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| post.title.clone()),
            description: seo
                .and_then(|s| s.description.clone())
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| post.excerpt.clone()),
            canonical,
            og_type: "article",
            og_image: image.map(|a| schema.absolute_url(a.url())),
            noindex: false,
        }
    }

    pub fn for_guide(guide: &Guide, canonical: String, schema: &StructuredData) -> Self {
        Self {
            title: guide.title.clone(),
            description: guide.description.clone(),
            canonical,
            og_type: "article",
            og_image: guide
                .featured_image
                .as_ref()
                .map(|a| schema.absolute_url(a.url())),
            noindex: false,
        }
    }

    /// Keep the page out of search indexes (drafts rendered in preview mode).
    pub fn noindex(mut self) -> Self {
        self.noindex = true;
        self
    }

    /// Render the tags for `<head>`. `site_name` is appended to `<title>`.
    pub fn render(&self, site_name: &str) -> Markup {
        let full_title = if self.title == site_name {
            self.title.clone()
        } else {
            format!("{} | {}", self.title, site_name)
        };
        let card = if self.og_image.is_some() {
            "summary_large_image"
        } else {
            "summary"
        };
        html! {
            title { (full_title) }
            meta name="description" content=(self.description);
            link rel="canonical" href=(self.canonical);
            @if self.noindex {
                meta name="robots" content="noindex, nofollow";
            }
            meta property="og:type" content=(self.og_type);
            meta property="og:title" content=(self.title);
            meta property="og:description" content=(self.description);
            meta property="og:url" content=(self.canonical);
            meta property="og:site_name" content=(site_name);
            @if let Some(image) = &self.og_image {
                meta property="og:image" content=(image);
                meta name="twitter:image" content=(image);
            }
            meta name="twitter:card" content=(card);
            meta name="twitter:title" content=(self.title);
            meta name="twitter:description" content=(self.description);
        }
    }
}
