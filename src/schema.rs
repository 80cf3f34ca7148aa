//! Schema.org structured data (JSON-LD).
//!
//! [`StructuredData`] maps content records to the Schema.org shapes search
//! engines read for rich results:
//!
//! | Record | Schema |
//! |--------|--------|
//! | site config | `Organization`, `WebSite` (with sitelinks `SearchAction`) |
//! | [`BlogPost`] | `BlogPosting` |
//! | [`Guide`] | `HowTo` |
//! | breadcrumb trail | `BreadcrumbList` |
//! | [`FaqEntry`] list | `FAQPage` |
//!
//! ## Absent Means Omitted
//!
//! Rich-result validators reject some types when a property is present but
//! `null` or empty. Every optional property is therefore an `Option` or `Vec`
//! with `skip_serializing_if`, so missing source data drops the key entirely.
//!
//! ## Absolute URLs
//!
//! CMS asset URLs are often site-relative (`/images/a.jpg`) or
//! protocol-relative (`//cdn.example.net/a.jpg`). Anything not already starting
//! with `http` is resolved against the configured site URL.

use crate::sitemap::format_url;
use crate::types::{Asset, BlogPost, FaqEntry, Guide};
use serde::{Deserialize, Serialize};

pub const SCHEMA_CONTEXT: &str = "https://schema.org";

/// Site-wide identity injected into every schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaConfig {
    /// Site origin without trailing slash
    pub site_url: String,
    pub site_name: String,
    pub organization_name: String,
    pub logo_url: Option<String>,
    pub social_links: Vec<String>,
}

/// One step of a breadcrumb trail, root first.
#[derive(Debug, Clone, PartialEq)]
pub struct Breadcrumb {
    pub name: String,
    /// Absolute or site-relative URL
    pub url: String,
}

impl Breadcrumb {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Organization {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub name: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(rename = "sameAs", skip_serializing_if = "Vec::is_empty")]
    pub same_as: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebSite {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub name: String,
    pub url: String,
    pub potential_action: SearchAction,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchAction {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub target: EntryPoint,
    #[serde(rename = "query-input")]
    pub query_input: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryPoint {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub url_template: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPosting {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub headline: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageObject>,
    pub author: Person,
    pub publisher: Organization,
    pub date_published: String,
    pub date_modified: String,
    pub main_entity_of_page: WebPageRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article_section: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Person {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebPageRef {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    #[serde(rename = "@id")]
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageObject {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HowTo {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageObject>,
    /// ISO-8601 duration, e.g. `PT45M`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_time: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tool: Vec<String>,
    pub step: Vec<HowToStep>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HowToStep {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    /// 1-based
    pub position: usize,
    pub name: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageObject>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreadcrumbList {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub item_list_element: Vec<ListItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListItem {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    /// 1-based, in caller order
    pub position: usize,
    pub name: String,
    pub item: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FaqPage {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub main_entity: Vec<Question>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub name: String,
    pub accepted_answer: Answer,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Answer {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub text: String,
}

/// Structured-data generator bound to one site identity.
///
/// Immutable after construction, so a single instance can be shared by
/// parallel page renders.
#[derive(Debug, Clone)]
pub struct StructuredData {
    config: SchemaConfig,
}

impl StructuredData {
    pub fn new(config: SchemaConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SchemaConfig {
        &self.config
    }

    /// Resolve a possibly relative URL against the site URL.
    pub fn absolute_url(&self, url: &str) -> String {
        if url.starts_with("http") {
            url.to_string()
        } else if url.starts_with("//") {
            // Protocol-relative (`//cdn.example.net/a.png`): keep the host, pin the scheme.
            format!("https:{url}")
        } else {
            format_url(url, &self.config.site_url)
        }
    }

    fn image_object(&self, asset: &Asset) -> ImageObject {
        let dims = asset.dimensions();
        ImageObject {
            kind: "ImageObject",
            url: self.absolute_url(asset.url()),
            width: dims.map(|d| d.width),
            height: dims.map(|d| d.height),
        }
    }

    pub fn organization(&self) -> Organization {
        Organization {
            context: SCHEMA_CONTEXT,
            kind: "Organization",
            name: self.config.organization_name.clone(),
            url: self.config.site_url.clone(),
            logo: self
                .config
                .logo_url
                .as_deref()
                .filter(|l| !l.is_empty())
                .map(|l| self.absolute_url(l)),
            same_as: self
                .config
                .social_links
                .iter()
                .filter(|l| !l.is_empty())
                .cloned()
                .collect(),
        }
    }

    pub fn web_site(&self) -> WebSite {
        WebSite {
            context: SCHEMA_CONTEXT,
            kind: "WebSite",
            name: self.config.site_name.clone(),
            url: self.config.site_url.clone(),
            potential_action: SearchAction {
                kind: "SearchAction",
                target: EntryPoint {
                    kind: "EntryPoint",
                    url_template: format!(
                        "{}/search?q={{search_term_string}}",
                        self.config.site_url
                    ),
                },
                query_input: "required name=search_term_string",
            },
        }
    }

    pub fn blog_posting(&self, post: &BlogPost, canonical_url: &str) -> BlogPosting {
        BlogPosting {
            context: SCHEMA_CONTEXT,
            kind: "BlogPosting",
            headline: post.title.clone(),
            description: post.excerpt.clone(),
            image: post.featured_image.as_ref().map(|a| self.image_object(a)),
            author: Person {
                kind: "Person",
                name: post.author.name.clone(),
                url: post
                    .author
                    .slug
                    .as_deref()
                    .filter(|s| !s.is_empty())
                    .map(|slug| format!("{}/author/{slug}", self.config.site_url)),
            },
            publisher: self.organization(),
            date_published: post.published_at.clone(),
            date_modified: post.sys.updated_at.clone(),
            main_entity_of_page: WebPageRef {
                kind: "WebPage",
                id: canonical_url.to_string(),
            },
            article_section: post.category.as_ref().map(|c| c.name.clone()),
            keywords: post.tags.clone(),
        }
    }

    /// `HowTo` for a guide. An `estimated_time` of zero is treated as unknown
    /// and leaves `totalTime` out.
    pub fn how_to(&self, guide: &Guide) -> HowTo {
        HowTo {
            context: SCHEMA_CONTEXT,
            kind: "HowTo",
            name: guide.title.clone(),
            description: guide.description.clone(),
            image: guide.featured_image.as_ref().map(|a| self.image_object(a)),
            total_time: (guide.estimated_time != 0)
                .then(|| format!("PT{}M", guide.estimated_time)),
            tool: guide.tools.clone(),
            step: guide
                .steps
                .iter()
                .enumerate()
                .map(|(idx, step)| HowToStep {
                    kind: "HowToStep",
                    position: idx + 1,
                    name: step.title.clone(),
                    text: step.content.clone(),
                    image: step.image.as_ref().map(|a| self.image_object(a)),
                })
                .collect(),
        }
    }

    pub fn breadcrumb_list(&self, items: &[Breadcrumb]) -> BreadcrumbList {
        BreadcrumbList {
            context: SCHEMA_CONTEXT,
            kind: "BreadcrumbList",
            item_list_element: items
                .iter()
                .enumerate()
                .map(|(idx, crumb)| ListItem {
                    kind: "ListItem",
                    position: idx + 1,
                    name: crumb.name.clone(),
                    item: self.absolute_url(&crumb.url),
                })
                .collect(),
        }
    }

    /// `FAQPage` in input order; callers sort by [`FaqEntry::order`] first if needed.
    pub fn faq_page(&self, entries: &[FaqEntry]) -> FaqPage {
        FaqPage {
            context: SCHEMA_CONTEXT,
            kind: "FAQPage",
            main_entity: entries
                .iter()
                .map(|entry| Question {
                    kind: "Question",
                    name: entry.question.clone(),
                    accepted_answer: Answer {
                        kind: "Answer",
                        text: entry.answer.clone(),
                    },
                })
                .collect(),
        }
    }
}

/// Serialize a schema for an inline `<script type="application/ld+json">`.
///
/// `</` is written as `<\/` so no string value can terminate the script
/// element early; JSON parsers read both forms identically.
pub fn to_json_ld<T: Serialize>(schema: &T) -> Result<String, serde_json::Error> {
    Ok(serde_json::to_string(schema)?.replace("</", "<\\/"))
}
