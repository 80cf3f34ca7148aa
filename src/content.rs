//! Content sources.
//!
//! Page generation reads records through [`ContentSource`], never from the raw
//! export. Two sources exist:
//!
//! - [`ContentStore::mock`] — the built-in sample dataset (`fixtures/mock.json`),
//!   used for local development and tests.
//! - [`ContentStore::from_file`] — a JSON export of the CMS space.
//!
//! Both go through [`ContentSet::validate`] before any record is handed out,
//! so the structured-data and sitemap layers can trust slugs, colors, and
//! timestamps without re-checking them.
//!
//! ## Drafts
//!
//! A blog post whose `publishedAt` lies in the future is a draft. Lookups with
//! `preview = false` hide drafts; `preview = true` returns everything.

use crate::config::{ContentConfig, ContentSourceKind};
use crate::sitemap::parse_timestamp;
use crate::types::{BlogPost, Category, FaqEntry, Guide, Sys};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

const MOCK_DATASET: &str = include_str!("../fixtures/mock.json");

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid content: {0}")]
    Invalid(String),
}

/// Read access to the site's content records.
///
/// `Sync` so one source can back parallel page renders.
pub trait ContentSource: Sync {
    fn blog_post(&self, slug: &str, preview: bool) -> Result<Option<BlogPost>, ContentError>;
    /// Newest first.
    fn blog_posts(&self, limit: Option<usize>, preview: bool)
    -> Result<Vec<BlogPost>, ContentError>;
    fn guide(&self, slug: &str, preview: bool) -> Result<Option<Guide>, ContentError>;
    /// Most recently created first.
    fn guides(&self, limit: Option<usize>, preview: bool) -> Result<Vec<Guide>, ContentError>;
    fn category(&self, slug: &str) -> Result<Option<Category>, ContentError>;
    /// Sorted by name.
    fn categories(&self) -> Result<Vec<Category>, ContentError>;
    /// Sorted by `order`.
    fn faq_entries(&self) -> Result<Vec<FaqEntry>, ContentError>;
}

/// Every record of a content export.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContentSet {
    pub categories: Vec<Category>,
    pub blog_posts: Vec<BlogPost>,
    pub guides: Vec<Guide>,
    pub faq_entries: Vec<FaqEntry>,
}

impl ContentSet {
    /// Check the invariants downstream code relies on.
    ///
    /// - slugs are lowercase, hyphenated, and unique per record type
    /// - category colors are `#RRGGBB`
    /// - every timestamp parses
    pub fn validate(&self) -> Result<(), ContentError> {
        let mut seen = HashSet::new();
        for category in &self.categories {
            check_sys(&category.sys)?;
            check_slug("category", &category.slug, &mut seen)?;
            check_color(category)?;
        }

        seen.clear();
        for post in &self.blog_posts {
            check_sys(&post.sys)?;
            check_slug("blog post", &post.slug, &mut seen)?;
            check_timestamp(&post.sys.id, "publishedAt", &post.published_at)?;
            if let Some(category) = &post.category {
                check_color(category)?;
            }
        }

        seen.clear();
        for guide in &self.guides {
            check_sys(&guide.sys)?;
            check_slug("guide", &guide.slug, &mut seen)?;
        }

        for entry in &self.faq_entries {
            check_sys(&entry.sys)?;
        }
        Ok(())
    }
}

/// URL-safe slug: `a-z`, `0-9`, single inner hyphens.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && !slug.contains("--")
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

fn check_slug<'a>(
    kind: &str,
    slug: &'a str,
    seen: &mut HashSet<&'a str>,
) -> Result<(), ContentError> {
    if !is_valid_slug(slug) {
        return Err(ContentError::Invalid(format!(
            "{kind} slug {slug:?} is not lowercase and hyphenated"
        )));
    }
    if !seen.insert(slug) {
        return Err(ContentError::Invalid(format!(
            "duplicate {kind} slug {slug:?}"
        )));
    }
    Ok(())
}

fn check_color(category: &Category) -> Result<(), ContentError> {
    let valid = category
        .color
        .strip_prefix('#')
        .is_some_and(|hex| hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()));
    if valid {
        Ok(())
    } else {
        Err(ContentError::Invalid(format!(
            "category {:?} color {:?} is not #RRGGBB",
            category.slug, category.color
        )))
    }
}

fn check_sys(sys: &Sys) -> Result<(), ContentError> {
    check_timestamp(&sys.id, "createdAt", &sys.created_at)?;
    check_timestamp(&sys.id, "updatedAt", &sys.updated_at)
}

fn check_timestamp(id: &str, field: &str, value: &str) -> Result<(), ContentError> {
    parse_timestamp(value)
        .map(|_| ())
        .map_err(|_| ContentError::Invalid(format!("{id}: {field} {value:?} is not a timestamp")))
}

/// In-memory [`ContentSource`] over a validated [`ContentSet`].
#[derive(Debug, Clone)]
pub struct ContentStore {
    set: ContentSet,
    now: DateTime<Utc>,
}

impl ContentStore {
    /// Wrap a content set after validating it. Drafts are judged against the
    /// current time.
    pub fn new(set: ContentSet) -> Result<Self, ContentError> {
        set.validate()?;
        Ok(Self {
            set,
            now: Utc::now(),
        })
    }

    /// Judge drafts against `now` instead of the wall clock.
    pub fn as_of(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    /// The built-in sample dataset.
    pub fn mock() -> Result<Self, ContentError> {
        Self::from_json(MOCK_DATASET)
    }

    pub fn from_json(json: &str) -> Result<Self, ContentError> {
        let set: ContentSet = serde_json::from_str(json)?;
        Self::new(set)
    }

    pub fn from_file(path: &Path) -> Result<Self, ContentError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Open the source named by the `[content]` config section.
    pub fn open(config: &ContentConfig) -> Result<Self, ContentError> {
        match config.source {
            ContentSourceKind::Mock => Self::mock(),
            ContentSourceKind::File => Self::from_file(Path::new(&config.path)),
        }
    }

    fn is_published(&self, post: &BlogPost) -> bool {
        parse_timestamp(&post.published_at).is_ok_and(|published| published <= self.now)
    }

    fn visible_posts(&self, preview: bool) -> impl Iterator<Item = &BlogPost> {
        self.set
            .blog_posts
            .iter()
            .filter(move |p| preview || self.is_published(p))
    }
}

fn truncate<T>(mut items: Vec<T>, limit: Option<usize>) -> Vec<T> {
    if let Some(limit) = limit {
        items.truncate(limit);
    }
    items
}

fn sort_key(timestamp: &str) -> Option<DateTime<Utc>> {
    parse_timestamp(timestamp).ok()
}

impl ContentSource for ContentStore {
    fn blog_post(&self, slug: &str, preview: bool) -> Result<Option<BlogPost>, ContentError> {
        Ok(self.visible_posts(preview).find(|p| p.slug == slug).cloned())
    }

    fn blog_posts(
        &self,
        limit: Option<usize>,
        preview: bool,
    ) -> Result<Vec<BlogPost>, ContentError> {
        let mut posts: Vec<BlogPost> = self.visible_posts(preview).cloned().collect();
        posts.sort_by_key(|p| std::cmp::Reverse(sort_key(&p.published_at)));
        Ok(truncate(posts, limit))
    }

    fn guide(&self, slug: &str, _preview: bool) -> Result<Option<Guide>, ContentError> {
        Ok(self.set.guides.iter().find(|g| g.slug == slug).cloned())
    }

    fn guides(&self, limit: Option<usize>, _preview: bool) -> Result<Vec<Guide>, ContentError> {
        let mut guides = self.set.guides.clone();
        guides.sort_by_key(|g| std::cmp::Reverse(sort_key(&g.sys.created_at)));
        Ok(truncate(guides, limit))
    }

    fn category(&self, slug: &str) -> Result<Option<Category>, ContentError> {
        Ok(self.set.categories.iter().find(|c| c.slug == slug).cloned())
    }

    fn categories(&self) -> Result<Vec<Category>, ContentError> {
        let mut categories = self.set.categories.clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    fn faq_entries(&self) -> Result<Vec<FaqEntry>, ContentError> {
        let mut entries = self.set.faq_entries.clone();
        entries.sort_by_key(|e| e.order);
        Ok(entries)
    }
}
