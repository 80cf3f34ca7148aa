//! HTML site generation.
//!
//! Reads every record from a [`ContentSource`], renders the pages, and writes
//! the SEO artifacts next to them. The whole site is regenerated on every
//! build; nothing is cached between runs.
//!
//! ## Generated Pages
//!
//! | URL | Page | JSON-LD |
//! |-----|------|---------|
//! | `/` | Home: latest posts and guides, categories | `Organization`, `WebSite` |
//! | `/blog` | All published posts | `BreadcrumbList` |
//! | `/blog/{slug}` | Post body (markdown) | `BlogPosting`, `BreadcrumbList` |
//! | `/guides` | All guides | `BreadcrumbList` |
//! | `/guides/{slug}` | Guide with numbered steps | `HowTo`, `BreadcrumbList` |
//! | `/categories/{slug}` | Posts and guides in a category | `BreadcrumbList` |
//! | `/faq` | Questions sorted by `order` | `FAQPage`, `BreadcrumbList` |
//!
//! Every URL the site publishes has no trailing slash: internal links,
//! canonical links, JSON-LD ids and breadcrumbs, and sitemap `<loc>`s all
//! agree, so a crawler never lands on a redirect.
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html
//! ├── blog/
//! │   ├── index.html
//! │   └── why-your-tap-keeps-dripping/index.html
//! ├── guides/...
//! ├── categories/...
//! ├── faq/index.html
//! ├── sitemap-index.xml
//! ├── sitemap-pages.xml
//! ├── sitemap-blog.xml
//! ├── sitemap-guides.xml
//! ├── robots.txt
//! └── _headers               # Content-Type / Cache-Control per sitemap
//! ```
//!
//! ## Sitemap Fallback
//!
//! A sitemap that cannot be built (bad timestamp, content failure) is logged
//! and replaced with [`SitemapDocument::fallback`]. The build itself carries
//! on: a crawler always receives a valid document, and the short cache
//! lifetime on the fallback makes the next build replace it quickly.
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! Markdown bodies go through pulldown-cmark. Post and guide pages are
//! rendered in parallel with rayon; they share one [`StructuredData`].

use crate::config::SiteConfig;
use crate::content::{ContentError, ContentSource};
use crate::schema::{self, Breadcrumb, StructuredData};
use crate::seo::MetaTags;
use crate::sitemap::{self, CachePolicy, SitemapDocument, SitemapError, SitemapKind};
use crate::types::{BlogPost, Category, FaqEntry, Guide};
use chrono::{DateTime, Utc};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use pulldown_cmark::{Parser, html as md_html};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Content error: {0}")]
    Content(#[from] ContentError),
    #[error("Sitemap error: {0}")]
    Sitemap(#[from] SitemapError),
    #[error("Asset copy failed: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Asset path outside assets dir: {0}")]
    AssetPath(PathBuf),
}

const CSS: &str = include_str!("../static/style.css");

/// Number of posts and guides featured on the home page.
const HOME_FEATURED: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Home,
    BlogIndex,
    BlogPost,
    GuideIndex,
    Guide,
    Category,
    Faq,
}

/// A rendered page, not yet written.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub kind: PageKind,
    pub title: String,
    /// Site-relative URL path, e.g. `/blog/my-post`
    pub url_path: String,
    pub html: String,
}

#[derive(Debug, Clone)]
pub struct PageSummary {
    pub kind: PageKind,
    pub title: String,
    pub url_path: String,
    /// Written file, relative to the output directory
    pub file: PathBuf,
}

#[derive(Debug, Clone)]
pub struct SitemapSummary {
    pub file_name: &'static str,
    pub urls: usize,
    pub cache: CachePolicy,
}

/// What a build wrote.
#[derive(Debug, Clone)]
pub struct GenerateReport {
    pub base_url: String,
    pub pages: Vec<PageSummary>,
    pub sitemaps: Vec<SitemapSummary>,
    pub assets_copied: usize,
}

impl GenerateReport {
    pub fn fallback_count(&self) -> usize {
        self.sitemaps
            .iter()
            .filter(|s| s.cache == CachePolicy::Fallback)
            .count()
    }
}

/// Everything shared by the page renderers.
struct SiteContext<'a> {
    config: &'a SiteConfig,
    base_url: String,
    schema: StructuredData,
    built_at: DateTime<Utc>,
}

impl SiteContext<'_> {
    fn canonical(&self, url_path: &str) -> String {
        sitemap::format_url(url_path, &self.base_url)
    }
}

/// Build the whole site into `output_dir`, stamped with the current time.
pub fn generate(
    source: &impl ContentSource,
    config: &SiteConfig,
    output_dir: &Path,
) -> Result<GenerateReport, GenerateError> {
    generate_at(source, config, output_dir, Utc::now())
}

/// Build the whole site with an explicit build time.
pub fn generate_at(
    source: &impl ContentSource,
    config: &SiteConfig,
    output_dir: &Path,
    built_at: DateTime<Utc>,
) -> Result<GenerateReport, GenerateError> {
    let ctx = SiteContext {
        config,
        base_url: sitemap::base_url(config),
        schema: StructuredData::new(config.schema_config()),
        built_at,
    };

    fs::create_dir_all(output_dir)?;

    let pages = render_site(&ctx, source)?;
    let mut page_summaries = Vec::with_capacity(pages.len());
    for page in pages {
        let file = page_file(&page.url_path);
        let path = output_dir.join(&file);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, &page.html)?;
        debug!(path = %file.display(), "wrote page");
        page_summaries.push(PageSummary {
            kind: page.kind,
            title: page.title,
            url_path: page.url_path,
            file,
        });
    }

    let documents = build_sitemaps(source, &ctx.base_url, built_at);
    let mut sitemap_summaries = Vec::with_capacity(documents.len());
    for doc in &documents {
        let urls = sitemap::parse_locs(&doc.body)?.len();
        fs::write(output_dir.join(doc.file_name()), &doc.body)?;
        sitemap_summaries.push(SitemapSummary {
            file_name: doc.file_name(),
            urls,
            cache: doc.cache,
        });
    }
    fs::write(output_dir.join("_headers"), render_headers(&documents))?;
    fs::write(output_dir.join("robots.txt"), render_robots(&ctx.base_url))?;

    let assets_copied = match &config.build.assets_dir {
        Some(dir) => copy_assets(Path::new(dir), output_dir)?,
        None => 0,
    };

    Ok(GenerateReport {
        base_url: ctx.base_url,
        pages: page_summaries,
        sitemaps: sitemap_summaries,
        assets_copied,
    })
}

/// Map a URL path to its `index.html` file, relative to the output root.
pub fn page_file(url_path: &str) -> PathBuf {
    let trimmed = url_path.trim_matches('/');
    if trimmed.is_empty() {
        PathBuf::from("index.html")
    } else {
        PathBuf::from(trimmed).join("index.html")
    }
}

fn render_site(
    ctx: &SiteContext<'_>,
    source: &impl ContentSource,
) -> Result<Vec<RenderedPage>, GenerateError> {
    let preview = ctx.config.content.preview;
    let posts = source.blog_posts(None, preview)?;
    let guides = source.guides(None, preview)?;
    let categories = source.categories()?;
    let faq = source.faq_entries()?;

    let mut pages = vec![
        render_home(ctx, &posts, &guides, &categories)?,
        render_blog_index(ctx, &posts)?,
        render_guide_index(ctx, &guides)?,
        render_faq_page(ctx, &faq)?,
    ];

    let post_pages = posts
        .par_iter()
        .map(|post| render_post_page(ctx, post))
        .collect::<Result<Vec<_>, _>>()?;
    let guide_pages = guides
        .par_iter()
        .map(|guide| render_guide_page(ctx, guide))
        .collect::<Result<Vec<_>, _>>()?;
    pages.extend(post_pages);
    pages.extend(guide_pages);

    for category in &categories {
        pages.push(render_category_page(ctx, category, &posts, &guides)?);
    }
    Ok(pages)
}

// ============================================================================
// Sitemaps
// ============================================================================

/// Build all four sitemap documents, substituting a fallback for any that fail.
///
/// Sitemaps only ever list published content, whatever the preview setting.
pub fn build_sitemaps(
    source: &impl ContentSource,
    base_url: &str,
    built_at: DateTime<Utc>,
) -> Vec<SitemapDocument> {
    std::iter::once(SitemapKind::Index)
        .chain(SitemapKind::CHILDREN)
        .map(|kind| sitemap_document(kind, source, base_url, built_at))
        .collect()
}

/// Build one sitemap document, or its fallback if building fails.
pub fn sitemap_document(
    kind: SitemapKind,
    source: &impl ContentSource,
    base_url: &str,
    built_at: DateTime<Utc>,
) -> SitemapDocument {
    match build_sitemap(kind, source, base_url, built_at) {
        Ok(body) => SitemapDocument::fresh(kind, body),
        Err(e) => {
            warn!(sitemap = kind.file_name(), error = %e, "serving fallback sitemap");
            SitemapDocument::fallback(kind, base_url)
        }
    }
}

/// Render one sitemap document from content.
pub fn build_sitemap(
    kind: SitemapKind,
    source: &impl ContentSource,
    base_url: &str,
    built_at: DateTime<Utc>,
) -> Result<String, GenerateError> {
    let body = match kind {
        SitemapKind::Index => {
            sitemap::render_sitemap_index(&sitemap::sitemap_index(base_url, built_at))
        }
        SitemapKind::Pages => {
            sitemap::render_sitemap(&sitemap::pages_sitemap(base_url, &source.categories()?)?)
        }
        SitemapKind::Blog => sitemap::render_sitemap(&sitemap::blog_sitemap(
            base_url,
            &source.blog_posts(None, false)?,
        )?),
        SitemapKind::Guides => sitemap::render_sitemap(&sitemap::guides_sitemap(
            base_url,
            &source.guides(None, false)?,
        )?),
    };
    Ok(body)
}

/// Result of a dry run over config and content.
#[derive(Debug, Clone, Default)]
pub struct CheckReport {
    pub base_url: String,
    pub blog_posts: usize,
    pub drafts: usize,
    pub guides: usize,
    pub categories: usize,
    pub faq_entries: usize,
    /// File name and `<loc>` count of every sitemap that built cleanly
    pub sitemaps: Vec<(&'static str, usize)>,
    pub problems: Vec<String>,
}

impl CheckReport {
    pub fn is_ok(&self) -> bool {
        self.problems.is_empty()
    }
}

/// Build every sitemap without writing anything, and without the fallback:
/// each failure is reported as a problem instead.
pub fn check(source: &impl ContentSource, config: &SiteConfig) -> Result<CheckReport, GenerateError> {
    let base_url = sitemap::base_url(config);
    let published = source.blog_posts(None, false)?.len();
    let mut report = CheckReport {
        blog_posts: published,
        drafts: source.blog_posts(None, true)?.len().saturating_sub(published),
        guides: source.guides(None, false)?.len(),
        categories: source.categories()?.len(),
        faq_entries: source.faq_entries()?.len(),
        ..CheckReport::default()
    };

    for kind in std::iter::once(SitemapKind::Index).chain(SitemapKind::CHILDREN) {
        let body = match build_sitemap(kind, source, &base_url, Utc::now()) {
            Ok(body) => body,
            Err(e) => {
                report.problems.push(format!("{}: {e}", kind.file_name()));
                continue;
            }
        };
        let locs = sitemap::parse_locs(&body)?;
        for loc in locs.iter().filter(|l| !sitemap::validate_url(l)) {
            report
                .problems
                .push(format!("{}: invalid URL {loc:?}", kind.file_name()));
        }
        report.sitemaps.push((kind.file_name(), locs.len()));
    }
    report.base_url = base_url;
    Ok(report)
}

/// `_headers` rules (Netlify / Cloudflare Pages format) for the sitemaps.
pub fn render_headers(documents: &[SitemapDocument]) -> String {
    documents
        .iter()
        .map(|doc| {
            format!(
                "/{}\n  Content-Type: {}\n  Cache-Control: {}\n",
                doc.file_name(),
                sitemap::CONTENT_TYPE,
                doc.cache.cache_control()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_robots(base_url: &str) -> String {
    format!(
        "User-agent: *\nAllow: /\nDisallow: /preview/\nDisallow: /api/\nDisallow: /admin\nDisallow: /search\n\nSitemap: {}\n",
        sitemap::format_url(SitemapKind::Index.file_name(), base_url)
    )
}

fn copy_assets(src: &Path, output_dir: &Path) -> Result<usize, GenerateError> {
    if !src.is_dir() {
        warn!(dir = %src.display(), "assets_dir does not exist, skipping");
        return Ok(0);
    }
    let mut copied = 0;
    for entry in WalkDir::new(src).follow_links(true) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(|_| GenerateError::AssetPath(entry.path().to_path_buf()))?;
        let dst = output_dir.join(relative);
        if let Some(parent) = dst.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(entry.path(), &dst)?;
        copied += 1;
    }
    Ok(copied)
}

// ============================================================================
// HTML Components
// ============================================================================

fn markdown_to_html(markdown: &str) -> String {
    let parser = Parser::new(markdown);
    let mut out = String::new();
    md_html::push_html(&mut out, parser);
    out
}

fn ld_json<T: serde::Serialize>(schema: &T) -> Result<String, GenerateError> {
    Ok(schema::to_json_ld(schema)?)
}

/// Renders the base HTML document with meta tags and JSON-LD in `<head>`.
fn base_document(
    ctx: &SiteContext<'_>,
    meta: &MetaTags,
    json_ld: &[String],
    current: &str,
    content: Markup,
) -> String {
    let site_name = &ctx.config.site_name;
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                (meta.render(site_name))
                link rel="sitemap" type="application/xml" href="/sitemap-index.xml";
                style { (PreEscaped(CSS)) }
                @for block in json_ld {
                    script type="application/ld+json" { (PreEscaped(block)) }
                }
            }
            body {
                (site_header(site_name, current))
                main { (content) }
                footer.site-footer {
                    "© " (ctx.built_at.format("%Y").to_string()) " " (ctx.config.organization.name)
                }
            }
        }
    }
    .into_string()
}

/// Renders the site header with primary navigation.
fn site_header(site_name: &str, current: &str) -> Markup {
    let links = [("/blog", "Blog"), ("/guides", "Guides"), ("/faq", "FAQ")];
    html! {
        header.site-header {
            a.brand href="/" { (site_name) }
            nav.site-nav {
                ul {
                    @for (href, label) in links {
                        li class=[(current == href).then_some("current")] {
                            a href=(href) { (label) }
                        }
                    }
                }
            }
        }
    }
}

/// Visible breadcrumb trail; the last item is the current page and is not linked.
fn breadcrumb_nav(items: &[Breadcrumb]) -> Markup {
    html! {
        nav.breadcrumb aria-label="Breadcrumb" {
            @for (idx, item) in items.iter().enumerate() {
                @if idx > 0 { " › " }
                @if idx + 1 == items.len() {
                    span aria-current="page" { (item.name) }
                } @else {
                    a href=(item.url) { (item.name) }
                }
            }
        }
    }
}

fn category_tag(category: &Category) -> Markup {
    let style = format!("--category-color: {};", category.color);
    html! {
        a.category-tag style=(style) href={ "/categories/" (category.slug) } {
            (category.name)
        }
    }
}

fn post_card(post: &BlogPost) -> Markup {
    html! {
        li.card {
            h3 { a href={ "/blog/" (post.slug) } { (post.title) } }
            p { (post.excerpt) }
            @if let Some(category) = &post.category {
                (category_tag(category))
            }
        }
    }
}

fn guide_card(guide: &Guide) -> Markup {
    html! {
        li.card {
            h3 { a href={ "/guides/" (guide.slug) } { (guide.title) } }
            p { (guide.description) }
            p.guide-meta {
                (guide.difficulty.label())
                @if guide.estimated_time > 0 {
                    " · " (guide.estimated_time) " min"
                }
            }
        }
    }
}

fn display_date(timestamp: &str) -> String {
    sitemap::parse_timestamp(timestamp)
        .map(|dt| dt.format("%-d %B %Y").to_string())
        .unwrap_or_else(|_| timestamp.to_string())
}

// ============================================================================
// Page Renderers
// ============================================================================

fn home_crumb() -> Breadcrumb {
    Breadcrumb::new("Home", "/")
}

fn render_home(
    ctx: &SiteContext<'_>,
    posts: &[BlogPost],
    guides: &[Guide],
    categories: &[Category],
) -> Result<RenderedPage, GenerateError> {
    let site_name = &ctx.config.site_name;
    let meta = MetaTags::page(
        site_name,
        &format!("Articles and step-by-step guides from {site_name}."),
        ctx.canonical("/"),
    );
    let json_ld = [
        ld_json(&ctx.schema.organization())?,
        ld_json(&ctx.schema.web_site())?,
    ];

    let content = html! {
        section {
            h2 { "Latest articles" }
            ul.card-list {
                @for post in posts.iter().take(HOME_FEATURED) { (post_card(post)) }
            }
            a href="/blog" { "All articles" }
        }
        section {
            h2 { "Guides" }
            ul.card-list {
                @for guide in guides.iter().take(HOME_FEATURED) { (guide_card(guide)) }
            }
            a href="/guides" { "All guides" }
        }
        @if !categories.is_empty() {
            section {
                h2 { "Categories" }
                @for category in categories { (category_tag(category)) " " }
            }
        }
    };

    Ok(RenderedPage {
        kind: PageKind::Home,
        title: site_name.clone(),
        url_path: "/".to_string(),
        html: base_document(ctx, &meta, &json_ld, "/", content),
    })
}

fn render_blog_index(
    ctx: &SiteContext<'_>,
    posts: &[BlogPost],
) -> Result<RenderedPage, GenerateError> {
    let crumbs = [home_crumb(), Breadcrumb::new("Blog", "/blog")];
    let meta = MetaTags::page("Blog", "Every article, newest first.", ctx.canonical("/blog"));
    let json_ld = [ld_json(&ctx.schema.breadcrumb_list(&crumbs))?];

    let content = html! {
        (breadcrumb_nav(&crumbs))
        h1 { "Blog" }
        @if posts.is_empty() {
            p { "No articles yet." }
        } @else {
            ul.card-list { @for post in posts { (post_card(post)) } }
        }
    };

    Ok(RenderedPage {
        kind: PageKind::BlogIndex,
        title: "Blog".to_string(),
        url_path: "/blog".to_string(),
        html: base_document(ctx, &meta, &json_ld, "/blog", content),
    })
}

fn render_post_page(ctx: &SiteContext<'_>, post: &BlogPost) -> Result<RenderedPage, GenerateError> {
    let url_path = format!("/blog/{}", post.slug);
    let canonical = ctx.canonical(&url_path);
    let crumbs = [
        home_crumb(),
        Breadcrumb::new("Blog", "/blog"),
        Breadcrumb::new(post.title.clone(), url_path.clone()),
    ];

    let is_draft = sitemap::parse_timestamp(&post.published_at)
        .map(|published| published > ctx.built_at)
        .unwrap_or(false);
    let mut meta = MetaTags::for_post(post, canonical.clone(), &ctx.schema);
    if is_draft {
        meta = meta.noindex();
    }

    let json_ld = [
        ld_json(&ctx.schema.blog_posting(post, &canonical))?,
        ld_json(&ctx.schema.breadcrumb_list(&crumbs))?,
    ];

    let content = html! {
        (breadcrumb_nav(&crumbs))
        article {
            h1 { (post.title) }
            p.post-meta {
                "By " (post.author.name) " · "
                time datetime=(post.published_at) { (display_date(&post.published_at)) }
                @if let Some(category) = &post.category {
                    " · " (category_tag(category))
                }
            }
            @if let Some(image) = &post.featured_image {
                img.featured-image
                    src=(ctx.schema.absolute_url(image.url()))
                    alt=(image.fields.description.as_deref().unwrap_or(&image.fields.title))
                    width=[image.dimensions().map(|d| d.width)]
                    height=[image.dimensions().map(|d| d.height)];
            }
            (PreEscaped(markdown_to_html(&post.content)))
            @if !post.tags.is_empty() {
                p.post-meta {
                    "Tagged: "
                    @for (idx, tag) in post.tags.iter().enumerate() {
                        @if idx > 0 { ", " }
                        (tag)
                    }
                }
            }
        }
    };

    Ok(RenderedPage {
        kind: PageKind::BlogPost,
        title: post.title.clone(),
        url_path,
        html: base_document(ctx, &meta, &json_ld, "/blog", content),
    })
}

fn render_guide_index(
    ctx: &SiteContext<'_>,
    guides: &[Guide],
) -> Result<RenderedPage, GenerateError> {
    let crumbs = [home_crumb(), Breadcrumb::new("Guides", "/guides")];
    let meta = MetaTags::page(
        "Guides",
        "Step-by-step guides for jobs around the home.",
        ctx.canonical("/guides"),
    );
    let json_ld = [ld_json(&ctx.schema.breadcrumb_list(&crumbs))?];

    let content = html! {
        (breadcrumb_nav(&crumbs))
        h1 { "Guides" }
        @if guides.is_empty() {
            p { "No guides yet." }
        } @else {
            ul.card-list { @for guide in guides { (guide_card(guide)) } }
        }
    };

    Ok(RenderedPage {
        kind: PageKind::GuideIndex,
        title: "Guides".to_string(),
        url_path: "/guides".to_string(),
        html: base_document(ctx, &meta, &json_ld, "/guides", content),
    })
}

fn render_guide_page(ctx: &SiteContext<'_>, guide: &Guide) -> Result<RenderedPage, GenerateError> {
    let url_path = format!("/guides/{}", guide.slug);
    let crumbs = [
        home_crumb(),
        Breadcrumb::new("Guides", "/guides"),
        Breadcrumb::new(guide.title.clone(), url_path.clone()),
    ];
    let meta = MetaTags::for_guide(guide, ctx.canonical(&url_path), &ctx.schema);
    let json_ld = [
        ld_json(&ctx.schema.how_to(guide))?,
        ld_json(&ctx.schema.breadcrumb_list(&crumbs))?,
    ];

    let content = html! {
        (breadcrumb_nav(&crumbs))
        article {
            h1 { (guide.title) }
            p.guide-meta {
                (guide.difficulty.label())
                @if guide.estimated_time > 0 {
                    " · about " (guide.estimated_time) " minutes"
                }
                @if let Some(category) = &guide.category {
                    " · " (category_tag(category))
                }
            }
            @if let Some(image) = &guide.featured_image {
                img.featured-image src=(ctx.schema.absolute_url(image.url())) alt=(image.fields.title);
            }
            p { (guide.description) }
            (PreEscaped(markdown_to_html(&guide.content)))
            @if !guide.tools.is_empty() {
                h2 { "You will need" }
                ul { @for tool in &guide.tools { li { (tool) } } }
            }
            h2 { "Steps" }
            ol.guide-steps {
                @for (idx, step) in guide.steps.iter().enumerate() {
                    li.guide-step id={ "step-" (idx + 1) } {
                        h3 { (step.title) }
                        @if let Some(image) = &step.image {
                            img src=(ctx.schema.absolute_url(image.url())) alt=(image.fields.title) loading="lazy";
                        }
                        (PreEscaped(markdown_to_html(&step.content)))
                    }
                }
            }
        }
    };

    Ok(RenderedPage {
        kind: PageKind::Guide,
        title: guide.title.clone(),
        url_path,
        html: base_document(ctx, &meta, &json_ld, "/guides", content),
    })
}

fn render_category_page(
    ctx: &SiteContext<'_>,
    category: &Category,
    posts: &[BlogPost],
    guides: &[Guide],
) -> Result<RenderedPage, GenerateError> {
    let url_path = format!("/categories/{}", category.slug);
    let crumbs = [
        home_crumb(),
        Breadcrumb::new(category.name.clone(), url_path.clone()),
    ];
    let mut meta = MetaTags::page(&category.name, &category.description, ctx.canonical(&url_path));
    meta.og_image = category
        .featured_image
        .as_ref()
        .map(|a| ctx.schema.absolute_url(a.url()));
    let json_ld = [ld_json(&ctx.schema.breadcrumb_list(&crumbs))?];

    let in_category = |c: &Option<Category>| c.as_ref().is_some_and(|c| c.slug == category.slug);
    let category_posts: Vec<&BlogPost> = posts.iter().filter(|p| in_category(&p.category)).collect();
    let category_guides: Vec<&Guide> = guides.iter().filter(|g| in_category(&g.category)).collect();

    let content = html! {
        (breadcrumb_nav(&crumbs))
        h1 { (category.name) }
        p { (category.description) }
        @if !category_posts.is_empty() {
            h2 { "Articles" }
            ul.card-list { @for post in &category_posts { (post_card(post)) } }
        }
        @if !category_guides.is_empty() {
            h2 { "Guides" }
            ul.card-list { @for guide in &category_guides { (guide_card(guide)) } }
        }
        @if category_posts.is_empty() && category_guides.is_empty() {
            p { "Nothing here yet." }
        }
    };

    Ok(RenderedPage {
        kind: PageKind::Category,
        title: category.name.clone(),
        url_path,
        html: base_document(ctx, &meta, &json_ld, "", content),
    })
}

fn render_faq_page(ctx: &SiteContext<'_>, entries: &[FaqEntry]) -> Result<RenderedPage, GenerateError> {
    let crumbs = [home_crumb(), Breadcrumb::new("FAQ", "/faq")];
    let meta = MetaTags::page(
        "Frequently asked questions",
        "Answers to common questions.",
        ctx.canonical("/faq"),
    );
    let json_ld = [
        ld_json(&ctx.schema.faq_page(entries))?,
        ld_json(&ctx.schema.breadcrumb_list(&crumbs))?,
    ];

    let content = html! {
        (breadcrumb_nav(&crumbs))
        h1 { "Frequently asked questions" }
        dl.faq-list {
            @for entry in entries {
                dt {
                    span.faq-group { (entry.category) } br;
                    (entry.question)
                }
                dd { (PreEscaped(markdown_to_html(&entry.answer))) }
            }
        }
    };

    Ok(RenderedPage {
        kind: PageKind::Faq,
        title: "FAQ".to_string(),
        url_path: "/faq".to_string(),
        html: base_document(ctx, &meta, &json_ld, "/faq", content),
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{ContentSet, ContentStore};
    use crate::test_helpers::{sample_category, sample_faq, sample_guide, sample_post};
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn built_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
    }

    fn test_config() -> SiteConfig {
        SiteConfig {
            site_url: Some("https://example.com".into()),
            site_name: "Example Site".into(),
            ..SiteConfig::default()
        }
    }

    fn store() -> ContentStore {
        ContentStore::new(ContentSet {
            categories: vec![sample_category("tools")],
            blog_posts: vec![sample_post("first-post"), sample_post("second-post")],
            guides: vec![sample_guide("fix-a-tap")],
            faq_entries: vec![sample_faq(2, "Second?"), sample_faq(1, "First?")],
        })
        .unwrap()
        .as_of(built_at())
    }

    fn with_ctx<R>(f: impl FnOnce(&SiteContext<'_>) -> R) -> R {
        let config = test_config();
        let ctx = SiteContext {
            config: &config,
            base_url: sitemap::base_url(&config),
            schema: StructuredData::new(config.schema_config()),
            built_at: built_at(),
        };
        f(&ctx)
    }

    #[test]
    fn page_file_maps_paths_to_index_html() {
        assert_eq!(page_file("/"), PathBuf::from("index.html"));
        assert_eq!(page_file("/blog"), PathBuf::from("blog/index.html"));
        assert_eq!(
            page_file("/blog/first-post/"),
            PathBuf::from("blog/first-post/index.html")
        );
    }

    #[test]
    fn home_page_embeds_organization_and_website() {
        let store = store();
        let posts = store.blog_posts(None, false).unwrap();
        let guides = store.guides(None, false).unwrap();
        let categories = store.categories().unwrap();
        let page = with_ctx(|ctx| render_home(ctx, &posts, &guides, &categories).unwrap());
        assert!(page.html.starts_with("<!DOCTYPE html>"));
        assert!(page.html.contains(r#""@type":"Organization""#));
        assert!(page.html.contains(r#""@type":"WebSite""#));
        assert!(page.html.contains("<title>Example Site</title>"));
        assert!(page.html.contains(r#"href="https://example.com/""#));
    }

    #[test]
    fn post_page_embeds_blog_posting_and_breadcrumbs() {
        let post = sample_post("first-post");
        let page = with_ctx(|ctx| render_post_page(ctx, &post).unwrap());
        assert_eq!(page.url_path, "/blog/first-post");
        assert!(page.html.contains(r#"<script type="application/ld+json">"#));
        assert!(page.html.contains(r#""@type":"BlogPosting""#));
        assert!(page.html.contains(r#""@type":"BreadcrumbList""#));
        assert!(
            page.html
                .contains(r#""@id":"https://example.com/blog/first-post""#)
        );
        // Markdown body rendered
        assert!(page.html.contains("<strong>markdown</strong>"));
        assert!(!page.html.contains("noindex"));
    }

    #[test]
    fn future_post_is_noindex() {
        let mut post = sample_post("draft");
        post.published_at = "2030-01-01T00:00:00Z".into();
        let page = with_ctx(|ctx| render_post_page(ctx, &post).unwrap());
        assert!(page.html.contains("noindex, nofollow"));
    }

    #[test]
    fn post_title_cannot_break_out_of_json_ld() {
        let mut post = sample_post("p");
        post.title = "</script><script>alert(1)</script>".into();
        let page = with_ctx(|ctx| render_post_page(ctx, &post).unwrap());
        assert!(!page.html.contains("</script><script>alert(1)"));
    }

    #[test]
    fn guide_page_embeds_how_to_and_numbered_steps() {
        let guide = sample_guide("fix-a-tap");
        let page = with_ctx(|ctx| render_guide_page(ctx, &guide).unwrap());
        assert!(page.html.contains(r#""@type":"HowTo""#));
        assert!(page.html.contains(r#""totalTime":"PT45M""#));
        assert!(page.html.contains(r#"id="step-1""#));
        assert!(page.html.contains(r#"id="step-3""#));
        assert!(page.html.contains("Adjustable wrench"));
    }

    #[test]
    fn faq_page_embeds_faq_schema() {
        let entries = vec![sample_faq(1, "First?"), sample_faq(2, "Second?")];
        let page = with_ctx(|ctx| render_faq_page(ctx, &entries).unwrap());
        assert!(page.html.contains(r#""@type":"FAQPage""#));
        let first = page.html.find("First?").unwrap();
        let second = page.html.find("Second?").unwrap();
        assert!(first < second);
    }

    #[test]
    fn category_page_lists_members() {
        let category = sample_category("tools");
        let posts = vec![sample_post("in-tools")];
        let mut other = sample_guide("elsewhere");
        other.category = None;
        let page = with_ctx(|ctx| render_category_page(ctx, &category, &posts, &[other]).unwrap());
        assert!(page.html.contains(r#"href="/blog/in-tools""#));
        assert!(!page.html.contains("/guides/elsewhere"));
        assert!(page.html.contains("--category-color: #3366ff;"));
    }

    #[test]
    fn breadcrumb_nav_does_not_link_current_page() {
        let crumbs = [home_crumb(), Breadcrumb::new("Blog", "/blog")];
        let html = breadcrumb_nav(&crumbs).into_string();
        assert!(html.contains(r#"<a href="/">Home</a>"#));
        assert!(html.contains(r#"<span aria-current="page">Blog</span>"#));
    }

    // =========================================================================
    // Sitemaps
    // =========================================================================

    #[test]
    fn build_sitemaps_all_fresh() {
        let docs = build_sitemaps(&store(), "https://example.com", built_at());
        let names: Vec<&str> = docs.iter().map(|d| d.file_name()).collect();
        assert_eq!(
            names,
            vec![
                "sitemap-index.xml",
                "sitemap-pages.xml",
                "sitemap-blog.xml",
                "sitemap-guides.xml",
            ]
        );
        assert!(docs.iter().all(|d| d.cache == CachePolicy::Fresh));
        let blog = sitemap::parse_locs(&docs[2].body).unwrap();
        assert_eq!(blog.len(), 2);
    }

    #[test]
    fn build_sitemaps_falls_back_per_document() {
        // The content layer validates timestamps, so fake a source that
        // hands out a broken one.
        struct BrokenBlog(ContentStore);
        impl ContentSource for BrokenBlog {
            fn blog_post(&self, s: &str, p: bool) -> Result<Option<BlogPost>, ContentError> {
                self.0.blog_post(s, p)
            }
            fn blog_posts(&self, l: Option<usize>, p: bool) -> Result<Vec<BlogPost>, ContentError> {
                let mut posts = self.0.blog_posts(l, p)?;
                posts[0].sys.updated_at = "yesterday".into();
                Ok(posts)
            }
            fn guide(&self, s: &str, p: bool) -> Result<Option<Guide>, ContentError> {
                self.0.guide(s, p)
            }
            fn guides(&self, l: Option<usize>, p: bool) -> Result<Vec<Guide>, ContentError> {
                self.0.guides(l, p)
            }
            fn category(&self, s: &str) -> Result<Option<Category>, ContentError> {
                self.0.category(s)
            }
            fn categories(&self) -> Result<Vec<Category>, ContentError> {
                self.0.categories()
            }
            fn faq_entries(&self) -> Result<Vec<FaqEntry>, ContentError> {
                self.0.faq_entries()
            }
        }

        let docs = build_sitemaps(&BrokenBlog(store()), "https://example.com", built_at());
        let blog = docs.iter().find(|d| d.kind == SitemapKind::Blog).unwrap();
        assert_eq!(blog.cache, CachePolicy::Fallback);
        assert_eq!(
            sitemap::parse_locs(&blog.body).unwrap(),
            vec!["https://example.com/"]
        );
        let guides = docs.iter().find(|d| d.kind == SitemapKind::Guides).unwrap();
        assert_eq!(guides.cache, CachePolicy::Fresh);
    }

    #[test]
    fn check_counts_content_and_sitemaps() {
        let report = check(&store(), &test_config()).unwrap();
        assert!(report.is_ok(), "{:?}", report.problems);
        assert_eq!(report.blog_posts, 2);
        assert_eq!(report.drafts, 0);
        assert_eq!(report.guides, 1);
        assert_eq!(report.categories, 1);
        assert_eq!(report.faq_entries, 2);
        assert_eq!(
            report.sitemaps,
            vec![
                ("sitemap-index.xml", 3),
                ("sitemap-pages.xml", 5),
                ("sitemap-blog.xml", 2),
                ("sitemap-guides.xml", 1),
            ]
        );
    }

    #[test]
    fn check_reports_invalid_site_url() {
        let config = SiteConfig {
            site_url: Some("ftp://example.com".into()),
            ..SiteConfig::default()
        };
        let report = check(&store(), &config).unwrap();
        assert!(!report.is_ok());
        assert!(report.problems[0].contains("invalid URL"));
    }

    #[test]
    fn headers_file_lists_cache_policy() {
        let docs = vec![
            SitemapDocument::fresh(SitemapKind::Pages, sitemap::render_sitemap(&[])),
            SitemapDocument::fallback(SitemapKind::Blog, "https://example.com"),
        ];
        let headers = render_headers(&docs);
        assert!(headers.contains(
            "/sitemap-pages.xml\n  Content-Type: application/xml; charset=utf-8\n  Cache-Control: public, max-age=3600\n"
        ));
        assert!(headers.contains("/sitemap-blog.xml\n"));
        assert!(headers.contains("Cache-Control: public, max-age=300"));
    }

    #[test]
    fn robots_points_at_sitemap_index() {
        let robots = render_robots("https://example.com/");
        assert!(robots.contains("Sitemap: https://example.com/sitemap-index.xml\n"));
        assert!(robots.contains("Disallow: /preview/"));
    }

    // =========================================================================
    // Full build
    // =========================================================================

    #[test]
    fn generate_writes_pages_sitemaps_and_headers() {
        let tmp = TempDir::new().unwrap();
        let report = generate_at(&store(), &test_config(), tmp.path(), built_at()).unwrap();

        // home, blog index, guide index, faq, 2 posts, 1 guide, 1 category
        assert_eq!(report.pages.len(), 8);
        assert_eq!(report.fallback_count(), 0);
        assert_eq!(report.base_url, "https://example.com");
        for file in [
            "index.html",
            "blog/index.html",
            "blog/first-post/index.html",
            "guides/fix-a-tap/index.html",
            "categories/tools/index.html",
            "faq/index.html",
            "sitemap-index.xml",
            "sitemap-pages.xml",
            "sitemap-blog.xml",
            "sitemap-guides.xml",
            "_headers",
            "robots.txt",
        ] {
            assert!(tmp.path().join(file).is_file(), "missing {file}");
        }
        let pages = report
            .sitemaps
            .iter()
            .find(|s| s.file_name == "sitemap-pages.xml")
            .unwrap();
        assert_eq!(pages.urls, 5);
    }

    #[test]
    fn generate_copies_assets() {
        let tmp = TempDir::new().unwrap();
        let assets = tmp.path().join("assets");
        fs::create_dir_all(assets.join("img")).unwrap();
        fs::write(assets.join("favicon.ico"), b"ico").unwrap();
        fs::write(assets.join("img/logo.png"), b"png").unwrap();

        let mut config = test_config();
        config.build.assets_dir = Some(assets.to_string_lossy().into_owned());
        let out = tmp.path().join("dist");
        let report = generate_at(&store(), &config, &out, built_at()).unwrap();

        assert_eq!(report.assets_copied, 2);
        assert!(out.join("favicon.ico").is_file());
        assert!(out.join("img/logo.png").is_file());
    }

    #[test]
    fn generate_skips_missing_assets_dir() {
        let tmp = TempDir::new().unwrap();
        let mut config = test_config();
        config.build.assets_dir = Some(tmp.path().join("nope").to_string_lossy().into_owned());
        let report = generate_at(&store(), &config, &tmp.path().join("dist"), built_at()).unwrap();
        assert_eq!(report.assets_copied, 0);
    }
}
