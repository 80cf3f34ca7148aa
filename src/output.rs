//! CLI output formatting for every command.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. Each page leads with
//! its title and URL; the written file follows as secondary context after an
//! arrow. Sitemaps lead with their file name, then the URL count and how long
//! they may be cached.
//!
//! # Output Format
//!
//! ## Build
//!
//! ```text
//! Pages
//! 001 Home / → index.html
//! 002 Blog /blog → blog/index.html
//!     001 Why your tap keeps dripping → blog/why-your-tap-keeps-dripping/index.html
//!
//! Sitemaps
//!     sitemap-index.xml: 3 URLs (max-age=3600)
//!     sitemap-blog.xml: 1 URL (max-age=300, fallback)
//!
//! Generated 12 pages, 4 sitemaps, 2 assets → https://example.com
//! ```
//!
//! ## Check
//!
//! ```text
//! Content
//!     3 blog posts (1 draft)
//!     3 guides
//!     3 categories
//!     3 FAQ entries
//!
//! Sitemaps (https://example.com)
//!     sitemap-pages.xml: 7 URLs
//!
//! Problems
//!     sitemap-blog.xml: Sitemap error: Invalid timestamp: "yesterday"
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::generate::{CheckReport, GenerateReport, PageKind, PageSummary};
use crate::sitemap::CachePolicy;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `1 URL`, `2 URLs`.
fn plural(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}

fn page_line(depth: usize, index: usize, page: &PageSummary, with_url: bool) -> String {
    let url = if with_url {
        format!(" {}", page.url_path)
    } else {
        String::new()
    };
    format!(
        "{}{} {}{} \u{2192} {}",
        indent(depth),
        format_index(index),
        page.title,
        url,
        page.file.display()
    )
}

/// Detail pages listed under their index page.
fn children_of(kind: PageKind) -> Option<PageKind> {
    match kind {
        PageKind::BlogIndex => Some(PageKind::BlogPost),
        PageKind::GuideIndex => Some(PageKind::Guide),
        _ => None,
    }
}

// ============================================================================
// Build
// ============================================================================

/// Format build output: the page tree, then the sitemaps, then a summary.
pub fn format_generate_output(report: &GenerateReport) -> Vec<String> {
    let mut lines = vec!["Pages".to_string()];
    let top_level = report
        .pages
        .iter()
        .filter(|p| !matches!(p.kind, PageKind::BlogPost | PageKind::Guide));

    for (i, page) in top_level.enumerate() {
        lines.push(page_line(0, i + 1, page, true));
        if let Some(child_kind) = children_of(page.kind) {
            let children = report.pages.iter().filter(|p| p.kind == child_kind);
            for (j, child) in children.enumerate() {
                lines.push(page_line(1, j + 1, child, false));
            }
        }
    }

    lines.push(String::new());
    lines.push("Sitemaps".to_string());
    for sitemap in &report.sitemaps {
        let fallback = if sitemap.cache == CachePolicy::Fallback {
            ", fallback"
        } else {
            ""
        };
        lines.push(format!(
            "{}{}: {} (max-age={}{})",
            indent(1),
            sitemap.file_name,
            plural(sitemap.urls, "URL", "URLs"),
            sitemap.cache.max_age(),
            fallback
        ));
    }

    lines.push(String::new());
    lines.push(format!(
        "Generated {}, {}, {} \u{2192} {}",
        plural(report.pages.len(), "page", "pages"),
        plural(report.sitemaps.len(), "sitemap", "sitemaps"),
        plural(report.assets_copied, "asset", "assets"),
        report.base_url
    ));
    lines
}

/// Print build output to stdout.
pub fn print_generate_output(report: &GenerateReport) {
    for line in format_generate_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Check
// ============================================================================

/// Format check output: content counts, sitemap URL counts, problems.
pub fn format_check_output(report: &CheckReport) -> Vec<String> {
    let drafts = if report.drafts > 0 {
        format!(" ({})", plural(report.drafts, "draft", "drafts"))
    } else {
        String::new()
    };
    let mut lines = vec![
        "Content".to_string(),
        format!(
            "{}{}{}",
            indent(1),
            plural(report.blog_posts, "blog post", "blog posts"),
            drafts
        ),
        format!("{}{}", indent(1), plural(report.guides, "guide", "guides")),
        format!(
            "{}{}",
            indent(1),
            plural(report.categories, "category", "categories")
        ),
        format!(
            "{}{}",
            indent(1),
            plural(report.faq_entries, "FAQ entry", "FAQ entries")
        ),
        String::new(),
        format!("Sitemaps ({})", report.base_url),
    ];
    for (file_name, urls) in &report.sitemaps {
        lines.push(format!(
            "{}{}: {}",
            indent(1),
            file_name,
            plural(*urls, "URL", "URLs")
        ));
    }

    if !report.problems.is_empty() {
        lines.push(String::new());
        lines.push("Problems".to_string());
        for problem in &report.problems {
            lines.push(format!("{}{}", indent(1), problem));
        }
    }
    lines
}

/// Print check output to stdout.
pub fn print_check_output(report: &CheckReport) {
    for line in format_check_output(report) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::SitemapSummary;
    use std::path::PathBuf;

    fn page(kind: PageKind, title: &str, url_path: &str) -> PageSummary {
        PageSummary {
            kind,
            title: title.to_string(),
            url_path: url_path.to_string(),
            file: crate::generate::page_file(url_path),
        }
    }

    fn report() -> GenerateReport {
        GenerateReport {
            base_url: "https://example.com".to_string(),
            pages: vec![
                page(PageKind::Home, "Home", "/"),
                page(PageKind::BlogIndex, "Blog", "/blog"),
                page(PageKind::GuideIndex, "Guides", "/guides"),
                page(PageKind::Faq, "FAQ", "/faq"),
                page(PageKind::BlogPost, "First", "/blog/first"),
                page(PageKind::BlogPost, "Second", "/blog/second"),
                page(PageKind::Guide, "Fix a tap", "/guides/fix-a-tap"),
            ],
            sitemaps: vec![
                SitemapSummary {
                    file_name: "sitemap-index.xml",
                    urls: 3,
                    cache: CachePolicy::Fresh,
                },
                SitemapSummary {
                    file_name: "sitemap-blog.xml",
                    urls: 1,
                    cache: CachePolicy::Fallback,
                },
            ],
            assets_copied: 0,
        }
    }

    // =========================================================================
    // Helper tests
    // =========================================================================

    #[test]
    fn format_index_pads_to_three() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(1000), "1000");
    }

    #[test]
    fn plural_picks_form() {
        assert_eq!(plural(0, "URL", "URLs"), "0 URLs");
        assert_eq!(plural(1, "URL", "URLs"), "1 URL");
        assert_eq!(plural(2, "category", "categories"), "2 categories");
    }

    // =========================================================================
    // Build output
    // =========================================================================

    #[test]
    fn generate_output_nests_detail_pages() {
        let lines = format_generate_output(&report());
        assert_eq!(lines[0], "Pages");
        assert_eq!(lines[1], "001 Home / \u{2192} index.html");
        assert_eq!(lines[2], "002 Blog /blog \u{2192} blog/index.html");
        assert_eq!(lines[3], "    001 First \u{2192} blog/first/index.html");
        assert_eq!(lines[4], "    002 Second \u{2192} blog/second/index.html");
        assert_eq!(lines[5], "003 Guides /guides \u{2192} guides/index.html");
        assert_eq!(
            lines[6],
            "    001 Fix a tap \u{2192} guides/fix-a-tap/index.html"
        );
        assert_eq!(lines[7], "004 FAQ /faq \u{2192} faq/index.html");
    }

    #[test]
    fn generate_output_marks_fallback_sitemaps() {
        let lines = format_generate_output(&report());
        assert!(lines.contains(&"    sitemap-index.xml: 3 URLs (max-age=3600)".to_string()));
        assert!(lines.contains(&"    sitemap-blog.xml: 1 URL (max-age=300, fallback)".to_string()));
    }

    #[test]
    fn generate_output_summary_line() {
        let lines = format_generate_output(&report());
        assert_eq!(
            lines.last().unwrap(),
            "Generated 7 pages, 2 sitemaps, 0 assets \u{2192} https://example.com"
        );
    }

    #[test]
    fn page_file_display_is_relative() {
        let p = page(PageKind::Category, "Tools", "/categories/tools");
        assert_eq!(p.file, PathBuf::from("categories/tools/index.html"));
    }

    // =========================================================================
    // Check output
    // =========================================================================

    #[test]
    fn check_output_clean() {
        let report = CheckReport {
            base_url: "https://example.com".into(),
            blog_posts: 3,
            drafts: 1,
            guides: 1,
            categories: 2,
            faq_entries: 1,
            sitemaps: vec![("sitemap-pages.xml", 6)],
            problems: vec![],
        };
        let lines = format_check_output(&report);
        assert_eq!(
            lines,
            vec![
                "Content",
                "    3 blog posts (1 draft)",
                "    1 guide",
                "    2 categories",
                "    1 FAQ entry",
                "",
                "Sitemaps (https://example.com)",
                "    sitemap-pages.xml: 6 URLs",
            ]
        );
    }

    #[test]
    fn check_output_lists_problems() {
        let report = CheckReport {
            problems: vec!["sitemap-blog.xml: bad".into()],
            ..CheckReport::default()
        };
        let lines = format_check_output(&report);
        let idx = lines.iter().position(|l| l == "Problems").unwrap();
        assert_eq!(lines[idx + 1], "    sitemap-blog.xml: bad");
        assert_eq!(lines[1], "    0 blog posts");
    }
}
