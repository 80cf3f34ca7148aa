//! Shared builders for the guidepost test suite.
//!
//! Each builder returns a fully populated record with fixed timestamps so
//! assertions on formatted output stay stable. Tests mutate the returned value
//! to exercise the optional-field paths.

use crate::schema::SchemaConfig;
use crate::types::*;

pub fn sys(id: &str, created_at: &str, updated_at: &str) -> Sys {
    Sys {
        id: id.to_string(),
        created_at: created_at.to_string(),
        updated_at: updated_at.to_string(),
    }
}

/// Site identity used by structured-data tests.
pub fn schema_config() -> SchemaConfig {
    SchemaConfig {
        site_url: "https://example.com".to_string(),
        site_name: "Example Site".to_string(),
        organization_name: "Example Org".to_string(),
        logo_url: Some("/logo.png".to_string()),
        social_links: vec!["https://twitter.com/example".to_string()],
    }
}

pub fn sample_asset(url: &str, dimensions: Option<(u32, u32)>) -> Asset {
    let file_name = url.rsplit('/').next().unwrap_or(url).to_string();
    Asset {
        sys: sys("asset-1", "2024-01-01T00:00:00Z", "2024-01-01T00:00:00Z"),
        fields: AssetFields {
            title: file_name.clone(),
            description: None,
            file: AssetFile {
                url: url.to_string(),
                file_name,
                content_type: "image/jpeg".to_string(),
                details: FileDetails {
                    size: 48_213,
                    image: dimensions.map(|(width, height)| ImageDimensions { width, height }),
                },
            },
        },
    }
}

/// Category with `updatedAt` = 2024-01-10T08:00:00Z.
pub fn sample_category(slug: &str) -> Category {
    Category {
        sys: sys(
            &format!("cat-{slug}"),
            "2024-01-01T08:00:00Z",
            "2024-01-10T08:00:00Z",
        ),
        name: "Tools".to_string(),
        slug: slug.to_string(),
        description: "Picking and caring for tools.".to_string(),
        color: "#3366ff".to_string(),
        featured_image: None,
    }
}

/// Blog post with `updatedAt` = 2024-02-01T12:30:00Z, tags `diy`/`tools`.
pub fn sample_post(slug: &str) -> BlogPost {
    BlogPost {
        sys: sys(
            &format!("post-{slug}"),
            "2024-01-20T09:00:00Z",
            "2024-02-01T12:30:00Z",
        ),
        title: format!("Post {slug}"),
        slug: slug.to_string(),
        excerpt: "A short summary of the post.".to_string(),
        content: "## Intro\n\nSome **markdown** body.".to_string(),
        author: Author {
            name: "Jane Doe".to_string(),
            slug: Some("jane-doe".to_string()),
            bio: None,
            avatar: None,
        },
        category: Some(sample_category("tools")),
        tags: vec!["diy".to_string(), "tools".to_string()],
        published_at: "2024-01-21T10:00:00Z".to_string(),
        featured_image: None,
        seo: None,
    }
}

/// Three-step guide, 45 minutes, two tools, with a featured image.
pub fn sample_guide(slug: &str) -> Guide {
    Guide {
        sys: sys(
            &format!("guide-{slug}"),
            "2024-01-05T09:00:00Z",
            "2024-02-15T09:00:00Z",
        ),
        title: format!("Guide {slug}"),
        slug: slug.to_string(),
        description: "Step-by-step instructions.".to_string(),
        content: "Before you start, turn off the water.".to_string(),
        difficulty: Difficulty::Beginner,
        estimated_time: 45,
        steps: vec![
            GuideStep {
                title: "Shut off the supply".to_string(),
                content: "Close the isolation valve under the sink.".to_string(),
                image: None,
            },
            GuideStep {
                title: "Remove the handle".to_string(),
                content: "Unscrew the cap and lift the handle off.".to_string(),
                image: None,
            },
            GuideStep {
                title: "Replace the washer".to_string(),
                content: "Swap in the new washer and reassemble.".to_string(),
                image: None,
            },
        ],
        tools: vec![
            "Adjustable wrench".to_string(),
            "Replacement washer".to_string(),
        ],
        category: Some(sample_category("tools")),
        featured_image: Some(sample_asset("/images/tap.jpg", Some((1600, 900)))),
    }
}

pub fn sample_faq(order: i32, question: &str) -> FaqEntry {
    FaqEntry {
        sys: sys(
            &format!("faq-{order}"),
            "2024-01-01T00:00:00Z",
            "2024-01-01T00:00:00Z",
        ),
        question: question.to_string(),
        answer: format!("Answer to {question}"),
        category: "General".to_string(),
        order,
    }
}
