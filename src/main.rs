use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use guidepost::config::{self, SiteConfig};
use guidepost::content::ContentStore;
use guidepost::sitemap::{self, SitemapKind};
use guidepost::{generate, output};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "guidepost")]
#[command(about = "Static site generator for a blog and how-to guides, with sitemaps and JSON-LD")]
#[command(long_about = "\
Static site generator for a blog and how-to guides, with sitemaps and JSON-LD

Content comes from a CMS JSON export (or the built-in sample dataset) and is
rendered to plain HTML. Every page carries canonical/Open Graph meta tags and
schema.org JSON-LD; four XML sitemaps, robots.txt and a _headers file are
written next to the pages.

Output structure:

  dist/
  ├── index.html                   # Organization + WebSite
  ├── blog/<slug>/index.html       # BlogPosting + BreadcrumbList
  ├── guides/<slug>/index.html     # HowTo + BreadcrumbList
  ├── categories/<slug>/index.html # BreadcrumbList
  ├── faq/index.html               # FAQPage
  ├── sitemap-index.xml            # references the three below
  ├── sitemap-pages.xml
  ├── sitemap-blog.xml
  ├── sitemap-guides.xml
  ├── robots.txt
  └── _headers

The SITE_URL environment variable overrides site_url from the config file.
Set RUST_LOG=debug for per-page logging.

Run 'guidepost gen-config' to generate a documented site.toml.")]
#[command(version)]
struct Cli {
    /// Site config file (missing file = stock defaults)
    #[arg(long, default_value = "site.toml", global = true)]
    config: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate the full site into the output directory
    Build,
    /// Print one sitemap document to stdout
    Sitemap {
        #[arg(long, value_enum, default_value_t = KindArg::Index)]
        kind: KindArg,
    },
    /// Validate config and content without writing anything
    Check,
    /// Print a stock site.toml with all options documented
    GenConfig,
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Index,
    Pages,
    Blog,
    Guides,
}

impl From<KindArg> for SitemapKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Index => SitemapKind::Index,
            KindArg::Pages => SitemapKind::Pages,
            KindArg::Blog => SitemapKind::Blog,
            KindArg::Guides => SitemapKind::Guides,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Build => {
            let (site_config, store) = open_site(&cli.config)?;
            println!("==> Building {}", cli.output.display());
            let report = generate::generate(&store, &site_config, &cli.output)?;
            output::print_generate_output(&report);
            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Sitemap { kind } => {
            let (site_config, store) = open_site(&cli.config)?;
            let base_url = sitemap::base_url(&site_config);
            let doc = generate::sitemap_document(kind.into(), &store, &base_url, Utc::now());
            print!("{}", doc.body);
        }
        Command::Check => {
            let (site_config, store) = open_site(&cli.config)?;
            println!("==> Checking {}", cli.config.display());
            let report = generate::check(&store, &site_config)?;
            output::print_check_output(&report);
            if !report.is_ok() {
                return Err(format!("{} problem(s) found", report.problems.len()).into());
            }
            println!("==> Content is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Load `site.toml`, apply the `SITE_URL` override, and open the content source.
///
/// This is the only place process environment is read.
fn open_site(path: &Path) -> Result<(SiteConfig, ContentStore), Box<dyn std::error::Error>> {
    let site_config =
        config::load_config(path)?.with_site_url_override(std::env::var("SITE_URL").ok());
    site_config.validate()?;
    let store = ContentStore::open(&site_config.content)?;
    Ok((site_config, store))
}
