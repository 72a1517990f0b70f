//! Build command implementation.
//!
//! Build pipeline phases:
//! - **Init** - prepare (and optionally clean) the output directory
//! - **Scan** - collect and parse content files
//! - **Render** - parallel markdown to HTML page rendering
//! - **Index** - write `search.json` for client-side search
//! - **Feed** - RSS/Atom generation
//!
//! Draft posts render as pages unless `--skip-drafts` (or the config
//! equivalent) is set, but never reach the feed or the search index.

use std::fs;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use rayon::prelude::*;

use crate::cli::BuildArgs;
use crate::config::SiteConfig;
use crate::content::{Post, PostStore, ScanOutcome, SearchEntry, scan_posts};
use crate::markdown::render_html;
use crate::utils::plural_count;
use crate::{debug, log};

/// Build the entire site.
pub fn build_site(config: &SiteConfig, args: &BuildArgs) -> Result<()> {
    let start = Instant::now();

    let output_dir = config.output_dir();
    init_output_dir(&output_dir, args.clean)?;

    let ScanOutcome {
        posts,
        draft_count,
        error_count,
    } = scan_posts(config)?;

    if error_count > 0 {
        log!("build"; "{} skipped due to errors", plural_count(error_count, "file"));
    }

    let store = PostStore::new(posts);
    let skip_drafts = config.build.skip_drafts || args.skip_drafts;
    if skip_drafts && draft_count > 0 {
        log!("build"; "{} skipped", plural_count(draft_count, "draft"));
    }

    let rendered = render_pages(config, &store, skip_drafts)?;

    write_search_index(&output_dir, &store)?;

    let published: Vec<&Post> = store.published().collect();
    let feed_enabled = args.feed.unwrap_or(config.feed.enable);
    if feed_enabled {
        let mut feed_config = config.clone();
        feed_config.feed.enable = true;
        crate::feed::build_feed(&feed_config, &published)?;
    }

    log!("build";
        "rendered {} in {:.2}s",
        plural_count(rendered, "page"),
        start.elapsed().as_secs_f32()
    );

    Ok(())
}

/// Prepare the output directory, optionally removing stale output first.
fn init_output_dir(output_dir: &Path, clean: bool) -> Result<()> {
    if clean && output_dir.exists() {
        debug!("build"; "cleaning {}", output_dir.display());
        fs::remove_dir_all(output_dir)
            .with_context(|| format!("failed to clean {}", output_dir.display()))?;
    }
    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create {}", output_dir.display()))?;
    Ok(())
}

/// Render post pages in parallel. Returns the number of pages written.
fn render_pages(config: &SiteConfig, store: &PostStore, skip_drafts: bool) -> Result<usize> {
    let output_dir = config.output_dir();

    let targets: Vec<&Post> = store
        .posts()
        .iter()
        .filter(|p| !skip_drafts || !p.meta.draft)
        .collect();

    targets
        .par_iter()
        .try_for_each(|post| render_post_page(post, &output_dir))?;

    Ok(targets.len())
}

/// Render one post to `<output>/blog/<slug>/index.html`.
fn render_post_page(post: &Post, output_dir: &Path) -> Result<()> {
    let html = render_html(&post.body)
        .with_context(|| format!("failed to render {}", post.path.display()))?;

    let page = page_shell(post, &html);

    // permalink is "/blog/<slug>/", map it to blog/<slug>/index.html
    let rel = post.permalink.trim_matches('/');
    let page_dir = output_dir.join(rel);
    fs::create_dir_all(&page_dir)
        .with_context(|| format!("failed to create {}", page_dir.display()))?;

    let page_path = page_dir.join("index.html");
    fs::write(&page_path, page)
        .with_context(|| format!("failed to write {}", page_path.display()))?;

    debug!("build"; "{}", post.permalink);
    Ok(())
}

/// Wrap rendered post HTML in a minimal document shell.
fn page_shell(post: &Post, body_html: &str) -> String {
    let title = escape_html(post.meta.title.as_deref().unwrap_or(&post.slug));
    let description = escape_html(post.meta.description.as_deref().unwrap_or_default());

    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <meta name=\"description\" content=\"{description}\">\n\
         <title>{title}</title>\n</head>\n<body>\n\
         <article>\n<h1>{title}</h1>\n{body_html}</article>\n</body>\n</html>\n"
    )
}

/// Minimal HTML escaping for text placed in attributes and titles.
fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Write `search.json` with entries for all published posts, in store order.
fn write_search_index(output_dir: &Path, store: &PostStore) -> Result<()> {
    let entries: Vec<SearchEntry> = store.published().map(SearchEntry::from).collect();

    let json = serde_json::to_string(&entries)?;
    let index_path = output_dir.join("search.json");
    fs::write(&index_path, json)
        .with_context(|| format!("failed to write {}", index_path.display()))?;

    log!("build"; "search.json ({})", plural_count(entries.len(), "post"));
    Ok(())
}
