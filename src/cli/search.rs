//! Search command implementation.
//!
//! Runs the same case-insensitive title search that `search.json` powers in
//! the browser, but against the content directory directly. Drafts are
//! hidden unless `--drafts` is passed.

use std::fs;
use std::io::Write;

use anyhow::Result;

use crate::cli::SearchArgs;
use crate::config::SiteConfig;
use crate::content::{Post, PostStore, ScanOutcome, SearchEntry, scan_posts};
use crate::log;
use crate::utils::plural_count;

/// Execute search command.
pub fn run_search(args: &SearchArgs, config: &SiteConfig) -> Result<()> {
    let ScanOutcome { posts, .. } = scan_posts(config)?;
    let store = PostStore::new(posts);

    let hits: Vec<&Post> = store
        .search(&args.query)
        .into_iter()
        .filter(|p| args.drafts || !p.meta.draft)
        .collect();

    log!("search"; "found {}", plural_count(hits.len(), "result"));

    output_results(&hits, args)
}

fn output_results(hits: &[&Post], args: &SearchArgs) -> Result<()> {
    if hits.is_empty() {
        return Ok(());
    }

    let formatted = if args.json || args.pretty {
        let entries: Vec<SearchEntry> = hits.iter().map(|p| SearchEntry::from(*p)).collect();
        if args.pretty {
            serde_json::to_string_pretty(&entries)?
        } else {
            serde_json::to_string(&entries)?
        }
    } else {
        hits.iter()
            .map(|post| format_hit(post))
            .collect::<Vec<_>>()
            .join("\n")
    };

    if let Some(output_path) = &args.output {
        let mut file = fs::File::create(output_path)?;
        writeln!(file, "{formatted}")?;
        log!("search"; "wrote output to {}", output_path.display());
    } else {
        println!("{formatted}");
    }

    Ok(())
}

/// One line per hit: date, title and permalink.
fn format_hit(post: &Post) -> String {
    let date = post.meta.published_at.as_deref().unwrap_or("          ");
    let title = post.meta.title.as_deref().unwrap_or(&post.slug);
    format!("{date}  {title}  {}", post.permalink)
}
