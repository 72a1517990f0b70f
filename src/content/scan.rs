//! Content directory scanning.
//!
//! Walks the content directory for markdown sources and parses frontmatter
//! in parallel. Files that fail to read or parse are logged and skipped so
//! one broken post does not abort the whole build.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rayon::prelude::*;

use super::store::Post;
use crate::config::SiteConfig;
use crate::log;

/// Result of a content scan. `posts` includes drafts; callers decide per
/// surface whether drafts are visible (pages: configurable, feed and
/// search index: never).
pub struct ScanOutcome {
    pub posts: Vec<Post>,
    pub draft_count: usize,
    /// Number of files skipped because they could not be read or parsed.
    pub error_count: usize,
}

/// Scan the configured content directory.
pub fn scan_posts(config: &SiteConfig) -> Result<ScanOutcome> {
    let content_dir = config.content_dir();
    let files = collect_markdown_files(&content_dir)?;

    let results: Vec<_> = files
        .par_iter()
        .map(|path| {
            std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))
                .and_then(|source| Post::from_source(path.clone(), &content_dir, &source))
        })
        .collect();

    let mut posts = Vec::with_capacity(results.len());
    let mut error_count = 0;
    for result in results {
        match result {
            Ok(post) => posts.push(post),
            Err(e) => {
                log!("warning"; "{:#}", e);
                error_count += 1;
            }
        }
    }

    let draft_count = posts.iter().filter(|p| p.meta.draft).count();

    Ok(ScanOutcome {
        posts,
        draft_count,
        error_count,
    })
}

/// Collect `.md`/`.markdown` files under `content_dir`, sorted for
/// deterministic output.
fn collect_markdown_files(content_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in jwalk::WalkDir::new(content_dir).sort(true) {
        let entry = entry.context("content directory walk failed")?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("md" | "markdown")
        ) {
            files.push(path);
        }
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_post(dir: &Path, name: &str, content: &str) {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn config_for(root: &Path) -> SiteConfig {
        let mut config = SiteConfig::default();
        config.root = root.to_path_buf();
        config.build.content = PathBuf::from("content");
        config
    }

    #[test]
    fn test_scan_collects_posts_and_counts_drafts() {
        let tmp = tempfile::tempdir().unwrap();
        let content = tmp.path().join("content");

        write_post(
            &content,
            "hello.md",
            "---\ntitle: Hello\npublishedAt: 2024-01-15\n---\nBody",
        );
        write_post(
            &content,
            "2024/nested.md",
            "---\ntitle: Nested\npublishedAt: 2024-02-01\n---\nBody",
        );
        write_post(
            &content,
            "wip.md",
            "---\ntitle: WIP\ndraft: true\n---\nBody",
        );
        write_post(&content, "notes.txt", "ignored");

        let outcome = scan_posts(&config_for(tmp.path())).unwrap();
        assert_eq!(outcome.posts.len(), 3);
        assert_eq!(outcome.draft_count, 1);
        assert_eq!(outcome.error_count, 0);

        let slugs: Vec<_> = outcome.posts.iter().map(|p| p.slug.as_str()).collect();
        assert!(slugs.contains(&"hello"));
        assert!(slugs.contains(&"2024/nested"));
    }

    #[test]
    fn test_scan_skips_broken_frontmatter() {
        let tmp = tempfile::tempdir().unwrap();
        let content = tmp.path().join("content");

        write_post(&content, "good.md", "---\ntitle: Good\n---\nBody");
        write_post(&content, "bad.md", "+++\ntitle = = broken\n+++\nBody");

        let outcome = scan_posts(&config_for(tmp.path())).unwrap();
        assert_eq!(outcome.posts.len(), 1);
        assert_eq!(outcome.error_count, 1);
    }

    #[test]
    fn test_scan_empty_directory() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("content")).unwrap();

        let outcome = scan_posts(&config_for(tmp.path())).unwrap();
        assert!(outcome.posts.is_empty());
        assert_eq!(outcome.draft_count, 0);
    }
}
