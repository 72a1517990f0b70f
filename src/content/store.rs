//! In-memory post collection: ordering, permalinks and title search.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Serialize;

use super::frontmatter;
use super::meta::PostMeta;
use crate::utils::date::DateTimeUtc;

/// A scanned post: metadata plus the markdown body awaiting rendering.
#[derive(Debug, Clone)]
pub struct Post {
    /// Absolute path of the source file.
    pub path: PathBuf,
    /// Content-relative identifier without extension, `/`-separated.
    pub slug: String,
    /// Site-relative URL path: `/blog/<slug>/`.
    pub permalink: String,
    pub meta: PostMeta,
    pub body: String,
}

impl Post {
    /// Build a post from its source text.
    ///
    /// Sources without frontmatter get default metadata and render as-is.
    pub fn from_source(path: PathBuf, content_dir: &Path, source: &str) -> Result<Self> {
        let (meta, body) = match frontmatter::extract(source)? {
            Some((meta, body)) => (meta, body.to_string()),
            None => (PostMeta::default(), source.to_string()),
        };

        let slug = slug_from_path(&path, content_dir);
        let permalink = format!("/blog/{slug}/");

        Ok(Self {
            path,
            slug,
            permalink,
            meta,
            body,
        })
    }

    /// Sortable key for date ordering (RFC 3339 sorts lexicographically).
    fn date_key(&self) -> Option<String> {
        let raw = self.meta.published_at.as_deref()?;
        DateTimeUtc::parse(raw).map(DateTimeUtc::to_rfc3339)
    }
}

/// Derive the slug from the content-relative path: strip the extension,
/// join nested directories with `/`.
fn slug_from_path(path: &Path, content_dir: &Path) -> String {
    let relative = path.strip_prefix(content_dir).unwrap_or(path);
    let without_ext = relative.with_extension("");

    without_ext
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Entry of the search index (`search.json`) and of `search` command output.
#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct SearchEntry {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub published_at: Option<String>,
    pub slug: String,
}

impl From<&Post> for SearchEntry {
    fn from(post: &Post) -> Self {
        Self {
            title: post.meta.title.clone().unwrap_or_default(),
            description: post.meta.description.clone().unwrap_or_default(),
            tags: post.meta.tags.clone(),
            published_at: post.meta.published_at.clone(),
            slug: post.slug.clone(),
        }
    }
}

/// Posts ordered by publication date descending; undated posts last.
#[derive(Debug, Default)]
pub struct PostStore {
    posts: Vec<Post>,
}

impl PostStore {
    pub fn new(mut posts: Vec<Post>) -> Self {
        posts.sort_by(|a, b| match (a.date_key(), b.date_key()) {
            (Some(x), Some(y)) => y.cmp(&x).then_with(|| a.slug.cmp(&b.slug)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => a.slug.cmp(&b.slug),
        });
        Self { posts }
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    /// Non-draft posts, in store order.
    pub fn published(&self) -> impl Iterator<Item = &Post> {
        self.posts.iter().filter(|p| !p.meta.draft)
    }

    /// Case-insensitive title substring search.
    ///
    /// A blank query matches nothing (not everything): an empty search box
    /// shows no results.
    pub fn search(&self, query: &str) -> Vec<&Post> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        self.posts
            .iter()
            .filter(|post| {
                post.meta
                    .title
                    .as_deref()
                    .unwrap_or_default()
                    .to_lowercase()
                    .contains(&needle)
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}
