//! Common utilities for feed generation.

use crate::{content::Post, log};

/// A post validated for feed inclusion (requires title and date).
#[derive(Debug, Clone)]
pub struct FeedPost {
    pub title: String,
    pub date: String,
    pub permalink: String,
    pub description: Option<String>,
}

impl FeedPost {
    fn from_post(post: &Post) -> Option<Self> {
        Some(Self {
            title: post.meta.title.clone()?,
            date: post.meta.published_at.clone()?,
            permalink: post.permalink.clone(),
            description: post.meta.description.clone(),
        })
    }
}

/// Filter posts valid for feed inclusion (only posts with title and date).
pub fn collect_feed_posts(posts: &[&Post]) -> Vec<FeedPost> {
    let total = posts.len();

    let feed_posts: Vec<FeedPost> = posts.iter().filter_map(|p| FeedPost::from_post(p)).collect();

    let excluded = total - feed_posts.len();
    if excluded > 0 {
        log!("feed"; "excluded {} posts without title or date", excluded);
    }

    feed_posts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::PostMeta;
    use std::path::PathBuf;

    fn make_post(title: Option<&str>, date: Option<&str>) -> Post {
        Post {
            path: PathBuf::from("/content/p.md"),
            slug: "p".to_string(),
            permalink: "/blog/p/".to_string(),
            meta: PostMeta {
                title: title.map(str::to_string),
                published_at: date.map(str::to_string),
                ..Default::default()
            },
            body: String::new(),
        }
    }

    #[test]
    fn test_collect_skips_incomplete_posts() {
        let complete = make_post(Some("Hello"), Some("2024-01-15"));
        let no_date = make_post(Some("No Date"), None);
        let no_title = make_post(None, Some("2024-01-01"));

        let refs: Vec<&Post> = vec![&complete, &no_date, &no_title];
        let feed_posts = collect_feed_posts(&refs);

        assert_eq!(feed_posts.len(), 1);
        assert_eq!(feed_posts[0].title, "Hello");
        assert_eq!(feed_posts[0].permalink, "/blog/p/");
    }
}
