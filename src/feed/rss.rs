//! RSS 2.0 feed generation.

use super::common::{FeedPost, collect_feed_posts};
use crate::{config::SiteConfig, content::Post, log, utils::date::DateTimeUtc};
use anyhow::{Result, anyhow};
use regex::Regex;
use rss::{ChannelBuilder, GuidBuilder, ItemBuilder, validation::Validate};
use std::{fs, sync::LazyLock};

/// Build RSS 2.0 feed.
pub fn build_rss(config: &SiteConfig, posts: &[&Post]) -> Result<()> {
    RssFeed::build(config, posts).write()
}

struct RssFeed {
    config: SiteConfig,
    posts: Vec<FeedPost>,
}

impl RssFeed {
    fn build(config: &SiteConfig, posts: &[&Post]) -> Self {
        Self {
            config: config.clone(),
            posts: collect_feed_posts(posts),
        }
    }

    fn into_xml(self) -> Result<String> {
        let items: Vec<_> = self
            .posts
            .iter()
            .filter_map(|post| post_to_rss_item(post, &self.config))
            .collect();

        let channel = ChannelBuilder::default()
            .title(self.config.site.title.clone())
            .link(self.config.site.url.clone().unwrap_or_default())
            .description(self.config.site.description.clone())
            .language(Some(self.config.site.language.clone()))
            .generator(Some("kawara".to_string()))
            .items(items)
            .build();

        channel
            .validate()
            .map_err(|e| anyhow!("RSS validation failed: {e}"))?;
        Ok(channel.to_string())
    }

    fn write(self) -> Result<()> {
        let output_dir = self.config.output_dir();
        let feed_path = self.config.feed.path.clone();
        let xml = self.into_xml()?;
        let rss_path = output_dir.join(&feed_path);

        if let Some(parent) = rss_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&rss_path, &xml)?;

        log!("rss"; "{}", rss_path.file_name().unwrap_or_default().to_string_lossy());
        Ok(())
    }
}

fn post_to_rss_item(post: &FeedPost, config: &SiteConfig) -> Option<rss::Item> {
    let pub_date = DateTimeUtc::parse(&post.date).map(DateTimeUtc::to_rfc2822)?;

    // Build full URL from base URL + permalink
    let link = format!("{}{}", config.base_url(), post.permalink);

    let author = normalize_rss_author(config);

    Some(
        ItemBuilder::default()
            .title(Some(post.title.clone()))
            .link(Some(link.clone()))
            .guid(Some(
                GuidBuilder::default().permalink(true).value(link).build(),
            ))
            .description(post.description.clone())
            .pub_date(Some(pub_date))
            .author(author)
            .build(),
    )
}

/// Normalize the site author to RSS format: "email (Name)"
fn normalize_rss_author(config: &SiteConfig) -> Option<String> {
    static RE_VALID_AUTHOR: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}[ \t]*\([^)]+\)$").unwrap()
    });

    let author = &config.site.author;
    if author.is_empty() {
        return None;
    }

    // Already in "email (Name)" form
    if RE_VALID_AUTHOR.is_match(author) {
        return Some(author.clone());
    }

    Some(format!("{} ({})", config.site.email, author))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_config(author: &str, email: &str) -> SiteConfig {
        let mut config = SiteConfig::default();
        config.site.author = author.to_string();
        config.site.email = email.to_string();
        config.site.url = Some("https://example.com".to_string());
        config
    }

    #[test]
    fn test_normalize_rss_author_already_valid() {
        let config = make_config("site@example.com (Site Author)", "unused@example.com");
        let result = normalize_rss_author(&config);
        assert_eq!(result, Some("site@example.com (Site Author)".to_string()));
    }

    #[test]
    fn test_normalize_rss_author_combined() {
        let config = make_config("Site Author", "site@example.com");
        let result = normalize_rss_author(&config);
        assert_eq!(result, Some("site@example.com (Site Author)".to_string()));
    }

    #[test]
    fn test_normalize_rss_author_empty() {
        let config = make_config("", "site@example.com");
        assert_eq!(normalize_rss_author(&config), None);
    }

    #[test]
    fn test_post_to_rss_item_basic() {
        let config = make_config("Test Author", "test@example.com");
        let post = FeedPost {
            title: "Test Post".to_string(),
            date: "2024-01-15".to_string(),
            permalink: "/blog/test/".to_string(),
            description: Some("A test summary".to_string()),
        };

        let item = post_to_rss_item(&post, &config).expect("should create item");
        assert_eq!(item.title(), Some("Test Post"));
        assert_eq!(item.link(), Some("https://example.com/blog/test/"));
        assert_eq!(item.description(), Some("A test summary"));
        assert!(item.pub_date().unwrap().contains("15 Jan 2024"));
    }

    #[test]
    fn test_post_to_rss_item_invalid_date() {
        let config = make_config("Test Author", "test@example.com");
        let post = FeedPost {
            title: "Test Post".to_string(),
            date: "invalid-date".to_string(),
            permalink: "/blog/test/".to_string(),
            description: None,
        };

        assert!(post_to_rss_item(&post, &config).is_none());
    }

    #[test]
    fn test_feed_xml_orders_and_validates() {
        let mut config = make_config("Test Author", "test@example.com");
        config.site.title = "Test Blog".to_string();
        config.site.description = "A test blog".to_string();

        let feed = RssFeed {
            config,
            posts: vec![
                FeedPost {
                    title: "Newer".to_string(),
                    date: "2024-06-15".to_string(),
                    permalink: "/blog/newer/".to_string(),
                    description: None,
                },
                FeedPost {
                    title: "Older".to_string(),
                    date: "2023-01-01".to_string(),
                    permalink: "/blog/older/".to_string(),
                    description: None,
                },
            ],
        };

        let xml = feed.into_xml().unwrap();
        assert!(xml.contains("<title>Test Blog</title>"));
        // Input order is preserved: caller passes posts newest-first
        let newer = xml.find("Newer").unwrap();
        let older = xml.find("Older").unwrap();
        assert!(newer < older);
    }
}
