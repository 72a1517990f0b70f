//! Atom 1.0 feed generation.

use super::common::{FeedPost, collect_feed_posts};
use crate::{config::SiteConfig, content::Post, log, utils::date::DateTimeUtc};
use anyhow::Result;
use atom_syndication::{
    Entry, EntryBuilder, Feed, FeedBuilder, FixedDateTime, GeneratorBuilder, Link, LinkBuilder,
    Person, PersonBuilder, Text,
};
use std::fs;

/// Build Atom 1.0 feed.
pub fn build_atom(config: &SiteConfig, posts: &[&Post]) -> Result<()> {
    AtomFeed::build(config, posts).write()
}

struct AtomFeed {
    config: SiteConfig,
    posts: Vec<FeedPost>,
}

impl AtomFeed {
    fn build(config: &SiteConfig, posts: &[&Post]) -> Self {
        Self {
            config: config.clone(),
            posts: collect_feed_posts(posts),
        }
    }

    fn into_xml(self) -> Result<String> {
        let base_url = self.config.base_url().to_string();

        let entries: Vec<Entry> = self
            .posts
            .iter()
            .filter_map(|post| post_to_atom_entry(post, &self.config))
            .collect();

        // Feed updated = most recent post date. RFC 3339 strings compare
        // lexicographically, so max() over strings is max over instants.
        let updated_str = self
            .posts
            .iter()
            .filter_map(|p| DateTimeUtc::parse(&p.date).map(|dt| dt.to_rfc3339()))
            .max()
            .unwrap_or_else(|| "1970-01-01T00:00:00Z".to_string());

        let updated: FixedDateTime = updated_str
            .parse()
            .unwrap_or_else(|_| FixedDateTime::default());

        let author: Person = PersonBuilder::default()
            .name(self.config.site.author.clone())
            .email(Some(self.config.site.email.clone()))
            .build();

        let self_link: Link = LinkBuilder::default()
            .href(format!("{}/{}", base_url, self.config.feed.path.display()))
            .rel("self".to_string())
            .mime_type(Some("application/atom+xml".to_string()))
            .build();

        let alternate_link: Link = LinkBuilder::default()
            .href(base_url.clone())
            .rel("alternate".to_string())
            .build();

        let feed: Feed = FeedBuilder::default()
            .title(Text::plain(self.config.site.title.clone()))
            .id(base_url)
            .updated(updated)
            .authors(vec![author])
            .links(vec![self_link, alternate_link])
            .subtitle(Some(Text::plain(self.config.site.description.clone())))
            .generator(Some(GeneratorBuilder::default().value("kawara").build()))
            .lang(Some(self.config.site.language.clone()))
            .entries(entries)
            .build();

        Ok(feed.to_string())
    }

    fn write(self) -> Result<()> {
        let output_dir = self.config.output_dir();
        let feed_path = self.config.feed.path.clone();
        let xml = self.into_xml()?;
        let atom_path = output_dir.join(&feed_path);

        if let Some(parent) = atom_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&atom_path, &xml)?;

        log!("atom"; "{}", atom_path.file_name().unwrap_or_default().to_string_lossy());
        Ok(())
    }
}

fn post_to_atom_entry(post: &FeedPost, config: &SiteConfig) -> Option<Entry> {
    let updated_str = DateTimeUtc::parse(&post.date)?.to_rfc3339();
    let updated: FixedDateTime = updated_str.parse().ok()?;

    let link = format!("{}{}", config.base_url(), post.permalink);

    let entry_link: Link = LinkBuilder::default()
        .href(link.clone())
        .rel("alternate".to_string())
        .build();

    Some(
        EntryBuilder::default()
            .title(Text::plain(post.title.clone()))
            .id(link)
            .updated(updated)
            .links(vec![entry_link])
            .summary(post.description.clone().map(Text::plain))
            .build(),
    )
}
