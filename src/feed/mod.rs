//! Feed generation (RSS, Atom).
//!
//! Generates syndication feeds from scanned post metadata:
//!
//! - **RSS 2.0**: Standard feed format (`rss.xml`)
//! - **Atom 1.0**: Modern feed format (`atom.xml`)

use crate::config::{FeedFormat, SiteConfig};
use crate::content::Post;
use anyhow::Result;

pub mod atom;
mod common;
pub mod rss;

/// Build feed if enabled in config (RSS or Atom based on format setting).
///
/// Draft posts never appear in feeds, regardless of build settings.
pub fn build_feed(config: &SiteConfig, posts: &[&Post]) -> Result<()> {
    if config.feed.enable {
        match config.feed.format {
            FeedFormat::Rss => rss::build_rss(config, posts)?,
            FeedFormat::Atom => atom::build_atom(config, posts)?,
        }
    }
    Ok(())
}
