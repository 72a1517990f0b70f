//! Markdown content collection.
//!
//! The content directory is a flat or nested tree of `.md` files, each with
//! optional frontmatter. This module covers:
//!
//! - [`meta`] - the frontmatter schema ([`PostMeta`])
//! - [`frontmatter`] - frontmatter detection and parsing
//! - [`scan`] - walking the content directory
//! - [`store`] - the in-memory post collection, ordering and search

pub mod frontmatter;
pub mod meta;
pub mod scan;
pub mod store;

pub use meta::PostMeta;
pub use scan::{ScanOutcome, scan_posts};
pub use store::{Post, PostStore, SearchEntry};
