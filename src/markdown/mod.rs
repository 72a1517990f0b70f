//! Markdown rendering for post bodies.
//!
//! This module contains the comrak-based pipeline:
//!
//! - [`default_options`] - the extension/render settings used everywhere
//! - [`embed`] - bare YouTube URL → embed widget AST rewrite
//! - [`render_html`] - parse → rewrite → HTML
//!
//! Frontmatter is stripped before the body reaches this module (see
//! `content::frontmatter`), so the pipeline only ever sees markdown proper.

pub mod embed;

use anyhow::Result;
use comrak::{Arena, Options, format_html, parse_document};

pub use embed::rewrite_youtube_embeds;

/// Markdown options shared by rendering and tests.
///
/// Raw HTML output must stay enabled: the embed rewriter injects HTML
/// blocks that would otherwise be escaped by the formatter.
pub fn default_options() -> Options<'static> {
    let mut options = Options::default();

    let ext = &mut options.extension;
    ext.strikethrough = true;
    ext.table = true;
    ext.autolink = true;
    ext.tasklist = true;
    ext.footnotes = true;

    let render = &mut options.render;
    render.github_pre_lang = true;
    render.r#unsafe = true;

    options
}

/// Render a post body to HTML.
///
/// Parses the markdown into an arena AST, rewrites bare YouTube URLs into
/// embed widgets, then formats the (mutated) tree to HTML.
pub fn render_html(body: &str) -> Result<String> {
    let options = default_options();
    let arena = Arena::new();
    let root = parse_document(&arena, body, &options);

    rewrite_youtube_embeds(root);

    let mut html = String::new();
    format_html(root, &options, &mut html)?;
    Ok(html)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_basic_paragraph() {
        let html = render_html("Hello world").unwrap();
        assert_eq!(html.trim(), "<p>Hello world</p>");
    }

    #[test]
    fn test_render_gfm_table() {
        let html = render_html("| a | b |\n|---|---|\n| 1 | 2 |").unwrap();
        assert!(html.contains("<table>"));
    }

    #[test]
    fn test_render_rewrites_bare_youtube_url() {
        let html = render_html("intro\n\nhttps://youtu.be/dQw4w9WgXcQ\n\noutro").unwrap();
        assert!(html.contains("class=\"youtube-embed\""));
        assert!(html.contains("src=\"https://www.youtube.com/embed/dQw4w9WgXcQ\""));
        // Surrounding paragraphs are untouched
        assert!(html.contains("<p>intro</p>"));
        assert!(html.contains("<p>outro</p>"));
    }

    #[test]
    fn test_render_keeps_inline_youtube_link() {
        let html = render_html("Check out https://youtu.be/dQw4w9WgXcQ today").unwrap();
        assert!(!html.contains("youtube-embed"));
        assert!(html.contains("<p>Check out"));
    }
}
