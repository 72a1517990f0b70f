//! YouTube embed rewriting.
//!
//! Replaces paragraphs whose sole content is a bare YouTube watch/share URL
//! (either as plain text or as a link) with an embeddable `<iframe>` widget.
//! Paragraphs that mix a URL with surrounding prose are left alone.
//!
//! The rewrite happens on the comrak AST before HTML formatting: a matched
//! paragraph node becomes a raw HTML block in the same position among its
//! siblings. HTML blocks are terminal leaves, so a second pass over an
//! already-rewritten tree finds nothing to change.

use std::sync::LazyLock;

use comrak::nodes::{AstNode, NodeHtmlBlock, NodeValue};
use regex::Regex;

/// Recognized URL forms: `youtube.com/watch?v=ID` and `youtu.be/ID`,
/// scheme required, `www.` optional. Anchored at the start only, so
/// trailing path or query content after the identifier is tolerated.
static YOUTUBE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://(?:www\.)?(?:youtube\.com/watch\?v=|youtu\.be/)([\w-]+)").unwrap()
});

/// Rewrite all single-URL paragraphs under `root` into embed widgets.
///
/// Depth-first, in-place. Nodes other than matching paragraphs are never
/// modified.
pub fn rewrite_youtube_embeds<'a>(root: &'a AstNode<'a>) {
    let is_paragraph = matches!(root.data.borrow().value, NodeValue::Paragraph);
    if is_paragraph && let Some(video_id) = sole_video_id(root) {
        while let Some(child) = root.first_child() {
            child.detach();
        }
        let mut data = root.data.borrow_mut();
        data.value = NodeValue::HtmlBlock(NodeHtmlBlock {
            block_type: 0,
            literal: embed_html(&video_id),
        });
        // Now a terminal HTML leaf, nothing left to visit below it.
        return;
    }

    let mut child = root.first_child();
    while let Some(next) = child {
        rewrite_youtube_embeds(next);
        child = next.next_sibling();
    }
}

/// Video identifier when the paragraph's sole child is a matching URL.
///
/// Returns `None` for paragraphs with more or less than one child (mixed
/// prose must not be destroyed), and for sole children that are neither
/// text nor link nodes.
fn sole_video_id<'a>(paragraph: &'a AstNode<'a>) -> Option<String> {
    let child = paragraph.first_child()?;
    if child.next_sibling().is_some() {
        return None;
    }

    let data = child.data.borrow();
    let url = match &data.value {
        NodeValue::Text(text) => text.as_ref(),
        // Only the URL is inspected; the link's visible text is ignored.
        NodeValue::Link(link) => link.url.as_str(),
        _ => return None,
    };

    extract_video_id(url).map(str::to_owned)
}

/// Extract the video identifier from a YouTube watch/share URL.
fn extract_video_id(url: &str) -> Option<&str> {
    YOUTUBE_URL.captures(url)?.get(1).map(|m| m.as_str())
}

/// Fixed embed template. The identifier is interpolated without further
/// escaping: the capture class restricts it to word characters and hyphens.
fn embed_html(video_id: &str) -> String {
    format!(
        "<div class=\"youtube-embed\">\n  \
         <iframe\n    \
         src=\"https://www.youtube.com/embed/{video_id}\"\n    \
         title=\"YouTube video player\"\n    \
         frameborder=\"0\"\n    \
         allow=\"accelerometer; autoplay; clipboard-write; encrypted-media; gyroscope; picture-in-picture; web-share\"\n    \
         allowfullscreen\n  \
         ></iframe>\n\
         </div>"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use comrak::{Arena, format_html, parse_document};

    /// Parse, rewrite, format. Autolinking is configurable so the
    /// text-node path can be exercised: with autolink on, comrak turns a
    /// bare URL into a link node before the rewriter ever sees it.
    fn rewrite(markdown: &str, autolink: bool) -> String {
        let mut options = crate::markdown::default_options();
        options.extension.autolink = autolink;

        let arena = Arena::new();
        let root = parse_document(&arena, markdown, &options);
        rewrite_youtube_embeds(root);

        let mut html = String::new();
        format_html(root, &options, &mut html).expect("html");
        html
    }

    fn rewrite_twice(markdown: &str, autolink: bool) -> String {
        let mut options = crate::markdown::default_options();
        options.extension.autolink = autolink;

        let arena = Arena::new();
        let root = parse_document(&arena, markdown, &options);
        rewrite_youtube_embeds(root);
        rewrite_youtube_embeds(root);

        let mut html = String::new();
        format_html(root, &options, &mut html).expect("html");
        html
    }

    // ------------------------------------------------------------------------
    // extract_video_id
    // ------------------------------------------------------------------------

    #[test]
    fn test_extract_watch_url() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn test_extract_short_url() {
        assert_eq!(
            extract_video_id("https://youtu.be/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn test_extract_http_www_with_hyphen() {
        assert_eq!(
            extract_video_id("http://www.youtube.com/watch?v=abc-123"),
            Some("abc-123")
        );
    }

    #[test]
    fn test_extract_tolerates_trailing_query() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42s"),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(
            extract_video_id("https://youtu.be/dQw4w9WgXcQ?si=share"),
            Some("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn test_extract_rejects_other_urls() {
        assert_eq!(extract_video_id("https://example.com/video"), None);
        assert_eq!(extract_video_id("https://youtube.com/playlist?list=x"), None);
        // Scheme is required; a URL mid-string must not match either.
        assert_eq!(extract_video_id("www.youtube.com/watch?v=abc"), None);
        assert_eq!(extract_video_id("see https://youtu.be/abc"), None);
    }

    // ------------------------------------------------------------------------
    // Paragraph rewriting
    // ------------------------------------------------------------------------

    #[test]
    fn test_bare_text_url_is_rewritten() {
        let html = rewrite("https://www.youtube.com/watch?v=dQw4w9WgXcQ", false);
        assert!(html.contains("class=\"youtube-embed\""));
        assert!(html.contains("src=\"https://www.youtube.com/embed/dQw4w9WgXcQ\""));
        assert!(html.contains("allowfullscreen"));
        assert!(!html.contains("<p>"));
    }

    #[test]
    fn test_short_text_url_is_rewritten() {
        let html = rewrite("https://youtu.be/dQw4w9WgXcQ", false);
        assert!(html.contains("src=\"https://www.youtube.com/embed/dQw4w9WgXcQ\""));
    }

    #[test]
    fn test_link_node_is_rewritten_by_url_not_text() {
        // Explicit markdown link: the visible text is unrelated to the URL.
        let html = rewrite("[watch this](http://www.youtube.com/watch?v=abc-123)", false);
        assert!(html.contains("src=\"https://www.youtube.com/embed/abc-123\""));
        assert!(!html.contains("watch this"));
    }

    #[test]
    fn test_autolinked_url_is_rewritten() {
        // With autolink enabled a bare URL parses as paragraph > link.
        let html = rewrite("https://youtu.be/dQw4w9WgXcQ", true);
        assert!(html.contains("src=\"https://www.youtube.com/embed/dQw4w9WgXcQ\""));
    }

    #[test]
    fn test_mixed_content_is_preserved() {
        let html = rewrite("Check out [this](https://youtu.be/dQw4w9WgXcQ)", false);
        assert!(!html.contains("youtube-embed"));
        assert!(html.contains("<p>Check out"));
        assert!(html.contains("href=\"https://youtu.be/dQw4w9WgXcQ\""));
    }

    #[test]
    fn test_non_youtube_url_is_preserved() {
        let html = rewrite("https://example.com/video", false);
        assert!(!html.contains("youtube-embed"));
        assert!(html.contains("<p>https://example.com/video</p>"));
    }

    #[test]
    fn test_other_sole_child_types_are_skipped() {
        let html = rewrite("*emphasis only*", false);
        assert!(!html.contains("youtube-embed"));
        assert!(html.contains("<em>emphasis only</em>"));
    }

    #[test]
    fn test_siblings_are_untouched() {
        let markdown = "before\n\nhttps://youtu.be/dQw4w9WgXcQ\n\nafter";
        let html = rewrite(markdown, false);
        assert!(html.contains("<p>before</p>"));
        assert!(html.contains("<p>after</p>"));
        assert!(html.contains("youtube-embed"));
    }

    #[test]
    fn test_rewrite_is_idempotent() {
        let markdown = "before\n\nhttps://youtu.be/dQw4w9WgXcQ\n\nafter";
        let once = rewrite(markdown, false);
        let twice = rewrite_twice(markdown, false);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_nested_paragraph_in_blockquote() {
        // Paragraphs are visited depth-first wherever they sit in the tree.
        let html = rewrite("> https://youtu.be/dQw4w9WgXcQ", false);
        assert!(html.contains("<blockquote>"));
        assert!(html.contains("src=\"https://www.youtube.com/embed/dQw4w9WgXcQ\""));
    }
}
