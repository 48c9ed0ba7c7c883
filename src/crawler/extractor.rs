//! HTML text and link extraction
//!
//! Turns a raw HTML document into one normalized line of visible text and a
//! deduplicated set of absolute link URLs.

use crate::ExtractionError;
use scraper::{Html, Node};
use std::collections::HashSet;
use url::Url;

/// Tags whose direct text children count as visible content
///
/// Text under anything else (script, style, title, ...) is left out.
const TEXT_TAGS: &[&str] = &[
    "p", "div", "span", "a", "h1", "h2", "h3", "h4", "h5", "h6", "li", "th", "td", "article",
    "main", "section", "pre",
];

/// Text and links extracted from a document
#[derive(Debug, Clone, Default)]
pub struct Extracted {
    /// Visible text, whitespace-collapsed to a single line
    pub text: String,

    /// Absolute link URLs, deduplicated; order is unspecified
    pub links: Vec<String>,
}

/// Extracts visible text and outbound links from an HTML document
///
/// # Algorithm
///
/// - Walk the parsed tree depth-first.
/// - Keep the trimmed text of every text node whose immediate parent is one
///   of [`TEXT_TAGS`], joined with single spaces.
/// - Collapse all whitespace runs in the joined text to single spaces.
/// - Resolve the `href` of every `<a>` against `base_url` and collect the
///   results into a set. Hrefs that do not resolve are dropped. Only the first
///   `href` of an element counts; the HTML tokenizer already discards repeats.
///
/// Scheme filtering is left to the caller: `mailto:` or `javascript:` links
/// come back as-is.
///
/// # Errors
///
/// Returns `InvalidBaseUrl` if `base_url` is not an absolute URL. The HTML
/// itself never fails to parse; malformed markup is recovered the way
/// browsers recover it.
///
/// # Example
///
/// ```
/// use spidey::crawler::extract;
///
/// let html = br#"<div>Hello <a href="/x">there</a></div>"#;
/// let extracted = extract(html, "https://e.com/").unwrap();
/// assert_eq!(extracted.text, "Hello there");
/// assert_eq!(extracted.links, vec!["https://e.com/x".to_string()]);
/// ```
pub fn extract(html: &[u8], base_url: &str) -> Result<Extracted, ExtractionError> {
    let base = Url::parse(base_url).map_err(|source| ExtractionError::InvalidBaseUrl {
        url: base_url.to_string(),
        source,
    })?;

    let source = String::from_utf8_lossy(html);
    let document = Html::parse_document(&source);

    let mut fragments: Vec<&str> = Vec::new();
    let mut links: HashSet<String> = HashSet::new();

    // descendants() is a pre-order walk, i.e. document order
    for node in document.tree.root().descendants() {
        match node.value() {
            Node::Text(text) => {
                let parent_is_content = node
                    .parent()
                    .and_then(|parent| parent.value().as_element())
                    .is_some_and(|element| TEXT_TAGS.contains(&element.name()));

                if parent_is_content {
                    let trimmed = text.trim();
                    if !trimmed.is_empty() {
                        fragments.push(trimmed);
                    }
                }
            }
            Node::Element(element) if element.name() == "a" => {
                if let Some(href) = element.attr("href") {
                    match base.join(href) {
                        Ok(resolved) => {
                            links.insert(resolved.to_string());
                        }
                        Err(e) => tracing::debug!("Skipping unresolvable href {:?}: {}", href, e),
                    }
                }
            }
            _ => {}
        }
    }

    Ok(Extracted {
        text: collapse_whitespace(&fragments.join(" ")),
        links: links.into_iter().collect(),
    })
}

/// Collapses every whitespace run (newlines included) to one space and trims
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://example.com/blog/post";

    fn link_set(extracted: &Extracted) -> HashSet<&str> {
        extracted.links.iter().map(String::as_str).collect()
    }

    #[test]
    fn test_text_and_relative_link() {
        let html = br#"<div>Hello <a href="/x">there</a></div>"#;
        let extracted = extract(html, "https://e.com/").unwrap();

        assert_eq!(extracted.text, "Hello there");
        assert_eq!(link_set(&extracted), HashSet::from(["https://e.com/x"]));
    }

    #[test]
    fn test_script_and_style_text_excluded() {
        let html = br#"<html><head><title>Title</title><style>p { color: red; }</style></head>
            <body><p>Visible</p><script>var hidden = 1;</script></body></html>"#;
        let extracted = extract(html, BASE).unwrap();

        assert_eq!(extracted.text, "Visible");
    }

    #[test]
    fn test_only_immediate_parent_counts() {
        // <em> is not a content tag, so its text is dropped even inside <p>
        let html = br#"<p>Keep <em>drop</em> this</p>"#;
        let extracted = extract(html, BASE).unwrap();

        assert_eq!(extracted.text, "Keep this");
    }

    #[test]
    fn test_text_directly_in_body_excluded() {
        let html = br#"<html><body>Loose text<p>Paragraph</p></body></html>"#;
        let extracted = extract(html, BASE).unwrap();

        assert_eq!(extracted.text, "Paragraph");
    }

    #[test]
    fn test_all_content_tags_collected() {
        let html = br#"<article><h1>One</h1><h2>Two</h2><h3>Three</h3><h4>Four</h4>
            <h5>Five</h5><h6>Six</h6></article>
            <main><section><span>Seven</span></section></main>
            <ul><li>Eight</li></ul>
            <table><tr><th>Nine</th><td>Ten</td></tr></table>
            <pre>Eleven</pre>"#;
        let extracted = extract(html, BASE).unwrap();

        assert_eq!(
            extracted.text,
            "One Two Three Four Five Six Seven Eight Nine Ten Eleven"
        );
    }

    #[test]
    fn test_whitespace_collapsed_to_single_line() {
        let html = b"<div>  first\n\n   line  </div><pre>\tsecond\n\tblock\n</pre>";
        let extracted = extract(html, BASE).unwrap();

        assert_eq!(extracted.text, "first line second block");
        assert!(!extracted.text.contains('\n'));
    }

    #[test]
    fn test_duplicate_links_deduplicated() {
        let html = br#"<div>
            <a href="/page">One</a>
            <a href="/page">Two</a>
            <a href="https://example.com/page">Three</a>
            <a href="https://other.com/">Four</a>
        </div>"#;
        let extracted = extract(html, BASE).unwrap();

        assert_eq!(extracted.links.len(), 2);
        assert_eq!(
            link_set(&extracted),
            HashSet::from(["https://example.com/page", "https://other.com/"])
        );
    }

    #[test]
    fn test_relative_path_resolution() {
        let html = br#"<a href="other">Sibling</a><a href="../up">Up</a><a href="?page=2">Q</a>"#;
        let extracted = extract(html, BASE).unwrap();

        assert_eq!(
            link_set(&extracted),
            HashSet::from([
                "https://example.com/blog/other",
                "https://example.com/up",
                "https://example.com/blog/post?page=2",
            ])
        );
    }

    #[test]
    fn test_first_href_wins() {
        let html = br#"<a href="/first" href="/second">Link</a>"#;
        let extracted = extract(html, BASE).unwrap();

        assert_eq!(
            link_set(&extracted),
            HashSet::from(["https://example.com/first"])
        );
    }

    #[test]
    fn test_non_http_links_returned_unfiltered() {
        let html = br#"<a href="mailto:me@example.com">Mail</a>"#;
        let extracted = extract(html, BASE).unwrap();

        assert_eq!(
            link_set(&extracted),
            HashSet::from(["mailto:me@example.com"])
        );
    }

    #[test]
    fn test_anchor_without_href_ignored() {
        let html = br#"<a name="top">Top</a>"#;
        let extracted = extract(html, BASE).unwrap();

        assert!(extracted.links.is_empty());
        assert_eq!(extracted.text, "Top");
    }

    #[test]
    fn test_malformed_markup_recovered() {
        let html = br#"<div><p>Unclosed <span>nested<div>tags"#;
        let extracted = extract(html, BASE).unwrap();

        assert_eq!(extracted.text, "Unclosed nested tags");
    }

    #[test]
    fn test_empty_document() {
        let extracted = extract(b"", BASE).unwrap();

        assert!(extracted.text.is_empty());
        assert!(extracted.links.is_empty());
    }

    #[test]
    fn test_invalid_utf8_is_tolerated() {
        let html = b"<p>caf\xe9</p>";
        let extracted = extract(html, BASE).unwrap();

        assert!(extracted.text.starts_with("caf"));
    }

    #[test]
    fn test_relative_base_rejected() {
        let result = extract(b"<p>x</p>", "/not/absolute");
        assert!(matches!(
            result,
            Err(ExtractionError::InvalidBaseUrl { .. })
        ));
    }
}
