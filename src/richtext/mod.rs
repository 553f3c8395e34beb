//! Rich-text rendering
//!
//! Converts the CMS's structured rich-text blocks to HTML. Blocks are read,
//! never modified; text is escaped, span markup is generated here.

use serde::Deserialize;

use crate::content::RichTextBlock;
use crate::helpers::html_escape;

/// Turns a sequence of rich-text blocks into markup
pub trait RichTextRenderer: Send + Sync {
    fn render(&self, blocks: &[RichTextBlock]) -> String;
}

/// Inline formatting over a character range
#[derive(Debug, Clone, Deserialize)]
struct Span {
    start: usize,
    end: usize,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: Option<serde_json::Value>,
}

impl Span {
    fn open_tag(&self) -> Option<String> {
        match self.kind.as_str() {
            "strong" => Some("<strong>".to_string()),
            "em" => Some("<em>".to_string()),
            "hyperlink" => {
                let url = self
                    .data
                    .as_ref()
                    .and_then(|d| d.get("url"))
                    .and_then(|u| u.as_str())
                    .unwrap_or("#");
                let target = self
                    .data
                    .as_ref()
                    .and_then(|d| d.get("target"))
                    .and_then(|t| t.as_str())
                    .map(|t| format!(r#" target="{}" rel="noopener""#, html_escape(t)))
                    .unwrap_or_default();
                Some(format!(r#"<a href="{}"{}>"#, html_escape(url), target))
            }
            _ => None,
        }
    }

    fn close_tag(&self) -> Option<&'static str> {
        match self.kind.as_str() {
            "strong" => Some("</strong>"),
            "em" => Some("</em>"),
            "hyperlink" => Some("</a>"),
            _ => None,
        }
    }
}

/// Default HTML converter
#[derive(Debug, Clone, Default)]
pub struct HtmlRenderer;

impl HtmlRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Render a single non-list block
    fn render_block(&self, block: &RichTextBlock) -> String {
        let value = block.as_value();
        match block.block_type().unwrap_or("paragraph") {
            "heading1" => wrap("h1", &inline(value)),
            "heading2" => wrap("h2", &inline(value)),
            "heading3" => wrap("h3", &inline(value)),
            "heading4" => wrap("h4", &inline(value)),
            "heading5" => wrap("h5", &inline(value)),
            "heading6" => wrap("h6", &inline(value)),
            "preformatted" => wrap("pre", &inline(value)),
            "image" => {
                let url = value.get("url").and_then(|u| u.as_str()).unwrap_or("");
                let alt = value.get("alt").and_then(|a| a.as_str()).unwrap_or("");
                format!(
                    r#"<p class="block-img"><img src="{}" alt="{}"></p>"#,
                    html_escape(url),
                    html_escape(alt)
                )
            }
            // Embeds carry provider markup, which is trusted like the rest of the payload
            "embed" => {
                let html = value
                    .get("oembed")
                    .and_then(|o| o.get("html"))
                    .and_then(|h| h.as_str())
                    .unwrap_or("");
                format!(r#"<div data-oembed="embed">{}</div>"#, html)
            }
            _ => wrap("p", &inline(value)),
        }
    }
}

impl RichTextRenderer for HtmlRenderer {
    fn render(&self, blocks: &[RichTextBlock]) -> String {
        let mut html = String::new();
        let mut open_list: Option<&'static str> = None;

        for block in blocks {
            let list_tag = match block.block_type() {
                Some("list-item") => Some("ul"),
                Some("o-list-item") => Some("ol"),
                _ => None,
            };

            if open_list != list_tag {
                if let Some(tag) = open_list {
                    html.push_str(&format!("</{}>", tag));
                }
                if let Some(tag) = list_tag {
                    html.push_str(&format!("<{}>", tag));
                }
                open_list = list_tag;
            }

            if list_tag.is_some() {
                html.push_str(&wrap("li", &inline(block.as_value())));
            } else {
                html.push_str(&self.render_block(block));
            }
        }

        if let Some(tag) = open_list {
            html.push_str(&format!("</{}>", tag));
        }

        html
    }
}

fn wrap(tag: &str, inner: &str) -> String {
    format!("<{tag}>{inner}</{tag}>")
}

/// Escape a block's text and apply its spans
fn inline(value: &serde_json::Value) -> String {
    let text = value.get("text").and_then(|t| t.as_str()).unwrap_or("");
    let spans: Vec<Span> = value
        .get("spans")
        .and_then(|s| serde_json::from_value(s.clone()).ok())
        .unwrap_or_default();
    apply_spans(text, &spans)
}

fn apply_spans(text: &str, spans: &[Span]) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut spans: Vec<&Span> = spans
        .iter()
        .filter(|s| s.start < s.end && s.open_tag().is_some())
        .collect();
    // Outer spans first so nested ones close before them
    spans.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));

    let mut out = String::with_capacity(text.len());
    let mut open: Vec<&Span> = Vec::new();

    for pos in 0..=chars.len() {
        // Closing a span also closes everything opened inside it; the
        // ones still active are reopened right after.
        if let Some(first_ended) = open.iter().position(|s| s.end.min(chars.len()) <= pos) {
            let closed: Vec<&Span> = open.drain(first_ended..).collect();
            for span in closed.iter().rev() {
                out.push_str(span.close_tag().unwrap_or_default());
            }
            for span in closed.into_iter().filter(|s| s.end.min(chars.len()) > pos) {
                if let Some(tag) = span.open_tag() {
                    out.push_str(&tag);
                }
                open.push(span);
            }
        }

        if pos == chars.len() {
            break;
        }

        for span in spans.iter().filter(|s| s.start == pos) {
            if let Some(tag) = span.open_tag() {
                out.push_str(&tag);
                open.push(*span);
            }
        }

        match chars[pos] {
            '\n' => out.push_str("<br />"),
            c => out.push_str(&html_escape(c.encode_utf8(&mut [0; 4]))),
        }
    }

    while let Some(span) = open.pop() {
        out.push_str(span.close_tag().unwrap_or_default());
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(blocks: serde_json::Value) -> String {
        let blocks: Vec<RichTextBlock> = serde_json::from_value(blocks).unwrap();
        HtmlRenderer::new().render(&blocks)
    }

    #[test]
    fn test_paragraphs_and_headings() {
        let html = render(json!([
            { "type": "heading3", "text": "Title", "spans": [] },
            { "type": "paragraph", "text": "Body", "spans": [] }
        ]));
        assert_eq!(html, "<h3>Title</h3><p>Body</p>");
    }

    #[test]
    fn test_text_is_escaped() {
        let html = render(json!([{ "type": "paragraph", "text": "<script>a & b</script>" }]));
        assert_eq!(html, "<p>&lt;script&gt;a &amp; b&lt;/script&gt;</p>");
    }

    #[test]
    fn test_lists_are_grouped() {
        let html = render(json!([
            { "type": "list-item", "text": "one" },
            { "type": "list-item", "text": "two" },
            { "type": "o-list-item", "text": "first" },
            { "type": "paragraph", "text": "after" }
        ]));
        assert_eq!(
            html,
            "<ul><li>one</li><li>two</li></ul><ol><li>first</li></ol><p>after</p>"
        );
    }

    #[test]
    fn test_spans() {
        let html = render(json!([{
            "type": "paragraph",
            "text": "bold and link",
            "spans": [
                { "start": 0, "end": 4, "type": "strong" },
                { "start": 9, "end": 13, "type": "hyperlink", "data": { "url": "https://x.dev" } }
            ]
        }]));
        assert_eq!(
            html,
            r#"<p><strong>bold</strong> and <a href="https://x.dev">link</a></p>"#
        );
    }

    #[test]
    fn test_nested_spans() {
        let html = render(json!([{
            "type": "paragraph",
            "text": "abcd",
            "spans": [
                { "start": 1, "end": 3, "type": "em" },
                { "start": 0, "end": 4, "type": "strong" }
            ]
        }]));
        assert_eq!(html, "<p><strong>a<em>bc</em>d</strong></p>");
    }

    #[test]
    fn test_overlapping_spans_stay_well_formed() {
        let html = render(json!([{
            "type": "paragraph",
            "text": "abcde",
            "spans": [
                { "start": 0, "end": 3, "type": "strong" },
                { "start": 2, "end": 5, "type": "em" }
            ]
        }]));
        assert_eq!(html, "<p><strong>ab<em>c</em></strong><em>de</em></p>");
    }

    #[test]
    fn test_line_breaks_and_unicode() {
        let html = render(json!([{
            "type": "preformatted",
            "text": "ação\nfim",
            "spans": [{ "start": 0, "end": 4, "type": "em" }]
        }]));
        assert_eq!(html, "<pre><em>ação</em><br />fim</pre>");
    }

    #[test]
    fn test_image_block() {
        let html = render(json!([{ "type": "image", "url": "https://img/x.png", "alt": "x" }]));
        assert_eq!(
            html,
            r#"<p class="block-img"><img src="https://img/x.png" alt="x"></p>"#
        );
    }

    #[test]
    fn test_unknown_block_is_paragraph() {
        assert_eq!(render(json!([{ "type": "label", "text": "t" }])), "<p>t</p>");
        assert_eq!(render(json!([])), "");
    }
}
