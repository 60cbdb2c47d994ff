//! HTML to plain text

use scraper::{ElementRef, Html, Node};

/// Elements whose content is never visible
const SKIP_TAGS: &[&str] = &["script", "style", "noscript", "template"];

/// Elements that start a new line of text
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt", "figcaption",
    "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main", "nav",
    "ol", "p", "section", "table", "td", "th", "title", "tr", "ul",
];

/// Extract the visible text of an HTML document
///
/// Markup is dropped along with script, style, noscript and template
/// content. Outside `<pre>` each non-blank line is trimmed and blank lines
/// are removed; preformatted text keeps its whitespace.
#[must_use]
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);

    let mut buf = TextBuf::default();
    collect_text(&document.root_element(), &mut buf);
    buf.finish()
}

/// Output lines plus the flowing text not yet split into lines
#[derive(Default)]
struct TextBuf {
    lines: Vec<String>,
    flow: String,
}

impl TextBuf {
    fn flush(&mut self) {
        self.lines.extend(
            self.flow
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string),
        );
        self.flow.clear();
    }

    fn push_preformatted(&mut self, text: &str) {
        self.flush();
        let text = text.trim_matches(|c: char| c == '\n' || c == '\r');
        if !text.trim().is_empty() {
            self.lines.push(text.to_string());
        }
    }

    fn finish(mut self) -> String {
        self.flush();
        self.lines.join("\n")
    }
}

fn collect_text(element: &ElementRef<'_>, buf: &mut TextBuf) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => buf.flow.push_str(text),
            Node::Element(el) => {
                let tag = el.name();
                if SKIP_TAGS.contains(&tag) {
                    continue;
                }
                let Some(child_ref) = ElementRef::wrap(child) else {
                    continue;
                };
                if tag == "pre" {
                    let mut raw = String::new();
                    collect_raw(&child_ref, &mut raw);
                    buf.push_preformatted(&raw);
                    continue;
                }
                let block = BLOCK_TAGS.contains(&tag);
                if block {
                    buf.flow.push('\n');
                }
                collect_text(&child_ref, buf);
                if block {
                    buf.flow.push('\n');
                }
            }
            _ => {}
        }
    }
}

/// Text under `element` exactly as written, minus invisible elements
fn collect_raw(element: &ElementRef<'_>, raw: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => raw.push_str(text),
            Node::Element(el) if !SKIP_TAGS.contains(&el.name()) => {
                if let Some(child_ref) = ElementRef::wrap(child) {
                    collect_raw(&child_ref, raw);
                }
            }
            _ => {}
        }
    }
}
