//! Source format to HTML fragment conversion.
//!
//! | Format | Conversion |
//! |--------|------------|
//! | HTML | identity |
//! | Markdown | CommonMark + tables, strikethrough, task lists, footnotes |
//! | Plain text | blank-line separated paragraphs, bare URLs become links |
//!
//! Anything else is [`ConversionError::Unsupported`]; the pipeline logs it and
//! passes the raw text through unchanged.

use maud::html;
use pulldown_cmark::{Options, Parser, html as md_html};
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConversionError {
    #[error("no converter from `{0}` to HTML")]
    Unsupported(String),
}

/// Declared format of a page's raw content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Format {
    Html,
    Markdown,
    PlainText,
    /// Any other extension, kept for the error message.
    Other(String),
}

impl Format {
    /// Map a file extension (without the dot) to a format.
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "html" | "htm" => Format::Html,
            "md" | "markdown" => Format::Markdown,
            "txt" => Format::PlainText,
            other => Format::Other(other.to_string()),
        }
    }
}

/// Convert raw text in the given format to an HTML fragment.
pub fn to_html(text: &str, format: &Format) -> Result<String, ConversionError> {
    match format {
        Format::Html => Ok(text.to_string()),
        Format::Markdown => Ok(markdown_to_html(text)),
        Format::PlainText => Ok(text_to_html(text)),
        Format::Other(ext) => Err(ConversionError::Unsupported(ext.clone())),
    }
}

fn markdown_options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_FOOTNOTES);
    options
}

pub fn markdown_to_html(text: &str) -> String {
    let parser = Parser::new_ext(text, markdown_options());
    let mut out = String::new();
    md_html::push_html(&mut out, parser);
    out
}

static PARAGRAPH_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[ \t]*\n").expect("paragraph pattern is valid"));

static BARE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s<>"']+"#).expect("url pattern is valid"));

enum Span<'a> {
    Text(&'a str),
    Link(&'a str),
}

/// Split a paragraph into text and URL spans.
///
/// Trailing sentence punctuation is not part of a URL.
fn spans(paragraph: &str) -> Vec<Span<'_>> {
    let mut out = Vec::new();
    let mut last = 0;
    for m in BARE_URL.find_iter(paragraph) {
        let url = m.as_str().trim_end_matches(['.', ',', ';', ':', '!', '?', ')']);
        let end = m.start() + url.len();
        if m.start() > last {
            out.push(Span::Text(&paragraph[last..m.start()]));
        }
        out.push(Span::Link(url));
        last = end;
    }
    if last < paragraph.len() {
        out.push(Span::Text(&paragraph[last..]));
    }
    out
}

/// Plain text to escaped HTML paragraphs with autolinked URLs.
pub fn text_to_html(text: &str) -> String {
    let normalized = text.replace("\r\n", "\n");
    let paragraphs: Vec<&str> = PARAGRAPH_BREAK
        .split(&normalized)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();

    html! {
        @for paragraph in &paragraphs {
            p {
                @for span in spans(paragraph) {
                    @match span {
                        Span::Text(t) => { (t) }
                        Span::Link(url) => { a href=(url) { (url) } }
                    }
                }
            }
        }
    }
    .into_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_from_extension() {
        assert_eq!(Format::from_extension("md"), Format::Markdown);
        assert_eq!(Format::from_extension("Markdown"), Format::Markdown);
        assert_eq!(Format::from_extension("HTM"), Format::Html);
        assert_eq!(Format::from_extension("txt"), Format::PlainText);
        assert_eq!(Format::from_extension("rst"), Format::Other("rst".into()));
    }

    #[test]
    fn html_is_identity() {
        let html = "<section>{{ title }}</section>";
        assert_eq!(to_html(html, &Format::Html).unwrap(), html);
    }

    #[test]
    fn markdown_renders_headings_and_tables() {
        let out = to_html("# Hi\n\n| a | b |\n|---|---|\n| 1 | 2 |\n", &Format::Markdown).unwrap();
        assert!(out.contains("<h1>Hi</h1>"));
        assert!(out.contains("<table>"));
    }

    #[test]
    fn unknown_format_is_unsupported() {
        let err = to_html("x", &Format::Other("rst".into())).unwrap_err();
        assert_eq!(err, ConversionError::Unsupported("rst".into()));
        assert_eq!(err.to_string(), "no converter from `rst` to HTML");
    }

    // =========================================================================
    // Plain text
    // =========================================================================

    #[test]
    fn text_splits_paragraphs_on_blank_lines() {
        let out = text_to_html("first line\nsame paragraph\n\nsecond\n   \nthird");
        assert_eq!(
            out,
            "<p>first line\nsame paragraph</p><p>second</p><p>third</p>"
        );
    }

    #[test]
    fn text_escapes_markup() {
        assert_eq!(text_to_html("a <b> & c"), "<p>a &lt;b&gt; &amp; c</p>");
    }

    #[test]
    fn text_links_bare_urls() {
        let out = text_to_html("see https://example.com/docs.");
        assert_eq!(
            out,
            "<p>see <a href=\"https://example.com/docs\">https://example.com/docs</a>.</p>"
        );
    }

    #[test]
    fn text_handles_crlf() {
        assert_eq!(text_to_html("a\r\n\r\nb"), "<p>a</p><p>b</p>");
    }

    #[test]
    fn empty_text_is_empty_fragment() {
        assert_eq!(text_to_html(""), "");
        assert_eq!(text_to_html("\n\n\n"), "");
    }
}
