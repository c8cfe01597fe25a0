//! Markdown to HTML rendering.

use crate::ContentResult;
use pulldown_cmark::{html, Options, Parser};

/// Renders a Markdown source to an HTML fragment.
///
/// Implementations must be deterministic: rendering the same source twice yields
/// byte-identical output.
pub trait MarkdownRenderer {
    fn render(&self, source: &str) -> ContentResult<String>;
}

impl<R: MarkdownRenderer + ?Sized> MarkdownRenderer for &R {
    fn render(&self, source: &str) -> ContentResult<String> {
        (**self).render(source)
    }
}

/// Plain CommonMark rendering (block and inline elements, no extensions).
#[derive(Clone, Copy, Debug, Default)]
pub struct CommonMarkRenderer;

impl CommonMarkRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl MarkdownRenderer for CommonMarkRenderer {
    fn render(&self, source: &str) -> ContentResult<String> {
        let parser = Parser::new_ext(source, Options::empty());
        let mut output = String::with_capacity(source.len() + source.len() / 2);
        html::push_html(&mut output, parser);
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(source: &str) -> String {
        CommonMarkRenderer::new().render(source).unwrap()
    }

    #[test]
    fn test_renders_inline_emphasis() {
        assert_eq!(render("**Hello**"), "<p><strong>Hello</strong></p>\n");
    }

    #[test]
    fn test_renders_headings_and_lists() {
        assert_eq!(render("# Hi"), "<h1>Hi</h1>\n");
        assert_eq!(
            render("- one\n- two"),
            "<ul>\n<li>one</li>\n<li>two</li>\n</ul>\n"
        );
    }

    #[test]
    fn test_extensions_are_disabled() {
        // Tables and strikethrough are not CommonMark.
        assert_eq!(render("~~gone~~"), "<p>~~gone~~</p>\n");
        assert!(!render("| a |\n|---|\n| b |").contains("<table>"));
    }

    #[test]
    fn test_empty_source_renders_empty() {
        assert_eq!(render(""), "");
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let source = "# Title\n\nSome *text* with a [link](https://example.com).";
        assert_eq!(render(source), render(source));
    }
}
