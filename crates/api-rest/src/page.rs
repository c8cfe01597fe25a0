//! HTML page template for text documents.
//!
//! Resolved document HTML is trusted (it is rendered from authored Markdown) and inserted
//! verbatim; the title and language attribute go through the `escape` formatter.

use std::fmt::Write;
use upon::{fmt as upon_fmt, Engine, Template, Value};

const TEXT_PAGE: &str = r#"<!DOCTYPE html>
<html{% if lang %} lang="{{ lang|escape }}"{% endif %}>
<head>
<meta charset="utf-8">
<title>{{ title|escape }}</title>
</head>
<body>
<article>
{{ content }}
</article>
</body>
</html>
"#;

pub struct PageRenderer {
    engine: Engine<'static>,
    text_page: Template<'static>,
}

impl PageRenderer {
    /// Compiles the page template up front so syntax errors surface at startup.
    pub fn new() -> Result<Self, upon::Error> {
        let mut engine = Engine::new();
        engine.add_formatter("escape", escape_formatter);
        let text_page = engine.compile(TEXT_PAGE)?;
        Ok(Self { engine, text_page })
    }

    pub fn text_page(
        &self,
        title: &str,
        content: &str,
        lang: Option<&str>,
    ) -> Result<String, upon::Error> {
        self.text_page
            .render(
                &self.engine,
                upon::value! {
                    title: title,
                    content: content,
                    lang: lang,
                },
            )
            .to_string()
    }
}

fn escape_formatter(f: &mut upon_fmt::Formatter<'_>, value: &Value) -> upon_fmt::Result {
    match value {
        Value::String(s) => {
            for c in s.chars() {
                match c {
                    '&' => f.write_str("&amp;")?,
                    '<' => f.write_str("&lt;")?,
                    '>' => f.write_str("&gt;")?,
                    '"' => f.write_str("&quot;")?,
                    '\'' => f.write_str("&#39;")?,
                    c => f.write_char(c)?,
                }
            }
        }
        v => upon_fmt::default(f, v)?,
    };
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_page_embeds_content_verbatim() {
        let pages = PageRenderer::new().unwrap();
        let page = pages
            .text_page("welcome", "<p><strong>Hello</strong></p>\n", None)
            .unwrap();

        assert!(page.starts_with("<!DOCTYPE html>\n<html>\n"));
        assert!(page.contains("<title>welcome</title>"));
        assert!(page.contains("<article>\n<p><strong>Hello</strong></p>\n\n</article>"));
    }

    #[test]
    fn test_text_page_sets_lang_for_translations() {
        let pages = PageRenderer::new().unwrap();
        let page = pages
            .text_page("greeting", "<h1>Salut</h1>\n", Some("fr"))
            .unwrap();

        assert!(page.contains("<html lang=\"fr\">"));
    }

    #[test]
    fn test_title_is_escaped() {
        let pages = PageRenderer::new().unwrap();
        let page = pages.text_page("<b>&\"", "", None).unwrap();

        assert!(page.contains("<title>&lt;b&gt;&amp;&quot;</title>"));
    }
}
