//! Text documents: Markdown sources with lazily rendered HTML, per language.
//!
//! A [`TextDocument`] carries a default-language `source` plus any number of authored
//! [`LocalizedVariant`]s keyed by language code. Each of these has an `html` field that caches
//! the rendering of its co-located `source`. The cache is *derived* data:
//!
//! - it is empty until the resolver renders it for the first time,
//! - every mutator in this module that changes a `source` clears the matching `html`,
//! - nothing outside the resolver ever writes `html` with new content.
//!
//! Fields are private so the only way to change a source is through those mutators.

use emporium_types::{LanguageCode, Slug};
use emporium_uuid::RecordId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Markdown source for one language with its cached HTML rendering.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LocalizedVariant {
    source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    html: Option<String>,
}

impl LocalizedVariant {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            html: None,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Cached HTML, or `None` while unrendered. An empty string counts as unrendered.
    pub fn html(&self) -> Option<&str> {
        self.html.as_deref().filter(|html| !html.is_empty())
    }

    pub fn is_rendered(&self) -> bool {
        self.html().is_some()
    }

    /// A variant with a blank source is treated as if the translation did not exist.
    pub fn is_authored(&self) -> bool {
        !self.source.trim().is_empty()
    }
}

/// Which part of a document the resolver selected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectedVariant {
    /// The document's own `source`/`html`.
    Default,
    /// The translation stored under this language code.
    Translation(String),
}

impl SelectedVariant {
    pub fn language(&self) -> Option<&str> {
        match self {
            SelectedVariant::Default => None,
            SelectedVariant::Translation(code) => Some(code),
        }
    }
}

impl fmt::Display for SelectedVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectedVariant::Default => f.write_str("default"),
            SelectedVariant::Translation(code) => f.write_str(code),
        }
    }
}

/// Borrowed view of one render target: its source and its cache slot.
pub(crate) struct RenderSlot<'a> {
    pub(crate) source: &'a str,
    pub(crate) html: &'a mut Option<String>,
}

/// A wiki-like content document addressed by slug.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TextDocument {
    id: RecordId,
    slug: Slug,
    source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    html: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    translations: BTreeMap<LanguageCode, LocalizedVariant>,
}

impl TextDocument {
    /// Creates an unrendered document with no translations.
    pub fn new(id: RecordId, slug: Slug, source: impl Into<String>) -> Self {
        Self {
            id,
            slug,
            source: source.into(),
            html: None,
            translations: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn slug(&self) -> &Slug {
        &self.slug
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Cached default-language HTML, or `None` while unrendered.
    pub fn html(&self) -> Option<&str> {
        self.html.as_deref().filter(|html| !html.is_empty())
    }

    pub fn translations(&self) -> &BTreeMap<LanguageCode, LocalizedVariant> {
        &self.translations
    }

    /// Exact-match lookup; `en-US` never matches an `en` translation.
    pub fn translation(&self, code: &str) -> Option<&LocalizedVariant> {
        self.translations.get(code)
    }

    /// Replaces the default-language source and invalidates its cached HTML.
    pub fn set_source(&mut self, source: impl Into<String>) {
        self.source = source.into();
        self.html = None;
    }

    /// Adds or replaces a translation. The variant starts unrendered.
    pub fn set_translation(&mut self, code: LanguageCode, source: impl Into<String>) {
        self.translations.insert(code, LocalizedVariant::new(source));
    }

    pub fn remove_translation(&mut self, code: &str) -> Option<LocalizedVariant> {
        self.translations.remove(code)
    }

    /// Drops every cached rendering, default and translated.
    ///
    /// Used to repair documents whose sources were edited without going through the mutators.
    pub fn clear_rendered(&mut self) {
        self.html = None;
        for variant in self.translations.values_mut() {
            variant.html = None;
        }
    }

    /// Picks the render target for `language` and hands out its source and cache slot.
    ///
    /// A translation is selected only when `language` is non-empty and names an authored
    /// translation exactly; every other case selects the default source.
    pub(crate) fn select_slot(&mut self, language: Option<&str>) -> (SelectedVariant, RenderSlot<'_>) {
        if let Some(code) = language.filter(|code| !code.is_empty()) {
            if let Some(variant) = self
                .translations
                .get_mut(code)
                .filter(|variant| variant.is_authored())
            {
                return (
                    SelectedVariant::Translation(code.to_owned()),
                    RenderSlot {
                        source: &variant.source,
                        html: &mut variant.html,
                    },
                );
            }
        }

        (
            SelectedVariant::Default,
            RenderSlot {
                source: &self.source,
                html: &mut self.html,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document() -> TextDocument {
        let mut doc = TextDocument::new(RecordId::new(), Slug::new("greeting").unwrap(), "# Hi");
        doc.set_translation(LanguageCode::new("fr").unwrap(), "# Salut");
        doc
    }

    #[test]
    fn test_new_document_is_unrendered() {
        let doc = document();
        assert_eq!(doc.html(), None);
        assert!(!doc.translation("fr").unwrap().is_rendered());
    }

    #[test]
    fn test_empty_html_counts_as_unrendered() {
        let mut doc = document();
        doc.html = Some(String::new());
        assert_eq!(doc.html(), None);
    }

    #[test]
    fn test_set_source_clears_cached_html() {
        let mut doc = document();
        doc.html = Some("<h1>Hi</h1>\n".into());

        doc.set_source("# Hello");

        assert_eq!(doc.source(), "# Hello");
        assert_eq!(doc.html(), None);
    }

    #[test]
    fn test_set_translation_replaces_rendered_variant() {
        let mut doc = document();
        doc.translations.get_mut("fr").unwrap().html = Some("<h1>Salut</h1>\n".into());

        doc.set_translation(LanguageCode::new("fr").unwrap(), "# Bonjour");

        let fr = doc.translation("fr").unwrap();
        assert_eq!(fr.source(), "# Bonjour");
        assert!(!fr.is_rendered());
    }

    #[test]
    fn test_clear_rendered_resets_every_target() {
        let mut doc = document();
        doc.html = Some("<h1>Hi</h1>\n".into());
        doc.translations.get_mut("fr").unwrap().html = Some("<h1>Salut</h1>\n".into());

        doc.clear_rendered();

        assert_eq!(doc.html(), None);
        assert!(!doc.translation("fr").unwrap().is_rendered());
        assert_eq!(doc.source(), "# Hi");
    }

    #[test]
    fn test_select_slot_falls_back_for_missing_empty_and_partial_codes() {
        let mut doc = document();
        doc.set_translation(LanguageCode::new("en").unwrap(), "# Hello");

        for language in [None, Some(""), Some("de"), Some("en-US"), Some("FR")] {
            let (selected, slot) = doc.select_slot(language);
            assert_eq!(selected, SelectedVariant::Default, "language: {language:?}");
            assert_eq!(slot.source, "# Hi");
        }

        let (selected, slot) = doc.select_slot(Some("fr"));
        assert_eq!(selected, SelectedVariant::Translation("fr".into()));
        assert_eq!(slot.source, "# Salut");
    }

    #[test]
    fn test_select_slot_skips_blank_translation() {
        let mut doc = document();
        doc.set_translation(LanguageCode::new("de").unwrap(), "  \n");

        let (selected, _) = doc.select_slot(Some("de"));
        assert_eq!(selected, SelectedVariant::Default);
    }

    #[test]
    fn test_yaml_omits_empty_cache_and_translations() {
        let doc = TextDocument::new(
            RecordId::parse("550e8400e29b41d4a716446655440000").unwrap(),
            Slug::new("welcome").unwrap(),
            "**Hello**",
        );
        let yaml = serde_yaml::to_string(&doc).unwrap();
        assert!(yaml.starts_with("id: 550e8400e29b41d4a716446655440000\nslug: welcome\n"));
        assert!(!yaml.contains("html"));
        assert!(!yaml.contains("translations"));

        let back: TextDocument = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn test_yaml_rejects_unknown_fields() {
        let yaml = "id: 550e8400e29b41d4a716446655440000\nslug: welcome\nsource: hi\nextra: 1\n";
        assert!(serde_yaml::from_str::<TextDocument>(yaml).is_err());
    }
}
