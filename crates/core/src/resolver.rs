//! Localized content resolution with a render cache.
//!
//! [`LocalizedContentResolver::resolve_html`] turns a loaded [`TextDocument`] and an optional
//! language code into the HTML to display:
//!
//! 1. If the code is non-empty and names an authored translation exactly, that translation is
//!    the target. Otherwise the document's default source is the target. Absent, empty and
//!    unknown codes all fall back the same way, and there is no partial matching (`en-US` does
//!    not fall back to `en`).
//! 2. If the target already has cached HTML it is returned as is.
//! 3. Otherwise the target's source is rendered, stored into the target's `html`, and returned.
//!
//! The document is borrowed mutably, so the cache fill is visible to the caller through its own
//! value. Persisting it is the caller's decision; [`Resolved::cache_filled`] says whether there is
//! anything new to persist. A failed render leaves the document untouched.

use crate::render::{CommonMarkRenderer, MarkdownRenderer};
use crate::text::{SelectedVariant, TextDocument};
use crate::ContentResult;

/// Outcome of resolving a document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolved {
    pub html: String,
    pub variant: SelectedVariant,
    /// True when this call rendered the target and wrote a new cache value into the document.
    /// An empty rendering is never cached, so it is never reported as a fill.
    pub cache_filled: bool,
}

#[derive(Clone, Debug, Default)]
pub struct LocalizedContentResolver<R = CommonMarkRenderer> {
    renderer: R,
}

impl LocalizedContentResolver<CommonMarkRenderer> {
    pub fn commonmark() -> Self {
        Self::new(CommonMarkRenderer::new())
    }
}

impl<R: MarkdownRenderer> LocalizedContentResolver<R> {
    pub fn new(renderer: R) -> Self {
        Self { renderer }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Resolves `document` for `language`, filling the selected target's cache if needed.
    ///
    /// # Errors
    ///
    /// Propagates the renderer's error. Nothing is written into the document in that case, so a
    /// later call can retry.
    pub fn resolve_html(
        &self,
        document: &mut TextDocument,
        language: Option<&str>,
    ) -> ContentResult<Resolved> {
        let slug = document.slug().clone();
        let (variant, slot) = document.select_slot(language);

        if let Some(html) = slot.html.as_deref().filter(|html| !html.is_empty()) {
            return Ok(Resolved {
                html: html.to_owned(),
                variant,
                cache_filled: false,
            });
        }

        let html = self.renderer.render(slot.source)?;
        // An empty rendering reads back as unrendered, so storing it would change nothing.
        if html.is_empty() {
            return Ok(Resolved {
                html,
                variant,
                cache_filled: false,
            });
        }

        *slot.html = Some(html.clone());
        tracing::debug!(%slug, %variant, "rendered text document");

        Ok(Resolved {
            html,
            variant,
            cache_filled: true,
        })
    }
}
