//! File-backed store of text documents.
//!
//! ## Storage Layout
//!
//! ```text
//! <data_dir>/
//!   texts/<s1>/<s2>/<id>/text.yaml    # the document, including cached html
//!   text-slugs/<slug>                 # id of the document that owns <slug>
//! ```
//!
//! Slug uniqueness is enforced by creating the index entry with create-new semantics, so two
//! concurrent creates for one slug cannot both succeed. Document writes are atomic renames.

use crate::config::CoreConfig;
use crate::constants::TEXT_FILENAME;
use crate::repositories::helpers::{
    create_unique_sharded_dir, read_yaml, sharded_record_files, write_yaml,
};
use crate::text::TextDocument;
use crate::{ContentError, ContentResult};
use emporium_types::Slug;
use emporium_uuid::RecordId;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct TextStore {
    cfg: Arc<CoreConfig>,
}

impl TextStore {
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        Self { cfg }
    }

    fn document_path(&self, id: RecordId) -> PathBuf {
        id.sharded_dir(&self.cfg.texts_dir()).join(TEXT_FILENAME)
    }

    fn slug_path(&self, slug: &Slug) -> PathBuf {
        self.cfg.slug_index_dir().join(slug.as_str())
    }

    /// Creates and stores a new, unrendered document.
    ///
    /// # Errors
    ///
    /// - [`ContentError::DuplicateSlug`] if another document already owns `slug`.
    /// - Storage errors if the document or its index entry cannot be written. A partially
    ///   created document directory is removed again.
    pub fn create(&self, slug: Slug, source: impl Into<String>) -> ContentResult<TextDocument> {
        let slug_path = self.slug_path(&slug);
        if slug_path.exists() {
            return Err(ContentError::DuplicateSlug(slug));
        }

        let (id, document_dir) = create_unique_sharded_dir(&self.cfg.texts_dir(), RecordId::new)?;
        let document = TextDocument::new(id, slug, source);

        let result = write_yaml(&document_dir.join(TEXT_FILENAME), &document)
            .and_then(|()| self.claim_slug(document.slug(), id));
        if let Err(e) = result {
            if let Err(cleanup_error) = fs::remove_dir_all(&document_dir) {
                tracing::warn!(
                    "failed to clean up {} after create error: {}",
                    document_dir.display(),
                    cleanup_error
                );
            }
            return Err(e);
        }

        tracing::info!(slug = %document.slug(), %id, "created text document");
        Ok(document)
    }

    fn claim_slug(&self, slug: &Slug, id: RecordId) -> ContentResult<()> {
        fs::create_dir_all(self.cfg.slug_index_dir()).map_err(ContentError::StorageDirCreation)?;

        let slug_path = self.slug_path(slug);
        let mut file = match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&slug_path)
        {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(ContentError::DuplicateSlug(slug.clone()))
            }
            Err(e) => return Err(ContentError::FileWrite(e)),
        };

        if let Err(e) = file.write_all(id.to_string().as_bytes()) {
            let _ = fs::remove_file(&slug_path);
            return Err(ContentError::FileWrite(e));
        }
        Ok(())
    }

    /// Loads the document that owns `slug`.
    ///
    /// Returns `Ok(None)` when no document has that slug.
    ///
    /// # Errors
    ///
    /// Storage errors, including [`ContentError::DanglingSlug`] when the index names a document
    /// that is not on disk.
    pub fn fetch_by_slug(&self, slug: &Slug) -> ContentResult<Option<TextDocument>> {
        let raw_id = match fs::read_to_string(self.slug_path(slug)) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(ContentError::FileRead(e)),
        };

        // An entry that is still being written reads as empty.
        let raw_id = raw_id.trim();
        if raw_id.is_empty() {
            return Ok(None);
        }

        let id = RecordId::parse(raw_id)?;
        match self.fetch_by_id(id)? {
            Some(document) => Ok(Some(document)),
            None => Err(ContentError::DanglingSlug {
                slug: slug.clone(),
                id,
            }),
        }
    }

    /// Like [`TextStore::fetch_by_slug`], but a missing document is an error.
    ///
    /// # Errors
    ///
    /// [`ContentError::SlugNotFound`] when no document has that slug, plus storage errors.
    pub fn require_by_slug(&self, slug: &Slug) -> ContentResult<TextDocument> {
        self.fetch_by_slug(slug)?
            .ok_or_else(|| ContentError::SlugNotFound(slug.clone()))
    }

    /// Loads a document by id, returning `Ok(None)` if it does not exist.
    pub fn fetch_by_id(&self, id: RecordId) -> ContentResult<Option<TextDocument>> {
        read_yaml(&self.document_path(id))
    }

    /// Writes an existing document back, including any cache fill.
    ///
    /// # Errors
    ///
    /// [`ContentError::RecordNotFound`] if the document was never created through this store.
    pub fn save(&self, document: &TextDocument) -> ContentResult<()> {
        let path = self.document_path(document.id());
        if !path.is_file() {
            return Err(ContentError::RecordNotFound(document.id()));
        }
        write_yaml(&path, document)
    }

    /// Lists every readable document. Files that fail to parse are logged and skipped.
    pub fn list(&self) -> Vec<TextDocument> {
        let mut documents: Vec<TextDocument> =
            sharded_record_files(&self.cfg.texts_dir(), TEXT_FILENAME)
                .into_iter()
                .filter_map(|path| match read_yaml::<TextDocument>(&path) {
                    Ok(document) => document,
                    Err(e) => {
                        tracing::warn!("failed to parse {}: {}", path.display(), e);
                        None
                    }
                })
                .collect();
        documents.sort_by(|a, b| a.slug().cmp(b.slug()));
        documents
    }
}
