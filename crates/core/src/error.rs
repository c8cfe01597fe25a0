use emporium_types::{Slug, TextError};
use emporium_uuid::{RecordId, UuidError};

#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid text: {0}")]
    Text(#[from] TextError),
    #[error("invalid record id: {0}")]
    Uuid(#[from] UuidError),

    #[error("no text document with slug '{0}'")]
    SlugNotFound(Slug),
    #[error("no record with id {0}")]
    RecordNotFound(RecordId),
    #[error("a text document with slug '{0}' already exists")]
    DuplicateSlug(Slug),
    #[error("a commodity named '{0}' already exists")]
    DuplicateName(String),
    #[error("min_level {min} is greater than max_level {max}")]
    InvalidLevelRange { min: u32, max: u32 },

    #[error("failed to render markdown: {0}")]
    RenderFailure(String),

    #[error("failed to create storage directory: {0}")]
    StorageDirCreation(std::io::Error),
    #[error("failed to write record file: {0}")]
    FileWrite(std::io::Error),
    #[error("failed to read record file: {0}")]
    FileRead(std::io::Error),
    #[error("failed to serialize YAML: {0}")]
    YamlSerialization(serde_yaml::Error),
    #[error("record schema mismatch at {path}: {message}")]
    YamlDeserialization { path: String, message: String },
    #[error("slug index entry '{slug}' points at missing document {id}")]
    DanglingSlug { slug: Slug, id: RecordId },
}

impl ContentError {
    /// True when the error means "nothing matched" rather than "something broke".
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ContentError::SlugNotFound(_) | ContentError::RecordNotFound(_)
        )
    }

    /// True for failures of the storage layer itself (I/O, YAML, index consistency).
    pub fn is_storage_failure(&self) -> bool {
        matches!(
            self,
            ContentError::StorageDirCreation(_)
                | ContentError::FileWrite(_)
                | ContentError::FileRead(_)
                | ContentError::YamlSerialization(_)
                | ContentError::YamlDeserialization { .. }
                | ContentError::DanglingSlug { .. }
        )
    }
}

pub type ContentResult<T> = std::result::Result<T, ContentError>;
