//! Record identifiers and sharded storage paths.
//!
//! Every text document and commodity record is stored under a directory derived from its
//! identifier. Identifiers use a single canonical representation: **32 lowercase hexadecimal
//! characters** with no hyphens, e.g. `550e8400e29b41d4a716446655440000`.
//!
//! ## Sharded directory layout
//! For a canonical id `u`, a record lives under:
//! `parent_dir/<u[0..2]>/<u[2..4]>/<u>/`
//!
//! Example:
//! `emporium_data/texts/55/0e/550e8400e29b41d4a716446655440000/`

mod record_id;

pub use record_id::RecordId;

/// Re-exported for convenience.
pub use ::uuid::Uuid;

/// Error type for identifier operations.
#[derive(Debug, thiserror::Error)]
pub enum UuidError {
    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for identifier operations.
pub type UuidResult<T> = Result<T, UuidError>;
