//! # Emporium Core
//!
//! Content and catalog logic for Emporium:
//! - Text documents with per-language Markdown sources and cached HTML ([`text`])
//! - Localized resolution with a render cache ([`resolver`])
//! - The commodity catalog model ([`commodity`])
//! - File-backed stores under a configured data directory ([`repositories`])
//!
//! **No API concerns**: HTTP routing, page templates and process bootstrap belong in `api-rest`
//! and the binaries.

pub mod commodity;
pub mod config;
pub mod constants;
pub mod error;
pub mod render;
pub mod repositories;
pub mod resolver;
pub mod text;

pub use commodity::{CommodityRecord, StorageClass};
pub use config::CoreConfig;
pub use constants::DEFAULT_DATA_DIR;
pub use error::{ContentError, ContentResult};
pub use render::{CommonMarkRenderer, MarkdownRenderer};
pub use repositories::catalog::{CatalogStore, NewCommodity};
pub use repositories::texts::TextStore;
pub use resolver::{LocalizedContentResolver, Resolved};
pub use text::{LocalizedVariant, SelectedVariant, TextDocument};

pub use emporium_types::{LanguageCode, NonEmptyText, Slug, TextError};
pub use emporium_uuid::RecordId;
