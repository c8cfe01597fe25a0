//! File-backed record stores.
//!
//! - [`texts::TextStore`]: text documents, looked up by slug
//! - [`catalog::CatalogStore`]: commodity records, looked up by name

pub mod catalog;
mod helpers;
pub mod texts;
