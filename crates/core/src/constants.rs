//! Path and filename constants for the on-disk store.

/// Default data directory when `EMPORIUM_DATA_DIR` is not set.
pub const DEFAULT_DATA_DIR: &str = "emporium_data";

/// Directory holding sharded text document directories.
pub const TEXTS_DIR_NAME: &str = "texts";

/// Directory holding one file per slug, each containing the owning document id.
pub const SLUG_INDEX_DIR_NAME: &str = "text-slugs";

/// Directory holding sharded commodity record directories.
pub const COMMODITIES_DIR_NAME: &str = "commodities";

/// Filename of a text document inside its sharded directory.
pub const TEXT_FILENAME: &str = "text.yaml";

/// Filename of a commodity record inside its sharded directory.
pub const COMMODITY_FILENAME: &str = "commodity.yaml";

/// Lowest production level assumed when a commodity does not set `min_level`.
pub const DEFAULT_MIN_LEVEL: u32 = 1;
