//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and passed into the stores, so request
//! handling never reads process-wide environment variables.

use crate::constants::{
    COMMODITIES_DIR_NAME, DEFAULT_DATA_DIR, SLUG_INDEX_DIR_NAME, TEXTS_DIR_NAME,
};
use crate::{ContentError, ContentResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    data_dir: PathBuf,
}

impl CoreConfig {
    pub fn new(data_dir: PathBuf) -> ContentResult<Self> {
        if data_dir.as_os_str().is_empty() {
            return Err(ContentError::InvalidInput(
                "data directory cannot be empty".into(),
            ));
        }
        Ok(Self { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn texts_dir(&self) -> PathBuf {
        self.data_dir.join(TEXTS_DIR_NAME)
    }

    pub fn slug_index_dir(&self) -> PathBuf {
        self.data_dir.join(SLUG_INDEX_DIR_NAME)
    }

    pub fn commodities_dir(&self) -> PathBuf {
        self.data_dir.join(COMMODITIES_DIR_NAME)
    }
}

/// Resolve the data directory from an optional environment value.
///
/// `None` or a blank value falls back to [`DEFAULT_DATA_DIR`].
pub fn data_dir_from_env_value(value: Option<String>) -> PathBuf {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_empty_path() {
        let err = CoreConfig::new(PathBuf::new()).expect_err("empty path should be rejected");
        assert!(matches!(err, ContentError::InvalidInput(_)));
    }

    #[test]
    fn test_directories_are_under_data_dir() {
        let cfg = CoreConfig::new(PathBuf::from("/srv/emporium")).unwrap();
        assert_eq!(cfg.texts_dir(), PathBuf::from("/srv/emporium/texts"));
        assert_eq!(cfg.slug_index_dir(), PathBuf::from("/srv/emporium/text-slugs"));
        assert_eq!(
            cfg.commodities_dir(),
            PathBuf::from("/srv/emporium/commodities")
        );
    }

    #[test]
    fn test_data_dir_from_env_value() {
        assert_eq!(data_dir_from_env_value(None), PathBuf::from(DEFAULT_DATA_DIR));
        assert_eq!(
            data_dir_from_env_value(Some("   ".into())),
            PathBuf::from(DEFAULT_DATA_DIR)
        );
        assert_eq!(
            data_dir_from_env_value(Some(" /data ".into())),
            PathBuf::from("/data")
        );
    }
}
