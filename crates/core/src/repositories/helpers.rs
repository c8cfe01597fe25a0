//! Storage helpers shared by the record stores.
//!
//! Records live in sharded directories (`<base>/<s1>/<s2>/<id>/<file>.yaml`). These helpers
//! allocate such directories, scan them, and read/write the YAML files inside.

use crate::{ContentError, ContentResult};
use emporium_uuid::RecordId;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::{
    fs,
    io::{self, ErrorKind, Write},
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;

/// Creates a fresh sharded directory for a new record.
///
/// Ids come from `id_source`; an id whose directory already exists is skipped. Gives up after
/// 5 attempts.
///
/// # Errors
///
/// Returns [`ContentError::StorageDirCreation`] if a directory cannot be created or no free id
/// was found.
pub(crate) fn create_unique_sharded_dir(
    base_dir: &Path,
    mut id_source: impl FnMut() -> RecordId,
) -> ContentResult<(RecordId, PathBuf)> {
    for _attempt in 0..5 {
        let id = id_source();
        let candidate = id.sharded_dir(base_dir);

        if candidate.exists() {
            continue;
        }

        if let Some(parent) = candidate.parent() {
            fs::create_dir_all(parent).map_err(ContentError::StorageDirCreation)?;
        }

        match fs::create_dir(&candidate) {
            Ok(()) => return Ok((id, candidate)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(ContentError::StorageDirCreation(e)),
        }
    }

    Err(ContentError::StorageDirCreation(io::Error::new(
        ErrorKind::AlreadyExists,
        "failed to allocate a unique record directory after 5 attempts",
    )))
}

/// Writes `contents` to a uniquely named temp file in the same directory and renames it over
/// `path`, so readers see either the old or the new file. Concurrent writers never share a temp
/// file; the last rename wins.
pub(crate) fn write_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
    let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(contents)?;
    tmp.persist(path).map(|_| ()).map_err(|e| e.error)
}

pub(crate) fn write_yaml<T: Serialize>(path: &Path, value: &T) -> ContentResult<()> {
    let yaml = serde_yaml::to_string(value).map_err(ContentError::YamlSerialization)?;
    write_atomic(path, yaml.as_bytes()).map_err(ContentError::FileWrite)
}

/// Reads and parses a YAML record, reporting the field path of any schema mismatch.
///
/// Returns `Ok(None)` when the file does not exist.
pub(crate) fn read_yaml<T: DeserializeOwned>(path: &Path) -> ContentResult<Option<T>> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(ContentError::FileRead(e)),
    };
    parse_yaml(&contents).map(Some)
}

pub(crate) fn parse_yaml<T: DeserializeOwned>(contents: &str) -> ContentResult<T> {
    let deserializer = serde_yaml::Deserializer::from_str(contents);
    serde_path_to_error::deserialize(deserializer).map_err(|err| {
        let path = err.path().to_string();
        let path = if path.is_empty() || path == "." {
            "<root>".to_string()
        } else {
            path
        };
        ContentError::YamlDeserialization {
            path,
            message: err.into_inner().to_string(),
        }
    })
}

/// Lists `<base>/<s1>/<s2>/<id>/<file_name>` paths that exist as files.
///
/// Unreadable directories are skipped; a missing base directory yields an empty list.
pub(crate) fn sharded_record_files(base_dir: &Path, file_name: &str) -> Vec<PathBuf> {
    fn subdirs(dir: &Path) -> impl Iterator<Item = PathBuf> {
        fs::read_dir(dir)
            .into_iter()
            .flatten()
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.is_dir())
    }

    let mut files: Vec<PathBuf> = subdirs(base_dir)
        .flat_map(|s1| subdirs(&s1).collect::<Vec<_>>())
        .flat_map(|s2| subdirs(&s2).collect::<Vec<_>>())
        .map(|record_dir| record_dir.join(file_name))
        .filter(|path| path.is_file())
        .collect();
    files.sort();
    files
}
