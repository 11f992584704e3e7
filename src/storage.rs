//! Persistence for the command list.
//!
//! The list lives in a single JSON file (`[{"id":0,"cmd":"ls"}]`). Every write
//! replaces the whole file; there is no delta format and no locking.

use crate::model::CommandList;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("cannot create directory {path:?}")]
    CreateDir { path: PathBuf, source: io::Error },
    #[error("cannot read {path:?}")]
    Read { path: PathBuf, source: io::Error },
    #[error("cannot write {path:?}")]
    Write { path: PathBuf, source: io::Error },
    #[error("malformed command list in {path:?}")]
    Decode {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("cannot encode command list for {path:?}")]
    Encode {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Backing storage for a session.
pub trait Store {
    fn load(&self) -> Result<CommandList, StorageError>;
    fn save(&self, list: &CommandList) -> Result<(), StorageError>;
}

/// The JSON file store used outside of tests.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Store for FileStore {
    fn load(&self) -> Result<CommandList, StorageError> {
        load(&self.path)
    }

    fn save(&self, list: &CommandList) -> Result<(), StorageError> {
        save(list, &self.path)
    }
}

pub fn encode(list: &CommandList) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(list)
}

pub fn decode(text: &str) -> Result<CommandList, serde_json::Error> {
    serde_json::from_str(text)
}

/// Read the list at `path`, initializing the file with a single empty entry
/// when it is missing or blank.
pub fn load(path: &Path) -> Result<CommandList, StorageError> {
    ensure_parent_dir(path)?;

    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
        Err(source) => {
            return Err(StorageError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    if text.trim().is_empty() {
        tracing::info!(path = %path.display(), "initializing command list");
        let list = CommandList::initial();
        save(&list, path)?;
        return Ok(list);
    }

    let mut list = decode(&text).map_err(|source| StorageError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    if !list.is_dense() {
        tracing::warn!(path = %path.display(), "stored positions are not dense; renumbering");
        list.reindex();
    }
    tracing::debug!(path = %path.display(), entries = list.len(), "loaded command list");
    Ok(list)
}

/// Overwrite `path` with the full list, positions renumbered to their index.
pub fn save(list: &CommandList, path: &Path) -> Result<(), StorageError> {
    ensure_parent_dir(path)?;

    let mut list = list.clone();
    list.reindex();
    let text = encode(&list).map_err(|source| StorageError::Encode {
        path: path.to_path_buf(),
        source,
    })?;

    // Write next to the target and rename so a crash never leaves a truncated file.
    let tmp = tmp_path(path);
    fs::write(&tmp, text.as_bytes()).map_err(|source| StorageError::Write {
        path: tmp.clone(),
        source,
    })?;
    if let Err(source) = fs::rename(&tmp, path) {
        if let Err(e) = fs::remove_file(&tmp) {
            tracing::warn!(path = %tmp.display(), error = %e, "cannot remove temp file");
        }
        return Err(StorageError::Write {
            path: path.to_path_buf(),
            source,
        });
    }
    tracing::debug!(path = %path.display(), entries = list.len(), "saved command list");
    Ok(())
}

fn ensure_parent_dir(path: &Path) -> Result<(), StorageError> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() && !dir.exists() => {
            fs::create_dir_all(dir).map_err(|source| StorageError::CreateDir {
                path: dir.to_path_buf(),
                source,
            })
        }
        _ => Ok(()),
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
