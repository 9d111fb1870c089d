use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Directory that receives generated artifacts and persisted state.
///
/// Writes go through a temp file and a rename, so a crash mid-write never
/// leaves a torn document behind.
#[derive(Debug, Clone)]
pub struct OutputDir {
    root: PathBuf,
}

impl OutputDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Create the directory if missing and probe that it is writable.
    pub fn ensure(&self) -> Result<(), StoreError> {
        if self.root.exists() {
            let meta =
                fs::metadata(&self.root).map_err(|e| StoreError::OutputDir(e.to_string()))?;
            if !meta.is_dir() {
                return Err(StoreError::OutputDir("path is not a directory".into()));
            }
        } else {
            fs::create_dir_all(&self.root).map_err(|e| StoreError::OutputDir(e.to_string()))?;
        }
        NamedTempFile::new_in(&self.root).map_err(|e| StoreError::OutputDir(e.to_string()))?;
        Ok(())
    }

    /// Atomically write `content` to `{root}/{filename}`, replacing any
    /// existing file, and return the final path.
    pub fn write(&self, filename: &str, content: &str) -> Result<PathBuf, StoreError> {
        self.ensure()?;

        let target = self.root.join(filename);
        let mut tmp = NamedTempFile::new_in(&self.root)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;

        if target.exists() {
            fs::remove_file(&target)?;
        }
        tmp.persist(&target).map_err(|e| StoreError::Io(e.error))?;
        Ok(target)
    }
}
