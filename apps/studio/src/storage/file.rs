use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Utc;
use tracing::debug;

use crate::errors::AppError;
use crate::models::ResumeDocument;
use crate::storage::{DocumentStore, STORAGE_KEY};

/// Stores the snapshot as `<dir>/resumeData.json`.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{STORAGE_KEY}.json")),
        }
    }

    #[cfg(test)]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DocumentStore for FileStore {
    fn load(&self) -> Result<Option<ResumeDocument>, AppError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(AppError::Storage(format!("{}: {e}", self.path.display()))),
        };
        let doc = serde_json::from_str(&raw)?;
        Ok(Some(doc))
    }

    fn save(&self, doc: &ResumeDocument) -> Result<(), AppError> {
        let json = serde_json::to_vec_pretty(doc)?;
        write_atomically(&self.path, &json)
            .map_err(|e| AppError::Storage(format!("{e:#}")))?;
        debug!(
            path = %self.path.display(),
            bytes = json.len(),
            saved_at = %Utc::now().to_rfc3339(),
            "saved resume snapshot"
        );
        Ok(())
    }

    fn clear(&self) -> Result<(), AppError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Storage(format!("{}: {e}", self.path.display()))),
        }
    }
}

/// Writes `bytes` to `path` through a temp file in the same directory, then renames it
/// into place. Readers see either the old file or the complete new one, never a partial write.
pub fn write_atomically(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("failed to create temp file in {}", dir.display()))?;
    tmp.write_all(bytes).context("failed to write temp file")?;
    tmp.as_file().sync_all().context("failed to sync temp file")?;
    tmp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("failed to move file into place at {}", path.display()))?;
    Ok(())
}
