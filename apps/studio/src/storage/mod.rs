//! Persistence port for the single resume snapshot.

pub mod debounce;
pub mod file;
#[cfg(test)]
pub mod memory;

use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::{default_template, ResumeDocument};

pub use debounce::DebouncedSaver;
pub use file::FileStore;
#[cfg(test)]
pub use memory::MemoryStore;

/// Fixed key the snapshot is stored under.
pub const STORAGE_KEY: &str = "resumeData";

/// Where the resume snapshot lives.
///
/// `load` returns `Ok(None)` when nothing has been stored yet.
pub trait DocumentStore: Send + Sync {
    fn load(&self) -> Result<Option<ResumeDocument>, AppError>;
    fn save(&self, doc: &ResumeDocument) -> Result<(), AppError>;
    fn clear(&self) -> Result<(), AppError>;
}

/// Loads the stored snapshot, falling back to the default template.
///
/// Absent or unreadable data is not an error for the caller: it is logged and the
/// returned advisory (if any) can be shown to the user.
pub fn load_or_default(store: &dyn DocumentStore) -> (ResumeDocument, Option<String>) {
    match store.load() {
        Ok(Some(doc)) => {
            info!("Loaded saved resume");
            (doc, None)
        }
        Ok(None) => {
            info!("No saved resume found; starting from the default template");
            (default_template(), None)
        }
        Err(e) => {
            warn!("Error reading stored key \"{STORAGE_KEY}\": {e}");
            (
                default_template(),
                Some(format!("Failed to load saved data: {e}")),
            )
        }
    }
}
