use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::errors::AppError;
use crate::models::ResumeDocument;
use crate::storage::DocumentStore;

/// Keeps the serialized snapshot in memory. Stores the JSON text, like the file store,
/// so load/save exercise the same serialization path.
#[derive(Default)]
pub struct MemoryStore {
    raw: Mutex<Option<String>>,
    saves: AtomicUsize,
    fail_saves: AtomicBool,
    fail_clears: AtomicBool,
}

impl MemoryStore {
    /// A store pre-seeded with raw stored text, which may be corrupt.
    pub fn with_raw(raw: &str) -> Self {
        Self {
            raw: Mutex::new(Some(raw.to_string())),
            ..Self::default()
        }
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Makes subsequent saves fail, as a full or read-only disk would.
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_clears(&self, fail: bool) {
        self.fail_clears.store(fail, Ordering::SeqCst);
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Option<String>>, AppError> {
        self.raw
            .lock()
            .map_err(|_| AppError::Storage("memory store lock poisoned".to_string()))
    }
}

impl DocumentStore for MemoryStore {
    fn load(&self) -> Result<Option<ResumeDocument>, AppError> {
        match self.lock()?.as_deref() {
            Some(raw) => Ok(Some(serde_json::from_str(raw)?)),
            None => Ok(None),
        }
    }

    fn save(&self, doc: &ResumeDocument) -> Result<(), AppError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(AppError::Storage("quota exceeded".to_string()));
        }
        let raw = serde_json::to_string(doc)?;
        *self.lock()? = Some(raw);
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn clear(&self) -> Result<(), AppError> {
        if self.fail_clears.load(Ordering::SeqCst) {
            return Err(AppError::Storage("storage is read-only".to_string()));
        }
        *self.lock()? = None;
        Ok(())
    }
}
