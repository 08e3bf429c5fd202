use thiserror::Error;

/// Application-level error type.
///
/// Nothing here is fatal to an editing session: persistence failures become advisories
/// and export failures are reported so the user can retry.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Capture of page {page} failed: {message}")]
    Capture { page: usize, message: String },

    #[error("Encoding error: {0}")]
    Encode(String),

    #[error("An export is already running")]
    ExportInProgress,

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Maps the error to a stable code and a message fit to show the user.
    ///
    /// Detail that only matters for diagnosis is logged, not returned.
    pub fn advisory(&self) -> (&'static str, String) {
        match self {
            AppError::NotFound(msg) => ("NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => ("VALIDATION_ERROR", msg.clone()),
            AppError::Storage(msg) => {
                tracing::error!("Storage error: {msg}");
                (
                    "STORAGE_ERROR",
                    format!("Failed to save data: {msg}. Your edits are kept in memory."),
                )
            }
            AppError::Serialization(e) => {
                tracing::error!("Serialization error: {e}");
                (
                    "SERIALIZATION_ERROR",
                    "The resume could not be serialized".to_string(),
                )
            }
            AppError::Io(e) => {
                tracing::error!("IO error: {e}");
                ("IO_ERROR", format!("A file operation failed: {e}"))
            }
            AppError::Capture { page, message } => {
                tracing::error!("Capture error on page {page}: {message}");
                (
                    "EXPORT_ERROR",
                    format!("PDF export failed while capturing page {}: {message}", page + 1),
                )
            }
            AppError::Encode(msg) => {
                tracing::error!("Encoding error: {msg}");
                ("EXPORT_ERROR", format!("Export failed: {msg}"))
            }
            AppError::ExportInProgress => (
                "EXPORT_BUSY",
                "Another export is still running".to_string(),
            ),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                ("INTERNAL_ERROR", "An internal error occurred".to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_advisory_uses_one_based_page() {
        let err = AppError::Capture {
            page: 0,
            message: "renderer crashed".to_string(),
        };
        let (code, message) = err.advisory();
        assert_eq!(code, "EXPORT_ERROR");
        assert!(message.contains("page 1"), "{message}");
    }

    #[test]
    fn test_storage_advisory_mentions_in_memory_state() {
        let (code, message) = AppError::Storage("disk full".to_string()).advisory();
        assert_eq!(code, "STORAGE_ERROR");
        assert!(message.contains("disk full"));
        assert!(message.contains("in memory"));
    }
}
