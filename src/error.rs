//! Errors surfaced by the collaborators around the confirmation list.
//!
//! The list itself has no fallible operations; these cover loading a preview,
//! background name lookups and transaction submission.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfirmError {
    /// A preview file field could not be parsed
    #[error("Invalid preview field '{field}': {reason}")]
    InvalidPreview { field: &'static str, reason: String },

    /// Reverse name lookup failed (the list falls back to the raw address)
    #[error("Name lookup failed: {0}")]
    NameLookup(String),

    /// Signing or broadcasting failed
    #[error("Submission failed: {0}")]
    Submission(String),

    /// A background task went away without reporting a result
    #[error("Worker task disconnected")]
    WorkerDisconnected,
}
