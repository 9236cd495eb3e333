/// Error types for scan sessions
use std::fmt;

#[derive(Debug)]
pub enum ScanError {
    // Page source errors
    Transport { key: String, source: anyhow::Error },

    // Flow control
    AlreadyExhausted,
    LoadInProgress,
    Superseded,
    Closed,

    // Local edits
    NotFound { locator: String },
}

pub type ScanResult<T> = Result<T, ScanError>;

impl ScanError {
    /// No-op conditions that should not be shown to the user as failures.
    pub fn is_benign(&self) -> bool {
        matches!(
            self,
            ScanError::AlreadyExhausted | ScanError::Superseded | ScanError::NotFound { .. }
        )
    }

    /// Whether the caller may simply issue the same call again.
    pub fn can_retry(&self) -> bool {
        matches!(self, ScanError::Transport { .. } | ScanError::LoadInProgress)
    }
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanError::Transport { key, source } => {
                write!(f, "Failed to fetch page for key {key}: {source}")
            }
            ScanError::AlreadyExhausted => write!(f, "Scan already exhausted"),
            ScanError::LoadInProgress => write!(f, "A page load is already in progress"),
            ScanError::Superseded => write!(f, "Page discarded: scan was reset while loading"),
            ScanError::Closed => write!(f, "Scan session is closed"),
            ScanError::NotFound { locator } => write!(f, "No item matching {locator} in view"),
        }
    }
}

impl std::error::Error for ScanError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScanError::Transport { source, .. } => Some(&**source),
            _ => None,
        }
    }
}
