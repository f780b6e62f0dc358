use std::path::PathBuf;

use thiserror::Error;

/// Boxed error returned by injected collaborators (detector, recognizer,
/// field extractor).
pub type ServiceError = Box<dyn std::error::Error + Send + Sync>;

/// Errors surfaced by the region pipeline.
///
/// Degenerate geometry and merge non-convergence are deliberately absent:
/// the first is filtered as noise, the second yields a valid but
/// under-merged result.
#[derive(Debug, Error)]
pub enum RegionError {
    /// The detector reported no text regions for the page.
    #[error("no text regions detected")]
    NoRegionsDetected,

    /// A pipeline setting is out of range.
    #[error("invalid config `{field}`: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    /// The text detector failed.
    #[error("text detection failed")]
    Detection(#[source] ServiceError),

    /// Reading file metadata failed.
    #[error("failed to stat {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, RegionError>;
