//! Errors surfaced by the `stratum` binary.

use std::path::PathBuf;

use stratum_terrain::{SerialError, TerrainError};

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Generation parameters violate a terrain invariant.
    #[error("invalid generation parameters: {0}")]
    Terrain(#[from] TerrainError),

    /// Archive encoding or decoding failed.
    #[error("archive error: {0}")]
    Serial(#[from] SerialError),

    /// A file could not be read or written.
    #[error("failed to {action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The color map could not be encoded.
    #[error("failed to write image: {0}")]
    Image(#[from] image::ImageError),
}

impl CliError {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| CliError::Io {
            action,
            path,
            source,
        }
    }
}
