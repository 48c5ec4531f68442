//! Error types for the pencil library
//!
//! Expected geometric outcomes (nothing found, degenerate vectors) are not
//! errors and never show up here. These variants cover bad input handed to
//! the library by its host.

use crate::data::PathId;
use std::path::PathBuf;
use thiserror::Error;

/// Errors reported by the library surface
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum PencilError {
    #[error("no path with id {0:?} in this layer")]
    UnknownPath(PathId),

    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    #[error("layer '{0}' not found in font")]
    MissingLayer(String),

    #[error("glyph '{0}' not found")]
    MissingGlyph(String),

    #[error("contour {index} out of range (glyph has {count})")]
    ContourOutOfRange { index: usize, count: usize },

    #[error("failed to read config file {path:?}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path:?}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("norad error: {0}")]
    Norad(#[from] norad::error::FontLoadError),

    #[error("norad write error: {0}")]
    NoradWrite(#[from] norad::error::FontWriteError),
}
