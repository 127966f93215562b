//! Error types for rplot.
//!
//! The renderer performs almost no validation of its own, so most variants
//! wrap a failure raised by one of its collaborators (the drawing backend,
//! the image encoder, the array readers) and carry it to the caller unchanged.

use thiserror::Error;

/// The main error type for rplot operations.
#[derive(Error, Debug)]
pub enum RplotError {
    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Invalid parameter errors
    #[error("Invalid parameter: {param} - {message}")]
    InvalidParameter { param: String, message: String },

    /// Array file could not be decoded into a 2D grid
    #[error("Data loading error: {message}")]
    DataLoad { message: String },

    /// Colormap construction errors
    #[error("Colormap error: {message}")]
    Colormap { message: String },

    /// Contour overlay errors
    #[error("Contour error: {message}")]
    Contour { message: String },

    /// Errors raised by the drawing backend, including file encoding
    #[error("Drawing error: {message}")]
    Drawing { message: String },

    /// The output file extension has no encoder
    #[error("Unsupported output format: {extension:?}")]
    UnsupportedFormat { extension: String },

    /// Image generation errors
    #[error("Image generation error: {message}")]
    ImageGeneration { message: String },
}

impl RplotError {
    /// Wrap a drawing backend failure.
    pub fn drawing<E: std::fmt::Display>(err: E) -> Self {
        RplotError::Drawing {
            message: err.to_string(),
        }
    }
}

/// Convenience type alias for Results with RplotError
pub type Result<T> = std::result::Result<T, RplotError>;
