//! Error type shared by the graph-cut driver and the batch generator.

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by the vectorization pipeline.
#[derive(Debug, Error)]
pub enum SketchError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Image encoding / decoding error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Tool configuration could not be read or parsed
    #[error("{0}")]
    Config(String),

    /// SVG markup could not be parsed or rendered
    #[error("SVG error: {0}")]
    Svg(String),

    /// Two buffers that must agree in size do not
    #[error("Shape mismatch in {what}: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        what: &'static str,
        expected: Vec<usize>,
        got: Vec<usize>,
    },

    /// Malformed line in a plaintext exchange file
    #[error("Failed to parse {}:{line}: {message}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// External solver failed to start or exited unsuccessfully
    #[error("Solver error: {0}")]
    Solver(String),

    /// Caller supplied an argument outside the accepted domain
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Sampling loop gave up
    #[error("No usable sample after {attempts} attempts")]
    RetriesExhausted { attempts: usize },
}

impl SketchError {
    pub(crate) fn shape(what: &'static str, expected: &[usize], got: &[usize]) -> Self {
        Self::ShapeMismatch {
            what,
            expected: expected.to_vec(),
            got: got.to_vec(),
        }
    }
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, SketchError>;
