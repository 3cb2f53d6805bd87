use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SimulationError>;

/// Configuration failures raised while loading, validating and building a simulation.
///
/// Every variant is fatal for the configuration attempt that raised it. The first
/// failure encountered is returned and nothing is retried.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimulationError {
    #[error("invalid simulation model: {0}")]
    ModelError(String),

    #[error("model {model} expects {expected} parameters but {found} were given")]
    ParameterCountError {
        model: String,
        expected: usize,
        found: usize,
    },

    #[error("model {model} expects {expected} states but {found} were declared")]
    StateCountError {
        model: String,
        expected: usize,
        found: usize,
    },

    #[error("state {state} does not belong to model {model}")]
    StateNameError { model: String, state: String },

    #[error("invalid state percentages: {0}")]
    StatePercentageError(String),

    #[error("invalid grid size: {0}")]
    GridSizeError(String),

    #[error("unknown cell shape: {0}")]
    CellShapeError(String),

    #[error("unknown edge policy: {0}")]
    EdgePolicyError(String),

    #[error("invalid neighbor index: {0}")]
    NeighborIndexError(String),

    #[error("explicit layout flag does not match the cell table: {0}")]
    SpecificationMismatchError(String),

    #[error("cell ({row}, {col}) is outside the {height}x{width} grid")]
    CellIndexError {
        row: i64,
        col: i64,
        width: usize,
        height: usize,
    },

    #[error("cell ({row}, {col}) uses undeclared state {state}")]
    CellStateError { row: i64, col: i64, state: String },

    #[error("incomplete cell table: {0}")]
    CellCompletenessError(String),

    #[error("file not found: {}", .0.display())]
    FileNotFoundError(PathBuf),

    #[error("malformed document: {0}")]
    MalformedDocumentError(String),
}

/// Reads a whole document, telling a missing file apart from an unreadable one.
pub(crate) fn read_document(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|err| match err.kind() {
        ErrorKind::NotFound => SimulationError::FileNotFoundError(path.to_path_buf()),
        _ => SimulationError::MalformedDocumentError(format!("{}: {}", path.display(), err)),
    })
}
