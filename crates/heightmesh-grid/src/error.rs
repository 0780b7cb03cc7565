//! Error and warning types for grid construction and preprocessing.

use thiserror::Error;

/// A preprocessing knob was given a value the operation cannot honour.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("invalid config: {name} = {value} ({reason})")]
pub struct InvalidConfigError {
    pub name: &'static str,
    pub value: String,
    pub reason: &'static str,
}

impl InvalidConfigError {
    pub fn new<T: std::fmt::Display>(name: &'static str, value: T, reason: &'static str) -> Self {
        Self {
            name,
            value: value.to_string(),
            reason,
        }
    }
}

/// The height samples themselves are unusable.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataError {
    #[error("grid has zero extent ({rows}x{cols})")]
    Empty { rows: usize, cols: usize },

    #[error("grid shape {rows}x{cols} does not match {len} samples")]
    ShapeMismatch { rows: usize, cols: usize, len: usize },

    #[error("non-finite height {value} at cell ({row}, {col})")]
    NonFinite { row: usize, col: usize, value: f32 },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridError {
    #[error(transparent)]
    InvalidConfig(#[from] InvalidConfigError),

    #[error(transparent)]
    Data(#[from] DataError),
}

/// Non-fatal conditions; the pipeline keeps going with the grid unchanged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GridWarning {
    /// Normalization found no positive maximum to scale against.
    DegenerateNormalize { max: f32 },
}

impl std::fmt::Display for GridWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GridWarning::DegenerateNormalize { max } => {
                write!(f, "normalize skipped: grid maximum is {max}, nothing to scale")
            }
        }
    }
}
