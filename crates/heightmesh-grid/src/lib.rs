//! Height grid storage and the preprocessing chain that prepares a raw depth
//! or elevation sample grid for meshing.
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod grid;
pub mod preprocess;

use thiserror::Error;

pub use config::{NormalizeTarget, PreprocessConfig};
pub use error::{DataError, GridError, GridWarning, InvalidConfigError};
pub use grid::HeightGrid;
pub use preprocess::{
    Preprocessed, Stage, clamp_bounds, clamp_outliers, downsample, invert, normalize,
    preprocess,
};

/// A grid error attributed to the preprocessing stage that raised it.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{stage} failed: {source}")]
pub struct StageError {
    pub stage: Stage,
    #[source]
    pub source: GridError,
}

impl StageError {
    pub fn new(stage: Stage, source: impl Into<GridError>) -> Self {
        Self {
            stage,
            source: source.into(),
        }
    }
}
