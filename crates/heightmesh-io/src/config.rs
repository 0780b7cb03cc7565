use std::fs;
use std::path::Path;

use heightmesh_mesh::PipelineConfig;

use crate::error::IoError;

pub fn parse_config(text: &str) -> Result<PipelineConfig, IoError> {
    Ok(toml::from_str(text)?)
}

/// Reads a pipeline config; keys left out fall back to their defaults.
pub fn load_config_from_path(path: impl AsRef<Path>) -> Result<PipelineConfig, IoError> {
    let s = fs::read_to_string(path)?;
    parse_config(&s)
}
