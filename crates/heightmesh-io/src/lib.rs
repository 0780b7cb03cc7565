#![forbid(unsafe_code)]
//! File formats around the mesh pipeline: `.npy` grids in, binary STL out,
//! TOML pipeline configuration.

pub mod config;
pub mod error;
pub mod npy;
pub mod stl;

pub use config::{load_config_from_path, parse_config};
pub use error::IoError;
pub use npy::{load_grid, read_grid};
