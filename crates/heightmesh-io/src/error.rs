use std::path::{Path, PathBuf};

use heightmesh_grid::GridError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed .npy{}: {reason}", at(.path))]
    Npy {
        path: Option<PathBuf>,
        reason: String,
    },

    #[error("failed to write STL{}: {source}", at(.path))]
    Stl {
        path: Option<PathBuf>,
        #[source]
        source: std::io::Error,
    },

    #[error("config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Grid(#[from] GridError),
}

fn at(path: &Option<PathBuf>) -> String {
    match path {
        Some(p) => format!(" ({})", p.display()),
        None => String::new(),
    }
}

impl IoError {
    pub(crate) fn npy(reason: impl Into<String>) -> Self {
        IoError::Npy {
            path: None,
            reason: reason.into(),
        }
    }

    /// Attaches `path` to errors that carry one and do not have it yet.
    pub(crate) fn at_path(self, path: &Path) -> Self {
        match self {
            IoError::Npy { path: None, reason } => IoError::Npy {
                path: Some(path.to_path_buf()),
                reason,
            },
            IoError::Stl { path: None, source } => IoError::Stl {
                path: Some(path.to_path_buf()),
                source,
            },
            other => other,
        }
    }
}
