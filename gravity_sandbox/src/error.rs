//! Error types for the sandbox library

use std::path::PathBuf;

/// Why a click did not produce a body
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum SpawnError {
    #[error("click ray does not reach the spawn plane")]
    MissedPlane,
    #[error("body store is full ({capacity} bodies)")]
    StoreFull { capacity: usize },
    #[error("viewport has zero size")]
    EmptyViewport,
}

/// Failures while loading or validating a config file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
