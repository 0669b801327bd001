use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while creating a raster surface
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    #[error("Invalid surface dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("Surface of {width}x{height} pixels is too large")]
    TooLarge { width: u32, height: u32 },
}

/// Errors raised while loading or validating an editor configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config value for `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}

/// Top-level error for constructing a flipbook session
#[derive(Error, Debug)]
pub enum FlipbookError {
    #[error(transparent)]
    Surface(#[from] SurfaceError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Unknown tool `{0}`")]
    UnknownTool(String),
}
