//! Error types
//!
//! Only `SetupError` is fatal. Configuration and draw errors are reported and skipped.

use thiserror::Error;

/// Problems reading the startup configuration (never fatal)
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("config is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("config root must be an object")]
    NotAnObject,

    #[error("config key `{0}` is not set")]
    MissingKey(String),

    #[error("config key `{key}` has the wrong type (expected {expected})")]
    WrongType { key: String, expected: &'static str },

    #[error("config key `{key}` is out of range: {reason}")]
    OutOfRange { key: String, reason: String },

    #[error("unknown config key `{0}`")]
    UnknownKey(String),
}

/// Setup failures that stop the process
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("brick grid needs at least one column")]
    NoColumns,

    #[error("brick grid with {columns} columns leaves no room (cell {width}x{height})")]
    DegenerateGrid { columns: u16, width: f32, height: f32 },

    #[error("invalid {entity} size {width}x{height}")]
    InvalidEntity {
        entity: &'static str,
        width: f32,
        height: f32,
    },

    #[error("physics world rejected {0} body")]
    BodyCreation(&'static str),
}

/// A single primitive the render collaborator could not draw
#[derive(Debug, Error)]
pub enum DrawError {
    #[error("asset `{0}` is not available")]
    MissingAsset(String),

    #[error("render target lost")]
    TargetLost,
}
