//! Errors raised while loading specs, generating floors and compositing documents

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, DungenError>;

#[derive(Error, Debug)]
pub enum DungenError {
    #[error("{0} is not a recognized room creation algorithm")]
    UnknownRoomAlgorithm(String),

    #[error("{0} is not a recognized room shape")]
    UnknownRoomShape(String),

    #[error("Invalid bound for '{field}': lower {lower} is greater than upper {upper}")]
    InvalidBound {
        field: &'static str,
        lower: i32,
        upper: i32,
    },

    #[error("'{field}' must be within [0, 1], found {value}")]
    InvalidProbability { field: &'static str, value: f64 },

    #[error("'{field}' must be positive, found {value}")]
    InvalidDimension { field: &'static str, value: i32 },

    #[error("Document is missing required element '{0}'")]
    MissingElement(String),

    #[error("Invalid extra option '{key}': {source}")]
    InvalidExtra {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Could not read texture '{path}': {source}")]
    TextureRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid dungeon spec: {0}")]
    InvalidSpec(String),

    #[error("Spec parse error: {0}")]
    SpecParse(#[from] serde_yaml::Error),

    #[error("Dungeon spec defines no usable floor types")]
    EmptyDungeon,
}
