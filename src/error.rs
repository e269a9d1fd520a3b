//! Error types
//!
//! The simulation itself cannot fail; errors only come from startup
//! (assets, configuration).

/// Top-level error returned to the hosting page/binary.
#[derive(thiserror::Error, Debug)]
pub enum GameError {
    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AssetError {
    #[error("Asset not found: {0}")]
    NotFound(String),

    #[error("Failed to decode {path}: {reason}")]
    Decode { path: String, reason: String },
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Malformed config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}
