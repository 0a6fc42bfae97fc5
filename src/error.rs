/// Error types shared across the application
use std::path::PathBuf;

use crate::state::data::ItemId;

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("failed to read config file {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("disease catalog must contain at least one entry")]
    EmptyCatalog,
    #[error("could not determine a cache directory for previews")]
    NoCacheDir,
    #[error("failed to prepare preview directory {}: {source}", .path.display())]
    PreviewDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type ScanResult<T> = std::result::Result<T, ScanError>;

#[derive(Debug, thiserror::Error)]
pub enum PreviewError {
    #[error("failed to write preview for {id}: {source}")]
    Write {
        id: ItemId,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to release preview {}: {source}", .path.display())]
    Release {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("no live preview for {0}")]
    UnknownHandle(ItemId),
}
