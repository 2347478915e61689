use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] lore_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Story description cannot be empty")]
    EmptyDescription,
    #[error("Photo file is empty: {0}")]
    EmptyPhoto(String),
    #[error("Could not determine a data directory; pass --data-dir")]
    NoDataDir,
}
