use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Contract failures on the loaded data. These mean the caller asked for
/// something that cannot exist after a successful load.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("An item prototype with the id '{0}' was not found.")]
    UnknownItem(String),

    #[error("A location with the id '{0}' was not found.")]
    UnknownLocation(String),

    #[error("An NPC with the id '{0}' was not found.")]
    UnknownNpc(String),
}

/// Why a single content file could not be turned into records.
#[derive(Debug, Error)]
pub(crate) enum FileError {
    #[error("Failed to read \"{}\":\n{source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to deserialize file \"{}\":\n{source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
