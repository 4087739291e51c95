use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum LobbyError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {file}: {source}")]
    Parse {
        file: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("storage error: {0}")]
    Storage(#[from] redb::Error),
    #[error("setup json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown map: {0}")]
    UnknownMap(String),
    #[error("unknown player: {0}")]
    UnknownPlayer(String),
    #[error("player already in lobby: {0}")]
    DuplicatePlayer(String),
    #[error("the local player cannot leave the lobby: {0}")]
    LocalPlayerRemoval(String),
    #[error("setup not found: {0}")]
    SetupNotFound(String),
}

/// Lift any redb error type into [`LobbyError::Storage`].
pub fn db<E: Into<redb::Error>>(e: E) -> LobbyError {
    LobbyError::Storage(e.into())
}
