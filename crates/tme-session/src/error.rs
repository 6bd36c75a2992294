use std::path::PathBuf;

use thiserror::Error;
use tme_history::HistoryError;
use tme_map::MapError;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("history error: {0}")]
    History(#[from] HistoryError),

    #[error("map error: {0}")]
    Map(#[from] MapError),

    #[error("no open map named {0}")]
    UnknownMap(String),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

pub type SessionResult<T> = Result<T, SessionError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("cannot encode config: {0}")]
    Encode(#[from] toml::ser::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
