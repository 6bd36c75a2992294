use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tme_map::Bounds;

use crate::error::{ConfigError, ConfigResult};

/// User-tunable editor settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Maximum number of undoable edits per session. `0` keeps all.
    pub undo_limit: usize,
    /// Verbosity of the log output.
    pub log_level: LogLevel,
    /// Dimensions of maps created without explicit bounds.
    pub default_map: Bounds,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            undo_limit: 200,
            log_level: LogLevel::Info,
            default_map: Bounds::default(),
        }
    }
}

impl EditorConfig {
    /// Parse a TOML document. Missing keys take their defaults; map bounds
    /// are checked as they are read.
    pub fn from_toml_str(source: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: &Path) -> ConfigResult<Self> {
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Undo limit for new sessions, `None` when unbounded.
    pub fn history_limit(&self) -> Option<usize> {
        (self.undo_limit > 0).then_some(self.undo_limit)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config() {
        let c = EditorConfig::default();
        assert_eq!(c.history_limit(), Some(200));
        assert_eq!(c.log_level, LogLevel::Info);
        assert_eq!(c.default_map, Bounds::default());
    }

    #[test]
    fn partial_document_keeps_defaults() {
        let c = EditorConfig::from_toml_str("log_level = \"debug\"\n").unwrap();
        assert_eq!(c.log_level, LogLevel::Debug);
        assert_eq!(c.undo_limit, 200);
    }

    #[test]
    fn nested_map_bounds() {
        let source = "undo_limit = 5\n\n[default_map]\nwidth = 10\nheight = 20\ndepth = 2\n";
        let c = EditorConfig::from_toml_str(source).unwrap();
        assert_eq!(c.undo_limit, 5);
        assert_eq!(c.default_map, Bounds::new(10, 20, 2).unwrap());
    }

    #[test]
    fn zero_undo_limit_is_unbounded() {
        let c = EditorConfig::from_toml_str("undo_limit = 0").unwrap();
        assert_eq!(c.history_limit(), None);
    }

    #[test]
    fn empty_map_is_invalid() {
        let source = "[default_map]\nwidth = 0\nheight = 1\ndepth = 1\n";
        let err = EditorConfig::from_toml_str(source).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("invalid map dimensions"));
    }

    #[test]
    fn oversized_map_is_invalid() {
        let source = "[default_map]\nwidth = 4294967295\nheight = 4294967295\ndepth = 4294967295\n";
        let err = EditorConfig::from_toml_str(source).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn unknown_log_level_fails_to_parse() {
        let err = EditorConfig::from_toml_str("log_level = \"loud\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn written_config_loads_back() {
        let config = EditorConfig {
            undo_limit: 0,
            log_level: LogLevel::Warn,
            default_map: Bounds::new(64, 48, 3).unwrap(),
        };
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(config.to_toml_string().unwrap().as_bytes())
            .unwrap();

        let loaded = EditorConfig::load(file.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = EditorConfig::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn levels_map_to_tracing() {
        assert_eq!(tracing::Level::from(LogLevel::Trace), tracing::Level::TRACE);
        assert_eq!(LogLevel::Warn.to_string(), "warn");
    }
}
