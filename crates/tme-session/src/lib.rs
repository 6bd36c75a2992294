//! Edit sessions for the tile map editor.
//!
//! An [`EditSession`] owns one open map together with its history ledger
//! and undo stack. Every committed edit appends a ledger entry and pushes a
//! [`SnapshotCommand`]; undo and redo jump the map between ledger entries
//! and ask the [`RedrawHook`] to repaint the tiles that changed.
//!
//! A [`MapHolder`] keeps track of the open sessions and which one is
//! selected. [`EditorConfig`] carries the user-tunable settings.

pub mod config;
pub mod error;
pub mod holder;
pub mod hooks;
pub mod session;

pub use config::{EditorConfig, LogLevel};
pub use error::{ConfigError, ConfigResult, SessionError, SessionResult};
pub use holder::MapHolder;
pub use hooks::{NoRedraw, Redraw, RedrawHook, Selection, SelectionProvider};
pub use session::{EditSession, SnapshotCommand, Workspace};
