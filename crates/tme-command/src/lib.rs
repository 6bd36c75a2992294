//! Reversible commands and the linear undo/redo stack.
//!
//! A [`Command`] is a named pair of side effects, `undo` and `redo`, run
//! against a context the stack's owner passes in. The [`CommandStack`]
//! keeps the usual discipline: pushing a command drops anything that could
//! still be redone, and undo/redo on an empty side is a silent no-op.

pub mod command;
pub mod stack;

pub use command::{Command, FnCommand};
pub use stack::CommandStack;
