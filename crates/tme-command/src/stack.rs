//! The undo/redo stack.

use std::collections::VecDeque;

use tracing::debug;

use crate::command::Command;

type BoxedCommand<Ctx> = Box<dyn Command<Ctx>>;

/// Linear undo/redo stack.
///
/// The undo side is bounded when a limit is set: pushing past the limit
/// forgets the oldest command.
pub struct CommandStack<Ctx> {
    undo: VecDeque<BoxedCommand<Ctx>>,
    redo: Vec<BoxedCommand<Ctx>>,
    limit: Option<usize>,
}

impl<Ctx> CommandStack<Ctx> {
    /// An unbounded stack.
    pub fn new() -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            limit: None,
        }
    }

    /// A stack keeping at most `limit` undoable commands. A limit of `0`
    /// means unbounded.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit: (limit > 0).then_some(limit),
            ..Self::new()
        }
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Record a command whose effect is already in place. Clears the redo
    /// side.
    pub fn push(&mut self, command: impl Command<Ctx> + 'static) {
        self.push_boxed(Box::new(command));
    }

    pub fn push_boxed(&mut self, command: BoxedCommand<Ctx>) {
        debug!(command = command.name(), dropped_redo = self.redo.len(), "command pushed");
        self.redo.clear();
        self.undo.push_back(command);
        if let Some(limit) = self.limit {
            while self.undo.len() > limit {
                if let Some(evicted) = self.undo.pop_front() {
                    debug!(command = evicted.name(), "undo limit reached; command forgotten");
                }
            }
        }
    }

    /// Undo the most recent command. Returns `false` when there is nothing
    /// to undo.
    pub fn undo(&mut self, ctx: &mut Ctx) -> bool {
        let Some(mut command) = self.undo.pop_back() else {
            return false;
        };
        debug!(command = command.name(), "undo");
        command.undo(ctx);
        self.redo.push(command);
        true
    }

    /// Redo the most recently undone command. Returns `false` when there is
    /// nothing to redo.
    pub fn redo(&mut self, ctx: &mut Ctx) -> bool {
        let Some(mut command) = self.redo.pop() else {
            return false;
        };
        debug!(command = command.name(), "redo");
        command.redo(ctx);
        self.undo.push_back(command);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Name of the command `undo` would revert.
    pub fn undo_label(&self) -> Option<&str> {
        self.undo.back().map(|c| c.name())
    }

    /// Name of the command `redo` would replay.
    pub fn redo_label(&self) -> Option<&str> {
        self.redo.last().map(|c| c.name())
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    /// Forget every command.
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}

impl<Ctx> Default for CommandStack<Ctx> {
    fn default() -> Self {
        Self::new()
    }
}
