//! Command trait and a closure-backed implementation.

use std::fmt;

/// A reversible unit of work.
///
/// `undo` and `redo` are only ever called in stack order: `undo` after the
/// command's effect is in place, `redo` after it has been undone.
pub trait Command<Ctx> {
    /// Human-readable label shown in menus ("Undo Add Atoms").
    fn name(&self) -> &str;

    fn undo(&mut self, ctx: &mut Ctx);

    fn redo(&mut self, ctx: &mut Ctx);
}

type Action<Ctx> = Box<dyn FnMut(&mut Ctx)>;

/// A command built from two closures.
pub struct FnCommand<Ctx> {
    name: String,
    undo: Action<Ctx>,
    redo: Action<Ctx>,
}

impl<Ctx> FnCommand<Ctx> {
    pub fn new(
        name: impl Into<String>,
        undo: impl FnMut(&mut Ctx) + 'static,
        redo: impl FnMut(&mut Ctx) + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            undo: Box::new(undo),
            redo: Box::new(redo),
        }
    }
}

impl<Ctx> Command<Ctx> for FnCommand<Ctx> {
    fn name(&self) -> &str {
        &self.name
    }

    fn undo(&mut self, ctx: &mut Ctx) {
        (self.undo)(ctx)
    }

    fn redo(&mut self, ctx: &mut Ctx) {
        (self.redo)(ctx)
    }
}

impl<Ctx> fmt::Debug for FnCommand<Ctx> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnCommand").field("name", &self.name).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_run_against_context() {
        let mut cmd = FnCommand::new("Toggle", |n: &mut i32| *n -= 1, |n: &mut i32| *n += 1);
        let mut value = 1;
        cmd.undo(&mut value);
        assert_eq!(value, 0);
        cmd.redo(&mut value);
        assert_eq!(value, 1);
        assert_eq!(cmd.name(), "Toggle");
    }

    #[test]
    fn debug_shows_name() {
        let cmd = FnCommand::new("Paint", |_: &mut ()| {}, |_: &mut ()| {});
        assert_eq!(format!("{cmd:?}"), r#"FnCommand { name: "Paint" }"#);
    }
}
