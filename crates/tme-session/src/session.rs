//! Reversible editing of one map.

use std::fmt;
use std::sync::Arc;

use tme_command::{Command, CommandStack};
use tme_diff::diff_states;
use tme_history::{HistoryLedger, HistoryResult};
use tme_map::{Instance, Map, MapError, MapResult, MapState};
use tme_types::{Point, StateId};
use tme_vars::VariablesBuilder;
use tracing::{debug, error, info, warn};

use crate::error::SessionResult;
use crate::hooks::{Redraw, RedrawHook, SelectionProvider};

/// Everything undo and redo act on: the live map, its ledger, and the
/// renderer to notify.
pub struct Workspace {
    map: Map,
    ledger: HistoryLedger<MapState>,
    redraw: Box<dyn RedrawHook>,
    dirty: bool,
}

impl Workspace {
    fn new(map: Map, redraw: Box<dyn RedrawHook>) -> Self {
        let ledger = HistoryLedger::new(&map);
        Self {
            map,
            ledger,
            redraw,
            dirty: false,
        }
    }

    pub fn map(&self) -> &Map {
        &self.map
    }

    pub fn ledger(&self) -> &HistoryLedger<MapState> {
        &self.ledger
    }

    /// Restore the map to `id` and repaint the tiles that changed.
    pub fn jump(&mut self, id: StateId) -> HistoryResult<()> {
        let before = self.map.capture();
        self.ledger.go_to(id, &mut self.map)?;
        self.dirty = false;
        self.redraw_changes(&before);
        Ok(())
    }

    fn redraw_changes(&mut self, before: &MapState) {
        let diff = diff_states(before, &self.map.capture());
        if diff.resized {
            self.redraw.redraw(&Redraw::All);
        } else if !diff.is_empty() {
            self.redraw.redraw(&Redraw::Points(diff.points()));
        }
    }
}

impl fmt::Debug for Workspace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Workspace")
            .field("map", &self.map.name())
            .field("current", &self.ledger.current())
            .field("dirty", &self.dirty)
            .finish()
    }
}

/// Undoable record of one commit: moves the map between the committed state
/// and the state it was committed on top of.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SnapshotCommand {
    label: String,
    state: StateId,
    previous: StateId,
}

impl SnapshotCommand {
    pub fn new(label: impl Into<String>, state: StateId, previous: StateId) -> Self {
        Self {
            label: label.into(),
            state,
            previous,
        }
    }

    pub fn state(&self) -> StateId {
        self.state
    }

    pub fn previous(&self) -> StateId {
        self.previous
    }
}

impl Command<Workspace> for SnapshotCommand {
    fn name(&self) -> &str {
        &self.label
    }

    fn undo(&mut self, ws: &mut Workspace) {
        if let Err(err) = ws.jump(self.previous) {
            error!(command = %self.label, %err, "undo target missing from ledger");
        }
    }

    fn redo(&mut self, ws: &mut Workspace) {
        if let Err(err) = ws.jump(self.state) {
            error!(command = %self.label, %err, "redo target missing from ledger");
        }
    }
}

/// One open map with its history and undo stack.
pub struct EditSession {
    workspace: Workspace,
    commands: CommandStack<Workspace>,
}

impl EditSession {
    /// Open `map`; its current content becomes the baseline `s#0`.
    pub fn new(map: Map, redraw: impl RedrawHook + 'static) -> Self {
        info!(map = %map.name(), "edit session opened");
        Self {
            workspace: Workspace::new(map, Box::new(redraw)),
            commands: CommandStack::new(),
        }
    }

    /// Keep at most `limit` undoable edits. `None` and `Some(0)` keep all.
    pub fn with_undo_limit(mut self, limit: Option<usize>) -> Self {
        self.commands = match limit {
            Some(limit) => CommandStack::with_limit(limit),
            None => CommandStack::new(),
        };
        self
    }

    pub fn map(&self) -> &Map {
        &self.workspace.map
    }

    pub fn ledger(&self) -> &HistoryLedger<MapState> {
        &self.workspace.ledger
    }

    /// The ledger entry the map was last committed as or restored to.
    pub fn state_id(&self) -> StateId {
        self.workspace.ledger.current()
    }

    /// `true` when the map has edits not yet committed.
    pub fn is_dirty(&self) -> bool {
        self.workspace.dirty
    }

    /// Run `edit` against the map and commit the result as one undoable step.
    ///
    /// `edit` returns the points it touched; they are repainted before the
    /// commit. If it fails, the map is put back the way it was and nothing is
    /// committed.
    pub fn apply_edit<F>(&mut self, label: &str, edit: F) -> SessionResult<StateId>
    where
        F: FnOnce(&mut Map) -> MapResult<Vec<Point>>,
    {
        let checkpoint = self.workspace.map.capture();
        match edit(&mut self.workspace.map) {
            Ok(points) => {
                self.workspace.redraw.redraw(&Redraw::Points(points));
                Ok(self.commit_changes(label))
            }
            Err(err) => {
                warn!(label, %err, "edit failed; map left unchanged");
                self.workspace.map.restore(&checkpoint);
                self.workspace.redraw_changes(&checkpoint);
                Err(err.into())
            }
        }
    }

    /// Put the selected instance on top of the tile at `point` without
    /// committing. Returns `false` when nothing is selected.
    pub fn add_selected_instance(
        &mut self,
        point: Point,
        selection: &dyn SelectionProvider,
    ) -> SessionResult<bool> {
        let Some(instance) = selection.selected_instance() else {
            return Ok(false);
        };
        self.workspace.map.tile_mut(point)?.push(instance);
        self.workspace.dirty = true;
        self.workspace.redraw.redraw(&Redraw::Points(vec![point]));
        Ok(true)
    }

    /// Commit the current map content and push an undoable command for it.
    pub fn commit_changes(&mut self, label: &str) -> StateId {
        let ws = &mut self.workspace;
        let previous = ws.ledger.current();
        let state = ws.ledger.commit_labeled(&ws.map, label);
        ws.dirty = false;
        self.commands
            .push(SnapshotCommand::new(label, state, previous));
        debug!(%state, %previous, label, "changes committed");
        state
    }

    /// Place `instance` on top of the tile at `point` and commit.
    pub fn place_instance(&mut self, point: Point, instance: Arc<Instance>) -> SessionResult<StateId> {
        let label = format!("Place {}", instance.name());
        self.apply_edit(&label, |map| {
            map.tile_mut(point)?.push(instance);
            Ok(vec![point])
        })
    }

    /// Replace the instance at `index` with a copy whose variables were
    /// rebuilt by `edit`, then commit.
    pub fn set_instance_vars<F>(&mut self, point: Point, index: usize, edit: F) -> SessionResult<StateId>
    where
        F: FnOnce(&mut VariablesBuilder),
    {
        self.apply_edit("Edit variables", |map| {
            let edited = Arc::new(map.instance(point, index)?.edit(edit));
            map.tile_mut(point)?.replace(index, edited);
            Ok(vec![point])
        })
    }

    /// Remove the instance at `index` and commit.
    pub fn remove_instance(&mut self, point: Point, index: usize) -> SessionResult<StateId> {
        self.apply_edit("Remove instance", |map| {
            map.tile_mut(point)?
                .remove(index)
                .ok_or(MapError::NoInstance { point, index })?;
            Ok(vec![point])
        })
    }

    /// Undo the last committed edit. Returns `false` when there is none.
    pub fn undo(&mut self) -> bool {
        self.commands.undo(&mut self.workspace)
    }

    /// Redo the last undone edit. Returns `false` when there is none.
    pub fn redo(&mut self) -> bool {
        self.commands.redo(&mut self.workspace)
    }

    pub fn can_undo(&self) -> bool {
        self.commands.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.commands.can_redo()
    }

    pub fn undo_label(&self) -> Option<&str> {
        self.commands.undo_label()
    }

    pub fn redo_label(&self) -> Option<&str> {
        self.commands.redo_label()
    }
}

impl fmt::Debug for EditSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditSession")
            .field("workspace", &self.workspace)
            .field("undo", &self.commands.undo_len())
            .field("redo", &self.commands.redo_len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::error::SessionError;
    use crate::hooks::{NoRedraw, Selection};
    use tme_map::Bounds;
    use tme_types::TypePath;
    use tme_vars::Variables;

    fn instance(path: &str) -> Arc<Instance> {
        Arc::new(Instance::new(
            TypePath::parse(path).unwrap(),
            Arc::new(Variables::new()),
        ))
    }

    fn session() -> EditSession {
        EditSession::new(Map::new("test", Bounds::new(4, 4, 1).unwrap()), NoRedraw)
    }

    fn recording_session() -> (EditSession, Rc<RefCell<Vec<Redraw>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let session = EditSession::new(
            Map::new("test", Bounds::new(4, 4, 1).unwrap()),
            move |region: &Redraw| sink.borrow_mut().push(region.clone()),
        );
        (session, log)
    }

    fn count(session: &EditSession, point: Point) -> usize {
        session.map().tile(point).unwrap().len()
    }

    #[test]
    fn edit_commits_and_undo_restores() {
        let mut session = session();
        let p = Point::flat(2, 2);
        let s1 = session.place_instance(p, instance("/obj")).unwrap();
        assert_eq!(s1, StateId::new(1));
        assert_eq!(count(&session, p), 1);

        assert!(session.undo());
        assert_eq!(count(&session, p), 0);
        assert_eq!(session.state_id(), StateId::BASELINE);

        assert!(session.redo());
        assert_eq!(count(&session, p), 1);
        assert_eq!(session.state_id(), s1);
    }

    #[test]
    fn zero_undo_limit_keeps_every_edit() {
        let mut session = session().with_undo_limit(Some(0));
        let p = Point::flat(1, 1);
        session.place_instance(p, instance("/obj")).unwrap();
        session.place_instance(p, instance("/mob")).unwrap();

        assert!(session.can_undo());
        assert!(session.undo());
        assert!(session.undo());
        assert_eq!(count(&session, p), 0);
        assert_eq!(session.state_id(), StateId::BASELINE);
    }

    #[test]
    fn undo_without_history_is_noop() {
        let mut session = session();
        assert!(!session.undo());
        assert!(!session.redo());
        assert_eq!(session.state_id(), StateId::BASELINE);
    }

    #[test]
    fn new_edit_after_undo_drops_redo_and_keeps_ledger() {
        let mut session = session();
        let p = Point::flat(1, 1);
        session.place_instance(p, instance("/obj")).unwrap();
        session.place_instance(p, instance("/mob")).unwrap();
        session.undo();
        assert!(session.can_redo());

        let s3 = session.place_instance(p, instance("/turf")).unwrap();
        assert!(!session.can_redo());
        assert_eq!(s3, StateId::new(3));
        assert_eq!(session.ledger().len(), 4);
        assert_eq!(session.ledger().parent_of(s3).unwrap(), Some(StateId::new(1)));

        // Undo lands on the state the edit was made on, not on s#2.
        session.undo();
        assert_eq!(session.state_id(), StateId::new(1));
        let tile = session.map().tile(p).unwrap();
        assert_eq!(tile.len(), 1);
        assert_eq!(tile.get(0).unwrap().path().as_str(), "/obj");
    }

    #[test]
    fn paint_stroke_commits_once() {
        let (mut session, log) = recording_session();
        let mut selection = Selection::new();
        assert!(!session.add_selected_instance(Point::flat(1, 1), &selection).unwrap());

        selection.select(instance("/turf/floor"));
        for x in 1..=3 {
            assert!(session.add_selected_instance(Point::flat(x, 1), &selection).unwrap());
        }
        assert!(session.is_dirty());
        assert_eq!(session.ledger().len(), 1);
        assert_eq!(log.borrow().len(), 3);

        let id = session.commit_changes("Paint");
        assert!(!session.is_dirty());
        assert_eq!(session.undo_label(), Some("Paint"));

        session.undo();
        assert_eq!(count(&session, Point::flat(2, 1)), 0);
        assert_eq!(
            log.borrow().last(),
            Some(&Redraw::Points(vec![
                Point::flat(1, 1),
                Point::flat(2, 1),
                Point::flat(3, 1)
            ]))
        );
        session.redo();
        assert_eq!(session.state_id(), id);
    }

    #[test]
    fn out_of_bounds_paint_is_an_error() {
        let mut session = session();
        let mut selection = Selection::new();
        selection.select(instance("/obj"));
        let err = session
            .add_selected_instance(Point::flat(9, 9), &selection)
            .unwrap_err();
        assert!(matches!(err, SessionError::Map(MapError::OutOfBounds { .. })));
    }

    #[test]
    fn failed_edit_leaves_map_and_history_alone() {
        let mut session = session();
        session.place_instance(Point::flat(1, 1), instance("/obj")).unwrap();

        let err = session
            .apply_edit("Broken", |map| {
                map.tile_mut(Point::flat(1, 1))?.clear();
                map.tile_mut(Point::flat(5, 1))?.push(instance("/mob"));
                Ok(vec![])
            })
            .unwrap_err();

        assert!(matches!(err, SessionError::Map(MapError::OutOfBounds { .. })));
        assert_eq!(count(&session, Point::flat(1, 1)), 1);
        assert_eq!(session.ledger().len(), 2);
        assert_eq!(session.undo_label(), Some("Place obj"));
    }

    #[test]
    fn set_vars_replaces_instance() {
        let mut session = session();
        let p = Point::flat(3, 3);
        session.place_instance(p, instance("/obj")).unwrap();
        session
            .set_instance_vars(p, 0, |vars| {
                vars.put("dir", "4");
            })
            .unwrap();

        let placed = session.map().instance(p, 0).unwrap();
        assert_eq!(placed.vars().int("dir"), Some(4));

        session.undo();
        assert_eq!(session.map().instance(p, 0).unwrap().vars().int("dir"), None);
    }

    #[test]
    fn missing_instance_is_reported() {
        let mut session = session();
        let p = Point::flat(1, 2);
        let err = session.remove_instance(p, 0).unwrap_err();
        assert!(matches!(
            err,
            SessionError::Map(MapError::NoInstance { index: 0, .. })
        ));
        let err = session.set_instance_vars(p, 3, |_| {}).unwrap_err();
        assert!(matches!(err, SessionError::Map(MapError::NoInstance { .. })));
        assert_eq!(session.ledger().len(), 1);
    }

    #[test]
    fn remove_then_undo() {
        let mut session = session();
        let p = Point::flat(4, 4);
        session.place_instance(p, instance("/obj")).unwrap();
        session.place_instance(p, instance("/mob")).unwrap();
        session.remove_instance(p, 0).unwrap();
        assert_eq!(session.map().instance(p, 0).unwrap().path().as_str(), "/mob");

        session.undo();
        assert_eq!(count(&session, p), 2);
        assert_eq!(session.map().instance(p, 0).unwrap().path().as_str(), "/obj");
    }

    #[test]
    fn undo_limit_bounds_history() {
        let mut session = session().with_undo_limit(Some(2));
        for x in 1..=4 {
            session.place_instance(Point::flat(x, 1), instance("/obj")).unwrap();
        }
        assert!(session.undo());
        assert!(session.undo());
        assert!(!session.undo());
        assert_eq!(session.state_id(), StateId::new(2));
        // The ledger itself keeps every entry.
        assert_eq!(session.ledger().len(), 5);
    }

    #[test]
    fn undo_repaints_only_changed_tiles() {
        let (mut session, log) = recording_session();
        session.place_instance(Point::flat(2, 3), instance("/obj")).unwrap();
        log.borrow_mut().clear();

        session.undo();
        assert_eq!(
            *log.borrow(),
            vec![Redraw::Points(vec![Point::flat(2, 3)])]
        );
    }
}
