//! Open maps and the current selection.

use tracing::info;

use crate::error::{SessionError, SessionResult};
use crate::session::EditSession;

/// The sessions open in the editor, in the order they were opened, and which
/// one is selected.
#[derive(Debug, Default)]
pub struct MapHolder {
    sessions: Vec<(String, EditSession)>,
    selected: Option<usize>,
}

impl MapHolder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the session opened under `key`, opening it with `open` first if
    /// needed.
    pub fn open_with<F>(&mut self, key: &str, open: F) -> SessionResult<&mut EditSession>
    where
        F: FnOnce() -> SessionResult<EditSession>,
    {
        let index = match self.position(key) {
            Some(index) => index,
            None => {
                let session = open()?;
                info!(map = key, "map opened");
                self.sessions.push((key.to_string(), session));
                self.sessions.len() - 1
            }
        };
        self.selected = Some(index);
        Ok(&mut self.sessions[index].1)
    }

    /// Close the session under `key`. If it was selected, its neighbour at
    /// the same position takes over, or the previous one when it was last.
    pub fn close(&mut self, key: &str) -> Option<EditSession> {
        let index = self.position(key)?;
        let (_, session) = self.sessions.remove(index);

        self.selected = match self.selected {
            _ if self.sessions.is_empty() => None,
            Some(selected) if selected == index => Some(index.min(self.sessions.len() - 1)),
            Some(selected) if selected > index => Some(selected - 1),
            other => other,
        };
        info!(map = key, remaining = self.sessions.len(), "map closed");
        Some(session)
    }

    pub fn select(&mut self, key: &str) -> SessionResult<()> {
        let index = self
            .position(key)
            .ok_or_else(|| SessionError::UnknownMap(key.to_string()))?;
        self.selected = Some(index);
        Ok(())
    }

    pub fn selected_key(&self) -> Option<&str> {
        self.selected.map(|i| self.sessions[i].0.as_str())
    }

    pub fn selected(&self) -> Option<&EditSession> {
        self.selected.map(|i| &self.sessions[i].1)
    }

    pub fn selected_mut(&mut self) -> Option<&mut EditSession> {
        let index = self.selected?;
        Some(&mut self.sessions[index].1)
    }

    pub fn get(&self, key: &str) -> Option<&EditSession> {
        self.position(key).map(|i| &self.sessions[i].1)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut EditSession> {
        let index = self.position(key)?;
        Some(&mut self.sessions[index].1)
    }

    /// Every open session, in opening order.
    pub fn sessions(&self) -> impl Iterator<Item = (&str, &EditSession)> {
        self.sessions.iter().map(|(key, session)| (key.as_str(), session))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.sessions.iter().map(|(key, _)| key.as_str())
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Close everything. Used when the environment is reloaded.
    pub fn reset(&mut self) {
        info!(closed = self.sessions.len(), "all maps closed");
        self.sessions.clear();
        self.selected = None;
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.sessions.iter().position(|(k, _)| k == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::NoRedraw;
    use tme_map::{Bounds, Map};

    fn open(holder: &mut MapHolder, key: &str) {
        holder
            .open_with(key, || {
                Ok(EditSession::new(
                    Map::new(key, Bounds::new(2, 2, 1).unwrap()),
                    NoRedraw,
                ))
            })
            .unwrap();
    }

    fn holder(keys: &[&str]) -> MapHolder {
        let mut holder = MapHolder::new();
        for key in keys {
            open(&mut holder, key);
        }
        holder
    }

    #[test]
    fn opening_selects() {
        let holder = holder(&["a", "b"]);
        assert_eq!(holder.selected_key(), Some("b"));
        assert_eq!(holder.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn reopening_selects_existing() {
        let mut holder = holder(&["a", "b"]);
        let session = holder
            .open_with("a", || panic!("already open"))
            .unwrap();
        assert_eq!(session.map().name(), "a");
        assert_eq!(holder.selected_key(), Some("a"));
        assert_eq!(holder.len(), 2);
    }

    #[test]
    fn failed_open_changes_nothing() {
        let mut holder = holder(&["a"]);
        let err = holder
            .open_with("b", || Err(SessionError::UnknownMap("b".into())))
            .unwrap_err();
        assert!(matches!(err, SessionError::UnknownMap(_)));
        assert_eq!(holder.len(), 1);
        assert_eq!(holder.selected_key(), Some("a"));
    }

    #[test]
    fn closing_selected_picks_neighbour() {
        let mut holder = holder(&["a", "b", "c"]);
        holder.select("b").unwrap();
        holder.close("b").unwrap();
        assert_eq!(holder.selected_key(), Some("c"));

        holder.close("c").unwrap();
        assert_eq!(holder.selected_key(), Some("a"));

        holder.close("a").unwrap();
        assert_eq!(holder.selected_key(), None);
        assert!(holder.is_empty());
    }

    #[test]
    fn closing_before_selection_shifts_it() {
        let mut holder = holder(&["a", "b", "c"]);
        holder.close("a").unwrap();
        assert_eq!(holder.selected_key(), Some("c"));
        holder.close("b").unwrap();
        assert_eq!(holder.selected_key(), Some("c"));
    }

    #[test]
    fn closing_unknown_is_none() {
        let mut holder = holder(&["a"]);
        assert!(holder.close("zzz").is_none());
        assert!(matches!(
            holder.select("zzz"),
            Err(SessionError::UnknownMap(_))
        ));
    }

    #[test]
    fn reset_closes_everything() {
        let mut holder = holder(&["a", "b"]);
        holder.reset();
        assert!(holder.is_empty());
        assert!(holder.selected().is_none());
        assert!(holder.selected_mut().is_none());
    }

    #[test]
    fn selected_session_is_editable() {
        let mut holder = holder(&["a"]);
        let session = holder.selected_mut().unwrap();
        session.commit_changes("noop");
        assert_eq!(holder.get("a").unwrap().ledger().len(), 2);
    }
}
