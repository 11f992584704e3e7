//! Session state machine.
//!
//! Owns the editable working copy of the list and decides, per event, whether
//! to touch storage. Add and delete reload the persisted list before changing
//! it so that half-typed edits in other rows never reach disk; save writes the
//! working copy as-is.

use super::input::{EditAction, EntryInput};
use crate::model::{CommandList, Entry, Focus};
use crate::storage::{StorageError, Store};

/// Semantic events produced by the input layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Quit,
    Add,
    Save,
    Delete,
    Execute,
    FocusNext,
    FocusPrev,
    Edit(EditAction),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Editing,
    Exiting,
    Executing(String),
}

/// How a finished session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    Quit,
    Execute(String),
}

pub struct Session<S: Store> {
    store: S,
    limit: usize,
    working: CommandList,
    // Buffer of the focused row; its value mirrors `working` at the focus.
    editor: EntryInput,
    focus: Focus,
    state: SessionState,
}

impl<S: Store> Session<S> {
    /// Load the persisted list and focus its first entry.
    pub fn open(store: S, limit: usize) -> Result<Self, StorageError> {
        let working = store.load()?;
        tracing::info!(entries = working.len(), limit, "session opened");
        let mut session = Self {
            store,
            limit,
            working,
            editor: EntryInput::default(),
            focus: Focus::NONE,
            state: SessionState::Editing,
        };
        session.set_focus(Focus::first(session.working.len()));
        Ok(session)
    }

    #[cfg(test)]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    /// The working copy, including edits not saved yet.
    pub fn entries(&self) -> &[Entry] {
        self.working.entries()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    #[cfg(test)]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The focused row's buffer, `None` when nothing is focused.
    pub fn editor(&self) -> Option<&EntryInput> {
        self.focus.index().map(|_| &self.editor)
    }

    /// The outcome once the session has left `Editing`.
    pub fn outcome(&self) -> Option<SessionOutcome> {
        match &self.state {
            SessionState::Editing => None,
            SessionState::Exiting => Some(SessionOutcome::Quit),
            SessionState::Executing(cmd) => Some(SessionOutcome::Execute(cmd.clone())),
        }
    }

    /// Apply one event. Returns the outcome when the event ended the session.
    /// Events after the session ended are ignored.
    pub fn handle(
        &mut self,
        event: SessionEvent,
    ) -> Result<Option<SessionOutcome>, StorageError> {
        if self.state != SessionState::Editing {
            return Ok(self.outcome());
        }
        match event {
            SessionEvent::Quit => {
                tracing::info!("session quit");
                self.state = SessionState::Exiting;
            }
            SessionEvent::Add => self.add()?,
            SessionEvent::Save => self.save()?,
            SessionEvent::Delete => self.delete()?,
            SessionEvent::Execute => {
                if let Some(entry) = self.focus.index().and_then(|i| self.working.get(i)) {
                    let cmd = entry.command.clone();
                    tracing::info!(command = %cmd, "executing focused entry");
                    self.state = SessionState::Executing(cmd);
                }
            }
            SessionEvent::FocusNext => self.set_focus(self.focus.next(self.working.len())),
            SessionEvent::FocusPrev => self.set_focus(self.focus.prev(self.working.len())),
            SessionEvent::Edit(action) => {
                if let Some(i) = self.focus.index() {
                    if self.editor.apply(action) {
                        self.working.update_command_at(i, self.editor.value());
                    }
                }
            }
        }
        Ok(self.outcome())
    }

    fn set_focus(&mut self, focus: Focus) {
        self.focus = focus;
        self.editor = match focus.index().and_then(|i| self.working.get(i)) {
            Some(entry) => EntryInput::new(&entry.command),
            None => EntryInput::default(),
        };
    }

    fn add(&mut self) -> Result<(), StorageError> {
        if self.working.len() >= self.limit {
            tracing::debug!(limit = self.limit, "add ignored: list is full");
            return Ok(());
        }
        let mut persisted = self.store.load()?;
        if !persisted.append("", self.limit) {
            tracing::debug!(limit = self.limit, "add ignored: stored list is full");
            return Ok(());
        }
        self.store.save(&persisted)?;

        self.working.append("", self.limit);
        let focus = self.focus.after_append(self.working.len());
        if focus != self.focus {
            self.set_focus(focus);
        }
        tracing::info!(entries = self.working.len(), "entry added");
        Ok(())
    }

    fn save(&mut self) -> Result<(), StorageError> {
        self.working.reindex();
        self.store.save(&self.working)?;
        tracing::info!(entries = self.working.len(), "list saved");
        Ok(())
    }

    fn delete(&mut self) -> Result<(), StorageError> {
        let Some(index) = self.focus.index() else {
            return Ok(());
        };
        let mut persisted = self.store.load()?;
        if persisted.remove_at(index).is_none() {
            tracing::warn!(index, stored = persisted.len(), "focused entry missing from storage");
        }
        self.store.save(&persisted)?;

        self.working.remove_at(index);
        self.set_focus(self.focus.after_remove(self.working.len()));
        tracing::info!(index, entries = self.working.len(), "entry deleted");
        Ok(())
    }
}
