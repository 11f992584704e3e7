use std::cell::{Cell, RefCell};

use rstest::{fixture, rstest};
use tempfile::TempDir;

use super::controller::SessionState;
use super::{EditAction, Session, SessionEvent, SessionOutcome};
use crate::model::{CommandList, Entry, Focus};
use crate::storage::{FileStore, StorageError, Store};

/// In-memory store that counts round trips.
#[derive(Default)]
struct MemoryStore {
    list: RefCell<CommandList>,
    loads: Cell<usize>,
    saves: Cell<usize>,
}

impl MemoryStore {
    fn with(commands: &[&str]) -> Self {
        Self {
            list: RefCell::new(CommandList::from_commands(commands.iter().copied())),
            ..Default::default()
        }
    }

    fn persisted(&self) -> CommandList {
        self.list.borrow().clone()
    }
}

impl Store for MemoryStore {
    fn load(&self) -> Result<CommandList, StorageError> {
        self.loads.set(self.loads.get() + 1);
        Ok(self.list.borrow().clone())
    }

    fn save(&self, list: &CommandList) -> Result<(), StorageError> {
        self.saves.set(self.saves.get() + 1);
        let mut list = list.clone();
        list.reindex();
        *self.list.borrow_mut() = list;
        Ok(())
    }
}

/// Store whose writes always fail.
struct ReadOnlyStore(CommandList);

impl Store for ReadOnlyStore {
    fn load(&self) -> Result<CommandList, StorageError> {
        Ok(self.0.clone())
    }

    fn save(&self, _list: &CommandList) -> Result<(), StorageError> {
        Err(StorageError::Write {
            path: "/read-only/data.json".into(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
        })
    }
}

fn session(commands: &[&str], limit: usize) -> Session<MemoryStore> {
    Session::open(MemoryStore::with(commands), limit).expect("open session")
}

fn type_text(s: &mut Session<MemoryStore>, text: &str) {
    for c in text.chars() {
        s.handle(SessionEvent::Edit(EditAction::Insert(c))).unwrap();
    }
}

fn values<S: Store>(s: &Session<S>) -> Vec<&str> {
    s.entries().iter().map(|e| e.command.as_str()).collect()
}

#[fixture]
fn three() -> Session<MemoryStore> {
    session(&["ls", "pwd", "date"], 10)
}

#[rstest]
fn opens_focused_on_first_entry(three: Session<MemoryStore>) {
    assert_eq!(three.focus(), Focus::at(0));
    assert_eq!(values(&three), ["ls", "pwd", "date"]);
    assert_eq!(three.state(), &SessionState::Editing);
}

#[test]
fn opening_an_empty_list_has_no_focus() {
    let s = session(&[], 10);
    assert_eq!(s.focus(), Focus::NONE);
    assert!(s.editor().is_none());
}

#[rstest]
fn navigation_wraps_both_ways(mut three: Session<MemoryStore>) {
    three.handle(SessionEvent::FocusPrev).unwrap();
    assert_eq!(three.focus(), Focus::at(2));
    three.handle(SessionEvent::FocusNext).unwrap();
    assert_eq!(three.focus(), Focus::at(0));
    three.handle(SessionEvent::FocusNext).unwrap();
    assert_eq!(three.focus(), Focus::at(1));
    assert_eq!(three.store().saves.get(), 0);
}

#[rstest]
fn edits_go_to_focused_entry_only_and_are_not_persisted(mut three: Session<MemoryStore>) {
    three.handle(SessionEvent::FocusNext).unwrap();
    type_text(&mut three, " -P");

    assert_eq!(values(&three), ["ls", "pwd -P", "date"]);
    assert_eq!(three.store().saves.get(), 0);
    assert_eq!(three.store().persisted(), CommandList::from_commands(["ls", "pwd", "date"]));
}

#[rstest]
fn execute_emits_edited_focused_text_without_persisting(mut three: Session<MemoryStore>) {
    type_text(&mut three, " -la");
    three.handle(SessionEvent::FocusNext).unwrap();
    type_text(&mut three, " -L");

    let outcome = three.handle(SessionEvent::Execute).unwrap();

    assert_eq!(outcome, Some(SessionOutcome::Execute("pwd -L".into())));
    assert_eq!(three.state(), &SessionState::Executing("pwd -L".into()));
    assert_eq!(three.store().saves.get(), 0);
    assert_eq!(three.store().persisted(), CommandList::from_commands(["ls", "pwd", "date"]));
}

#[rstest]
fn quit_persists_nothing(mut three: Session<MemoryStore>) {
    type_text(&mut three, "x");
    let outcome = three.handle(SessionEvent::Quit).unwrap();

    assert_eq!(outcome, Some(SessionOutcome::Quit));
    assert_eq!(three.state(), &SessionState::Exiting);
    assert_eq!(three.store().saves.get(), 0);
}

#[rstest]
fn events_after_finish_are_ignored(mut three: Session<MemoryStore>) {
    three.handle(SessionEvent::Quit).unwrap();
    let outcome = three.handle(SessionEvent::Delete).unwrap();

    assert_eq!(outcome, Some(SessionOutcome::Quit));
    assert_eq!(three.entries().len(), 3);
    assert_eq!(three.store().saves.get(), 0);
}

#[rstest]
fn save_writes_every_working_entry(mut three: Session<MemoryStore>) {
    type_text(&mut three, " -1");
    three.handle(SessionEvent::FocusPrev).unwrap();
    type_text(&mut three, " +%F");

    three.handle(SessionEvent::Save).unwrap();

    assert_eq!(
        three.store().persisted(),
        CommandList::from_commands(["ls -1", "pwd", "date +%F"])
    );
    assert!(three.store().persisted().is_dense());
    assert_eq!(three.focus(), Focus::at(2));
}

#[rstest]
fn add_reloads_and_keeps_other_edits_off_disk(mut three: Session<MemoryStore>) {
    type_text(&mut three, " -la");

    three.handle(SessionEvent::Add).unwrap();

    assert_eq!(three.store().loads.get(), 2);
    assert_eq!(
        three.store().persisted(),
        CommandList::from_commands(["ls", "pwd", "date", ""])
    );
    assert_eq!(values(&three), ["ls -la", "pwd", "date", ""]);
    assert_eq!(three.focus(), Focus::at(0));
}

#[test]
fn add_twice_with_limit_one_yields_one_entry() {
    let mut s = session(&[], 1);

    s.handle(SessionEvent::Add).unwrap();
    s.handle(SessionEvent::Add).unwrap();

    assert_eq!(s.entries().len(), 1);
    assert_eq!(s.store().persisted().entries(), &[Entry::new(0, "")]);
    assert_eq!(s.store().saves.get(), 1);
    assert_eq!(s.focus(), Focus::at(0));
}

#[test]
fn add_at_capacity_does_not_touch_storage() {
    let mut s = session(&["a", "b"], 2);
    s.handle(SessionEvent::Add).unwrap();
    assert_eq!(s.store().loads.get(), 1);
    assert_eq!(s.store().saves.get(), 0);
    assert_eq!(s.entries().len(), 2);
}

#[test]
fn delete_first_of_two_reindexes() {
    let mut s = session(&["ls", "pwd"], 10);

    s.handle(SessionEvent::Delete).unwrap();

    assert_eq!(s.store().persisted().entries(), &[Entry::new(0, "pwd")]);
    assert_eq!(values(&s), ["pwd"]);
    assert_eq!(s.focus(), Focus::at(0));
}

#[rstest]
fn delete_uses_persisted_text_for_other_entries(mut three: Session<MemoryStore>) {
    type_text(&mut three, " unsaved");
    three.handle(SessionEvent::FocusNext).unwrap();

    three.handle(SessionEvent::Delete).unwrap();

    assert_eq!(three.store().persisted(), CommandList::from_commands(["ls", "date"]));
    assert_eq!(values(&three), ["ls unsaved", "date"]);
    assert_eq!(three.focus(), Focus::at(1));
}

#[rstest]
fn deleting_last_entry_clamps_focus(mut three: Session<MemoryStore>) {
    three.handle(SessionEvent::FocusPrev).unwrap();
    three.handle(SessionEvent::Delete).unwrap();

    assert_eq!(three.focus(), Focus::at(1));
    assert_eq!(three.store().persisted(), CommandList::from_commands(["ls", "pwd"]));
}

#[test]
fn deleting_only_entry_leaves_no_focus_and_ignores_focus_events() {
    let mut s = session(&["ls"], 10);

    s.handle(SessionEvent::Delete).unwrap();
    assert_eq!(s.focus(), Focus::NONE);
    assert!(s.store().persisted().is_empty());

    s.handle(SessionEvent::FocusNext).unwrap();
    s.handle(SessionEvent::Edit(EditAction::Insert('x'))).unwrap();
    s.handle(SessionEvent::Delete).unwrap();
    assert_eq!(s.handle(SessionEvent::Execute).unwrap(), None);
    assert_eq!(s.focus(), Focus::NONE);
    assert_eq!(s.store().saves.get(), 1);

    s.handle(SessionEvent::Add).unwrap();
    assert_eq!(s.focus(), Focus::at(0));
    assert_eq!(values(&s), [""]);
}

#[test]
fn storage_failure_is_returned_and_leaves_state_untouched() {
    let store = ReadOnlyStore(CommandList::from_commands(["ls", "pwd"]));
    let mut s = Session::open(store, 10).unwrap();

    let err = s.handle(SessionEvent::Delete).unwrap_err();

    assert!(matches!(err, StorageError::Write { .. }));
    assert_eq!(values(&s), ["ls", "pwd"]);
    assert_eq!(s.focus(), Focus::at(0));
    assert_eq!(s.state(), &SessionState::Editing);
}

#[test]
fn file_backed_session_round_trip() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join(".cla").join("data.json");

    let mut s = Session::open(FileStore::new(&path), 5).unwrap();
    assert_eq!(values(&s), [""]);

    s.handle(SessionEvent::Edit(EditAction::Paste("echo one".into())))
        .unwrap();
    s.handle(SessionEvent::Add).unwrap();
    s.handle(SessionEvent::FocusNext).unwrap();
    s.handle(SessionEvent::Edit(EditAction::Paste("echo two".into())))
        .unwrap();
    s.handle(SessionEvent::Save).unwrap();
    s.handle(SessionEvent::FocusPrev).unwrap();
    s.handle(SessionEvent::Delete).unwrap();

    let reopened = Session::open(FileStore::new(&path), 5).unwrap();
    assert_eq!(values(&reopened), ["echo two"]);
    assert_eq!(
        FileStore::new(&path).load().unwrap().entries(),
        &[Entry::new(0, "echo two")]
    );
}

#[rstest]
fn edits_survive_moving_focus_away_and_back(mut three: Session<MemoryStore>) {
    type_text(&mut three, " -a");
    three.handle(SessionEvent::FocusNext).unwrap();
    three.handle(SessionEvent::FocusPrev).unwrap();
    three.handle(SessionEvent::Edit(EditAction::CursorHome)).unwrap();
    type_text(&mut three, "e");

    assert_eq!(values(&three), ["els -a", "pwd", "date"]);
    assert_eq!(three.editor().map(|e| e.cursor()), Some(1));
}

#[rstest]
fn working_copy_positions_stay_dense_after_delete(mut three: Session<MemoryStore>) {
    three.handle(SessionEvent::Delete).unwrap();

    assert_eq!(
        three.entries(),
        &[Entry::new(0, "pwd"), Entry::new(1, "date")]
    );
    assert_eq!(three.editor().map(|e| e.value()), Some("pwd"));
}

#[test]
fn cursor_moves_keep_long_stored_commands_whole() {
    let long = "x".repeat(150);
    let mut s = session(&[long.as_str()], 10);

    s.handle(SessionEvent::Edit(EditAction::CursorLeft)).unwrap();
    s.handle(SessionEvent::Edit(EditAction::CursorHome)).unwrap();
    s.handle(SessionEvent::Save).unwrap();

    assert_eq!(values(&s), [long.as_str()]);
    assert_eq!(s.store().persisted().entries(), &[Entry::new(0, long.clone())]);
    assert_eq!(
        s.handle(SessionEvent::Execute).unwrap(),
        Some(SessionOutcome::Execute(long))
    );
}
