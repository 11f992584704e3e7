use serde::{Deserialize, Serialize};

/// One stored command line.
///
/// `position` is the entry's rank in its list, not a stable identifier. It is
/// rewritten whenever the list changes shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    #[serde(rename = "id")]
    pub position: usize,
    #[serde(rename = "cmd")]
    pub command: String,
}

impl Entry {
    pub fn new(position: usize, command: impl Into<String>) -> Self {
        Self {
            position,
            command: command.into(),
        }
    }
}

/// Ordered list of entries where `entries[i].position == i` holds after every
/// mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandList {
    entries: Vec<Entry>,
}

impl CommandList {
    /// The list written on first run: a single empty command.
    pub fn initial() -> Self {
        Self::from_commands([""])
    }

    /// Build a list from command strings, assigning dense positions.
    pub fn from_commands<I, S>(commands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries = commands
            .into_iter()
            .enumerate()
            .map(|(i, c)| Entry::new(i, c))
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    /// Look an entry up by its persisted id.
    pub fn find(&self, position: usize) -> Option<&Entry> {
        self.entries.iter().find(|e| e.position == position)
    }

    /// Append a command at the tail. Returns `false` without touching the list
    /// once `limit` entries are stored.
    pub fn append(&mut self, command: impl Into<String>, limit: usize) -> bool {
        if self.entries.len() >= limit {
            return false;
        }
        let position = self.entries.len();
        self.entries.push(Entry::new(position, command));
        true
    }

    /// Remove the entry at `index` and renumber everything after it.
    pub fn remove_at(&mut self, index: usize) -> Option<Entry> {
        if index >= self.entries.len() {
            return None;
        }
        let removed = self.entries.remove(index);
        self.reindex();
        Some(removed)
    }

    pub fn update_command_at(&mut self, index: usize, command: impl Into<String>) -> bool {
        match self.entries.get_mut(index) {
            Some(entry) => {
                entry.command = command.into();
                true
            }
            None => false,
        }
    }

    pub fn reindex(&mut self) {
        for (i, entry) in self.entries.iter_mut().enumerate() {
            entry.position = i;
        }
    }

    pub fn is_dense(&self) -> bool {
        self.entries.iter().enumerate().all(|(i, e)| e.position == i)
    }
}

/// The focused entry of a list, or no focus when the list is empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Focus(Option<usize>);

impl Focus {
    pub const NONE: Focus = Focus(None);

    /// Focus the first entry of a list with `len` entries.
    pub fn first(len: usize) -> Self {
        if len == 0 {
            Self::NONE
        } else {
            Self::at(0)
        }
    }

    pub fn at(index: usize) -> Self {
        Focus(Some(index))
    }

    pub fn index(self) -> Option<usize> {
        self.0
    }

    pub fn is_focused(self, index: usize) -> bool {
        self.0 == Some(index)
    }

    /// Step forward, wrapping from the last entry to the first.
    pub fn next(self, len: usize) -> Self {
        if len == 0 {
            return Self::NONE;
        }
        match self.0 {
            Some(i) if i + 1 < len => Self::at(i + 1),
            _ => Self::at(0),
        }
    }

    /// Step backward, wrapping from the first entry to the last.
    pub fn prev(self, len: usize) -> Self {
        if len == 0 {
            return Self::NONE;
        }
        match self.0 {
            Some(i) if i > 0 && i < len => Self::at(i - 1),
            _ => Self::at(len - 1),
        }
    }

    /// Focus after the focused entry was removed, `len` being the new length.
    /// The index is kept (landing on the following entry) and clamped to the
    /// last entry.
    pub fn after_remove(self, len: usize) -> Self {
        if len == 0 {
            return Self::NONE;
        }
        match self.0 {
            Some(i) => Self::at(i.min(len - 1)),
            None => Self::at(0),
        }
    }

    /// Focus after an entry was appended, `len` being the new length.
    pub fn after_append(self, len: usize) -> Self {
        match self.0 {
            Some(i) if i < len => self,
            _ if len == 0 => Self::NONE,
            _ => Self::at(len - 1),
        }
    }
}
