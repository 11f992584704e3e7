//! Single-line text buffer backing one entry row.

/// Longest command an entry accepts, in characters.
pub const CHAR_LIMIT: usize = 99;

/// Edits a key press can apply to the focused entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditAction {
    Insert(char),
    Paste(String),
    Backspace,
    DeleteForward,
    CursorLeft,
    CursorRight,
    CursorHome,
    CursorEnd,
    KillToStart,
    KillToEnd,
}

/// Text of one entry plus a cursor, counted in chars.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryInput {
    value: String,
    cursor: usize,
}

impl EntryInput {
    /// A buffer holding `value` with the cursor at the end. Stored text longer
    /// than [`CHAR_LIMIT`] is kept whole; the limit only stops new input.
    pub fn new(value: &str) -> Self {
        Self {
            value: value.to_string(),
            cursor: value.chars().count(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn len(&self) -> usize {
        self.value.chars().count()
    }

    fn byte_offset(&self, char_idx: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_idx)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    /// Apply one edit. Returns `true` when the text changed; cursor moves
    /// return `false`.
    pub fn apply(&mut self, action: EditAction) -> bool {
        // Every text edit inserts or removes bytes.
        let before = self.value.len();
        match action {
            EditAction::Insert(c) => self.insert(c),
            EditAction::Paste(text) => {
                for c in text.chars().filter(|c| !c.is_control()) {
                    self.insert(c);
                }
            }
            EditAction::Backspace => {
                if self.cursor > 0 {
                    let at = self.byte_offset(self.cursor - 1);
                    self.value.remove(at);
                    self.cursor -= 1;
                }
            }
            EditAction::DeleteForward => {
                if self.cursor < self.len() {
                    let at = self.byte_offset(self.cursor);
                    self.value.remove(at);
                }
            }
            EditAction::CursorLeft => self.cursor = self.cursor.saturating_sub(1),
            EditAction::CursorRight => self.cursor = (self.cursor + 1).min(self.len()),
            EditAction::CursorHome => self.cursor = 0,
            EditAction::CursorEnd => self.cursor = self.len(),
            EditAction::KillToStart => {
                let at = self.byte_offset(self.cursor);
                self.value.replace_range(..at, "");
                self.cursor = 0;
            }
            EditAction::KillToEnd => {
                let at = self.byte_offset(self.cursor);
                self.value.truncate(at);
            }
        }
        self.value.len() != before
    }

    fn insert(&mut self, c: char) {
        if self.len() >= CHAR_LIMIT {
            return;
        }
        let at = self.byte_offset(self.cursor);
        self.value.insert(at, c);
        self.cursor += 1;
    }
}
