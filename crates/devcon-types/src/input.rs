//! Editable console input line.

/// The line the user is composing at the prompt.
///
/// Besides the text and cursor it remembers the autocomplete anchor: the
/// prefix the user actually typed when a completion rotation started.
/// Keyboard edits drop the anchor; the raw `clear` + `write` pair used by
/// autocomplete keeps it, so repeated rotations keep filtering by the
/// original prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputBuffer {
    text: String,
    /// Cursor position as character index.
    cursor: usize,
    anchor: Option<String>,
}

impl InputBuffer {
    /// Create an empty input line.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current text.
    pub fn value(&self) -> &str {
        &self.text
    }

    /// Cursor position as a character index.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Remove all text. Keeps the autocomplete anchor.
    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Append text at the end and move the cursor there. Keeps the
    /// autocomplete anchor.
    pub fn write(&mut self, s: &str) {
        self.text.push_str(s);
        self.cursor = self.text.chars().count();
    }

    /// Prefix remembered by the current autocomplete rotation.
    pub fn autocomplete_anchor(&self) -> Option<&str> {
        self.anchor.as_deref()
    }

    /// Set or drop the autocomplete anchor.
    pub fn set_autocomplete_anchor(&mut self, anchor: Option<String>) {
        self.anchor = anchor;
    }

    /// Insert a character at the cursor position.
    pub fn insert(&mut self, ch: char) {
        let byte_pos = self.byte_offset(self.cursor);
        self.text.insert(byte_pos, ch);
        self.cursor += 1;
        self.anchor = None;
    }

    /// Delete the character before the cursor.
    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let byte_pos = self.byte_offset(self.cursor);
        if let Some(ch) = self.text[byte_pos..].chars().next() {
            self.text.drain(byte_pos..byte_pos + ch.len_utf8());
        }
        self.anchor = None;
    }

    /// Take the text out, leaving an empty line with no anchor.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        self.anchor = None;
        std::mem::take(&mut self.text)
    }

    fn byte_offset(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }
}
