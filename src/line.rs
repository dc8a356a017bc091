//! Single-line input buffer with a character-addressed cursor.
//!
//! The cursor is a character index, always within `[0, chars]`. Every
//! mutation clamps instead of rejecting, so no operation can panic on
//! out-of-range requests.

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LineBuffer {
    text: String,
    cursor: usize,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Cursor position in characters.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Length in characters, not bytes.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_index)
            .map(|(b, _)| b)
            .unwrap_or(self.text.len())
    }

    /// Splice `ch` in at the cursor and advance by one.
    pub fn insert(&mut self, ch: char) {
        let at = self.byte_index(self.cursor);
        self.text.insert(at, ch);
        self.cursor += 1;
    }

    /// Remove the character left of the cursor, if any.
    pub fn delete_back(&mut self) {
        if self.cursor > 0 {
            let at = self.byte_index(self.cursor - 1);
            self.text.remove(at);
            self.cursor -= 1;
        }
    }

    /// Move the cursor by `delta`, clamped to `[0, chars]`.
    pub fn move_cursor(&mut self, delta: isize) {
        let moved = self.cursor.saturating_add_signed(delta);
        self.cursor = moved.min(self.char_len());
    }

    /// Place the cursor at an absolute position, clamped.
    pub fn set_cursor(&mut self, pos: usize) {
        self.cursor = pos.min(self.char_len());
    }

    /// Replace the buffer content, cursor at end-of-text.
    pub fn set(&mut self, text: &str) {
        self.text = text.to_string();
        self.cursor = self.char_len();
    }

    pub fn reset(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Empty the buffer and return what was in it.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_advances_cursor() {
        let mut line = LineBuffer::new();
        for c in "help".chars() {
            line.insert(c);
        }
        assert_eq!(line.text(), "help");
        assert_eq!(line.cursor(), 4);
    }

    #[test]
    fn insert_at_cursor_splices() {
        let mut line = LineBuffer::new();
        line.set("hlp");
        line.set_cursor(1);
        line.insert('e');
        assert_eq!(line.text(), "help");
        assert_eq!(line.cursor(), 2);
    }

    #[test]
    fn delete_back_at_origin_is_noop() {
        let mut line = LineBuffer::new();
        line.delete_back();
        assert_eq!(line.text(), "");
        assert_eq!(line.cursor(), 0);

        line.set("ab");
        line.set_cursor(0);
        line.delete_back();
        assert_eq!(line.text(), "ab");
    }

    #[test]
    fn delete_back_removes_left_of_cursor() {
        let mut line = LineBuffer::new();
        line.set("abc");
        line.set_cursor(2);
        line.delete_back();
        assert_eq!(line.text(), "ac");
        assert_eq!(line.cursor(), 1);
    }

    #[test]
    fn cursor_stays_in_bounds() {
        let mut line = LineBuffer::new();
        line.set("ab");
        line.move_cursor(10);
        assert_eq!(line.cursor(), 2);
        line.move_cursor(-10);
        assert_eq!(line.cursor(), 0);
        line.set_cursor(99);
        assert_eq!(line.cursor(), 2);
    }

    #[test]
    fn length_changes_by_one_per_edit() {
        let mut line = LineBuffer::new();
        let mut prev = 0;
        for c in "a1 b2".chars() {
            line.insert(c);
            assert_eq!(line.char_len(), prev + 1);
            prev += 1;
        }
        while line.char_len() > 0 {
            line.delete_back();
            assert_eq!(line.char_len(), prev - 1);
            prev -= 1;
            assert!(line.cursor() <= line.char_len());
        }
    }

    #[test]
    fn multibyte_chars_use_char_indices() {
        let mut line = LineBuffer::new();
        line.insert('▲');
        line.insert('x');
        assert_eq!(line.cursor(), 2);
        line.move_cursor(-1);
        line.delete_back();
        assert_eq!(line.text(), "x");
        assert_eq!(line.cursor(), 0);
    }

    #[test]
    fn take_resets_cursor() {
        let mut line = LineBuffer::new();
        line.set("roll");
        assert_eq!(line.take(), "roll");
        assert_eq!(line.text(), "");
        assert_eq!(line.cursor(), 0);
    }
}
