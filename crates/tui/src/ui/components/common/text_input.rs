//! Reusable UTF-8 safe text editing state with cursor management.
//!
//! Backs the payload editor: a plain multi-line buffer with a byte cursor
//! and line-aware movement. Rendering is left to the owning component; this
//! module only guarantees the cursor always sits on a UTF-8 boundary.

#[derive(Clone, Debug, Default)]
pub struct TextInputState {
    /// The underlying text buffer
    input: String,
    /// Cursor byte index into `input` (always on a UTF-8 boundary)
    cursor: usize,
}

impl TextInputState {
    pub fn new() -> Self {
        Self {
            input: String::new(),
            cursor: 0,
        }
    }

    // ----- Getters -----
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn is_empty(&self) -> bool {
        self.input.trim().is_empty()
    }

    /// Zero-based (line, column) of the cursor, measured in chars.
    pub fn cursor_line_col(&self) -> (usize, usize) {
        let before = &self.input[..self.cursor];
        let line = before.matches('\n').count();
        let col = before.rsplit('\n').next().unwrap_or("").chars().count();
        (line, col)
    }

    pub fn line_count(&self) -> usize {
        self.input.matches('\n').count() + 1
    }

    // ----- Setters -----
    pub fn set_input<S: Into<String>>(&mut self, s: S) {
        self.input = s.into();
        self.cursor = self.input.len();
    }

    // ----- Editing primitives (UTF-8 safe) -----

    /// Move cursor one Unicode scalar to the left.
    pub fn move_left(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let prev_len = self.input[..self.cursor].chars().last().map(|c| c.len_utf8()).unwrap_or(1);
        self.cursor = self.cursor.saturating_sub(prev_len);
    }

    /// Move cursor one Unicode scalar to the right.
    pub fn move_right(&mut self) {
        if self.cursor >= self.input.len() {
            return;
        }
        let mut iter = self.input[self.cursor..].chars();
        if let Some(next) = iter.next() {
            self.cursor = self.cursor.saturating_add(next.len_utf8());
        }
    }

    /// Move cursor to the same column on the previous line, clamped to that
    /// line's length.
    pub fn move_up(&mut self) {
        let (line, col) = self.cursor_line_col();
        if line == 0 {
            return;
        }
        self.place_at(line - 1, col);
    }

    /// Move cursor to the same column on the next line, clamped to that
    /// line's length.
    pub fn move_down(&mut self) {
        let (line, col) = self.cursor_line_col();
        if line + 1 >= self.line_count() {
            return;
        }
        self.place_at(line + 1, col);
    }

    /// Move cursor to the start of the current line.
    pub fn move_line_start(&mut self) {
        let (line, _) = self.cursor_line_col();
        self.place_at(line, 0);
    }

    /// Move cursor past the last char of the current line.
    pub fn move_line_end(&mut self) {
        let (line, _) = self.cursor_line_col();
        self.place_at(line, usize::MAX);
    }

    /// Insert a char at the cursor.
    pub fn insert_char(&mut self, c: char) {
        self.input.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Insert a line break at the cursor.
    pub fn insert_newline(&mut self) {
        self.insert_char('\n');
    }

    /// Backspace the char immediately before the cursor.
    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let prev = self.input[..self.cursor].chars().last().map(|c| c.len_utf8()).unwrap_or(1);
        let start = self.cursor - prev;
        self.input.drain(start..self.cursor);
        self.cursor = start;
    }

    fn place_at(&mut self, line: usize, col: usize) {
        let mut start = 0;
        for (idx, text) in self.input.split('\n').enumerate() {
            if idx == line {
                let offset: usize = text.chars().take(col).map(char::len_utf8).sum();
                self.cursor = start + offset;
                return;
            }
            start += text.len() + 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_move_insert_backspace() {
        let mut st = TextInputState::new();
        st.set_input("h🙂llo"); // emoji is 4 bytes
        st.move_left();
        st.move_left();
        st.move_left();
        st.move_left(); // between h and 🙂
        st.insert_char('e');
        assert_eq!(st.input(), "he🙂llo");
        st.move_right(); // step over 🙂
        st.backspace(); // delete 🙂
        assert_eq!(st.input(), "hello");
        st.move_left();
        st.backspace();
        assert_eq!(st.input(), "ello");
    }

    #[test]
    fn vertical_movement_clamps_to_line_length() {
        let mut st = TextInputState::new();
        st.set_input("{\n  \"action\": \"Process\"\n}");
        assert_eq!(st.cursor_line_col(), (2, 1));

        st.move_up();
        assert_eq!(st.cursor_line_col(), (1, 1));
        st.move_line_end();
        assert_eq!(st.cursor_line_col(), (1, 21));

        // Line 0 holds a single char; the column clamps.
        st.move_up();
        assert_eq!(st.cursor_line_col(), (0, 1));
        st.move_up();
        assert_eq!(st.cursor_line_col(), (0, 1));

        st.move_down();
        st.move_down();
        st.move_down();
        assert_eq!(st.cursor_line_col(), (2, 1));
    }

    #[test]
    fn newline_insertion_splits_the_line() {
        let mut st = TextInputState::new();
        st.set_input("ab");
        st.move_left();
        st.insert_newline();
        assert_eq!(st.input(), "a\nb");
        assert_eq!(st.line_count(), 2);
        assert_eq!(st.cursor_line_col(), (1, 0));
    }

    #[test]
    fn whitespace_only_buffer_counts_as_empty() {
        let mut st = TextInputState::new();
        st.set_input("  \n\t ");
        assert!(st.is_empty());
        st.set_input("{}");
        assert!(!st.is_empty());
    }
}
