/// Single-line text input with a cursor tracked as a byte offset.
#[derive(Debug, Clone, Default)]
pub struct TextBuffer {
    text: String,
    cursor: usize,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    pub fn set<T: Into<String>>(&mut self, value: T) {
        self.text = value.into();
        self.cursor = self.text.len();
    }

    pub fn insert_char(&mut self, ch: char) {
        if ch.is_control() {
            return;
        }
        self.text.insert(self.cursor, ch);
        self.cursor += ch.len_utf8();
    }

    pub fn backspace(&mut self) {
        if let Some((idx, _)) = self.text[..self.cursor].char_indices().next_back() {
            self.text.drain(idx..self.cursor);
            self.cursor = idx;
        }
    }

    pub fn delete_char(&mut self) {
        if let Some(ch) = self.text[self.cursor..].chars().next() {
            let end = self.cursor + ch.len_utf8();
            self.text.drain(self.cursor..end);
        }
    }

    /// Remove the word before the cursor, along with the spaces that follow it.
    pub fn delete_word(&mut self) {
        let before = &self.text[..self.cursor];
        let trimmed = before.trim_end();
        let start = trimmed
            .char_indices()
            .rev()
            .find(|(_, ch)| ch.is_whitespace())
            .map(|(idx, ch)| idx + ch.len_utf8())
            .unwrap_or(0);
        self.text.drain(start..self.cursor);
        self.cursor = start;
    }

    pub fn move_left(&mut self) {
        if let Some((idx, _)) = self.text[..self.cursor].char_indices().next_back() {
            self.cursor = idx;
        }
    }

    pub fn move_right(&mut self) {
        if let Some(ch) = self.text[self.cursor..].chars().next() {
            self.cursor += ch.len_utf8();
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.text.len();
    }

    /// Cursor position in characters, for placing the terminal cursor.
    pub fn cursor_column(&self) -> usize {
        self.text[..self.cursor].chars().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_places_cursor_at_end() {
        let mut buffer = TextBuffer::new();
        buffer.set("hello");

        assert_eq!(buffer.as_str(), "hello");
        assert_eq!(buffer.cursor_column(), 5);
    }

    #[test]
    fn edits_around_multibyte_characters() {
        let mut buffer = TextBuffer::new();
        buffer.set("café");
        buffer.move_left();
        buffer.insert_char('!');
        assert_eq!(buffer.as_str(), "caf!é");

        buffer.move_end();
        buffer.backspace();
        assert_eq!(buffer.as_str(), "caf!");

        buffer.move_home();
        buffer.delete_char();
        assert_eq!(buffer.as_str(), "af!");
        assert_eq!(buffer.cursor_column(), 0);
    }

    #[test]
    fn delete_word_removes_previous_word() {
        let mut buffer = TextBuffer::new();
        buffer.set("buy oat milk  ");
        buffer.delete_word();
        assert_eq!(buffer.as_str(), "buy oat ");
        buffer.delete_word();
        buffer.delete_word();
        assert_eq!(buffer.as_str(), "");
        assert!(buffer.is_blank());
    }

    #[test]
    fn control_characters_are_ignored() {
        let mut buffer = TextBuffer::new();
        buffer.insert_char('\n');
        buffer.insert_char('\t');
        buffer.insert_char('a');
        assert_eq!(buffer.as_str(), "a");
    }
}
