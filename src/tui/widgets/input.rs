//! Text input state
//!
//! Editable single-line text with a cursor. Cursor positions count
//! characters, not bytes.

/// A single-line text input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    pub content: String,
    /// Cursor position in characters
    pub cursor: usize,
    pub placeholder: String,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Set content and move the cursor to the end
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.set(content);
        self
    }

    pub fn set(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.cursor = self.len();
    }

    fn len(&self) -> usize {
        self.content.chars().count()
    }

    fn byte_index(&self, char_idx: usize) -> usize {
        self.content
            .char_indices()
            .nth(char_idx)
            .map(|(i, _)| i)
            .unwrap_or(self.content.len())
    }

    /// Insert a character at the cursor
    pub fn insert(&mut self, c: char) {
        let idx = self.byte_index(self.cursor);
        self.content.insert(idx, c);
        self.cursor += 1;
    }

    /// Delete character before cursor
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let idx = self.byte_index(self.cursor);
            self.content.remove(idx);
        }
    }

    /// Delete character at cursor
    pub fn delete(&mut self) {
        if self.cursor < self.len() {
            let idx = self.byte_index(self.cursor);
            self.content.remove(idx);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.len() {
            self.cursor += 1;
        }
    }

    pub fn move_start(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.len();
    }

    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
    }

    pub fn value(&self) -> &str {
        &self.content
    }

    /// Split the content around the cursor: (before, at cursor, after)
    pub fn split_at_cursor(&self) -> (&str, Option<char>, &str) {
        let idx = self.byte_index(self.cursor);
        let (before, rest) = self.content.split_at(idx);
        let mut chars = rest.chars();
        let at = chars.next();
        (before, at, chars.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_editing() {
        let mut input = TextInput::new().content("12.5");
        assert_eq!(input.cursor, 4);

        input.insert('0');
        assert_eq!(input.value(), "12.50");

        input.move_start();
        input.delete();
        assert_eq!(input.value(), "2.50");

        input.move_end();
        input.backspace();
        input.move_left();
        input.insert('7');
        assert_eq!(input.value(), "2.75");
    }

    #[test]
    fn test_multibyte_characters() {
        let mut input = TextInput::new().content("café");
        input.backspace();
        assert_eq!(input.value(), "caf");
        input.insert('é');
        input.move_left();
        assert_eq!(input.split_at_cursor(), ("caf", Some('é'), ""));
    }

    #[test]
    fn test_cursor_bounds() {
        let mut input = TextInput::new();
        input.move_left();
        input.backspace();
        input.delete();
        input.move_right();
        assert_eq!(input.cursor, 0);
        assert_eq!(input.split_at_cursor(), ("", None, ""));
    }
}
