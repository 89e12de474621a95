//! Single-line text input for the add and edit prompts.

/// A text input with a cursor counted in characters, not bytes.
#[derive(Clone, Debug, Default)]
pub struct InputField {
    pub value: String,
    pub cursor: usize,
}

impl InputField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `value`, cursor at the end.
    pub fn with_value(value: &str) -> Self {
        Self {
            value: value.to_string(),
            cursor: value.chars().count(),
        }
    }

    fn byte_index(&self, cursor: usize) -> usize {
        self.value
            .char_indices()
            .nth(cursor)
            .map_or(self.value.len(), |(i, _)| i)
    }

    fn char_len(&self) -> usize {
        self.value.chars().count()
    }

    pub fn handle_char(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.value.insert(at, c);
        self.cursor += 1;
    }

    /// Delete the character before the cursor.
    pub fn handle_backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_index(self.cursor);
            self.value.remove(at);
        }
    }

    /// Delete the character under the cursor.
    pub fn handle_delete(&mut self) {
        if self.cursor < self.char_len() {
            let at = self.byte_index(self.cursor);
            self.value.remove(at);
        }
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor < self.char_len() {
            self.cursor += 1;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.char_len();
    }

    /// Return the value and reset the field.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multibyte_editing() {
        let mut field = InputField::with_value("café");
        assert_eq!(field.cursor, 4);
        field.handle_backspace();
        assert_eq!(field.value, "caf");
        field.handle_char('é');
        field.move_home();
        field.handle_delete();
        assert_eq!(field.value, "afé");
        field.move_cursor_right();
        field.handle_char('ß');
        assert_eq!(field.value, "aßfé");
    }

    #[test]
    fn test_take_resets() {
        let mut field = InputField::with_value("milk");
        assert_eq!(field.take(), "milk");
        assert!(field.value.is_empty());
        assert_eq!(field.cursor, 0);
        field.move_cursor_left();
        field.handle_backspace();
        assert_eq!(field.cursor, 0);
    }
}
