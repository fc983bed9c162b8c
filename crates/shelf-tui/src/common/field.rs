//! Single-line text field for forms and the search bar.
//!
//! Editing is append/backspace only; the cursor always sits at the end.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Default)]
pub struct TextField {
    value: String,
    /// Rendered as bullets (passwords).
    masked: bool,
}

impl TextField {
    pub fn masked() -> Self {
        Self {
            value: String::new(),
            masked: true,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    pub fn set(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    pub fn clear(&mut self) {
        self.value.clear();
    }

    /// Text to draw: the value, or one bullet per char when masked.
    pub fn display(&self) -> String {
        if self.masked {
            "•".repeat(self.value.chars().count())
        } else {
            self.value.clone()
        }
    }

    /// Inserts pasted text, dropping line breaks.
    pub fn paste(&mut self, text: &str) {
        self.value
            .extend(text.chars().filter(|c| !matches!(c, '\n' | '\r')));
    }

    /// Applies an editing key. Returns true if the value changed.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Backspace if ctrl || key.modifiers.contains(KeyModifiers::ALT) => {
                self.delete_word()
            }
            KeyCode::Backspace => self.value.pop().is_some(),
            KeyCode::Char('u') if ctrl => {
                let changed = !self.value.is_empty();
                self.value.clear();
                changed
            }
            KeyCode::Char('w') if ctrl => self.delete_word(),
            KeyCode::Char(c) if !ctrl => {
                self.value.push(c);
                true
            }
            _ => false,
        }
    }

    fn delete_word(&mut self) -> bool {
        let before = self.value.len();
        let trimmed = self.value.trim_end().len();
        self.value.truncate(trimmed);
        let cut = self
            .value
            .rfind(char::is_whitespace)
            .map_or(0, |idx| idx + 1);
        self.value.truncate(cut);
        self.value.len() != before
    }
}
