//! A minimal editable text buffer.

use crossterm::event::KeyCode;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
  pub value: String,
}

impl TextInput {
  pub fn new(value: impl Into<String>) -> Self { Self { value: value.into() } }

  /// Apply an editing key. Returns `false` for keys the buffer ignores, so
  /// the caller can treat them as commands.
  pub fn handle(&mut self, code: KeyCode) -> bool {
    match code {
      KeyCode::Char(c) => self.value.push(c),
      KeyCode::Backspace => {
        self.value.pop();
      }
      _ => return false,
    }
    true
  }

  pub fn clear(&mut self) { self.value.clear(); }

  pub fn is_blank(&self) -> bool { self.value.trim().is_empty() }

  pub fn as_str(&self) -> &str { &self.value }
}
