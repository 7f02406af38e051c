/// The mutable text + cursor pair behind one query input surface.
///
/// `cursor` is a character offset with `0 <= cursor <= len`; the buffer is
/// only ever mutated through its methods, so the invariant holds everywhere
/// else. A cursor handed in past the end is clamped to it (the widget and
/// the buffer can briefly disagree during IME composition, and the display
/// path must not panic over it).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryBuffer {
  text:   String,
  cursor: usize,
}

impl QueryBuffer {
  pub fn new(text: impl Into<String>, cursor: usize) -> Self {
    let mut buffer = Self::default();
    buffer.set(text, cursor);
    buffer
  }

  pub fn text(&self) -> &str {
    &self.text
  }

  pub fn cursor(&self) -> usize {
    self.cursor
  }

  pub fn char_len(&self) -> usize {
    self.text.chars().count()
  }

  pub fn is_empty(&self) -> bool {
    self.text.is_empty()
  }

  /// Replace the whole content, clamping the cursor into bounds.
  pub fn set(&mut self, text: impl Into<String>, cursor: usize) {
    self.text = text.into();
    self.cursor = cursor.min(self.char_len());
  }
}
