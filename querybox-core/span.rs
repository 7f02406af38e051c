use serde::{
  Deserialize,
  Serialize,
};

/// A character range with an INCLUSIVE `end`.
///
/// This is the one shape the server uses for locations: suggestion targets
/// and compiler diagnostics both anchor to a `Span`. Replacing
/// `Span { start: 1, end: 2 }` of `"abcdef"` rewrites `"bc"`; the splice
/// path consumes `end + 1` as the exclusive bound and that conversion lives
/// in [`crate::splice`], nowhere else.
///
/// `end == start - 1` is a valid empty span and means pure insertion at
/// `start` (at position 0 that is `end == -1`, which is why the fields are
/// signed). Offsets are characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
  pub start: i64,
  pub end:   i64,
}

impl Span {
  pub const fn new(start: i64, end: i64) -> Self {
    Self { start, end }
  }

  /// An empty span marking the insertion point at `at`.
  pub const fn insertion(at: i64) -> Self {
    Self {
      start: at,
      end:   at - 1,
    }
  }

  /// Number of characters covered; zero for an insertion point.
  pub fn len(&self) -> usize {
    (self.end - self.start + 1).max(0) as usize
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}
