use thiserror::Error;

use crate::span::Span;

/// The range handed to [`splice`] does not fit the target string.
///
/// This is always a caller bug (typically a suggestion applied against a
/// string it was not computed for), so the edit path reports it instead of
/// clamping; clamping would corrupt offsets without surfacing the bug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("splice range {start}..={end} is out of bounds for a {len}-char string")]
pub struct InvalidRange {
  pub start: i64,
  pub end:   i64,
  pub len:   usize,
}

/// Replace the characters covered by `span` with `replacement`.
///
/// Returns the rewritten string and the new cursor offset, which lands just
/// past the inserted text. `span.end` is inclusive (see [`Span`]); an empty
/// span inserts at `span.start`. Offsets are characters, not bytes.
pub fn splice(
  original: &str,
  span: Span,
  replacement: &str,
) -> Result<(String, usize), InvalidRange> {
  let len = original.chars().count();
  let after_end = span.end.saturating_add(1);
  if span.start < 0 || span.start > after_end || after_end as usize > len {
    return Err(InvalidRange {
      start: span.start,
      end:   span.end,
      len,
    });
  }
  let start = span.start as usize;
  let tail = after_end as usize;

  let mut result = String::with_capacity(original.len() + replacement.len());
  result.extend(original.chars().take(start));
  result.push_str(replacement);
  result.extend(original.chars().skip(tail));

  Ok((result, start + replacement.chars().count()))
}
