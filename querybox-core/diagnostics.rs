//! Compiler diagnostics and their rendering against the submitted query.

use serde::{
  Deserialize,
  Serialize,
};

use crate::span::Span;

/// Context characters shown on each side of a diagnostic's span.
pub const CONTEXT_CHARS: usize = 25;

/// One compiler error anchored to a span of the submitted query string.
///
/// `location.end` may equal `location.start` (a point diagnostic) or exceed
/// it (a range diagnostic).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
  pub location: Span,
  pub msg:      String,
}

/// A failed compilation: one phase, one or more diagnostics.
///
/// There is no partial or warning state; a submission either compiles or it
/// does not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryCompilationError {
  pub phase:  String,
  pub errors: Vec<Diagnostic>,
}

/// A diagnostic rendered for display: a windowed snippet of the query and a
/// marker line that aligns under it.
///
/// For a range diagnostic the marker spans the whole range with caret
/// endpoints (`^---^`); a point diagnostic gets a single `^`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDiagnostic {
  pub snippet: String,
  pub marker:  String,
}

/// Render `diag` against `query` with the default context window.
pub fn localize(query: &str, diag: &Diagnostic) -> RenderedDiagnostic {
  localize_with_context(query, diag, CONTEXT_CHARS)
}

/// Render `diag` against `query`, windowed to `context` characters on each
/// side of the diagnostic's span.
///
/// This is a display path: a malformed server span is clamped into bounds
/// rather than rejected, because rendering must never take down the input
/// surface. Each diagnostic is rendered independently; callers keep server
/// order and do not de-duplicate.
pub fn localize_with_context(query: &str, diag: &Diagnostic, context: usize) -> RenderedDiagnostic {
  let len = query.chars().count() as i64;
  let context = context as i64;
  let start = diag.location.start.clamp(0, len);
  let end = diag.location.end.min(len);

  let window_start = (start - context).max(0);
  let window_end = (end + context).clamp(window_start, len);

  let snippet: String = query
    .chars()
    .skip(window_start as usize)
    .take((window_end - window_start) as usize)
    .collect();

  let mut marker = " ".repeat((start - window_start) as usize);
  if end > start {
    marker.push('^');
    for _ in 0..(end - start - 1) {
      marker.push('-');
    }
    marker.push('^');
  } else {
    marker.push('^');
  }

  RenderedDiagnostic { snippet, marker }
}
