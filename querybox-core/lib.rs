//! Pure core of the query engine: the query buffer, range splicing, and
//! diagnostic localization. No async and no I/O in this crate; everything
//! here is a function of its arguments.

pub mod buffer;
pub mod diagnostics;
pub mod span;
pub mod splice;

pub use buffer::QueryBuffer;
pub use diagnostics::{
  Diagnostic,
  QueryCompilationError,
  RenderedDiagnostic,
  localize,
  localize_with_context,
};
pub use span::Span;
pub use splice::{
  InvalidRange,
  splice,
};
