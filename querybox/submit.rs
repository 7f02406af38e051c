//! Query submission and diagnostic rendering.
//!
//! Submission sends the full query string, never a cursor-scoped one. On a
//! compile failure the server's diagnostics are localized against that
//! string and handed back ready to render; the caller's buffer is never
//! touched, so the user can correct the query in place.

use std::fmt;

use querybox_core::{
  RenderedDiagnostic,
  localize,
};
use thiserror::Error;

use crate::{
  client::{
    QueryClient,
    SearchCallError,
  },
  wire::{
    SearchFailurePayload,
    SearchRequest,
    SearchResults,
  },
};

/// One diagnostic ready for display: windowed snippet, aligned marker, and
/// the server's message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedError {
  pub snippet: String,
  pub marker:  String,
  pub msg:     String,
}

impl fmt::Display for RenderedError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "{}", self.snippet)?;
    writeln!(f, "{}", self.marker)?;
    write!(f, "{}", self.msg)
  }
}

/// Everything the UI needs to surface a failed submission: the top-level
/// message plus the localized diagnostics, in server order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureReport {
  pub message:     String,
  pub diagnostics: Vec<RenderedError>,
}

impl fmt::Display for FailureReport {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.message)?;
    for rendered in &self.diagnostics {
      write!(f, "\n\n{rendered}")?;
    }
    Ok(())
  }
}

/// A submission failed; there are no partial results.
#[derive(Debug, Error)]
pub enum SubmitError {
  /// The server rejected the query. The report is ready to render; the
  /// caller keeps its buffer as-is and lets the user correct it.
  #[error("{}", .0.message)]
  Rejected(FailureReport),
  /// The call itself failed (network, 5xx, bad JSON).
  #[error(transparent)]
  Transport(anyhow::Error),
}

/// Localize `payload` against the query it was produced for.
///
/// Diagnostics keep server order; nothing is de-duplicated or re-sorted. A
/// payload without diagnostics yields a report with only the message.
pub fn render_failure(query: &str, payload: &SearchFailurePayload) -> FailureReport {
  let diagnostics = payload
    .compilation_errors
    .as_deref()
    .unwrap_or_default()
    .iter()
    .map(|diag| {
      let RenderedDiagnostic { snippet, marker } = localize(query, diag);
      RenderedError {
        snippet,
        marker,
        msg: diag.msg.clone(),
      }
    })
    .collect();

  FailureReport {
    message: payload.message.clone(),
    diagnostics,
  }
}

/// Submit one page of a search and localize any compilation failure.
pub async fn submit(
  client: &dyn QueryClient,
  request: SearchRequest,
) -> Result<SearchResults, SubmitError> {
  let query = request.query.clone();
  match client.search(request).await {
    Ok(results) => Ok(results),
    Err(SearchCallError::Rejected(payload)) => {
      log::debug!(
        "search rejected: {} ({} diagnostics)",
        payload.message,
        payload.compilation_errors.as_deref().map_or(0, |diags| diags.len())
      );
      Err(SubmitError::Rejected(render_failure(&query, &payload)))
    },
    Err(SearchCallError::Transport(err)) => Err(SubmitError::Transport(err)),
  }
}
