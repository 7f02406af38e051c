//! Live state behind one query input surface.

use querybox_core::{
  InvalidRange,
  QueryBuffer,
  splice,
};
use querybox_event::send_blocking;
use thiserror::Error;
use tokio::sync::mpsc::Sender;

use crate::{
  analysis::{
    AnalysisEvent,
    AnalysisOutcome,
  },
  wire::Suggestion,
};

/// A suggestion list plus the exact query text it was computed against.
///
/// The pairing is what makes suggestion offsets safe to apply: they only
/// mean anything against this snapshot.
#[derive(Debug)]
struct SuggestionSet {
  query: String,
  items: Vec<Suggestion>,
}

/// Accepting a suggestion failed; the buffer is left untouched.
#[derive(Debug, Error)]
pub enum AcceptError {
  #[error("no suggestion at index {0}")]
  NoSuchSuggestion(usize),
  /// The server sent offsets that do not fit the snapshot. Loud on
  /// purpose: this is the edit path.
  #[error(transparent)]
  InvalidRange(#[from] InvalidRange),
}

/// The state machine behind one search box: buffer, scope, and the current
/// suggestion list, kept mutually consistent under rapid input.
///
/// Every edit invalidates the suggestion list wholesale (suggestions are
/// single-use per snapshot, see [`Suggestion`]); analysis outcomes are
/// adopted only if they still match the live scope and text. Each surface
/// owns its own session and its own hook; nothing is shared between
/// surfaces.
pub struct SuggestionSession {
  buffer:      QueryBuffer,
  scope:       String,
  suggestions: Option<SuggestionSet>,
  events:      Sender<AnalysisEvent>,
}

impl SuggestionSession {
  /// `events` is the feed of a dedicated
  /// [`AnalysisHook`](crate::analysis::AnalysisHook).
  pub fn new(scope: impl Into<String>, events: Sender<AnalysisEvent>) -> Self {
    Self {
      buffer: QueryBuffer::default(),
      scope: scope.into(),
      suggestions: None,
      events,
    }
  }

  pub fn buffer(&self) -> &QueryBuffer {
    &self.buffer
  }

  pub fn scope(&self) -> &str {
    &self.scope
  }

  pub fn suggestions(&self) -> &[Suggestion] {
    self.suggestions.as_ref().map_or(&[], |set| &set.items)
  }

  /// A keystroke (or any other external edit) landed in the input.
  ///
  /// The old suggestion list is cleared synchronously, before the debounce
  /// even arms, so stale entries are never shown while the user types.
  pub fn on_text_changed(&mut self, text: impl Into<String>, cursor: usize) {
    self.buffer.set(text, cursor);
    self.suggestions = None;
    send_blocking(&self.events, AnalysisEvent::Edit {
      text:   self.buffer.text().to_owned(),
      cursor: self.buffer.cursor(),
      scope:  self.scope.clone(),
    });
  }

  /// Adopt an analysis outcome, unless it is stale.
  ///
  /// An outcome is stale when the scope changed or the text was edited
  /// after its request went out. Response arrival order proves nothing once
  /// requests overlap, so both are compared against the echoed snapshot and
  /// mismatches are dropped silently.
  pub fn on_analysis_result(&mut self, outcome: AnalysisOutcome) {
    if outcome.scope != self.scope || outcome.query != self.buffer.text() {
      log::trace!(
        "dropping stale analysis outcome (scope {:?}, {} chars)",
        outcome.scope,
        outcome.query.chars().count()
      );
      return;
    }
    match outcome.response {
      Ok(response) if response.error.is_none() => {
        self.suggestions = Some(SuggestionSet {
          query: outcome.query,
          items: response.suggestions,
        });
      },
      Ok(_) => {
        // The query does not compile at this cursor. The error is not
        // rendered on the suggestion path and nothing is offered.
        self.suggestions = None;
      },
      Err(_) => {
        // Best-effort: degrade to "no suggestions", keep the buffer.
        self.suggestions = None;
      },
    }
  }

  /// Apply the `index`-th suggestion to the buffer.
  ///
  /// The splice runs against the snapshot the suggestions were computed
  /// for, the cursor lands after the inserted text, and the list is
  /// cleared. The scheduler is NOT re-armed; the user's next keystroke
  /// will do that.
  pub fn accept_suggestion(&mut self, index: usize) -> Result<(), AcceptError> {
    let set = self
      .suggestions
      .as_ref()
      .ok_or(AcceptError::NoSuchSuggestion(index))?;
    let suggestion = set
      .items
      .get(index)
      .ok_or(AcceptError::NoSuchSuggestion(index))?;

    let (text, cursor) = splice(&set.query, suggestion.target_location, &suggestion.text)?;
    self.buffer.set(text, cursor);
    self.suggestions = None;
    Ok(())
  }

  /// The surrounding page/route context changed.
  ///
  /// Suggestions are cleared and the hook's pending timer and in-flight
  /// request are cancelled; anything that still slips through is rejected
  /// by the staleness guard above. No analysis fires for the new scope
  /// until the user types.
  pub fn set_scope(&mut self, scope: impl Into<String>) {
    self.scope = scope.into();
    self.suggestions = None;
    send_blocking(&self.events, AnalysisEvent::Cancel);
  }
}
