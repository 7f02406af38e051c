//! # Querybox
//!
//! The interaction engine behind a query search box: live autocomplete
//! keyed to the cursor position, in-place edits when a suggestion is
//! accepted, and compiler-style diagnostics localized inside the query
//! string when a submission fails server-side.
//!
//! ## Overview
//!
//! The query compiler lives on the server and is consumed through two
//! calls only (see [`client::QueryClient`]): `analyze-query`, which returns
//! cursor-dependent suggestions, and the search endpoint, which may return
//! compilation diagnostics instead of results. Everything client-side is in
//! this workspace:
//!
//! - [`session::SuggestionSession`] owns the buffer, the scope, and the
//!   current suggestion list, and keeps them consistent under rapid input.
//! - [`analysis::AnalysisHook`] debounces keystrokes and issues at most one
//!   analysis request per quiet period; outcomes echo their snapshot so
//!   stale responses are rejected instead of trusted by arrival order.
//! - [`submit`] sends the full query and turns a rejection into a
//!   [`submit::FailureReport`] of localized diagnostics.
//!
//! Each input surface (global search box, pickers, tag editors) gets its
//! own session + hook pair; no timers or state are shared between them.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use querybox::{
//!   analysis::AnalysisHook,
//!   client::QueryClient,
//!   session::SuggestionSession,
//! };
//! use tokio::sync::mpsc;
//!
//! async fn wire_up(client: Arc<dyn QueryClient>) {
//!   let (outcome_tx, mut outcomes) = mpsc::channel(8);
//!   let events = AnalysisHook::new(client, outcome_tx).spawn();
//!   let mut session = SuggestionSession::new("posts", events);
//!
//!   // Keystrokes go in; after the quiet period an outcome comes back.
//!   session.on_text_changed("tag", 3);
//!   if let Some(outcome) = outcomes.recv().await {
//!     session.on_analysis_result(outcome);
//!   }
//!   if !session.suggestions().is_empty() {
//!     session.accept_suggestion(0).unwrap();
//!   }
//! }
//! ```

pub mod analysis;
pub mod client;
pub mod session;
pub mod submit;
pub mod wire;

pub use querybox_core::{
  Diagnostic,
  InvalidRange,
  QueryBuffer,
  QueryCompilationError,
  RenderedDiagnostic,
  Span,
  localize,
  splice,
};

pub use crate::{
  analysis::{
    AnalysisEvent,
    AnalysisHook,
    AnalysisOutcome,
  },
  client::{
    QueryClient,
    SearchCallError,
  },
  session::{
    AcceptError,
    SuggestionSession,
  },
  submit::{
    FailureReport,
    RenderedError,
    SubmitError,
    render_failure,
    submit,
  },
  wire::{
    AnalysisRequest,
    AnalysisResponse,
    SearchFailurePayload,
    SearchRequest,
    SearchResults,
    Suggestion,
    SuggestionType,
  },
};
