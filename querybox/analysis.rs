//! Debounced analysis driver for one query input surface.
//!
//! Keystrokes arrive as [`AnalysisEvent::Edit`]s; the hook coalesces them
//! under a moving deadline and issues at most one `analyze-query` request
//! per quiet period, built from the snapshot current at expiry. The network
//! call is fire-and-forget: the hook never blocks on it, and a newer edit
//! or a cancel supersedes it through the task controller.

use std::{
  sync::Arc,
  time::Duration,
};

use querybox_event::{
  DebounceWorker,
  TaskController,
  cancelable_future,
};
use tokio::sync::mpsc;

use crate::{
  client::QueryClient,
  wire::{
    AnalysisRequest,
    AnalysisResponse,
  },
};

/// Quiet period between the last keystroke and the analysis request.
pub const DEBOUNCE: Duration = Duration::from_millis(250);

/// Events fed to the hook by its [`SuggestionSession`](crate::session::SuggestionSession).
#[derive(Debug, Clone)]
pub enum AnalysisEvent {
  /// The buffer changed; supersede the pending snapshot and re-arm the
  /// timer.
  Edit {
    text:   String,
    cursor: usize,
    scope:  String,
  },
  /// Drop the pending snapshot and cancel in-flight work (scope change,
  /// widget teardown).
  Cancel,
}

/// Delivered on the outcome channel once a request resolves.
///
/// `scope` and `query` echo the snapshot the request was built from so the
/// session can reject an outcome that is stale by the time it arrives;
/// arrival order proves nothing once requests overlap.
#[derive(Debug)]
pub struct AnalysisOutcome {
  pub scope:    String,
  pub query:    String,
  pub response: anyhow::Result<AnalysisResponse>,
}

#[derive(Debug, Clone)]
struct Snapshot {
  text:   String,
  cursor: usize,
  scope:  String,
}

/// Debounce worker issuing analysis requests for one input surface.
///
/// All state is per-instance. Two surfaces never share a timer, so one
/// surface's keystrokes cannot cancel another surface's pending request.
pub struct AnalysisHook {
  client:     Arc<dyn QueryClient>,
  outcome_tx: mpsc::Sender<AnalysisOutcome>,
  pending:    Option<Snapshot>,
  in_flight:  TaskController,
}

impl AnalysisHook {
  pub fn new(client: Arc<dyn QueryClient>, outcome_tx: mpsc::Sender<AnalysisOutcome>) -> Self {
    Self {
      client,
      outcome_tx,
      pending: None,
      in_flight: TaskController::new(),
    }
  }

  /// Spawn onto the current runtime; the returned sender is the event feed.
  pub fn spawn(self) -> mpsc::Sender<AnalysisEvent> {
    DebounceWorker::spawn(self)
  }
}

impl DebounceWorker for AnalysisHook {
  type Event = AnalysisEvent;

  fn delay(&self) -> Duration {
    DEBOUNCE
  }

  fn absorb(&mut self, event: Self::Event) -> bool {
    match event {
      AnalysisEvent::Edit { text, cursor, scope } => {
        // A newer edit always wins over the pending snapshot; the quiet
        // period restarts from now.
        self.pending = Some(Snapshot { text, cursor, scope });
        true
      },
      AnalysisEvent::Cancel => {
        self.pending = None;
        self.in_flight.cancel();
        false
      },
    }
  }

  fn fire(&mut self) {
    let Some(snapshot) = self.pending.take() else {
      return;
    };
    // Cancellation stops the timer path above; an already-sent request is
    // stopped here, by superseding its handle.
    let handle = self.in_flight.restart();
    let client = Arc::clone(&self.client);
    let outcome_tx = self.outcome_tx.clone();

    tokio::spawn(async move {
      let request = AnalysisRequest {
        cursor_pos: Some(snapshot.cursor),
        query:      snapshot.text.clone(),
        scope:      snapshot.scope.clone(),
      };
      let Some(response) = cancelable_future(client.analyze(request), handle).await else {
        log::trace!("analysis for scope {:?} canceled in flight", snapshot.scope);
        return;
      };
      if let Err(err) = &response {
        // Best-effort path: a failed fetch degrades to "no suggestions".
        log::debug!("analyze-query failed: {err:#}");
      }
      let outcome = AnalysisOutcome {
        scope: snapshot.scope,
        query: snapshot.text,
        response,
      };
      if outcome_tx.send(outcome).await.is_err() {
        log::trace!("analysis outcome dropped: session receiver gone");
      }
    });
  }
}

#[cfg(test)]
mod tests {
  use parking_lot::Mutex;

  use super::*;
  use crate::{
    client::SearchCallError,
    wire::{
      SearchRequest,
      SearchResults,
      Suggestion,
      SuggestionType,
    },
  };

  #[derive(Default)]
  struct RecordingClient {
    requests: Mutex<Vec<AnalysisRequest>>,
    delay:    Option<Duration>,
  }

  #[async_trait::async_trait]
  impl QueryClient for RecordingClient {
    async fn analyze(&self, request: AnalysisRequest) -> anyhow::Result<AnalysisResponse> {
      self.requests.lock().push(request.clone());
      if let Some(delay) = self.delay {
        tokio::time::sleep(delay).await;
      }
      Ok(AnalysisResponse {
        error:       None,
        suggestions: vec![Suggestion {
          text:            request.query.clone(),
          display:         request.query,
          target_location: querybox_core::Span::insertion(0),
          suggestion_type: SuggestionType {
            name:   "echo".into(),
            prefix: String::new(),
          },
        }],
      })
    }

    async fn search(&self, _request: SearchRequest) -> Result<SearchResults, SearchCallError> {
      unimplemented!("not used by the analysis hook")
    }
  }

  fn spawn_hook(
    client: Arc<RecordingClient>,
  ) -> (mpsc::Sender<AnalysisEvent>, mpsc::Receiver<AnalysisOutcome>) {
    let (outcome_tx, outcome_rx) = mpsc::channel(8);
    let events = AnalysisHook::new(client, outcome_tx).spawn();
    (events, outcome_rx)
  }

  fn edit(text: &str, scope: &str) -> AnalysisEvent {
    AnalysisEvent::Edit {
      text:   text.to_string(),
      cursor: text.chars().count(),
      scope:  scope.to_string(),
    }
  }

  #[tokio::test(start_paused = true)]
  async fn rapid_edits_coalesce_into_one_request() {
    let client = Arc::new(RecordingClient::default());
    let (events, mut outcomes) = spawn_hook(client.clone());

    for text in ["t", "ta", "tag"] {
      events.send(edit(text, "posts")).await.unwrap();
    }

    let outcome = outcomes.recv().await.unwrap();
    assert_eq!(outcome.query, "tag");
    assert_eq!(outcome.scope, "posts");
    assert!(outcome.response.is_ok());

    let requests = client.requests.lock();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].query, "tag");
    assert_eq!(requests[0].cursor_pos, Some(3));
  }

  #[tokio::test(start_paused = true)]
  async fn separate_quiet_periods_fire_separately() {
    let client = Arc::new(RecordingClient::default());
    let (events, mut outcomes) = spawn_hook(client.clone());

    events.send(edit("a", "posts")).await.unwrap();
    let first = outcomes.recv().await.unwrap();
    events.send(edit("ab", "posts")).await.unwrap();
    let second = outcomes.recv().await.unwrap();

    assert_eq!(first.query, "a");
    assert_eq!(second.query, "ab");
    assert_eq!(client.requests.lock().len(), 2);
  }

  #[tokio::test(start_paused = true)]
  async fn cancel_before_expiry_suppresses_the_request() {
    let client = Arc::new(RecordingClient::default());
    let (events, mut outcomes) = spawn_hook(client.clone());

    events.send(edit("tag", "posts")).await.unwrap();
    events.send(AnalysisEvent::Cancel).await.unwrap();

    tokio::time::sleep(DEBOUNCE * 4).await;
    assert!(client.requests.lock().is_empty());
    assert!(outcomes.try_recv().is_err());
  }

  #[tokio::test(start_paused = true)]
  async fn cancel_drops_an_in_flight_response() {
    let client = Arc::new(RecordingClient {
      requests: Mutex::new(Vec::new()),
      delay:    Some(Duration::from_millis(100)),
    });
    let (events, mut outcomes) = spawn_hook(client.clone());

    events.send(edit("tag", "posts")).await.unwrap();
    // Let the debounce expire and the request go out, then cancel while
    // the (slow) response is still in flight.
    tokio::time::sleep(DEBOUNCE + Duration::from_millis(10)).await;
    assert_eq!(client.requests.lock().len(), 1);
    events.send(AnalysisEvent::Cancel).await.unwrap();

    let outcome = tokio::time::timeout(Duration::from_secs(1), outcomes.recv()).await;
    assert!(outcome.is_err(), "canceled request must not deliver an outcome");
  }

  #[tokio::test(start_paused = true)]
  async fn a_newer_request_supersedes_the_in_flight_one() {
    let client = Arc::new(RecordingClient {
      requests: Mutex::new(Vec::new()),
      delay:    Some(Duration::from_millis(500)),
    });
    let (events, mut outcomes) = spawn_hook(client.clone());

    events.send(edit("ta", "posts")).await.unwrap();
    tokio::time::sleep(DEBOUNCE + Duration::from_millis(10)).await;
    // First request is now sleeping inside the client; type again.
    events.send(edit("tag", "posts")).await.unwrap();

    let outcome = outcomes.recv().await.unwrap();
    assert_eq!(outcome.query, "tag");
    // Only the superseding request's outcome arrives.
    let extra = tokio::time::timeout(Duration::from_secs(2), outcomes.recv()).await;
    assert!(extra.is_err());
    assert_eq!(client.requests.lock().len(), 2);
  }

  #[tokio::test(start_paused = true)]
  async fn transport_failure_is_delivered_not_dropped() {
    struct FailingClient;

    #[async_trait::async_trait]
    impl QueryClient for FailingClient {
      async fn analyze(&self, _request: AnalysisRequest) -> anyhow::Result<AnalysisResponse> {
        anyhow::bail!("connection refused")
      }

      async fn search(&self, _request: SearchRequest) -> Result<SearchResults, SearchCallError> {
        unimplemented!()
      }
    }

    let (outcome_tx, mut outcomes) = mpsc::channel(8);
    let events = AnalysisHook::new(Arc::new(FailingClient), outcome_tx).spawn();
    events.send(edit("tag", "posts")).await.unwrap();

    let outcome = outcomes.recv().await.unwrap();
    assert_eq!(outcome.query, "tag");
    assert!(outcome.response.is_err());
  }
}
