//! Fixed-delay debouncing for keystroke-driven background work.
//!
//! The worker runs as a background tokio task fed events over an mpsc
//! channel. It is a two-state machine: **idle** (no timer) and **armed**
//! (one timer outstanding). Any absorbed event restarts the quiet period;
//! when the period elapses without further events the worker fires once and
//! goes back to idle. There is never more than one timer per worker.

use std::time::Duration;

use futures_executor::block_on;
use tokio::{
  sync::mpsc::{
    self,
    Sender,
    error::TrySendError,
  },
  time::{
    Instant,
    timeout_at,
  },
};

/// Longest a full channel may block the sending side. Dropping an event is
/// better than stalling the input surface mid-keystroke.
const SEND_TIMEOUT: Duration = Duration::from_millis(2);

/// A debounced background worker with a single fixed delay.
///
/// Implementors hold whatever snapshot the coalesced events boil down to;
/// the loop in here owns the timer so implementors never touch deadlines.
pub trait DebounceWorker: Send + Sync + 'static + Sized {
  type Event: Send + Sync + 'static;

  /// Quiet period between the last absorbed event and [`fire`](Self::fire).
  fn delay(&self) -> Duration;

  /// Take one event into the pending state. Returning `true` (re)arms the
  /// timer; returning `false` disarms it (cancellation-style events).
  fn absorb(&mut self, event: Self::Event) -> bool;

  /// The quiet period elapsed with the timer still armed.
  fn fire(&mut self);

  /// Spawn the worker onto the current runtime and return its event feed.
  fn spawn(self) -> mpsc::Sender<Self::Event> {
    // Events are drained immediately, so the channel rarely fills up; the
    // headroom is for bursts of rapid typing.
    let (tx, rx) = mpsc::channel(128);
    // only spawn the worker when we are inside a runtime so that unrelated
    // unit tests do not need to stand one up
    if tokio::runtime::Handle::try_current().is_ok() {
      tokio::spawn(run(self, rx));
    }
    tx
  }
}

async fn run<W: DebounceWorker>(mut worker: W, mut rx: mpsc::Receiver<W::Event>) {
  'idle: loop {
    let Some(event) = rx.recv().await else {
      return;
    };
    if !worker.absorb(event) {
      continue 'idle;
    }

    // Armed: each further event restarts the quiet period from now.
    let mut deadline = Instant::now() + worker.delay();
    loop {
      match timeout_at(deadline, rx.recv()).await {
        Ok(Some(event)) => {
          if worker.absorb(event) {
            deadline = Instant::now() + worker.delay();
          } else {
            continue 'idle;
          }
        },
        Ok(None) => return,
        Err(_elapsed) => {
          worker.fire();
          continue 'idle;
        },
      }
    }
  }
}

/// Send an event to a worker from synchronous code, blocking only briefly
/// if its channel is full.
///
/// Responsiveness wins over reliability here: the fast path is a
/// non-blocking send, a full channel blocks for at most [`SEND_TIMEOUT`],
/// and after that the event is dropped.
pub fn send_blocking<T>(tx: &Sender<T>, event: T) {
  let Err(err) = tx.try_send(event) else {
    return;
  };
  match err {
    TrySendError::Full(event) => {
      let _ = block_on(tx.send_timeout(event, SEND_TIMEOUT));
    },
    TrySendError::Closed(_) => {
      log::warn!("event dropped: worker channel closed");
    },
  }
}
