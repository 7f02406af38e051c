//! Cancellation of in-flight background work.
//!
//! A [`TaskController`] owns at most one logical unit of work at a time;
//! restarting it hands out a fresh [`TaskHandle`] and cancels whatever was
//! running before. The handle side is cheap to clone and travels with the
//! spawned future.

use std::future::Future;

use tokio_util::sync::CancellationToken;

/// Handle carried by one unit of cancelable background work.
#[derive(Debug, Clone, Default)]
pub struct TaskHandle {
  token: CancellationToken,
}

impl TaskHandle {
  pub fn is_canceled(&self) -> bool {
    self.token.is_cancelled()
  }

  /// Resolves once the controlling [`TaskController`] cancels or restarts.
  pub async fn canceled(&self) {
    self.token.cancelled().await
  }
}

/// Owner side of [`TaskHandle`]: at most one task is live per controller,
/// a restart always supersedes the previous task.
#[derive(Debug, Default)]
pub struct TaskController {
  active: Option<TaskHandle>,
}

impl TaskController {
  pub fn new() -> Self {
    Self::default()
  }

  /// Cancel the current task (if any) and hand out the handle for its
  /// replacement.
  pub fn restart(&mut self) -> TaskHandle {
    self.cancel();
    let handle = TaskHandle::default();
    self.active = Some(handle.clone());
    handle
  }

  pub fn cancel(&mut self) {
    if let Some(handle) = self.active.take() {
      handle.token.cancel();
    }
  }

  pub fn is_running(&self) -> bool {
    self
      .active
      .as_ref()
      .is_some_and(|handle| !handle.is_canceled())
  }
}

/// Drive `fut` to completion unless `handle` is canceled first.
///
/// Returns `None` on cancellation. Cancellation wins ties so a canceled
/// task can never deliver a result that arrives in the same poll.
pub async fn cancelable_future<T>(fut: impl Future<Output = T>, handle: TaskHandle) -> Option<T> {
  tokio::select! {
    biased;
    _ = handle.canceled() => None,
    res = fut => Some(res),
  }
}
