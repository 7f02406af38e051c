//! Async event plumbing shared by the query-input surfaces: debounced
//! background workers and cancellation of in-flight requests.

mod cancel;
mod debounce;

pub use cancel::{
  TaskController,
  TaskHandle,
  cancelable_future,
};
pub use debounce::{
  DebounceWorker,
  send_blocking,
};
