use tokio::runtime::Handle;

use crate::error::RxError;
use crate::scheduler::{Scheduler, Task};

/// Runs tasks on the blocking pool of a tokio runtime.
///
/// Observer handlers are plain synchronous code, so they go to
/// `spawn_blocking` rather than the async worker threads.
#[derive(Clone, Debug)]
pub struct TokioScheduler {
  handle: Handle,
}

impl TokioScheduler {
  pub fn new(handle: Handle) -> Self { Self { handle } }

  /// Binds to the runtime the caller is running inside of.
  ///
  /// Returns `None` outside of a tokio runtime.
  pub fn current() -> Option<Self> { Handle::try_current().ok().map(Self::new) }
}

impl Scheduler for TokioScheduler {
  fn schedule(&self, task: Task) -> Result<(), RxError> {
    // The JoinHandle is dropped: completion is tracked by the observable.
    drop(self.handle.spawn_blocking(task));
    Ok(())
  }
}
