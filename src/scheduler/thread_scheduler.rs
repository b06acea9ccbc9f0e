use std::thread;

use crate::error::RxError;
use crate::scheduler::{Scheduler, Task};

/// Spawns a fresh OS thread for every task.
///
/// Unbounded, so only suitable for small graphs or as a fallback when no pool
/// can be built.
#[derive(Clone, Copy, Debug, Default)]
pub struct NewThreadScheduler;

impl Scheduler for NewThreadScheduler {
  fn schedule(&self, task: Task) -> Result<(), RxError> {
    thread::Builder::new().spawn(task).map(drop).map_err(RxError::Schedule)
  }
}
