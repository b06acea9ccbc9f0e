use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use smallvec::SmallVec;

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
  mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Completion handle of one dispatch task.
#[derive(Clone, Debug, Default)]
pub struct TaskHandle(Arc<TaskState>);

#[derive(Debug, Default)]
struct TaskState {
  finished: Mutex<bool>,
  cond: Condvar,
}

impl TaskHandle {
  pub(crate) fn finish(&self) {
    *lock(&self.0.finished) = true;
    self.0.cond.notify_all();
  }

  pub fn is_finished(&self) -> bool { *lock(&self.0.finished) }

  /// Blocks until the task finished or `deadline` passed. `None` waits
  /// forever. Returns whether the task finished.
  pub fn wait_until(&self, deadline: Option<Instant>) -> bool {
    let mut finished = lock(&self.0.finished);
    while !*finished {
      finished = match deadline {
        None => self.0.cond.wait(finished).unwrap_or_else(PoisonError::into_inner),
        Some(deadline) => {
          let now = Instant::now();
          if now >= deadline {
            return false;
          }
          let (guard, _) = self
            .0
            .cond
            .wait_timeout(finished, deadline - now)
            .unwrap_or_else(PoisonError::into_inner);
          guard
        }
      };
    }
    true
  }
}

/// The dispatch tasks an observable has scheduled and not yet reclaimed.
#[derive(Debug, Default)]
pub(crate) struct InFlight {
  tasks: Mutex<Tracked>,
}

#[derive(Debug)]
struct Tracked {
  handles: SmallVec<[TaskHandle; 4]>,
  // Length at which `track` next sweeps finished handles.
  sweep_at: usize,
}

const MIN_SWEEP: usize = 16;

impl Default for Tracked {
  fn default() -> Self { Self { handles: SmallVec::new(), sweep_at: MIN_SWEEP } }
}

impl Tracked {
  fn sweep(&mut self) -> usize {
    self.handles.retain(|t| !t.is_finished());
    self.sweep_at = (self.handles.len() * 2).max(MIN_SWEEP);
    self.handles.len()
  }
}

impl InFlight {
  /// Sweeps only when the set has doubled since the last sweep, so a burst
  /// of fires stays linear.
  pub(crate) fn track(&self, handle: TaskHandle) {
    let mut tasks = lock(&self.tasks);
    tasks.handles.push(handle);
    if tasks.handles.len() >= tasks.sweep_at {
      tasks.sweep();
    }
  }

  /// Waits for every task tracked at call time, then reclaims the finished
  /// ones. Returns true iff nothing is left in flight.
  pub(crate) fn join_until(&self, deadline: Option<Instant>) -> bool {
    let snapshot = lock(&self.tasks).handles.clone();
    for task in &snapshot {
      if !task.wait_until(deadline) {
        break;
      }
    }
    self.purge() == 0
  }

  /// Drops finished tasks, returning how many are still running.
  pub(crate) fn purge(&self) -> usize { lock(&self.tasks).sweep() }
}
