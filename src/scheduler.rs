//! Task-spawning abstraction used by every observable to run dispatch tasks.
//!
//! A [`Scheduler`] only has to run a boxed closure somewhere other than the
//! calling thread. Tracking and joining are handled by the observable that
//! scheduled the work, so implementations stay trivial.
//!
//! | Scheduler | Backing |
//! |-----------|---------|
//! | [`ThreadPoolScheduler`] | `futures::executor::ThreadPool` (feature `futures-scheduler`) |
//! | [`NewThreadScheduler`] | one OS thread per task |
//! | [`TokioScheduler`] | blocking pool of a tokio runtime (feature `tokio-scheduler`) |

use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::error::RxError;

mod thread_scheduler;
pub use thread_scheduler::NewThreadScheduler;

#[cfg(feature = "futures-scheduler")]
mod thread_pool_scheduler;
#[cfg(feature = "futures-scheduler")]
pub use thread_pool_scheduler::ThreadPoolScheduler;

#[cfg(feature = "tokio-scheduler")]
mod tokio_scheduler;
#[cfg(feature = "tokio-scheduler")]
pub use tokio_scheduler::TokioScheduler;

mod pool_config;
pub use pool_config::PoolConfig;

/// A unit of work handed to a scheduler.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Shared handle to a scheduler, as stored by observables.
pub type SchedulerRef = Arc<dyn Scheduler>;

/// A Scheduler runs tasks off the calling thread.
///
/// `schedule` must not run `task` inline: observables call it while holding
/// their own locks. An `Err` means `task` will never run.
pub trait Scheduler: Send + Sync {
  fn schedule(&self, task: Task) -> Result<(), RxError>;
}

impl<S: Scheduler + ?Sized> Scheduler for Arc<S> {
  #[inline]
  fn schedule(&self, task: Task) -> Result<(), RxError> { (**self).schedule(task) }
}

static DEFAULT_SCHEDULER: Lazy<SchedulerRef> = Lazy::new(build_default);

/// The process-wide scheduler used by observables built without an explicit
/// one. Built on first use from [`PoolConfig::from_env`].
pub fn default_scheduler() -> SchedulerRef { DEFAULT_SCHEDULER.clone() }

/// Returns a Scheduler instance that creates a new thread for each unit of
/// work.
pub fn new_thread() -> NewThreadScheduler { NewThreadScheduler }

#[cfg(feature = "futures-scheduler")]
fn build_default() -> SchedulerRef {
  let pool = PoolConfig::from_env().and_then(|cfg| ThreadPoolScheduler::from_config(&cfg));
  match pool {
    Ok(pool) => Arc::new(pool),
    Err(err) => {
      tracing::warn!(%err, "default thread pool unavailable, spawning a thread per task");
      Arc::new(NewThreadScheduler)
    }
  }
}

#[cfg(not(feature = "futures-scheduler"))]
fn build_default() -> SchedulerRef { Arc::new(NewThreadScheduler) }
