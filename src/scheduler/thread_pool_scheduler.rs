use futures::executor::ThreadPool;
use futures::future;

use crate::error::RxError;
use crate::scheduler::{PoolConfig, Scheduler, Task};

/// Runs tasks on a `futures` thread pool.
///
/// Cloning is cheap: clones share the same pool.
#[derive(Clone, Debug)]
pub struct ThreadPoolScheduler {
  pool: ThreadPool,
}

impl ThreadPoolScheduler {
  /// A pool with one thread per CPU.
  pub fn new() -> Result<Self, RxError> { Self::from_config(&PoolConfig::default()) }

  pub fn from_config(config: &PoolConfig) -> Result<Self, RxError> {
    let mut builder = ThreadPool::builder();
    builder.name_prefix(config.name_prefix.clone());
    if let Some(size) = config.pool_size {
      builder.pool_size(size);
    }
    Ok(Self { pool: builder.create()? })
  }

  /// Wraps an existing pool, e.g. one shared with other futures code.
  pub fn from_pool(pool: ThreadPool) -> Self { Self { pool } }
}

impl Scheduler for ThreadPoolScheduler {
  fn schedule(&self, task: Task) -> Result<(), RxError> {
    self.pool.spawn_ok(future::lazy(move |_| task()));
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use std::sync::{
    atomic::{AtomicUsize, Ordering},
    mpsc::channel,
    Arc,
  };
  use std::time::Duration;

  use super::*;

  #[test]
  fn runs_every_task() {
    let pool = ThreadPoolScheduler::from_config(&PoolConfig::default().with_pool_size(2)).unwrap();
    let counter = Arc::new(AtomicUsize::new(0));
    let (tx, rx) = channel();
    for _ in 0..32 {
      let counter = counter.clone();
      let tx = tx.clone();
      pool.schedule(Box::new(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        tx.send(()).unwrap();
      }))
      .unwrap();
    }
    for _ in 0..32 {
      rx.recv_timeout(Duration::from_secs(5)).unwrap();
    }
    assert_eq!(counter.load(Ordering::SeqCst), 32);
  }

  #[test]
  fn threads_carry_the_prefix() {
    let pool =
      ThreadPoolScheduler::from_config(&PoolConfig::default().with_name_prefix("probe-")).unwrap();
    let (tx, rx) = channel();
    pool.schedule(Box::new(move || {
      let name = std::thread::current().name().map(str::to_owned);
      tx.send(name).unwrap();
    }))
    .unwrap();
    let name = rx.recv_timeout(Duration::from_secs(5)).unwrap().unwrap();
    assert!(name.starts_with("probe-"), "{name}");
  }
}
