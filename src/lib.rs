//! # rxfanout: thread-dispatched observables
//!
//! A small in-process Observer/Observable toolkit. Every event fired by a
//! node is delivered to each of its subscribers as a task on a scheduler, and
//! any node can be joined to wait, with a timeout, until everything it and its
//! upstreams dispatched has been handled.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use rxfanout::prelude::*;
//!
//! let numbers = Subject::<i32, String>::new();
//! let evens = numbers.filter(|v| v % 2 == 0).map(|v| v * 10);
//! let observer = evens.subscribe(Arc::new(CollectingObserver::new()));
//!
//! for v in 0..6 {
//!   numbers.next(v);
//! }
//! assert!(evens.join_all(Some(Duration::from_secs(1))));
//! assert_eq!(observer.events(), vec![0, 20, 40]);
//! ```
//!
//! ## Key Concepts
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Observer`] | Consumes `next`, `error`, and `complete` events |
//! | [`Observable`] | Holds subscribers and dispatches events to them |
//! | [`Subject`] | Both at once; the entry point that callers push into |
//! | [`Joinable`] | `join` / `join_all` drain barrier with a timeout |
//! | [`ObservableExt`] | `derive`, `map`, `filter`, `merge`, `combine_last` |
//! | [`Scheduler`] | Where dispatch tasks run |
//!
//! ## Feature Flags
//!
//! - **`futures-scheduler`** (default): the default scheduler is a
//!   `futures` thread pool, sized by `RXFANOUT_POOL_SIZE`
//! - **`tokio-scheduler`**: adds [`TokioScheduler`], running tasks on a
//!   tokio runtime's blocking pool
//!
//! [`Observer`]: observer::Observer
//! [`Observable`]: observable::Observable
//! [`Subject`]: subject::Subject
//! [`Joinable`]: observable::Joinable
//! [`ObservableExt`]: ops::ObservableExt
//! [`Scheduler`]: scheduler::Scheduler
//! [`TokioScheduler`]: scheduler

pub mod error;
pub mod observable;
pub mod observer;
pub mod ops;
pub mod prelude;
pub mod scheduler;
pub mod subject;

pub use prelude::*;

#[cfg(doctest)]
mod readme {
  #![doc = include_str!("../README.md")]
}
