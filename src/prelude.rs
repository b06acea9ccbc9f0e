//! Prelude module for convenient imports
//!
//! This module re-exports commonly used types and traits for easy access.

// Errors
pub use crate::error::RxError;
// Core traits
pub use crate::observable::{deadline_after, Broadcaster, Joinable, Observable, TaskHandle};
// Observers
pub use crate::observer::{
  CollectingObserver, FnObserver, NoopObserver, Observer, ObserverRef, PrintingObserver,
};
// Operators
pub use crate::ops::{
  merge::merge, CombinedLastObservable, Derived, DerivedObservable, FilteredObservable,
  IntoSource, MappedObservable, MergedObservable, ObservableExt, Propagation, SourceRef,
};
// Schedulers
#[cfg(feature = "futures-scheduler")]
pub use crate::scheduler::ThreadPoolScheduler;
#[cfg(feature = "tokio-scheduler")]
pub use crate::scheduler::TokioScheduler;
pub use crate::scheduler::{
  default_scheduler, new_thread, NewThreadScheduler, PoolConfig, Scheduler, SchedulerRef,
};
// Subject
pub use crate::subject::Subject;
