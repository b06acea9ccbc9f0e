//! Observable trait and the drain barrier.
//!
//! Every node of a graph owns a [`Broadcaster`], which keeps its subscribers
//! and the dispatch tasks it has scheduled. [`Observable`] exposes it together
//! with the node's upstreams, and the blanket [`Joinable`] impl turns that
//! into `join` / `join_all`.

use std::any::{type_name, Any};
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};

use crate::error::RxError;
use crate::observer::{Observer, ObserverRef};

mod broadcaster;
pub(crate) mod in_flight;
mod subscribers;

pub use broadcaster::Broadcaster;
pub use in_flight::TaskHandle;

/// A node that can be subscribed to and dispatches events to subscribers.
///
/// Subscriptions do not keep observers alive: the caller holds on to the
/// `Arc` returned by [`subscribe`](Observable::subscribe). Once the last
/// strong reference is dropped the observer stops receiving events and its
/// entry is pruned on the next dispatch.
pub trait Observable: Send + Sync {
  type Item: Clone + Send + 'static;
  type Err: Clone + Send + 'static;

  fn broadcaster(&self) -> &Broadcaster<Self::Item, Self::Err>;

  /// Nodes that `join_all` drains, in order, before this one.
  fn upstreams(&self) -> &[Arc<dyn Joinable>] { &[] }

  /// Registers `observer` and hands it back for chaining.
  #[must_use = "the subscription ends when the returned observer is dropped"]
  fn subscribe<O>(&self, observer: Arc<O>) -> Arc<O>
  where
    O: Observer<Self::Item, Self::Err> + 'static,
  {
    let weak: Weak<dyn Observer<Self::Item, Self::Err>> = Arc::downgrade(&observer) as _;
    self.broadcaster().subscribe_weak(weak);
    observer
  }

  /// Registers `observer` and returns `self`, for building chains fluently.
  fn with_subscriber<O>(&self, observer: &Arc<O>) -> &Self
  where
    O: Observer<Self::Item, Self::Err> + 'static,
    Self: Sized,
  {
    let weak: Weak<dyn Observer<Self::Item, Self::Err>> = Arc::downgrade(observer) as _;
    self.broadcaster().subscribe_weak(weak);
    self
  }

  /// Subscribes an already type-erased observer.
  fn subscribe_ref(&self, observer: &ObserverRef<Self::Item, Self::Err>) {
    self.broadcaster().subscribe_weak(Arc::downgrade(observer));
  }

  /// Subscribes a value whose type is only known at runtime.
  ///
  /// Fails with [`RxError::TypeCheck`] unless `candidate` holds an
  /// [`ObserverRef`] for this observable's item and error types.
  fn subscribe_any(
    &self,
    candidate: Box<dyn Any + Send>,
  ) -> Result<ObserverRef<Self::Item, Self::Err>, RxError> {
    let observer = candidate
      .downcast::<ObserverRef<Self::Item, Self::Err>>()
      .map_err(|_| RxError::TypeCheck {
        expected: type_name::<ObserverRef<Self::Item, Self::Err>>(),
      })?;
    self.subscribe_ref(&observer);
    Ok(*observer)
  }
}

/// Drain barrier over a node and, transitively, its upstreams.
///
/// Timeouts are turned into one absolute deadline at the entry point and that
/// deadline is threaded through the whole recursion, so every level spends
/// from the same clock. `None` waits indefinitely. A deadline that has
/// already passed turns each wait into a non-blocking check.
///
/// Nothing is cancelled when a deadline passes: unfinished tasks keep running
/// and stay tracked for a later join.
pub trait Joinable: Send + Sync {
  /// Waits for this node's own in-flight dispatch tasks.
  fn join_until(&self, deadline: Option<Instant>) -> bool;

  /// Drains every upstream first, short-circuiting on the first one that does
  /// not finish in time, then this node.
  fn join_all_until(&self, deadline: Option<Instant>) -> bool;

  fn join(&self, timeout: Option<Duration>) -> bool { self.join_until(deadline_after(timeout)) }

  fn join_all(&self, timeout: Option<Duration>) -> bool {
    self.join_all_until(deadline_after(timeout))
  }
}

impl<T: Observable> Joinable for T {
  fn join_until(&self, deadline: Option<Instant>) -> bool { self.broadcaster().join_until(deadline) }

  fn join_all_until(&self, deadline: Option<Instant>) -> bool {
    self.upstreams().iter().all(|upstream| upstream.join_all_until(deadline))
      && self.join_until(deadline)
  }
}

/// Absolute deadline for a relative timeout. Timeouts too large to represent
/// count as unbounded.
pub fn deadline_after(timeout: Option<Duration>) -> Option<Instant> {
  timeout.and_then(|t| Instant::now().checked_add(t))
}
