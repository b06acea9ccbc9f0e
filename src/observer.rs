//! Observer trait and implementations
//!
//! The Observer trait defines the consumer of data in the reactive pattern.
//! It provides three methods: next (for values), error (for errors), and
//! complete (for stream completion).
//!
//! Observers are shared between the caller and every observable they are
//! subscribed to, and may be called from several dispatch threads at once, so
//! all methods take `&self` and implementations synchronise their own state.

use std::fmt::Display;
use std::io::Write;
use std::sync::{
  atomic::{AtomicBool, Ordering},
  Arc, Mutex,
};

use crate::observable::in_flight::lock;

// ============================================================================
// Observer Trait
// ============================================================================

/// Observer trait: The consumer of data in reactive programming
///
/// Every method defaults to doing nothing, so an implementation only spells
/// out the events it cares about. Handlers must not rely on the dispatching
/// observable to report their failures: a panic is contained to the dispatch
/// task that delivered the event.
pub trait Observer<Item, Err>: Send + Sync {
  /// Receive the next value from the observable
  fn next(&self, value: Item) { let _ = value; }

  /// Receive an in-band error. Errors are data: more values may follow.
  fn error(&self, err: Err) { let _ = err; }

  /// Handle completion of the observable
  fn complete(&self) {}
}

/// Type-erased observer as stored by callers that mix observer types.
pub type ObserverRef<Item, Err> = Arc<dyn Observer<Item, Err>>;

impl<Item, Err, O> Observer<Item, Err> for Arc<O>
where
  O: Observer<Item, Err> + ?Sized,
{
  #[inline]
  fn next(&self, value: Item) { (**self).next(value) }

  #[inline]
  fn error(&self, err: Err) { (**self).error(err) }

  #[inline]
  fn complete(&self) { (**self).complete() }
}

// ============================================================================
// Provided observers
// ============================================================================

/// Ignores every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl<Item, Err> Observer<Item, Err> for NoopObserver {}

/// Writes values and completion to stdout, errors to stderr.
#[derive(Clone, Copy, Debug, Default)]
pub struct PrintingObserver;

impl<Item: Display, Err: Display> Observer<Item, Err> for PrintingObserver {
  fn next(&self, value: Item) { println!("{value}"); }

  fn error(&self, err: Err) { eprintln!("{err}"); }

  fn complete(&self) {
    print!("Complete");
    let _ = std::io::stdout().flush();
  }
}

/// Records everything it receives, in arrival order.
#[derive(Debug)]
pub struct CollectingObserver<Item, Err> {
  events: Mutex<Vec<Item>>,
  errors: Mutex<Vec<Err>>,
  complete: AtomicBool,
}

impl<Item, Err> Default for CollectingObserver<Item, Err> {
  fn default() -> Self {
    Self {
      events: Mutex::new(Vec::new()),
      errors: Mutex::new(Vec::new()),
      complete: AtomicBool::new(false),
    }
  }
}

impl<Item, Err> CollectingObserver<Item, Err> {
  pub fn new() -> Self { Self::default() }

  pub fn events(&self) -> Vec<Item>
  where
    Item: Clone,
  {
    lock(&self.events).clone()
  }

  pub fn errors(&self) -> Vec<Err>
  where
    Err: Clone,
  {
    lock(&self.errors).clone()
  }

  pub fn event_count(&self) -> usize { lock(&self.events).len() }

  pub fn error_count(&self) -> usize { lock(&self.errors).len() }

  pub fn is_complete(&self) -> bool { self.complete.load(Ordering::Acquire) }
}

impl<Item: Send, Err: Send> Observer<Item, Err> for CollectingObserver<Item, Err> {
  fn next(&self, value: Item) { lock(&self.events).push(value); }

  fn error(&self, err: Err) { lock(&self.errors).push(err); }

  fn complete(&self) { self.complete.store(true, Ordering::Release); }
}

/// Closure adapter: the closure becomes the `next` handler, while `error`
/// and `complete` are ignored.
#[derive(Clone)]
pub struct FnObserver<F>(pub F);

impl<F, Item, Err> Observer<Item, Err> for FnObserver<F>
where
  F: Fn(Item) + Send + Sync,
{
  #[inline]
  fn next(&self, value: Item) { (self.0)(value) }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
  use std::sync::atomic::AtomicI32;

  use super::*;

  struct CompleteOnly(AtomicBool);

  impl Observer<i32, ()> for CompleteOnly {
    fn complete(&self) { self.0.store(true, Ordering::SeqCst); }
  }

  #[test]
  fn partial_override_keeps_defaults() {
    let obs = CompleteOnly(AtomicBool::new(false));
    obs.next(1);
    obs.error(());
    assert!(!obs.0.load(Ordering::SeqCst));
    obs.complete();
    assert!(obs.0.load(Ordering::SeqCst));
  }

  #[test]
  fn collecting_observer_records_in_order() {
    let obs = CollectingObserver::<i32, &str>::new();
    obs.next(1);
    obs.error("e");
    obs.next(2);
    obs.error("f");
    assert_eq!(obs.events(), vec![1, 2]);
    assert_eq!(obs.errors(), vec!["e", "f"]);
    assert!(!obs.is_complete());
    obs.complete();
    assert!(obs.is_complete());
  }

  #[test]
  fn closure_as_observer() {
    let total = Arc::new(AtomicI32::new(0));
    let c_total = total.clone();
    let obs = FnObserver(move |v: i32| {
      c_total.fetch_add(v, Ordering::SeqCst);
    });
    Observer::<i32, ()>::next(&obs, 10);
    Observer::<i32, ()>::next(&obs, 20);
    assert_eq!(total.load(Ordering::SeqCst), 30);
  }

  #[test]
  fn arc_forwards_to_inner() {
    let obs: ObserverRef<i32, ()> = Arc::new(CollectingObserver::<i32, ()>::new());
    obs.next(5);
    obs.complete();
    let shared = Arc::new(CollectingObserver::<i32, ()>::new());
    let via_arc = shared.clone();
    Observer::next(&via_arc, 3);
    assert_eq!(shared.events(), vec![3]);
  }
}
