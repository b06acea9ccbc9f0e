//! Subject: the externally driven entry point of a graph.

use std::sync::Arc;

use crate::observable::{Broadcaster, Observable};
use crate::observer::Observer;
use crate::scheduler::SchedulerRef;

/// An `Observable` _and_ an `Observer`. Every event it receives through
/// `next`, `error` or `complete` is passed on to its subscribers.
///
/// This is the "manual" observable: callers push events into it directly.
///
/// ```rust
/// use std::sync::Arc;
/// use std::time::Duration;
/// use rxfanout::prelude::*;
///
/// let subject = Subject::<i32, String>::new();
/// let observer = subject.subscribe(Arc::new(CollectingObserver::new()));
/// subject.next(1);
/// subject.next(2);
/// assert!(subject.join_all(Some(Duration::from_secs(1))));
/// assert_eq!(observer.events(), vec![1, 2]);
/// ```
pub struct Subject<Item, Err> {
  broadcaster: Broadcaster<Item, Err>,
}

impl<Item, Err> Subject<Item, Err>
where
  Item: Clone + Send + 'static,
  Err: Clone + Send + 'static,
{
  pub fn new() -> Arc<Self> { Arc::new(Self { broadcaster: Broadcaster::new() }) }

  /// A subject whose dispatch tasks, and those of everything derived from it,
  /// run on `scheduler`.
  pub fn with_scheduler(scheduler: SchedulerRef) -> Arc<Self> {
    Arc::new(Self { broadcaster: Broadcaster::with_scheduler(scheduler) })
  }
}

impl<Item, Err> Observable for Subject<Item, Err>
where
  Item: Clone + Send + 'static,
  Err: Clone + Send + 'static,
{
  type Item = Item;
  type Err = Err;

  #[inline]
  fn broadcaster(&self) -> &Broadcaster<Item, Err> { &self.broadcaster }
}

impl<Item, Err> Observer<Item, Err> for Subject<Item, Err>
where
  Item: Clone + Send + 'static,
  Err: Clone + Send + 'static,
{
  #[inline]
  fn next(&self, value: Item) { self.broadcaster.fire_next(value) }

  #[inline]
  fn error(&self, err: Err) { self.broadcaster.fire_error(err) }

  #[inline]
  fn complete(&self) { self.broadcaster.fire_complete() }
}

#[cfg(test)]
mod tests {
  use std::time::Duration;

  use super::*;
  use crate::observable::Joinable;
  use crate::observer::CollectingObserver;

  const TIMEOUT: Option<Duration> = Some(Duration::from_secs(1));

  #[test]
  fn forwards_everything_in_order() {
    let uut = Subject::<i32, &str>::new();
    let observer = uut.subscribe(Arc::new(CollectingObserver::new()));

    assert_eq!(observer.event_count(), 0);
    assert_eq!(observer.error_count(), 0);

    uut.next(1);
    uut.next(2);
    uut.next(3);
    assert!(uut.join_all(TIMEOUT));
    assert_eq!(observer.event_count(), 3);
    assert_eq!(observer.error_count(), 0);

    uut.next(4);
    uut.next(5);
    assert!(uut.join_all(TIMEOUT));
    assert_eq!(observer.event_count(), 5);

    uut.error("e");
    uut.error("f");
    uut.next(6);
    uut.error("g");
    uut.next(7);
    assert!(uut.join_all(TIMEOUT));
    assert_eq!(observer.events(), vec![1, 2, 3, 4, 5, 6, 7]);
    assert_eq!(observer.errors(), vec!["e", "f", "g"]);
    assert!(!observer.is_complete());

    uut.complete();
    assert!(uut.join_all(TIMEOUT));
    assert!(observer.is_complete());
  }

  #[test]
  fn fans_out_to_every_subscriber() {
    let uut = Subject::<i32, ()>::new();
    let observers: Vec<_> =
      (0..8).map(|_| uut.subscribe(Arc::new(CollectingObserver::new()))).collect();

    for v in 0..50 {
      uut.next(v);
    }
    assert!(uut.join_all(TIMEOUT));
    for observer in &observers {
      assert_eq!(observer.events(), (0..50).collect::<Vec<_>>());
    }
  }

  #[test]
  fn subject_can_observe_another_subject() {
    let upstream = Subject::<i32, ()>::new();
    let relay = upstream.subscribe(Subject::<i32, ()>::new());
    let observer = relay.subscribe(Arc::new(CollectingObserver::new()));

    upstream.next(1);
    assert!(upstream.join_all(TIMEOUT));
    assert!(relay.join_all(TIMEOUT));
    assert_eq!(observer.events(), vec![1]);
  }

  #[test]
  fn dropped_observer_stops_receiving() {
    let uut = Subject::<i32, ()>::new();
    let kept = uut.subscribe(Arc::new(CollectingObserver::new()));
    let dropped = uut.subscribe(Arc::new(CollectingObserver::<i32, ()>::new()));
    assert_eq!(uut.broadcaster().subscriber_count(), 2);

    drop(dropped);
    uut.next(1);
    assert!(uut.join_all(TIMEOUT));
    assert_eq!(uut.broadcaster().subscriber_count(), 1);
    assert_eq!(kept.events(), vec![1]);
  }
}
