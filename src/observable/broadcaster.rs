use std::sync::{Mutex, Weak};
use std::time::Instant;

use super::in_flight::{lock, InFlight};
use super::subscribers::{Event, Subscribers};
use crate::observer::Observer;
use crate::scheduler::{default_scheduler, SchedulerRef};

/// Per-node dispatch core: subscribers, in-flight tasks and the scheduler
/// that runs them.
///
/// Each `fire_*` call schedules one dispatch task per live subscriber and
/// tracks it until a join reclaims it. The subscriber set and the in-flight
/// set are private to this broadcaster and each sit behind their own lock.
pub struct Broadcaster<Item, Err> {
  subscribers: Mutex<Subscribers<Item, Err>>,
  in_flight: InFlight,
  scheduler: SchedulerRef,
}

impl<Item, Err> Default for Broadcaster<Item, Err>
where
  Item: Clone + Send + 'static,
  Err: Clone + Send + 'static,
{
  fn default() -> Self { Self::new() }
}

impl<Item, Err> Broadcaster<Item, Err>
where
  Item: Clone + Send + 'static,
  Err: Clone + Send + 'static,
{
  /// A broadcaster on the process-wide default scheduler.
  pub fn new() -> Self { Self::with_scheduler(default_scheduler()) }

  pub fn with_scheduler(scheduler: SchedulerRef) -> Self {
    Self {
      subscribers: Mutex::new(Subscribers::default()),
      in_flight: InFlight::default(),
      scheduler,
    }
  }

  pub fn scheduler(&self) -> &SchedulerRef { &self.scheduler }

  pub fn subscribe_weak(&self, observer: Weak<dyn Observer<Item, Err>>) {
    lock(&self.subscribers).add(observer);
  }

  /// Number of subscribers whose observer is still alive.
  pub fn subscriber_count(&self) -> usize {
    let mut subscribers = lock(&self.subscribers);
    subscribers.prune();
    subscribers.len()
  }

  /// Number of dispatch tasks scheduled by this node that have not finished.
  pub fn in_flight(&self) -> usize { self.in_flight.purge() }

  pub fn fire_next(&self, value: Item) { self.fire(Event::Next(value)) }

  pub fn fire_error(&self, err: Err) { self.fire(Event::Error(err)) }

  pub fn fire_complete(&self) { self.fire(Event::Complete) }

  fn fire(&self, event: Event<Item, Err>) {
    let mut scheduled = 0usize;
    lock(&self.subscribers).broadcast(event, &*self.scheduler, |handle| {
      scheduled += 1;
      self.in_flight.track(handle);
    });
    tracing::trace!(scheduled, "dispatch scheduled");
  }

  /// Waits until `deadline` for this node's own tasks. Returns true iff
  /// nothing is left in flight.
  pub fn join_until(&self, deadline: Option<Instant>) -> bool {
    let drained = self.in_flight.join_until(deadline);
    if !drained {
      tracing::debug!(remaining = self.in_flight.purge(), "join gave up with tasks in flight");
    }
    drained
  }
}
