use std::any::Any;
use std::collections::VecDeque;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, Weak};

use super::in_flight::{lock, TaskHandle};
use crate::observer::Observer;
use crate::scheduler::Scheduler;

pub(crate) enum Event<Item, Err> {
  Next(Item),
  Error(Err),
  Complete,
}

/// Subscribers of one observable, in subscription order.
///
/// Every subscriber owns a serial delivery queue: events reach one observer in
/// the order they were fired, while separate observers drain in parallel.
pub(crate) struct Subscribers<Item, Err> {
  queues: Vec<Arc<SerialQueue<Item, Err>>>,
}

impl<Item, Err> Default for Subscribers<Item, Err> {
  fn default() -> Self { Self { queues: Vec::new() } }
}

impl<Item, Err> Subscribers<Item, Err>
where
  Item: Send + 'static,
  Err: Send + 'static,
{
  pub(crate) fn add(&mut self, observer: Weak<dyn Observer<Item, Err>>) {
    self.queues.push(Arc::new(SerialQueue::new(observer)));
  }

  pub(crate) fn len(&self) -> usize { self.queues.len() }

  /// Forgets subscribers whose observer has been dropped.
  pub(crate) fn prune(&mut self) { self.queues.retain(|q| q.observer.strong_count() > 0); }

  /// Queues `event` for every subscriber, cloning for all but the last one.
  ///
  /// `spawned` is called once per queued delivery with its completion handle.
  pub(crate) fn broadcast(
    &mut self,
    event: Event<Item, Err>,
    scheduler: &dyn Scheduler,
    mut spawned: impl FnMut(TaskHandle),
  ) where
    Item: Clone,
    Err: Clone,
  {
    self.prune();
    let mut iter = self.queues.iter().peekable();
    while let Some(queue) = iter.next() {
      let handle = TaskHandle::default();
      spawned(handle.clone());
      if iter.peek().is_some() {
        queue.push(event.clone(), handle, scheduler);
      } else {
        queue.push(event, handle, scheduler);
        break;
      }
    }
  }
}

impl<Item: Clone, Err: Clone> Clone for Event<Item, Err> {
  fn clone(&self) -> Self {
    match self {
      Event::Next(v) => Event::Next(v.clone()),
      Event::Error(e) => Event::Error(e.clone()),
      Event::Complete => Event::Complete,
    }
  }
}

struct SerialQueue<Item, Err> {
  observer: Weak<dyn Observer<Item, Err>>,
  state: Mutex<QueueState<Item, Err>>,
}

struct QueueState<Item, Err> {
  pending: VecDeque<(Event<Item, Err>, TaskHandle)>,
  draining: bool,
}

impl<Item, Err> SerialQueue<Item, Err>
where
  Item: Send + 'static,
  Err: Send + 'static,
{
  fn new(observer: Weak<dyn Observer<Item, Err>>) -> Self {
    Self {
      observer,
      state: Mutex::new(QueueState { pending: VecDeque::new(), draining: false }),
    }
  }

  fn push(self: &Arc<Self>, event: Event<Item, Err>, handle: TaskHandle, scheduler: &dyn Scheduler) {
    let mut state = lock(&self.state);
    state.pending.push_back((event, handle));
    if state.draining {
      return;
    }
    let queue = self.clone();
    match scheduler.schedule(Box::new(move || queue.drain())) {
      Ok(()) => state.draining = true,
      Err(err) => {
        // Nothing will drain these; release their joins and stay re-armable.
        let dropped = state.pending.len();
        for (_, handle) in state.pending.drain(..) {
          handle.finish();
        }
        tracing::error!(%err, dropped, "dispatch task not scheduled, events dropped");
      }
    }
  }

  fn drain(&self) {
    loop {
      let (event, handle) = {
        let mut state = lock(&self.state);
        match state.pending.pop_front() {
          Some(job) => job,
          None => {
            state.draining = false;
            return;
          }
        }
      };
      self.deliver(event);
      handle.finish();
      tracing::trace!("dispatch task finished");
    }
  }

  fn deliver(&self, event: Event<Item, Err>) {
    // A dropped observer means the subscription is gone; the event is void.
    let Some(observer) = self.observer.upgrade() else { return };
    let outcome = catch_unwind(AssertUnwindSafe(|| match event {
      Event::Next(v) => observer.next(v),
      Event::Error(e) => observer.error(e),
      Event::Complete => observer.complete(),
    }));
    if let Err(payload) = outcome {
      tracing::error!(panic = panic_message(payload.as_ref()), "observer panicked during dispatch");
    }
  }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
  if let Some(msg) = payload.downcast_ref::<&'static str>() {
    msg
  } else if let Some(msg) = payload.downcast_ref::<String>() {
    msg.as_str()
  } else {
    "<non-string panic payload>"
  }
}
