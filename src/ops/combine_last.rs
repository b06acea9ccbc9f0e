use std::sync::{Arc, Mutex, Weak};

use crate::observable::in_flight::lock;
use crate::observable::{Broadcaster, Joinable, Observable};
use crate::observer::Observer;
use crate::ops::{Propagation, SourceRef, Upstream};
use crate::scheduler::default_scheduler;

/// Combines the latest value of every source.
///
/// Nothing is emitted until each source has produced at least one value.
/// From then on every new value from any source emits the full vector of
/// latest values, in source order.
///
/// An error from source `i` is emitted, when propagated, as a vector with the
/// error at position `i` and `None` everywhere else. Completion is emitted,
/// when propagated, once every source has completed.
pub struct CombinedLastObservable<Item, Err> {
  broadcaster: Broadcaster<Vec<Item>, Vec<Option<Err>>>,
  upstreams: Vec<Arc<dyn Joinable>>,
  // Upstreams only hold these weakly.
  proxies: Vec<Arc<SourceProxy<Item, Err>>>,
  state: Mutex<LastValues<Item>>,
  propagation: Propagation,
}

struct LastValues<Item> {
  last: Vec<Option<Item>>,
  completed: Vec<bool>,
  completion_fired: bool,
}

impl<Item: Clone> LastValues<Item> {
  fn combined(&self) -> Option<Vec<Item>> { self.last.iter().cloned().collect() }
}

/// Tags the events of one source with its index.
struct SourceProxy<Item, Err> {
  index: usize,
  parent: Weak<CombinedLastObservable<Item, Err>>,
}

impl<Item, Err> CombinedLastObservable<Item, Err>
where
  Item: Clone + Send + 'static,
  Err: Clone + Send + 'static,
{
  /// Builds the node and subscribes one proxy to each of `sources`. The node
  /// runs on the first source's scheduler.
  #[must_use]
  pub fn new(sources: Vec<SourceRef<Item, Err>>, propagation: Propagation) -> Arc<Self> {
    let count = sources.len();
    let scheduler = sources.first().map_or_else(default_scheduler, |s| s.scheduler());
    let node = Arc::new_cyclic(|parent: &Weak<Self>| Self {
      broadcaster: Broadcaster::with_scheduler(scheduler),
      upstreams: sources.iter().cloned().map(Upstream::into_joinable).collect(),
      proxies: (0..count)
        .map(|index| Arc::new(SourceProxy { index, parent: parent.clone() }))
        .collect(),
      state: Mutex::new(LastValues {
        last: vec![None; count],
        completed: vec![false; count],
        completion_fired: false,
      }),
      propagation,
    });
    for (source, proxy) in sources.iter().zip(&node.proxies) {
      source.attach(Arc::downgrade(proxy) as Weak<dyn Observer<Item, Err>>);
    }
    node
  }

  pub fn source_count(&self) -> usize { self.proxies.len() }

  fn set_last(&self, index: usize, value: Item) {
    let mut state = lock(&self.state);
    state.last[index] = Some(value);
    // Fired under the lock so emissions follow the order of updates.
    if let Some(combined) = state.combined() {
      self.broadcaster.fire_next(combined);
    }
  }

  fn source_error(&self, index: usize, err: Err) {
    if !self.propagation.errors {
      return;
    }
    let mut errors: Vec<Option<Err>> = (0..self.source_count()).map(|_| None).collect();
    errors[index] = Some(err);
    self.broadcaster.fire_error(errors);
  }

  fn source_complete(&self, index: usize) {
    let mut state = lock(&self.state);
    state.completed[index] = true;
    if self.propagation.complete
      && !state.completion_fired
      && state.completed.iter().all(|done| *done)
    {
      state.completion_fired = true;
      tracing::debug!(sources = self.source_count(), "all sources completed");
      self.broadcaster.fire_complete();
    }
  }
}

impl<Item, Err> Observable for CombinedLastObservable<Item, Err>
where
  Item: Clone + Send + 'static,
  Err: Clone + Send + 'static,
{
  type Item = Vec<Item>;
  type Err = Vec<Option<Err>>;

  #[inline]
  fn broadcaster(&self) -> &Broadcaster<Vec<Item>, Vec<Option<Err>>> { &self.broadcaster }

  #[inline]
  fn upstreams(&self) -> &[Arc<dyn Joinable>] { &self.upstreams }
}

impl<Item, Err> Observer<Item, Err> for SourceProxy<Item, Err>
where
  Item: Clone + Send + 'static,
  Err: Clone + Send + 'static,
{
  fn next(&self, value: Item) {
    if let Some(parent) = self.parent.upgrade() {
      parent.set_last(self.index, value);
    }
  }

  fn error(&self, err: Err) {
    if let Some(parent) = self.parent.upgrade() {
      parent.source_error(self.index, err);
    }
  }

  fn complete(&self) {
    if let Some(parent) = self.parent.upgrade() {
      parent.source_complete(self.index);
    }
  }
}
