use std::marker::PhantomData;
use std::sync::{
  atomic::{AtomicBool, Ordering},
  Arc, Weak,
};

use crate::observable::{Broadcaster, Joinable, Observable};
use crate::observer::Observer;
use crate::ops::{IntoSource, Propagation, SourceRef, Upstream};

/// Per-value step of a derived node: `None` drops the value.
pub trait Operator<In>: Send + Sync {
  type Out;

  fn apply(&self, value: In) -> Option<Self::Out>;
}

/// Forwards every value unchanged.
#[derive(Clone, Copy, Debug, Default)]
pub struct PassThrough;

impl<In> Operator<In> for PassThrough {
  type Out = In;

  #[inline]
  fn apply(&self, value: In) -> Option<In> { Some(value) }
}

/// An observable that is also an observer of one or more upstreams.
///
/// Values go through `Op` and are re-fired downstream. Upstream `error` and
/// `complete` events are re-fired only when the matching propagation flag is
/// set; both flags can be flipped at any time.
pub struct Derived<In, Err, Op>
where
  Op: Operator<In>,
{
  broadcaster: Broadcaster<Op::Out, Err>,
  upstreams: Vec<Arc<dyn Joinable>>,
  propagate_errors: AtomicBool,
  propagate_complete: AtomicBool,
  op: Op,
  _in: PhantomData<fn(In)>,
}

/// Pass-through node: forwards values, and errors/completion as configured.
pub type DerivedObservable<Item, Err> = Derived<Item, Err, PassThrough>;

impl<In, Err, Op> Derived<In, Err, Op>
where
  In: Clone + Send + 'static,
  Err: Clone + Send + 'static,
  Op: Operator<In> + 'static,
  Op::Out: Clone + Send + 'static,
{
  /// Builds the node and subscribes it to `source`.
  #[must_use]
  pub fn new(source: impl IntoSource<In, Err>, op: Op, propagation: Propagation) -> Arc<Self> {
    Self::with_sources(source.into_source(), Vec::new(), op, propagation)
  }

  /// Builds the node and subscribes it to `primary` and every one of
  /// `others`. The node runs on the primary's scheduler, and `join_all`
  /// drains the sources in this order.
  #[must_use]
  pub fn with_sources(
    primary: SourceRef<In, Err>,
    others: Vec<SourceRef<In, Err>>,
    op: Op,
    propagation: Propagation,
  ) -> Arc<Self> {
    let sources: Vec<SourceRef<In, Err>> = std::iter::once(primary).chain(others).collect();
    let node = Arc::new(Self {
      broadcaster: Broadcaster::with_scheduler(sources[0].scheduler()),
      upstreams: sources.iter().cloned().map(Upstream::into_joinable).collect(),
      propagate_errors: AtomicBool::new(propagation.errors),
      propagate_complete: AtomicBool::new(propagation.complete),
      op,
      _in: PhantomData,
    });
    let weak: Weak<dyn Observer<In, Err>> = Arc::downgrade(&node) as _;
    for source in &sources {
      source.attach(weak.clone());
    }
    node
  }

  pub fn with_propagate_errors(self: Arc<Self>, on: bool) -> Arc<Self> {
    self.set_propagate_errors(on);
    self
  }

  pub fn with_propagate_complete(self: Arc<Self>, on: bool) -> Arc<Self> {
    self.set_propagate_complete(on);
    self
  }

  pub fn set_propagate_errors(&self, on: bool) { self.propagate_errors.store(on, Ordering::Release); }

  pub fn set_propagate_complete(&self, on: bool) {
    self.propagate_complete.store(on, Ordering::Release);
  }

  pub fn propagates_errors(&self) -> bool { self.propagate_errors.load(Ordering::Acquire) }

  pub fn propagates_complete(&self) -> bool { self.propagate_complete.load(Ordering::Acquire) }
}

impl<In, Err, Op> Observable for Derived<In, Err, Op>
where
  In: Clone + Send + 'static,
  Err: Clone + Send + 'static,
  Op: Operator<In> + 'static,
  Op::Out: Clone + Send + 'static,
{
  type Item = Op::Out;
  type Err = Err;

  #[inline]
  fn broadcaster(&self) -> &Broadcaster<Op::Out, Err> { &self.broadcaster }

  #[inline]
  fn upstreams(&self) -> &[Arc<dyn Joinable>] { &self.upstreams }
}

impl<In, Err, Op> Observer<In, Err> for Derived<In, Err, Op>
where
  In: Clone + Send + 'static,
  Err: Clone + Send + 'static,
  Op: Operator<In> + 'static,
  Op::Out: Clone + Send + 'static,
{
  fn next(&self, value: In) {
    if let Some(value) = self.op.apply(value) {
      self.broadcaster.fire_next(value);
    }
  }

  fn error(&self, err: Err) {
    if self.propagates_errors() {
      self.broadcaster.fire_error(err);
    }
  }

  fn complete(&self) {
    if self.propagates_complete() {
      self.broadcaster.fire_complete();
    }
  }
}
