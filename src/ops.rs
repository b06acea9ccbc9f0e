//! Combinators deriving new observables from existing ones.
//!
//! Every derived node subscribes itself to its upstream(s) when it is built
//! and keeps them alive, so `join_all` on the node can drain them first.
//! Upstreams do not keep derived nodes alive: hold on to the returned `Arc`
//! for as long as events are expected.

use std::sync::{Arc, Weak};

use crate::error::RxError;
use crate::observable::{Joinable, Observable};
use crate::observer::Observer;
use crate::scheduler::SchedulerRef;

pub mod combine_last;
pub mod derived;
pub mod filter;
pub mod map;
pub mod merge;

pub use combine_last::CombinedLastObservable;
pub use derived::{Derived, DerivedObservable, Operator, PassThrough};
pub use filter::{FilterOp, FilteredObservable};
pub use map::{MapOp, MappedObservable};
pub use merge::MergedObservable;

// ============================================================================
// Propagation options
// ============================================================================

/// Whether a derived node re-fires upstream `error` and `complete` events.
/// Both default to off; `next` always flows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Propagation {
  pub errors: bool,
  pub complete: bool,
}

impl Propagation {
  pub const ERRORS_KEY: &'static str = "propagate_errors";
  pub const COMPLETE_KEY: &'static str = "propagate_complete";

  pub fn all() -> Self { Self { errors: true, complete: true } }

  pub fn with_errors(mut self, on: bool) -> Self {
    self.errors = on;
    self
  }

  pub fn with_complete(mut self, on: bool) -> Self {
    self.complete = on;
    self
  }

  /// Builds options from `propagate_errors` / `propagate_complete` pairs,
  /// e.g. when they come from a config file.
  ///
  /// Any other key is rejected; the error lists all of them.
  pub fn from_pairs<K: AsRef<str>>(
    pairs: impl IntoIterator<Item = (K, bool)>,
  ) -> Result<Self, RxError> {
    let mut options = Self::default();
    let mut unsupported = Vec::new();
    for (key, on) in pairs {
      match key.as_ref() {
        Self::ERRORS_KEY => options.errors = on,
        Self::COMPLETE_KEY => options.complete = on,
        other => unsupported.push(other.to_owned()),
      }
    }
    if unsupported.is_empty() { Ok(options) } else { Err(RxError::UnsupportedOptions(unsupported)) }
  }
}

// ============================================================================
// Type-erased upstreams
// ============================================================================

/// What a derived node needs from an upstream: somewhere to attach itself,
/// the scheduler to inherit, and a handle for `join_all`.
pub trait Upstream<Item, Err>: Joinable {
  fn attach(&self, observer: Weak<dyn Observer<Item, Err>>);

  fn scheduler(&self) -> SchedulerRef;

  fn into_joinable(self: Arc<Self>) -> Arc<dyn Joinable>;
}

impl<T: Observable + 'static> Upstream<T::Item, T::Err> for T {
  #[inline]
  fn attach(&self, observer: Weak<dyn Observer<T::Item, T::Err>>) {
    self.broadcaster().subscribe_weak(observer)
  }

  #[inline]
  fn scheduler(&self) -> SchedulerRef { self.broadcaster().scheduler().clone() }

  #[inline]
  fn into_joinable(self: Arc<Self>) -> Arc<dyn Joinable> { self }
}

/// An upstream of any concrete node type.
pub type SourceRef<Item, Err> = Arc<dyn Upstream<Item, Err>>;

/// Anything usable as a combinator source.
pub trait IntoSource<Item, Err> {
  fn into_source(self) -> SourceRef<Item, Err>;
}

impl<S: Observable + 'static> IntoSource<S::Item, S::Err> for Arc<S> {
  #[inline]
  fn into_source(self) -> SourceRef<S::Item, S::Err> { self }
}

impl<S: Observable + 'static> IntoSource<S::Item, S::Err> for &Arc<S> {
  #[inline]
  fn into_source(self) -> SourceRef<S::Item, S::Err> { self.clone() }
}

impl<Item, Err> IntoSource<Item, Err> for SourceRef<Item, Err> {
  #[inline]
  fn into_source(self) -> SourceRef<Item, Err> { self }
}

// ============================================================================
// Factory methods
// ============================================================================

/// Combinator factories available on every observable held in an `Arc`.
pub trait ObservableExt: Observable + Sized + 'static {
  /// A pass-through node with the given propagation of `error`/`complete`.
  #[must_use = "upstreams hold derived nodes weakly"]
  fn derive(self: &Arc<Self>, propagation: Propagation) -> Arc<DerivedObservable<Self::Item, Self::Err>> {
    Derived::new(self, PassThrough, propagation)
  }

  /// Creates a new stream which calls a closure on each element and uses
  /// its return as the value.
  #[must_use = "upstreams hold derived nodes weakly"]
  fn map<B, F>(self: &Arc<Self>, f: F) -> Arc<MappedObservable<Self::Item, Self::Err, F>>
  where
    F: Fn(Self::Item) -> B + Send + Sync + 'static,
    B: Clone + Send + 'static,
  {
    Derived::new(self, MapOp(f), Propagation::default())
  }

  /// Forwards only the values for which `predicate` returns true.
  #[must_use = "upstreams hold derived nodes weakly"]
  fn filter<F>(self: &Arc<Self>, predicate: F) -> Arc<FilteredObservable<Self::Item, Self::Err, F>>
  where
    F: Fn(&Self::Item) -> bool + Send + Sync + 'static,
  {
    Derived::new(self, FilterOp(predicate), Propagation::default())
  }

  /// Interleaves this observable with `others`.
  #[must_use = "upstreams hold derived nodes weakly"]
  fn merge<I>(self: &Arc<Self>, others: I) -> Arc<MergedObservable<Self::Item, Self::Err>>
  where
    I: IntoIterator,
    I::Item: IntoSource<Self::Item, Self::Err>,
  {
    merge::merge(self, others, Propagation::default())
  }

  /// Combines the latest value of this observable and every one of `others`.
  #[must_use = "upstreams hold derived nodes weakly"]
  fn combine_last<I>(
    self: &Arc<Self>,
    others: I,
    propagation: Propagation,
  ) -> Arc<CombinedLastObservable<Self::Item, Self::Err>>
  where
    I: IntoIterator,
    I::Item: IntoSource<Self::Item, Self::Err>,
  {
    let sources = std::iter::once(self.into_source())
      .chain(others.into_iter().map(IntoSource::into_source))
      .collect();
    CombinedLastObservable::new(sources, propagation)
  }
}

impl<T: Observable + 'static> ObservableExt for T {}
