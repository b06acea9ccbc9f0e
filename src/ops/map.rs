use crate::ops::{Derived, Operator};

/// Applies a transform to every value before it is re-fired.
#[derive(Clone, Copy)]
pub struct MapOp<F>(pub F);

impl<In, Out, F> Operator<In> for MapOp<F>
where
  F: Fn(In) -> Out + Send + Sync,
{
  type Out = Out;

  #[inline]
  fn apply(&self, value: In) -> Option<Out> { Some((self.0)(value)) }
}

/// Observable of `f(x)` for every upstream value `x`.
pub type MappedObservable<In, Err, F> = Derived<In, Err, MapOp<F>>;

#[cfg(test)]
mod test {
  use std::sync::Arc;
  use std::time::Duration;

  use bencher::{benchmark_group, Bencher};

  use crate::prelude::*;

  const TIMEOUT: Option<Duration> = Some(Duration::from_secs(1));

  #[test]
  fn doubles_every_value() {
    let subj = Subject::<i32, &'static str>::new();
    let uut = subj.map(|x| 2 * x);
    let observer = uut.subscribe(Arc::new(CollectingObserver::new()));

    for v in 0..5 {
      subj.next(v);
    }
    assert!(uut.join_all(TIMEOUT));
    assert_eq!(observer.events(), vec![0, 2, 4, 6, 8]);
    assert!(!observer.is_complete());

    subj.error("e");
    subj.error("f");
    assert!(uut.join_all(TIMEOUT));
    // errors are not propagated by default
    assert_eq!(observer.error_count(), 0);

    subj.complete();
    assert!(uut.join_all(TIMEOUT));
    assert!(!observer.is_complete());
  }

  #[test]
  fn map_types_mixed() {
    let subj = Subject::<char, ()>::new();
    let uut = subj.map(|c: char| c.to_string().repeat(2));
    let observer = uut.subscribe(Arc::new(CollectingObserver::new()));

    subj.next('a');
    subj.next('b');
    assert!(uut.join_all(TIMEOUT));
    assert_eq!(observer.events(), vec!["aa".to_owned(), "bb".to_owned()]);
  }

  #[test]
  fn chained_maps_drain_through_every_level() {
    let subj = Subject::<i64, ()>::new();
    let uut = subj.map(|x| x + 1).map(|x| x * 10).map(|x| x - 1);
    let observer = uut.subscribe(Arc::new(CollectingObserver::new()));

    for v in 0..100 {
      subj.next(v);
    }
    assert!(uut.join_all(TIMEOUT));
    assert_eq!(observer.events(), (0..100).map(|x| (x + 1) * 10 - 1).collect::<Vec<_>>());
  }

  #[test]
  fn propagation_can_be_enabled() {
    let subj = Subject::<i32, &'static str>::new();
    let uut = subj.map(|x| x + 1).with_propagate_errors(true).with_propagate_complete(true);
    let observer = uut.subscribe(Arc::new(CollectingObserver::new()));

    subj.next(1);
    subj.error("e");
    subj.complete();
    assert!(uut.join_all(TIMEOUT));
    assert_eq!(observer.events(), vec![2]);
    assert_eq!(observer.errors(), vec!["e"]);
    assert!(observer.is_complete());
  }

  #[test]
  fn benchmark() { do_bench(); }

  benchmark_group!(do_bench, bench);

  fn bench(b: &mut Bencher) { b.iter(chained_maps_drain_through_every_level); }
}
