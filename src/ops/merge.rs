use std::sync::Arc;

use crate::ops::{Derived, IntoSource, PassThrough, Propagation};

/// Transparent union of several sources.
///
/// The propagation flags apply to every source alike, and `join_all` drains
/// every source, in order, on one shared deadline before the node itself.
pub type MergedObservable<Item, Err> = Derived<Item, Err, PassThrough>;

/// Merges `primary` with every one of `others`.
#[must_use]
pub fn merge<Item, Err, I>(
  primary: impl IntoSource<Item, Err>,
  others: I,
  propagation: Propagation,
) -> Arc<MergedObservable<Item, Err>>
where
  Item: Clone + Send + 'static,
  Err: Clone + Send + 'static,
  I: IntoIterator,
  I::Item: IntoSource<Item, Err>,
{
  Derived::with_sources(
    primary.into_source(),
    others.into_iter().map(IntoSource::into_source).collect(),
    PassThrough,
    propagation,
  )
}

#[cfg(test)]
mod test {
  use std::collections::HashMap;
  use std::sync::Arc;
  use std::time::Duration;

  use crate::ops::{IntoSource, SourceRef};
  use crate::prelude::*;

  const TIMEOUT: Option<Duration> = Some(Duration::from_secs(1));

  #[derive(Clone, Debug, PartialEq, Eq, Hash)]
  enum Tok {
    Num(i32),
    Text(&'static str),
  }

  #[test]
  fn union_of_all_sources() {
    let s1 = Subject::<Tok, ()>::new();
    let s2 = Subject::<Tok, ()>::new();
    let s3 = Subject::<Tok, ()>::new();
    let uut = s1.merge([&s2, &s3]);
    let observer = uut.subscribe(Arc::new(CollectingObserver::new()));

    use Tok::*;
    s1.next(Num(1));
    s1.next(Num(2));
    s2.next(Text("a"));
    s3.next(Text("A"));
    s1.next(Num(3));
    s2.next(Text("a"));
    s2.next(Text("b"));
    s3.next(Text("B"));
    s2.next(Text("c"));
    s3.next(Text("C"));
    s1.next(Num(4));
    s2.next(Text("d"));
    s3.next(Text("D"));
    s3.next(Text("E"));
    s3.next(Text("F"));
    s2.next(Text("e"));

    assert!(uut.join_all(TIMEOUT));
    let events = observer.events();
    assert_eq!(events.len(), 16);

    let mut counts: HashMap<Tok, usize> = HashMap::new();
    for e in &events {
      *counts.entry(e.clone()).or_default() += 1;
    }
    assert_eq!(counts[&Text("a")], 2);
    for e in [Num(1), Num(2), Num(3), Num(4)] {
      assert_eq!(counts[&e], 1);
    }
    for t in ["b", "c", "d", "e", "A", "B", "C", "D", "E", "F"] {
      assert_eq!(counts[&Text(t)], 1);
    }
  }

  #[test]
  fn order_within_one_source_is_kept() {
    let odd = Subject::<i32, ()>::new();
    let even = Subject::<i32, ()>::new();
    let uut = odd.merge(Some(even.clone()));
    let observer = uut.subscribe(Arc::new(CollectingObserver::new()));

    for v in 0..100 {
      if v % 2 == 0 { even.next(v) } else { odd.next(v) }
    }
    assert!(uut.join_all(TIMEOUT));

    let events = observer.events();
    let evens: Vec<_> = events.iter().copied().filter(|v| v % 2 == 0).collect();
    let odds: Vec<_> = events.iter().copied().filter(|v| v % 2 != 0).collect();
    assert_eq!(evens, (0..100).step_by(2).collect::<Vec<_>>());
    assert_eq!(odds, (1..100).step_by(2).collect::<Vec<_>>());
  }

  #[test]
  fn merge_heterogeneous_sources() {
    let numbers = Subject::<i32, ()>::new();
    let doubled = numbers.map(|v| v * 2);
    let others: Vec<SourceRef<i32, ()>> =
      vec![doubled.clone().into_source(), numbers.filter(|v| *v > 1).into_source()];
    let uut = numbers.merge(others);
    let observer = uut.subscribe(Arc::new(CollectingObserver::new()));

    numbers.next(1);
    numbers.next(2);
    assert!(uut.join_all(TIMEOUT));

    let mut events = observer.events();
    events.sort_unstable();
    assert_eq!(events, vec![1, 2, 2, 2, 4]);
  }

  #[test]
  fn propagation_applies_to_every_source() {
    let s1 = Subject::<i32, &'static str>::new();
    let s2 = Subject::<i32, &'static str>::new();
    let uut = s1.merge([&s2]).with_propagate_errors(true);
    let observer = uut.subscribe(Arc::new(CollectingObserver::new()));

    s1.error("from s1");
    s2.error("from s2");
    s1.complete();
    assert!(uut.join_all(TIMEOUT));

    let mut errors = observer.errors();
    errors.sort_unstable();
    assert_eq!(errors, vec!["from s1", "from s2"]);
    assert!(!observer.is_complete());
  }
}
