use crate::ops::{Derived, Operator};

/// Emit only those items from an Observable that pass a predicate test
#[derive(Clone, Copy)]
pub struct FilterOp<F>(pub F);

impl<Item, F> Operator<Item> for FilterOp<F>
where
  F: Fn(&Item) -> bool + Send + Sync,
{
  type Out = Item;

  #[inline]
  fn apply(&self, value: Item) -> Option<Item> { (self.0)(&value).then_some(value) }
}

pub type FilteredObservable<Item, Err, F> = Derived<Item, Err, FilterOp<F>>;

#[cfg(test)]
mod test {
  use std::sync::Arc;
  use std::time::Duration;

  use crate::prelude::*;

  const TIMEOUT: Option<Duration> = Some(Duration::from_secs(1));

  #[test]
  fn keeps_even_numbers() {
    let subj = Subject::<i32, ()>::new();
    let uut = subj.filter(|x| x % 2 == 0);
    let observer = uut.subscribe(Arc::new(CollectingObserver::new()));

    for v in 0..5 {
      subj.next(v);
    }
    assert!(uut.join_all(TIMEOUT));
    assert_eq!(observer.events(), vec![0, 2, 4]);
  }

  #[test]
  fn output_is_the_matching_subsequence() {
    let inputs = [5, 12, 7, 30, 1, 18, 18, 2];
    let subj = Subject::<i32, ()>::new();
    let uut = subj.filter(|x| *x > 6);
    let observer = uut.subscribe(Arc::new(CollectingObserver::new()));

    for v in inputs {
      subj.next(v);
    }
    assert!(uut.join_all(TIMEOUT));
    let expected: Vec<i32> = inputs.iter().copied().filter(|x| *x > 6).collect();
    assert_eq!(observer.events(), expected);
  }

  #[test]
  fn filter_then_map() {
    let subj = Subject::<u32, ()>::new();
    let uut = subj.filter(|x| x % 3 == 0).map(|x| x / 3);
    let observer = uut.subscribe(Arc::new(CollectingObserver::new()));

    for v in 0..10 {
      subj.next(v);
    }
    assert!(uut.join_all(TIMEOUT));
    assert_eq!(observer.events(), vec![0, 1, 2, 3]);
  }
}
