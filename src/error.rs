//! Synchronous errors raised while wiring a graph together.
//!
//! In-band stream errors are not represented here: they are ordinary values of
//! the observable's `Err` type and travel through `Observer::error`.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RxError {
  /// A type-erased value did not satisfy the capability it was offered for.
  #[error("type check failed: expected {expected}")]
  TypeCheck { expected: &'static str },

  /// Configuration keys that no combinator understands.
  #[error("unsupported {}: {}", argument_noun(.0), .0.join(", "))]
  UnsupportedOptions(Vec<String>),

  #[error("invalid value {value:?} for {key}")]
  InvalidConfig { key: &'static str, value: String },

  #[error("failed to build thread pool: {0}")]
  SchedulerInit(#[from] std::io::Error),

  #[error("failed to schedule dispatch task: {0}")]
  Schedule(#[source] std::io::Error),
}

fn argument_noun(keys: &[String]) -> &'static str {
  if keys.len() > 1 { "arguments" } else { "argument" }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn unsupported_options_message() {
    let one = RxError::UnsupportedOptions(vec!["foo".into()]);
    assert_eq!(one.to_string(), "unsupported argument: foo");

    let two = RxError::UnsupportedOptions(vec!["foo".into(), "bar".into()]);
    assert_eq!(two.to_string(), "unsupported arguments: foo, bar");
  }
}
