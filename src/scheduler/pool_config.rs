use std::env;

use crate::error::RxError;

pub const POOL_SIZE_ENV: &str = "RXFANOUT_POOL_SIZE";
pub const THREAD_PREFIX_ENV: &str = "RXFANOUT_THREAD_PREFIX";

/// Sizing and naming of a dispatch thread pool.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoolConfig {
  /// Number of worker threads. `None` lets the pool pick one per CPU.
  pub pool_size: Option<usize>,
  pub name_prefix: String,
}

impl Default for PoolConfig {
  fn default() -> Self { Self { pool_size: None, name_prefix: "rxfanout-".to_owned() } }
}

impl PoolConfig {
  pub fn with_pool_size(mut self, size: usize) -> Self {
    self.pool_size = Some(size);
    self
  }

  pub fn with_name_prefix(mut self, prefix: impl Into<String>) -> Self {
    self.name_prefix = prefix.into();
    self
  }

  /// Defaults overridden by `RXFANOUT_POOL_SIZE` and `RXFANOUT_THREAD_PREFIX`.
  pub fn from_env() -> Result<Self, RxError> {
    Self::from_lookup(|key| env::var(key).ok())
  }

  fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, RxError> {
    let mut config = Self::default();
    if let Some(raw) = lookup(POOL_SIZE_ENV) {
      let size = raw
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|size| *size > 0)
        .ok_or(RxError::InvalidConfig { key: POOL_SIZE_ENV, value: raw })?;
      config.pool_size = Some(size);
    }
    if let Some(prefix) = lookup(THREAD_PREFIX_ENV) {
      config.name_prefix = prefix;
    }
    Ok(config)
  }
}
