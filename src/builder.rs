//! Configuration builder for [`Cache`].
//!
//! ## Example
//!
//! ```rust
//! use std::time::Duration;
//! use shardcache::builder::CacheBuilder;
//!
//! let cache = CacheBuilder::new(16, 1024)
//!     .expiration(Duration::from_secs(30))
//!     .second_level(256)
//!     .build::<String>();
//!
//! assert_eq!(cache.shard_count(), 16);
//! assert_eq!(cache.second_level_capacity(), Some(256));
//! ```

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::Cache;
use crate::clock::{Clock, CoarseClock};
use crate::error::ConfigError;

/// Builder for [`Cache`] instances.
#[derive(Clone)]
pub struct CacheBuilder {
    shards: usize,
    capacity: usize,
    expiration: Duration,
    second_level: Option<usize>,
    clock: Option<Arc<dyn Clock>>,
}

impl CacheBuilder {
    /// Starts a builder for `shards` shards (rounded up to a power of two) of
    /// `capacity_per_shard` entries each.
    pub fn new(shards: usize, capacity_per_shard: usize) -> Self {
        Self {
            shards,
            capacity: capacity_per_shard,
            expiration: Duration::ZERO,
            second_level: None,
            clock: None,
        }
    }

    /// Sets how long an entry stays readable after its last write.
    ///
    /// `Duration::ZERO` (the default) disables expiration.
    pub fn expiration(mut self, expiration: Duration) -> Self {
        self.expiration = expiration;
        self
    }

    /// Enables LRU-2 with `capacity_per_shard` level 1 entries per shard.
    pub fn second_level(mut self, capacity_per_shard: usize) -> Self {
        self.second_level = Some(capacity_per_shard);
        self
    }

    /// Replaces the default [`CoarseClock`] time source.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Builds the cache.
    ///
    /// # Panics
    ///
    /// Panics if the configuration is invalid. For a non-panicking
    /// alternative, use [`try_build`](Self::try_build).
    pub fn build<T>(self) -> Cache<T> {
        match self.try_build() {
            Ok(cache) => cache,
            Err(e) => panic!("{}", e),
        }
    }

    /// Builds the cache, returning an error on invalid parameters instead of
    /// panicking.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the shard count or a capacity is zero, a
    /// capacity is too large, or the expiration overflows `i64` nanoseconds.
    ///
    /// # Example
    ///
    /// ```
    /// use shardcache::builder::CacheBuilder;
    ///
    /// assert!(CacheBuilder::new(4, 64).try_build::<u64>().is_ok());
    /// assert!(CacheBuilder::new(4, 64).second_level(0).try_build::<u64>().is_err());
    /// ```
    pub fn try_build<T>(self) -> Result<Cache<T>, ConfigError> {
        let clock = match self.clock {
            Some(clock) => clock,
            None => Arc::new(CoarseClock::start()),
        };
        Cache::with_config(
            self.shards,
            self.capacity,
            self.expiration,
            self.second_level,
            clock,
        )
    }
}

impl fmt::Debug for CacheBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheBuilder")
            .field("shards", &self.shards)
            .field("capacity", &self.capacity)
            .field("expiration", &self.expiration)
            .field("second_level", &self.second_level)
            .field("custom_clock", &self.clock.is_some())
            .finish()
    }
}
