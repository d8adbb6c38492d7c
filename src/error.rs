//! Error types for shardcache.
//!
//! Cache operations themselves never fail: lookups return `Option` and a full
//! shard evicts. Errors only arise from construction and from the invariant
//! checks.
//!
//! ## Key Components
//!
//! - [`ConfigError`]: Returned when construction parameters are invalid
//!   (zero shards, zero or oversized capacity, second level enabled twice);
//!   [`ConfigParam`] names the offending parameter.
//! - [`InvariantError`]: Returned by `check_invariants` when an engine's ring,
//!   index and arena disagree.
//!
//! ## Example Usage
//!
//! ```
//! use shardcache::Cache;
//! use shardcache::error::ConfigError;
//!
//! let cache: Result<Cache<String>, ConfigError> = Cache::try_new(16, 1024);
//! assert!(cache.is_ok());
//!
//! let bad = Cache::<String>::try_new(16, 0);
//! assert!(bad.is_err());
//! ```

use std::fmt;

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Error returned when internal engine invariants are violated.
///
/// Produced by [`LruEngine::check_invariants`](crate::policy::lru::LruEngine::check_invariants)
/// and [`Cache::check_invariants`](crate::Cache::check_invariants).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }

    /// Prefixes the description with where the violation was found.
    pub(crate) fn at(self, location: impl fmt::Display) -> Self {
        Self(format!("{location}: {}", self.0))
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InvariantError {}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// The construction parameter a [`ConfigError`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigParam {
    ShardCount,
    CapacityPerShard,
    SecondLevelCapacity,
    Expiration,
}

impl fmt::Display for ConfigParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConfigParam::ShardCount => "shard count",
            ConfigParam::CapacityPerShard => "capacity per shard",
            ConfigParam::SecondLevelCapacity => "second level capacity per shard",
            ConfigParam::Expiration => "expiration",
        })
    }
}

/// Error returned when cache configuration parameters are invalid.
///
/// Produced by [`Cache::try_new`](crate::Cache::try_new),
/// [`Cache::try_enable_second_level`](crate::Cache::try_enable_second_level)
/// and [`CacheBuilder::try_build`](crate::builder::CacheBuilder::try_build).
///
/// # Example
///
/// ```
/// use shardcache::Cache;
/// use shardcache::error::ConfigParam;
///
/// let err = Cache::<u64>::try_new(0, 8).unwrap_err();
/// assert_eq!(err.param(), ConfigParam::ShardCount);
/// assert_eq!(err.to_string(), "shard count must be greater than zero");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    param: ConfigParam,
    reason: String,
}

impl ConfigError {
    /// Creates an error for `param`; the message reads "`param` `reason`".
    #[inline]
    pub fn new(param: ConfigParam, reason: impl Into<String>) -> Self {
        Self {
            param,
            reason: reason.into(),
        }
    }

    /// The parameter that was rejected.
    #[inline]
    pub fn param(&self) -> ConfigParam {
        self.param
    }

    /// Returns the full error description.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.param, self.reason)
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- InvariantError ---------------------------------------------------

    #[test]
    fn invariant_display_shows_message() {
        let err = InvariantError::new("ring visits 3 slots but tracks 4");
        assert_eq!(err.to_string(), "ring visits 3 slots but tracks 4");
    }

    #[test]
    fn invariant_at_prefixes_location() {
        let err = InvariantError::new("bad link").at("shard 2 level 1");
        assert_eq!(err.message(), "shard 2 level 1: bad link");
    }

    #[test]
    fn invariant_implements_std_error() {
        fn assert_error<T: std::error::Error + Send + Sync + 'static>() {}
        assert_error::<InvariantError>();
    }

    // -- ConfigError ------------------------------------------------------

    #[test]
    fn config_display_names_the_parameter() {
        let err = ConfigError::new(ConfigParam::CapacityPerShard, "must be greater than zero");
        assert_eq!(err.to_string(), "capacity per shard must be greater than zero");
        assert_eq!(err.message(), err.to_string());
        assert_eq!(err.param(), ConfigParam::CapacityPerShard);
    }

    #[test]
    fn config_equality_includes_the_parameter() {
        let a = ConfigError::new(ConfigParam::ShardCount, "must be greater than zero");
        assert_eq!(a.clone(), a);
        assert_ne!(
            a,
            ConfigError::new(ConfigParam::SecondLevelCapacity, "must be greater than zero")
        );
    }

    #[test]
    fn config_implements_std_error() {
        fn assert_error<T: std::error::Error + Send + Sync + 'static>() {}
        assert_error::<ConfigError>();
    }
}
