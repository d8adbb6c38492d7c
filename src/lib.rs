//! shardcache: a sharded, fixed-capacity LRU cache with optional LRU-2
//! promotion, lazy expiration and observation hooks.
//!
//! Keys are strings. Each shard owns a preallocated slot arena threaded by an
//! index-linked recency ring, so steady-state writes reuse the least recently
//! used slot instead of allocating.
//!
//! ```
//! use shardcache::Cache;
//!
//! let cache: Cache<String> = Cache::new(16, 1024);
//! cache.put("user:1", "ada".to_string());
//! assert_eq!(cache.get("user:1").as_deref(), Some("ada"));
//!
//! cache.put_i64("hits", 42);
//! assert_eq!(cache.get_i64("hits"), Some(42));
//!
//! assert!(cache.delete("user:1"));
//! assert_eq!(cache.get("user:1"), None);
//! ```
//!
//! See [`builder::CacheBuilder`] for expiration, LRU-2 and clock options.

pub mod builder;
pub mod cache;
pub mod clock;
pub mod ds;
pub mod error;
pub mod hook;
pub mod policy;
pub mod value;

#[cfg(feature = "metrics")]
pub mod metrics;

pub mod prelude;

pub use cache::Cache;
pub use value::Value;
