//! Hit/miss/eviction accounting built on the hook chain.
//!
//! ```text
//!   Cache ──emit──► HookChain ──► CacheStats (atomic counters)
//!                                      │
//!                                      ▼ snapshot()
//!                              CacheMetricsSnapshot ──► PrometheusTextExporter
//! ```
//!
//! ## Example
//!
//! ```
//! use shardcache::Cache;
//! use shardcache::metrics::CacheStats;
//! use shardcache::metrics::traits::MetricsSnapshotProvider;
//!
//! let stats = CacheStats::new();
//! let mut cache: Cache<u32> = Cache::new(4, 16);
//! cache.inspect(stats.clone());
//!
//! cache.put("a", 1);
//! cache.get("a");
//! cache.get("b");
//!
//! let snapshot = stats.snapshot();
//! assert_eq!(snapshot.get_hits, 1);
//! assert_eq!(snapshot.get_misses, 1);
//! assert_eq!(snapshot.hit_rate(), 0.5);
//! ```

pub mod exporter;
pub mod snapshot;
pub mod stats;
pub mod traits;

pub use exporter::PrometheusTextExporter;
pub use snapshot::CacheMetricsSnapshot;
pub use stats::CacheStats;
