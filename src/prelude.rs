pub use crate::builder::CacheBuilder;
pub use crate::cache::Cache;
pub use crate::clock::{Clock, CoarseClock, ManualClock};
pub use crate::ds::{FixedArena, LinkRing, ShardRouter, SlotId};
pub use crate::error::{ConfigError, ConfigParam, InvariantError};
pub use crate::hook::{Action, HookChain, Observer, Outcome};
#[cfg(feature = "metrics")]
pub use crate::metrics::{CacheMetricsSnapshot, CacheStats, PrometheusTextExporter};
#[cfg(feature = "metrics")]
pub use crate::metrics::traits::{MetricsExporter, MetricsReset, MetricsSnapshotProvider};
pub use crate::policy::lru::LruEngine;
pub use crate::value::{Value, decode_i64, encode_i64};
