//! Counting observer.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::hook::{Action, Observer, Outcome};
use crate::metrics::snapshot::CacheMetricsSnapshot;
use crate::metrics::traits::{MetricsReset, MetricsSnapshotProvider};
use crate::value::Value;

#[derive(Debug, Default)]
struct Counters {
    put_added: AtomicU64,
    put_updated: AtomicU64,
    evictions: AtomicU64,
    get_hits: AtomicU64,
    get_misses: AtomicU64,
    delete_hits: AtomicU64,
    delete_misses: AtomicU64,
}

/// Observer that tallies every event it sees.
///
/// Clones share the same counters, so one clone can be registered with
/// [`Cache::inspect`](crate::Cache::inspect) while another is kept for
/// reading. Counters use relaxed atomics; a snapshot taken while other
/// threads operate on the cache is not a consistent cut.
#[derive(Debug, Default, Clone)]
pub struct CacheStats {
    counters: Arc<Counters>,
}

impl CacheStats {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    fn counter(&self, action: Action, outcome: Outcome) -> Option<&AtomicU64> {
        let c = &self.counters;
        match (action, outcome) {
            (Action::Put, Outcome::Added) => Some(&c.put_added),
            (Action::Put, Outcome::Updated) => Some(&c.put_updated),
            (Action::Put, Outcome::Evicted) => Some(&c.evictions),
            (Action::Get, Outcome::Hit) => Some(&c.get_hits),
            (Action::Get, Outcome::Miss) => Some(&c.get_misses),
            (Action::Del, Outcome::Hit) => Some(&c.delete_hits),
            (Action::Del, Outcome::Miss) => Some(&c.delete_misses),
            _ => None,
        }
    }
}

impl<T> Observer<T> for CacheStats {
    #[inline]
    fn observe(&self, action: Action, _key: &str, _value: Option<&Value<T>>, outcome: Outcome) {
        if let Some(counter) = self.counter(action, outcome) {
            counter.fetch_add(1, Ordering::Relaxed);
        }
    }
}

impl MetricsSnapshotProvider<CacheMetricsSnapshot> for CacheStats {
    fn snapshot(&self) -> CacheMetricsSnapshot {
        let c = &self.counters;
        CacheMetricsSnapshot {
            put_added: c.put_added.load(Ordering::Relaxed),
            put_updated: c.put_updated.load(Ordering::Relaxed),
            evictions: c.evictions.load(Ordering::Relaxed),
            get_hits: c.get_hits.load(Ordering::Relaxed),
            get_misses: c.get_misses.load(Ordering::Relaxed),
            delete_hits: c.delete_hits.load(Ordering::Relaxed),
            delete_misses: c.delete_misses.load(Ordering::Relaxed),
        }
    }
}

impl MetricsReset for CacheStats {
    fn reset_metrics(&self) {
        let c = &self.counters;
        for counter in [
            &c.put_added,
            &c.put_updated,
            &c.evictions,
            &c.get_hits,
            &c.get_misses,
            &c.delete_hits,
            &c.delete_misses,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}
