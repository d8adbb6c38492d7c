//! # Sharded LRU / LRU-2 cache
//!
//! [`Cache`] spreads string keys over `2^k` shards. Each shard is guarded by
//! its own `parking_lot::Mutex` and owns one [`LruEngine`] (level 0) plus,
//! once LRU-2 is enabled, a second engine (level 1).
//!
//! ## Architecture
//!
//! ```text
//!   key ──► ShardRouter (hash & mask) ──► shard i
//!
//!   ┌──────────────────────────────────────────────────────────────────────┐
//!   │ Cache<T>                                                             │
//!   │                                                                      │
//!   │  shards: [Mutex<Shard<T>>; 2^k]                                      │
//!   │  ┌────────────────────────┐ ┌────────────────────────┐               │
//!   │  │ shard 0                │ │ shard 1                │  ...          │
//!   │  │  level0: LruEngine     │ │  level0: LruEngine     │               │
//!   │  │  level1: LruEngine?    │ │  level1: LruEngine?    │               │
//!   │  └────────────────────────┘ └────────────────────────┘               │
//!   │                                                                      │
//!   │  hooks: HookChain<T>     clock: Arc<dyn Clock>    expiration         │
//!   └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## LRU-2 promotion
//!
//! ```text
//!   put(k)            get(k) #1                   get(k) #2+
//!   ───────►  Level0  ─────────────────►  Level1  ─────────► Level1 (refresh)
//!                     delete from level 0,
//!                     put into level 1
//!
//!   put(k) after promotion writes level 0 again; the next get moves the
//!   fresh value up over the stale level 1 copy.
//! ```
//!
//! ## Expiration
//!
//! With a non-zero expiration `D`, an entry written at `t` reads as a miss
//! once `now - t >= D`. Expired entries are left where they are; capacity
//! eviction or an explicit delete reclaims them later.
//!
//! ## Concurrency
//!
//! Every operation holds exactly one shard lock for its whole duration,
//! including hook calls. Keys on different shards never contend. Hooks are
//! registered through `&mut self`, so the chain is fixed before the cache can
//! be shared between threads.

use std::fmt;
use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::clock::{Clock, CoarseClock};
use crate::ds::shard::ShardRouter;
use crate::ds::slot_arena::SlotId;
use crate::error::{ConfigError, ConfigParam, InvariantError};
use crate::hook::{Action, HookChain, Observer, Outcome};
use crate::policy::lru::{Entry, LruEngine, PutStatus};
use crate::value::{Value, encode_i64};

struct Shard<T> {
    level0: LruEngine<T>,
    level1: Option<LruEngine<T>>,
}

impl<T> Shard<T> {
    fn levels(&self) -> impl Iterator<Item = &LruEngine<T>> {
        std::iter::once(&self.level0).chain(self.level1.as_ref())
    }
}

/// Concurrent fixed-capacity cache keyed by strings.
///
/// # Example
///
/// ```
/// use shardcache::Cache;
///
/// let cache: Cache<String> = Cache::new(4, 128);
/// cache.put("greeting", "hello".to_string());
/// assert_eq!(cache.get("greeting"), Some("hello".to_string()));
///
/// cache.put_i64("counter", 42);
/// assert_eq!(cache.get_i64("counter"), Some(42));
///
/// cache.delete("greeting");
/// assert_eq!(cache.get("greeting"), None);
/// ```
pub struct Cache<T> {
    shards: Box<[Mutex<Shard<T>>]>,
    router: ShardRouter,
    capacity: usize,
    second_level_capacity: Option<usize>,
    expiration: Duration,
    expiration_nanos: i64,
    hooks: HookChain<T>,
    clock: Arc<dyn Clock>,
}

impl<T> Cache<T> {
    /// Creates a cache with at least `shards` shards (rounded up to a power of
    /// two), each holding up to `capacity_per_shard` entries.
    ///
    /// # Panics
    ///
    /// Panics if the parameters are invalid. See [`try_new`](Self::try_new).
    pub fn new(shards: usize, capacity_per_shard: usize) -> Self {
        match Self::try_new(shards, capacity_per_shard) {
            Ok(cache) => cache,
            Err(e) => panic!("{}", e),
        }
    }

    /// Creates a cache, returning an error on invalid parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `shards` is zero or `capacity_per_shard` is
    /// zero or larger than [`SlotId::MAX_CAPACITY`].
    pub fn try_new(shards: usize, capacity_per_shard: usize) -> Result<Self, ConfigError> {
        Self::with_config(
            shards,
            capacity_per_shard,
            Duration::ZERO,
            None,
            Arc::new(CoarseClock::start()),
        )
    }

    /// Creates a cache whose entries read as misses once `expiration` has
    /// passed since their last write. `Duration::ZERO` disables expiration.
    ///
    /// # Panics
    ///
    /// Panics if the parameters are invalid.
    pub fn with_expiration(shards: usize, capacity_per_shard: usize, expiration: Duration) -> Self {
        let built = Self::with_config(
            shards,
            capacity_per_shard,
            expiration,
            None,
            Arc::new(CoarseClock::start()),
        );
        match built {
            Ok(cache) => cache,
            Err(e) => panic!("{}", e),
        }
    }

    /// Returns a builder for the full set of options.
    pub fn builder(shards: usize, capacity_per_shard: usize) -> crate::builder::CacheBuilder {
        crate::builder::CacheBuilder::new(shards, capacity_per_shard)
    }

    pub(crate) fn with_config(
        shards: usize,
        capacity: usize,
        expiration: Duration,
        second_level_capacity: Option<usize>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ConfigError> {
        if shards == 0 {
            return Err(ConfigError::new(
                ConfigParam::ShardCount,
                "must be greater than zero",
            ));
        }
        validate_capacity(ConfigParam::CapacityPerShard, capacity)?;
        if let Some(level1) = second_level_capacity {
            validate_capacity(ConfigParam::SecondLevelCapacity, level1)?;
        }
        let expiration_nanos = i64::try_from(expiration.as_nanos()).map_err(|_| {
            ConfigError::new(
                ConfigParam::Expiration,
                format!("{expiration:?} does not fit in i64 nanoseconds"),
            )
        })?;

        let router = ShardRouter::new(shards);
        let shards: Box<[Mutex<Shard<T>>]> = (0..router.shard_count())
            .map(|_| {
                Mutex::new(Shard {
                    level0: LruEngine::new(capacity),
                    level1: second_level_capacity.map(LruEngine::new),
                })
            })
            .collect();

        debug!(
            shards = router.shard_count(),
            capacity_per_shard = capacity,
            second_level_capacity = ?second_level_capacity,
            expiration_ms = expiration.as_millis() as u64,
            "cache created"
        );

        Ok(Self {
            shards,
            router,
            capacity,
            second_level_capacity,
            expiration,
            expiration_nanos,
            hooks: HookChain::new(),
            clock,
        })
    }

    /// Enables LRU-2 by giving every shard a level 1 engine.
    ///
    /// # Panics
    ///
    /// Panics on invalid capacity or if LRU-2 is already enabled. See
    /// [`try_enable_second_level`](Self::try_enable_second_level).
    pub fn enable_second_level(&mut self, capacity_per_shard: usize) -> &mut Self {
        if let Err(e) = self.try_enable_second_level(capacity_per_shard) {
            panic!("{}", e);
        }
        self
    }

    /// Enables LRU-2, returning an error instead of panicking.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the capacity is invalid or a second level
    /// already exists.
    pub fn try_enable_second_level(&mut self, capacity_per_shard: usize) -> Result<(), ConfigError> {
        validate_capacity(ConfigParam::SecondLevelCapacity, capacity_per_shard)?;
        if self.second_level_capacity.is_some() {
            return Err(ConfigError::new(
                ConfigParam::SecondLevelCapacity,
                "cannot be set twice: second level is already enabled",
            ));
        }
        for shard in self.shards.iter_mut() {
            shard.get_mut().level1 = Some(LruEngine::new(capacity_per_shard));
        }
        self.second_level_capacity = Some(capacity_per_shard);
        debug!(capacity_per_shard, "second level enabled");
        Ok(())
    }

    /// Appends an observer to the hook chain.
    ///
    /// Observers run in registration order while the shard lock is held; they
    /// must not call back into this cache.
    pub fn inspect<O>(&mut self, observer: O) -> &mut Self
    where
        O: Observer<T> + 'static,
    {
        self.hooks.push(Arc::new(observer));
        self
    }

    // -----------------------------------------------------------------------
    // Writes
    // -----------------------------------------------------------------------

    /// Stores a typed value.
    pub fn put(&self, key: &str, value: T) {
        self.store(key, Value::Ref(value));
    }

    /// Stores a byte blob.
    pub fn put_bytes(&self, key: &str, bytes: impl Into<Vec<u8>>) {
        self.store(key, Value::Bytes(bytes.into()));
    }

    /// Stores an integer as 8 little-endian bytes.
    pub fn put_i64(&self, key: &str, n: i64) {
        self.store(key, Value::Bytes(encode_i64(n)));
    }

    fn store(&self, key: &str, value: Value<T>) {
        let mut shard = self.shard_for(key).lock();
        let now = self.now();
        let hooks = &self.hooks;
        let (slot, status) = shard.level0.put(key, value, now, |victim, evicted| {
            trace!(key = victim, level = 0, "evicted");
            hooks.emit(Action::Put, victim, evicted, Outcome::Evicted);
        });
        let outcome = match status {
            PutStatus::Added => Outcome::Added,
            PutStatus::Updated => Outcome::Updated,
        };
        hooks.emit(Action::Put, key, stored_value(&shard.level0, slot), outcome);
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Runs `f` on the stored payload of `key` under the shard lock.
    ///
    /// This is the lookup every other getter goes through: it refreshes
    /// recency, performs LRU-2 promotion and reports `Get` to the hooks.
    pub fn get_with<R, F>(&self, key: &str, f: F) -> Option<R>
    where
        F: FnOnce(&Value<T>) -> R,
    {
        let mut guard = self.shard_for(key).lock();
        let now = self.now();
        let Shard { level0, level1 } = &mut *guard;
        let found = match level1 {
            None => self.live(level0.get(key), now),
            Some(level1) => self.promote_or_lookup(key, level0, level1, now),
        };
        match found {
            Some(value) => {
                self.hooks.emit(Action::Get, key, Some(value), Outcome::Hit);
                Some(f(value))
            },
            None => {
                self.hooks.emit(Action::Get, key, None, Outcome::Miss);
                None
            },
        }
    }

    /// Returns a clone of the typed value stored under `key`.
    ///
    /// Returns `None` on a miss and when the key holds bytes.
    pub fn get(&self, key: &str) -> Option<T>
    where
        T: Clone,
    {
        self.get_with(key, |v| v.as_ref_value().cloned()).flatten()
    }

    /// Returns a copy of the bytes stored under `key`.
    ///
    /// Returns `None` on a miss and when the key holds a typed value.
    pub fn get_bytes(&self, key: &str) -> Option<Vec<u8>> {
        self.get_with(key, |v| v.as_bytes().map(<[u8]>::to_vec))
            .flatten()
    }

    /// Decodes the bytes stored under `key` as a little-endian `i64`.
    ///
    /// Returns `None` on a miss, for typed values and for payloads shorter
    /// than 8 bytes.
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get_with(key, Value::as_i64).flatten()
    }

    fn promote_or_lookup<'a>(
        &self,
        key: &str,
        level0: &mut LruEngine<T>,
        level1: &'a mut LruEngine<T>,
        now: i64,
    ) -> Option<&'a Value<T>> {
        let written_at = level0
            .peek(key)
            .filter(|e| !e.is_deleted())
            .map(Entry::timestamp);
        match written_at {
            None => return self.live(level1.get(key), now),
            // Expired entries stay put until eviction or delete reclaims them.
            Some(written_at) if self.is_expired(written_at, now) => return None,
            Some(_) => {},
        }
        let (_, entry) = level0.delete(key)?;
        let value = entry.take_value()?;
        let hooks = &self.hooks;
        let (slot, _) = level1.put(key, value, now, |victim, evicted| {
            trace!(key = victim, level = 1, "evicted");
            hooks.emit(Action::Put, victim, evicted, Outcome::Evicted);
        });
        trace!(key, "promoted to level 1");
        stored_value(level1, slot)
    }

    fn live<'a>(&self, entry: Option<&'a Entry<T>>, now: i64) -> Option<&'a Value<T>> {
        entry
            .filter(|e| !e.is_deleted() && !self.is_expired(e.timestamp(), now))
            .and_then(Entry::value)
    }

    #[inline]
    fn is_expired(&self, written_at: i64, now: i64) -> bool {
        self.expiration_nanos > 0 && now.saturating_sub(written_at) >= self.expiration_nanos
    }

    // -----------------------------------------------------------------------
    // Deletes
    // -----------------------------------------------------------------------

    /// Deletes `key` from both levels and releases its payload.
    ///
    /// Returns `true` if a live entry was found. When both levels hold the
    /// key, the hook sees the more recently written one.
    pub fn delete(&self, key: &str) -> bool {
        let mut guard = self.shard_for(key).lock();
        let Shard { level0, level1 } = &mut *guard;
        let first = level0.delete(key);
        let second = level1.as_mut().and_then(|engine| engine.delete(key));

        let reported = match (&first, &second) {
            (Some((t0, e0)), Some((t1, e1))) => {
                if t1 > t0 {
                    e1.value()
                } else {
                    e0.value()
                }
            },
            (Some((_, e)), None) | (None, Some((_, e))) => e.value(),
            (None, None) => None,
        };
        let hit = first.is_some() || second.is_some();
        if hit {
            self.hooks.emit(Action::Del, key, reported, Outcome::Hit);
        } else {
            self.hooks.emit(Action::Del, key, None, Outcome::Miss);
        }

        for (_, entry) in first.into_iter().chain(second) {
            let _ = entry.take_value();
        }
        hit
    }

    // -----------------------------------------------------------------------
    // Iteration and introspection
    // -----------------------------------------------------------------------

    /// Visits every live entry, shard by shard, level 0 before level 1.
    ///
    /// Within one engine entries come most recent first; there is no order
    /// across shards. Returning [`ControlFlow::Break`] ends the current
    /// engine only; the walk resumes with the next level or shard. Each shard is locked while it is visited, so the visitor must not call
    /// back into the cache. Expired entries that have not been reclaimed are
    /// still visited.
    pub fn walk<F>(&self, mut visitor: F)
    where
        F: FnMut(&str, &Value<T>, i64) -> ControlFlow<()>,
    {
        for shard in self.shards.iter() {
            let guard = shard.lock();
            for engine in guard.levels() {
                for (key, value, timestamp) in engine.iter() {
                    if visitor(key, value, timestamp).is_break() {
                        break;
                    }
                }
            }
        }
    }

    /// Number of live entries across all shards and levels.
    ///
    /// Locks each shard in turn; the total is not a consistent snapshot under
    /// concurrent writes.
    pub fn len(&self) -> usize {
        self.shards
            .iter()
            .map(|shard| shard.lock().levels().map(LruEngine::len).sum::<usize>())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn shard_count(&self) -> usize {
        self.router.shard_count()
    }

    /// Index of the shard that owns `key`.
    pub fn shard_of(&self, key: &str) -> usize {
        self.router.shard_for_key(key)
    }

    pub fn capacity_per_shard(&self) -> usize {
        self.capacity
    }

    pub fn second_level_capacity(&self) -> Option<usize> {
        self.second_level_capacity
    }

    /// Configured expiration; `Duration::ZERO` means entries never expire.
    pub fn expiration(&self) -> Duration {
        self.expiration
    }

    /// Validates every engine in every shard.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        for (i, shard) in self.shards.iter().enumerate() {
            let guard = shard.lock();
            for (level, engine) in guard.levels().enumerate() {
                engine
                    .check_invariants()
                    .map_err(|e| e.at(format!("shard {i} level {level}")))?;
            }
        }
        Ok(())
    }

    #[inline]
    fn shard_for(&self, key: &str) -> &Mutex<Shard<T>> {
        &self.shards[self.router.shard_for_key(key)]
    }

    #[inline]
    fn now(&self) -> i64 {
        self.clock.now().max(1)
    }
}

impl<T> fmt::Debug for Cache<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cache")
            .field("shards", &self.router.shard_count())
            .field("capacity_per_shard", &self.capacity)
            .field("second_level_capacity", &self.second_level_capacity)
            .field("expiration", &self.expiration)
            .field("hooks", &self.hooks)
            .field("clock", &self.clock)
            .finish()
    }
}

fn stored_value<T>(engine: &LruEngine<T>, slot: SlotId) -> Option<&Value<T>> {
    engine.entry(slot).and_then(Entry::value)
}

fn validate_capacity(param: ConfigParam, capacity: usize) -> Result<(), ConfigError> {
    if capacity == 0 {
        return Err(ConfigError::new(param, "must be greater than zero"));
    }
    if capacity > SlotId::MAX_CAPACITY {
        return Err(ConfigError::new(
            param,
            format!("must be at most {}, got {capacity}", SlotId::MAX_CAPACITY),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use parking_lot::Mutex as PlMutex;

    type Log = Arc<PlMutex<Vec<(Action, String, Option<u32>, i8)>>>;

    fn recorder(cache: &mut Cache<u32>) -> Log {
        let log: Log = Arc::new(PlMutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        cache.inspect(
            move |action: Action, key: &str, value: Option<&Value<u32>>, outcome: Outcome| {
                let v = value.and_then(|v| v.as_ref_value().copied());
                sink.lock().push((action, key.to_owned(), v, outcome.code()));
            },
        );
        log
    }

    fn single_shard(capacity: usize) -> (Cache<u32>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(1_000));
        let cache = Cache::with_config(1, capacity, Duration::ZERO, None, clock.clone()).unwrap();
        (cache, clock)
    }

    fn keys(cache: &Cache<u32>) -> Vec<String> {
        let mut out = Vec::new();
        cache.walk(|k, _, _| {
            out.push(k.to_owned());
            ControlFlow::Continue(())
        });
        out
    }

    #[test]
    fn overflow_evicts_least_recent_and_reports_it() {
        let (mut cache, _) = single_shard(4);
        let log = recorder(&mut cache);
        for (i, k) in ["A", "B", "C", "D", "E"].iter().enumerate() {
            cache.put(k, i as u32);
        }
        let events = log.lock().clone();
        assert!(events.contains(&(Action::Put, "A".into(), Some(0), -1)));
        assert_eq!(events.last(), Some(&(Action::Put, "E".into(), Some(4), 1)));
        assert_eq!(keys(&cache), vec!["E", "D", "C", "B"]);
        assert_eq!(cache.get("A"), None);
    }

    #[test]
    fn get_moves_key_to_head_and_shifts_next_victim() {
        let (cache, _) = single_shard(4);
        for k in ["A", "B", "C", "D", "E"] {
            cache.put(k, 0);
        }
        assert_eq!(cache.get("B"), Some(0));
        assert_eq!(keys(&cache), vec!["B", "E", "D", "C"]);
        cache.put("F", 0);
        assert_eq!(keys(&cache), vec!["F", "B", "E", "D"]);
    }

    #[test]
    fn update_reports_status_zero() {
        let (mut cache, _) = single_shard(2);
        let log = recorder(&mut cache);
        cache.put("k", 1);
        cache.put("k", 2);
        assert_eq!(
            *log.lock(),
            vec![
                (Action::Put, "k".into(), Some(1), 1),
                (Action::Put, "k".into(), Some(2), 0),
            ]
        );
    }

    #[test]
    fn delete_then_put_revives_key() {
        let (mut cache, _) = single_shard(2);
        let log = recorder(&mut cache);
        cache.put("k", 7);
        assert!(cache.delete("k"));
        assert_eq!(cache.get("k"), None);
        assert!(!cache.delete("k"));
        cache.put("k", 8);
        assert_eq!(cache.get("k"), Some(8));

        let events = log.lock().clone();
        assert_eq!(events[1], (Action::Del, "k".into(), Some(7), 1));
        assert_eq!(events[2], (Action::Get, "k".into(), None, 0));
        assert_eq!(events[3], (Action::Del, "k".into(), None, 0));
        cache.check_invariants().unwrap();
    }

    #[test]
    fn expiration_is_lazy_and_boundary_inclusive() {
        let clock = Arc::new(ManualClock::new(1_000));
        let cache: Cache<u32> =
            Cache::with_config(1, 4, Duration::from_secs(10), None, clock.clone()).unwrap();
        cache.put("k", 1);

        clock.advance(Duration::from_secs(10) - Duration::from_nanos(1));
        assert_eq!(cache.get("k"), Some(1));

        clock.advance(Duration::from_nanos(1));
        assert_eq!(cache.get("k"), None);
        // Still occupying its slot.
        assert_eq!(cache.len(), 1);

        cache.put("k", 2);
        assert_eq!(cache.get("k"), Some(2));
    }

    #[test]
    fn typed_getters_follow_the_stored_variant() {
        let (cache, _) = single_shard(4);
        cache.put("typed", 5);
        cache.put_bytes("raw", vec![1, 2, 3]);
        cache.put_i64("num", -9);

        assert_eq!(cache.get("typed"), Some(5));
        assert_eq!(cache.get_bytes("typed"), None);
        assert_eq!(cache.get_bytes("raw"), Some(vec![1, 2, 3]));
        assert_eq!(cache.get_i64("raw"), None);
        assert_eq!(cache.get_i64("num"), Some(-9));
        assert_eq!(cache.get("num"), None);
    }

    #[test]
    fn lru2_first_get_promotes_and_later_gets_refresh() {
        let (mut cache, _) = single_shard(4);
        cache.enable_second_level(4);
        cache.put("k", 1);

        assert_eq!(cache.get("k"), Some(1));
        {
            let shard = cache.shards[0].lock();
            assert!(!shard.level0.contains("k"));
            assert!(shard.level1.as_ref().unwrap().contains("k"));
        }
        assert_eq!(cache.get("k"), Some(1));
        let shard = cache.shards[0].lock();
        assert!(shard.level1.as_ref().unwrap().contains("k"));
    }

    #[test]
    fn lru2_put_after_promotion_re_enters_level0() {
        let (mut cache, clock) = single_shard(4);
        cache.enable_second_level(4);
        cache.put("k", 1);
        cache.get("k");
        clock.advance(Duration::from_millis(1));
        cache.put("k", 2);
        {
            let shard = cache.shards[0].lock();
            assert!(shard.level0.contains("k"));
            assert!(shard.level1.as_ref().unwrap().contains("k"));
        }
        // The fresh write wins and moves up.
        assert_eq!(cache.get("k"), Some(2));
        assert_eq!(cache.get("k"), Some(2));
        cache.check_invariants().unwrap();
    }

    #[test]
    fn lru2_delete_with_both_levels_reports_latest_write() {
        let (mut cache, clock) = single_shard(4);
        cache.enable_second_level(4);
        let log = recorder(&mut cache);
        cache.put("k", 1);
        cache.get("k");
        clock.advance(Duration::from_millis(5));
        cache.put("k", 2);

        assert!(cache.delete("k"));
        let dels: Vec<_> = log
            .lock()
            .iter()
            .filter(|e| e.0 == Action::Del)
            .cloned()
            .collect();
        assert_eq!(dels, vec![(Action::Del, "k".into(), Some(2), 1)]);
        assert_eq!(cache.get("k"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn second_level_cannot_be_enabled_twice() {
        let (mut cache, _) = single_shard(2);
        cache.try_enable_second_level(2).unwrap();
        let err = cache.try_enable_second_level(2).unwrap_err();
        assert_eq!(err.param(), ConfigParam::SecondLevelCapacity);
        assert!(cache.try_enable_second_level(0).is_err());
    }

    #[test]
    fn config_errors_name_the_rejected_parameter() {
        let param = |shards, capacity| Cache::<u32>::try_new(shards, capacity).unwrap_err().param();
        assert_eq!(param(0, 4), ConfigParam::ShardCount);
        assert_eq!(param(4, 0), ConfigParam::CapacityPerShard);

        let err = Cache::<u32>::try_new(1, SlotId::MAX_CAPACITY + 1).unwrap_err();
        assert_eq!(err.param(), ConfigParam::CapacityPerShard);
        assert!(err.message().contains("must be at most"));
    }

    #[test]
    fn walk_break_ends_only_the_current_engine() {
        let (cache, _) = single_shard(8);
        for k in ["a", "b", "c", "d"] {
            cache.put(k, 0);
        }
        let mut seen = Vec::new();
        cache.walk(|k, _, _| {
            seen.push(k.to_owned());
            if seen.len() == 2 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        assert_eq!(seen, vec!["d", "c"]);
    }

    #[test]
    fn walk_break_in_level0_still_visits_level1() {
        let (mut cache, _) = single_shard(4);
        cache.enable_second_level(4);
        cache.put("a", 1);
        cache.get("a");
        cache.put("b", 2);
        cache.put("c", 3);

        let mut seen = Vec::new();
        cache.walk(|k, _, _| {
            seen.push(k.to_owned());
            ControlFlow::Break(())
        });
        assert_eq!(seen, vec!["c", "a"]);
    }

    #[test]
    fn invalid_construction_is_rejected() {
        assert!(Cache::<u32>::try_new(0, 4).is_err());
        assert!(Cache::<u32>::try_new(4, 0).is_err());
        let cache = Cache::<u32>::try_new(3, 4).unwrap();
        assert_eq!(cache.shard_count(), 4);
        assert_eq!(cache.capacity_per_shard(), 4);
        assert_eq!(cache.expiration(), Duration::ZERO);
    }

    #[test]
    #[should_panic(expected = "capacity per shard must be greater than zero")]
    fn new_panics_on_zero_capacity() {
        let _ = Cache::<u32>::new(1, 0);
    }
}
