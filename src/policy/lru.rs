//! # Fixed-arena LRU engine
//!
//! One recency-ordered bucket: a [`FixedArena`] of entries, a [`LinkRing`]
//! over their slot indices, and an `FxHashMap` from key to slot.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────────┐
//!   │                          LruEngine<T>                                │
//!   │                                                                      │
//!   │   index: FxHashMap<String, SlotId>                                   │
//!   │     "a" → 2    "b" → 1    "c" → 3                                    │
//!   │                                                                      │
//!   │   arena: FixedArena<Entry<T>>          ring: LinkRing                │
//!   │   ┌────┬──────────────────────┐        ┌──────────────────────────┐  │
//!   │   │ 1  │ "b", v, ts=40        │        │ [0] ─► 3 ─► 2 ─► 1 ─► [0]│  │
//!   │   │ 2  │ "a", v, ts=50        │        │      MRU          LRU    │  │
//!   │   │ 3  │ "c", v, ts=60        │        └──────────────────────────┘  │
//!   │   └────┴──────────────────────┘                                      │
//!   └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Operations
//!
//! | Method      | Effect on the ring                         |
//! |-------------|--------------------------------------------|
//! | `put`       | new/updated slot moves to head             |
//! | `get`       | hit moves to head                          |
//! | `peek`      | none                                       |
//! | `delete`    | hit is marked deleted and sunk to tail     |
//! | `iter`      | none; head→tail, deleted entries skipped   |
//!
//! ## Lazy deletion
//!
//! `delete` sets the entry timestamp to `0` instead of unlinking it. The key
//! stays in the index so a later `put` of the same key revives the slot in
//! place, and the slot sits at the tail so it is the first one reused when a
//! new key arrives at capacity. Overwriting a deleted tail is not reported as
//! an eviction.
//!
//! ## Capacity
//!
//! The arena is filled slot by slot until `capacity` slots are assigned; from
//! then on every new key takes over the tail slot. Nothing is allocated for
//! the arena or the ring after construction, and the overwritten key's string
//! buffers are reused for the new key.

use std::fmt;

use rustc_hash::FxHashMap;

use crate::ds::link_ring::LinkRing;
use crate::ds::slot_arena::{FixedArena, SlotId};
use crate::error::InvariantError;
use crate::value::Value;

/// A stored key/value pair and its write timestamp.
///
/// `timestamp == 0` marks a lazily deleted entry.
pub struct Entry<T> {
    key: String,
    value: Option<Value<T>>,
    timestamp: i64,
}

impl<T> Entry<T> {
    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The payload, or `None` once it has been released.
    #[inline]
    pub fn value(&self) -> Option<&Value<T>> {
        self.value.as_ref()
    }

    /// Removes the payload from the slot.
    #[inline]
    pub fn take_value(&mut self) -> Option<Value<T>> {
        self.value.take()
    }

    #[inline]
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    #[inline]
    pub fn is_deleted(&self) -> bool {
        self.timestamp <= 0
    }
}

impl<T: fmt::Debug> fmt::Debug for Entry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("key", &self.key)
            .field("value", &self.value)
            .field("timestamp", &self.timestamp)
            .finish()
    }
}

/// How a `put` landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutStatus {
    /// The key was not mapped; it now occupies a fresh or reused slot.
    Added,
    /// The key was already mapped and its slot was overwritten.
    Updated,
}

/// Fixed-capacity LRU bucket.
pub struct LruEngine<T> {
    arena: FixedArena<Entry<T>>,
    ring: LinkRing,
    index: FxHashMap<String, SlotId>,
    live: usize,
}

impl<T> LruEngine<T> {
    /// Creates an engine holding at most `capacity` keys.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero or exceeds [`SlotId::MAX_CAPACITY`].
    /// [`Cache`](crate::Cache) validates capacities before building engines.
    pub fn new(capacity: usize) -> Self {
        assert!(
            capacity > 0 && capacity <= SlotId::MAX_CAPACITY,
            "engine capacity must be in 1..={}, got {}",
            SlotId::MAX_CAPACITY,
            capacity
        );
        let mut index = FxHashMap::default();
        index.reserve(capacity);
        Self {
            arena: FixedArena::with_capacity(capacity),
            ring: LinkRing::with_capacity(capacity),
            index,
            live: 0,
        }
    }

    /// Inserts or overwrites `key`, stamping it with `now`.
    ///
    /// When a new key arrives at capacity the tail slot is taken over;
    /// `on_evict` is called with the victim first unless it was already
    /// deleted.
    pub fn put<F>(
        &mut self,
        key: &str,
        value: Value<T>,
        now: i64,
        on_evict: F,
    ) -> (SlotId, PutStatus)
    where
        F: FnOnce(&str, Option<&Value<T>>),
    {
        debug_assert!(now > 0, "live entries need a positive timestamp");

        if let Some(&slot) = self.index.get(key) {
            if let Some(entry) = self.arena.get_mut(slot) {
                if entry.is_deleted() {
                    self.live += 1;
                }
                entry.value = Some(value);
                entry.timestamp = now;
            }
            self.ring.move_to_head(slot);
            return (slot, PutStatus::Updated);
        }

        if !self.arena.is_full() {
            let entry = Entry {
                key: key.to_owned(),
                value: Some(value),
                timestamp: now,
            };
            let Ok(slot) = self.arena.allocate(entry) else {
                unreachable!("arena with free slots refused an allocation");
            };
            self.ring.push_head(slot);
            self.index.insert(key.to_owned(), slot);
            self.live += 1;
            return (slot, PutStatus::Added);
        }

        // Capacity is at least one, so a full engine always has a tail.
        let Some(slot) = self.ring.tail() else {
            unreachable!("full engine has an empty ring");
        };
        self.reuse(slot, key, value, now, on_evict);
        (slot, PutStatus::Added)
    }

    /// Overwrites the entry in `slot` with a new key and moves it to the head.
    fn reuse<F>(&mut self, slot: SlotId, key: &str, value: Value<T>, now: i64, on_evict: F)
    where
        F: FnOnce(&str, Option<&Value<T>>),
    {
        let Some(victim) = self.arena.get_mut(slot) else {
            unreachable!("ring slot {slot:?} is not assigned");
        };
        if victim.is_deleted() {
            self.live += 1;
        } else {
            on_evict(&victim.key, victim.value.as_ref());
        }

        let mapped_key = match self.index.remove_entry(victim.key.as_str()) {
            Some((mut buf, _)) => {
                buf.clear();
                buf.push_str(key);
                buf
            },
            None => key.to_owned(),
        };
        victim.key.clear();
        victim.key.push_str(key);
        victim.value = Some(value);
        victim.timestamp = now;

        self.index.insert(mapped_key, slot);
        self.ring.move_to_head(slot);
    }

    /// Looks up `key` and moves it to the head.
    ///
    /// Deleted entries are still returned (with `timestamp == 0`) and still
    /// refreshed; callers decide whether they count as present.
    pub fn get(&mut self, key: &str) -> Option<&Entry<T>> {
        let slot = *self.index.get(key)?;
        self.ring.move_to_head(slot);
        self.arena.get(slot)
    }

    /// Looks up `key` without touching recency.
    pub fn peek(&self, key: &str) -> Option<&Entry<T>> {
        let slot = *self.index.get(key)?;
        self.arena.get(slot)
    }

    /// Marks `key` deleted and sinks it to the tail.
    ///
    /// Returns the timestamp the entry carried while live together with the
    /// entry itself, or `None` if the key is unknown or already deleted. The
    /// key stays mapped to its slot; the payload is left in place for the
    /// caller to take or drop.
    pub fn delete(&mut self, key: &str) -> Option<(i64, &mut Entry<T>)> {
        let slot = *self.index.get(key)?;
        let written_at = self.arena.get(slot)?.timestamp;
        if written_at <= 0 {
            return None;
        }
        self.ring.move_to_tail(slot);
        let entry = self.arena.get_mut(slot)?;
        entry.timestamp = 0;
        self.live -= 1;
        Some((written_at, entry))
    }

    /// The entry stored in `slot`, as returned by [`put`](Self::put).
    #[inline]
    pub fn entry(&self, slot: SlotId) -> Option<&Entry<T>> {
        self.arena.get(slot)
    }

    /// Iterates live entries from most to least recently used.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            engine: self,
            cursor: self.ring.head(),
        }
    }

    /// Number of live (not deleted) entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of slots ever assigned, live or deleted.
    pub fn assigned(&self) -> usize {
        self.arena.assigned()
    }

    pub fn capacity(&self) -> usize {
        self.arena.capacity()
    }

    /// Returns `true` if `key` is mapped to a live entry.
    pub fn contains(&self, key: &str) -> bool {
        self.peek(key).is_some_and(|e| !e.is_deleted())
    }

    /// Checks that ring, index and arena describe the same set of slots.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        let order = self.ring.validate().map_err(InvariantError::new)?;
        if order.len() != self.arena.assigned() {
            return Err(InvariantError::new(format!(
                "ring links {} slots but {} are assigned",
                order.len(),
                self.arena.assigned()
            )));
        }
        if self.index.len() != self.arena.assigned() {
            return Err(InvariantError::new(format!(
                "index maps {} keys but {} slots are assigned",
                self.index.len(),
                self.arena.assigned()
            )));
        }
        for (key, &slot) in &self.index {
            match self.arena.get(slot) {
                Some(entry) if entry.key == *key => {},
                Some(entry) => {
                    return Err(InvariantError::new(format!(
                        "key {key:?} maps to slot {} holding {:?}",
                        slot.index(),
                        entry.key
                    )));
                },
                None => {
                    return Err(InvariantError::new(format!(
                        "key {key:?} maps to unassigned slot {}",
                        slot.index()
                    )));
                },
            }
        }
        let live = self.arena.iter().filter(|(_, e)| !e.is_deleted()).count();
        if live != self.live {
            return Err(InvariantError::new(format!(
                "live counter is {} but {live} entries are live",
                self.live
            )));
        }
        for (slot, entry) in self.arena.iter() {
            if !entry.is_deleted() && entry.value.is_none() {
                return Err(InvariantError::new(format!(
                    "live slot {} has no payload",
                    slot.index()
                )));
            }
        }
        Ok(())
    }

    #[cfg(test)]
    fn debug_keys(&self) -> Vec<String> {
        self.ring
            .iter()
            .filter_map(|slot| self.arena.get(slot))
            .map(|e| e.key.clone())
            .collect()
    }
}

impl<T> fmt::Debug for LruEngine<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruEngine")
            .field("capacity", &self.capacity())
            .field("assigned", &self.assigned())
            .finish()
    }
}

/// Head-to-tail iterator over live entries of an [`LruEngine`].
pub struct Iter<'a, T> {
    engine: &'a LruEngine<T>,
    cursor: Option<SlotId>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (&'a str, &'a Value<T>, i64);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(slot) = self.cursor {
            self.cursor = self.engine.ring.next(slot);
            let entry = self.engine.arena.get(slot)?;
            if entry.is_deleted() {
                continue;
            }
            if let Some(value) = entry.value.as_ref() {
                return Some((entry.key.as_str(), value, entry.timestamp));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn put(engine: &mut LruEngine<u32>, key: &str, v: u32, now: i64) -> PutStatus {
        engine.put(key, Value::Ref(v), now, |_, _| {}).1
    }

    fn filled(capacity: usize, keys: &[&str]) -> LruEngine<u32> {
        let mut engine = LruEngine::new(capacity);
        for (i, key) in keys.iter().enumerate() {
            put(&mut engine, key, i as u32, i as i64 + 1);
        }
        engine
    }

    fn live_keys(engine: &LruEngine<u32>) -> Vec<&str> {
        engine.iter().map(|(k, _, _)| k).collect()
    }

    #[test]
    fn put_adds_then_updates() {
        let mut engine = LruEngine::new(2);
        assert_eq!(put(&mut engine, "a", 1, 1), PutStatus::Added);
        assert_eq!(put(&mut engine, "a", 2, 2), PutStatus::Updated);
        let entry = engine.get("a").unwrap();
        assert_eq!(entry.value(), Some(&Value::Ref(2)));
        assert_eq!(entry.timestamp(), 2);
        assert_eq!(engine.len(), 1);
        engine.check_invariants().unwrap();
    }

    #[test]
    fn put_at_capacity_evicts_the_tail() {
        let mut engine = filled(4, &["a", "b", "c", "d"]);
        let mut evicted = Vec::new();
        let (_, status) = engine.put("e", Value::Ref(9), 10, |k, v| {
            evicted.push((k.to_owned(), v.cloned()));
        });
        assert_eq!(status, PutStatus::Added);
        assert_eq!(evicted, vec![("a".to_owned(), Some(Value::Ref(0)))]);
        assert_eq!(live_keys(&engine), vec!["e", "d", "c", "b"]);
        assert!(engine.peek("a").is_none());
        assert_eq!(engine.assigned(), 4);
        engine.check_invariants().unwrap();
    }

    #[test]
    fn get_refreshes_recency_and_redirects_eviction() {
        let mut engine = filled(4, &["a", "b", "c", "d"]);
        put(&mut engine, "e", 4, 5);
        assert!(engine.get("b").is_some());
        assert_eq!(live_keys(&engine), vec!["b", "e", "d", "c"]);

        let mut evicted = None;
        engine.put("f", Value::Ref(5), 6, |k, _| evicted = Some(k.to_owned()));
        assert_eq!(evicted.as_deref(), Some("c"));
        engine.check_invariants().unwrap();
    }

    #[test]
    fn get_miss_returns_none() {
        let mut engine = filled(2, &["a"]);
        assert!(engine.get("zz").is_none());
        assert_eq!(live_keys(&engine), vec!["a"]);
    }

    #[test]
    fn delete_marks_sinks_and_keeps_mapping() {
        let mut engine = filled(3, &["a", "b", "c"]);
        let (written_at, entry) = engine.delete("c").unwrap();
        assert_eq!(written_at, 3);
        assert_eq!(entry.timestamp(), 0);
        assert_eq!(engine.debug_keys(), vec!["b", "a", "c"]);
        assert_eq!(live_keys(&engine), vec!["b", "a"]);
        assert!(!engine.contains("c"));
        assert!(engine.peek("c").is_some_and(Entry::is_deleted));
        assert_eq!(engine.len(), 2);
        engine.check_invariants().unwrap();
    }

    #[test]
    fn delete_twice_is_a_miss() {
        let mut engine = filled(2, &["a"]);
        assert!(engine.delete("a").is_some());
        assert!(engine.delete("a").is_none());
        assert!(engine.delete("never").is_none());
    }

    #[test]
    fn deleted_tail_is_reused_without_eviction_report() {
        let mut engine = filled(3, &["a", "b", "c"]);
        engine.delete("b");
        let mut reported = false;
        engine.put("d", Value::Ref(7), 10, |_, _| reported = true);
        assert!(!reported);
        assert!(engine.peek("b").is_none());
        assert_eq!(live_keys(&engine), vec!["d", "c", "a"]);
        engine.check_invariants().unwrap();
    }

    #[test]
    fn put_revives_a_deleted_key_in_place() {
        let mut engine = filled(3, &["a", "b"]);
        let slot_before = engine.index["a"];
        engine.delete("a");
        assert_eq!(put(&mut engine, "a", 42, 9), PutStatus::Updated);
        assert_eq!(engine.index["a"], slot_before);
        assert_eq!(live_keys(&engine), vec!["a", "b"]);
        assert_eq!(engine.get("a").unwrap().value(), Some(&Value::Ref(42)));
        engine.check_invariants().unwrap();
    }

    #[test]
    fn get_on_deleted_entry_reports_it_and_moves_it_to_head() {
        let mut engine = filled(3, &["a", "b"]);
        engine.delete("a");
        assert!(engine.get("a").is_some_and(Entry::is_deleted));
        assert_eq!(engine.debug_keys(), vec!["a", "b"]);
    }

    #[test]
    fn iter_is_head_to_tail_and_can_stop_early() {
        let engine = filled(4, &["a", "b", "c", "d"]);
        let seen: Vec<_> = engine.iter().take(2).map(|(k, _, ts)| (k, ts)).collect();
        assert_eq!(seen, vec![("d", 4), ("c", 3)]);
        assert_eq!(engine.iter().count(), 4);
    }

    #[test]
    fn capacity_one_engine_replaces_its_only_entry() {
        let mut engine = filled(1, &["a"]);
        let mut evicted = None;
        engine.put("b", Value::Ref(1), 5, |k, _| evicted = Some(k.to_owned()));
        assert_eq!(evicted.as_deref(), Some("a"));
        assert_eq!(live_keys(&engine), vec!["b"]);
        engine.delete("b");
        assert!(engine.is_empty());
        engine.check_invariants().unwrap();
    }

    #[test]
    fn len_tracks_adds_revives_deletes_and_evictions() {
        let mut engine = filled(3, &["a", "b", "c"]);
        assert_eq!(engine.len(), 3);

        engine.delete("b");
        engine.delete("b");
        assert_eq!(engine.len(), 2);

        // Reusing the deleted tail adds without evicting.
        put(&mut engine, "d", 3, 10);
        assert_eq!(engine.len(), 3);

        // Full of live entries: one in, one out.
        put(&mut engine, "e", 4, 11);
        assert_eq!(engine.len(), 3);

        engine.delete("e");
        put(&mut engine, "e", 5, 12);
        assert_eq!(engine.len(), 3);

        for key in ["c", "d", "e"] {
            engine.delete(key);
        }
        assert!(engine.is_empty());
        engine.check_invariants().unwrap();
    }

    #[test]
    #[should_panic(expected = "engine capacity")]
    fn zero_capacity_is_rejected() {
        let _ = LruEngine::<u8>::new(0);
    }

    #[test]
    fn check_invariants_detects_missing_payload() {
        let mut engine = filled(2, &["a"]);
        let slot = engine.index["a"];
        engine.arena.get_mut(slot).unwrap().value = None;
        assert!(engine.check_invariants().is_err());
    }
}
