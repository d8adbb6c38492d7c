//! Key-to-shard routing with power-of-two masking.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Shard Selection Flow                            │
//! │                                                                         │
//! │   Input Key ("user:42")                                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │   ┌───────────────────────────────────────────────────────────────┐     │
//! │   │  ShardRouter { mask: 3 }     (requested 3 shards → 4)         │     │
//! │   │                                                               │     │
//! │   │  1. FxHasher over the key bytes                               │     │
//! │   │  2. Fold the high half into the low half                      │     │
//! │   │  3. Compute: folded & 3                                       │     │
//! │   └───────────────────────────────────────────────────────────────┘     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │   Shard Index: 0, 1, 2, or 3                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Properties
//! ──────────
//! - Deterministic: the same key always lands on the same shard
//! - Cheap: one hash and one AND, no division
//! - The shard count is always a power of two
//!
//! ## Example Usage
//!
//! ```
//! use shardcache::ds::ShardRouter;
//!
//! let router = ShardRouter::new(3);
//! assert_eq!(router.shard_count(), 4);
//!
//! let shard = router.shard_for_key("user:42");
//! assert!(shard < 4);
//! assert_eq!(router.shard_for_key("user:42"), shard);
//! ```

use std::hash::Hasher;

use rustc_hash::FxHasher;

/// Maps string keys onto `2^k` shards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShardRouter {
    mask: usize,
}

impl ShardRouter {
    /// Creates a router for at least `shards` shards.
    ///
    /// The count is rounded up to the next power of two; zero is treated as one.
    ///
    /// ```
    /// use shardcache::ds::ShardRouter;
    ///
    /// assert_eq!(ShardRouter::new(0).shard_count(), 1);
    /// assert_eq!(ShardRouter::new(8).shard_count(), 8);
    /// assert_eq!(ShardRouter::new(9).shard_count(), 16);
    /// ```
    pub fn new(shards: usize) -> Self {
        Self {
            mask: mask_of_next_power_of_two(shards),
        }
    }

    #[inline]
    pub fn shard_count(&self) -> usize {
        self.mask + 1
    }

    #[inline]
    pub fn mask(&self) -> usize {
        self.mask
    }

    /// Maps a key to a shard index in `[0, shard_count)`.
    #[inline]
    pub fn shard_for_key(&self, key: &str) -> usize {
        (hash_key(key) as usize) & self.mask
    }
}

impl Default for ShardRouter {
    /// A single-shard router.
    fn default() -> Self {
        Self::new(1)
    }
}

/// Returns `n.next_power_of_two() - 1`, with `0` and `1` both mapping to `0`.
#[inline]
pub fn mask_of_next_power_of_two(n: usize) -> usize {
    n.max(1).next_power_of_two() - 1
}

#[inline]
fn hash_key(key: &str) -> u64 {
    let mut hasher = FxHasher::default();
    hasher.write(key.as_bytes());
    let h = hasher.finish();
    h ^ (h >> 32)
}
