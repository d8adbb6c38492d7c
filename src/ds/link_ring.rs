//! Circular doubly linked list over arena slot indices.
//!
//! The list is stored as one `{prev, next}` pair per slot, with slot `0` acting
//! as a permanent sentinel: `links[0].next` is the head (most recently used)
//! and `links[0].prev` is the tail (least recently used). Because the ring is
//! closed through the sentinel, linking and unlinking never branch on
//! "first element" or "last element".
//!
//! ## Architecture
//!
//! ```text
//!   links (Vec<Link>), capacity = 3, order = 2, 3, 1
//!
//!   index │ prev │ next
//!   ──────┼──────┼──────
//!     0   │  1   │  2      sentinel: {tail, head}
//!     1   │  3   │  0
//!     2   │  0   │  3
//!     3   │  2   │  1
//!
//!   ┌─► [0] ─► [2] ─► [3] ─► [1] ─┐
//!   └─────────────────────────────┘
//! ```
//!
//! ## Operations
//! - `push_head(id)`: link a fresh slot at the head
//! - `move_to_head(id)` / `move_to_tail(id)`: close the gap, splice at the end
//! - `iter()`: head to tail
//!
//! All operations except `iter` are O(1) and allocation free.

use crate::ds::slot_arena::SlotId;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Link {
    prev: u32,
    next: u32,
}

/// Recency ring for up to `capacity` slots.
#[derive(Debug)]
pub struct LinkRing {
    links: Vec<Link>,
    len: usize,
}

impl LinkRing {
    /// Creates an empty ring able to link slots `1..=capacity`.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            links: vec![Link::default(); capacity + 1],
            len: 0,
        }
    }

    /// Number of linked slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Most recently used slot, or `None` when empty.
    #[inline]
    pub fn head(&self) -> Option<SlotId> {
        Self::non_sentinel(self.links[0].next)
    }

    /// Least recently used slot, or `None` when empty.
    #[inline]
    pub fn tail(&self) -> Option<SlotId> {
        Self::non_sentinel(self.links[0].prev)
    }

    /// Slot following `id` towards the tail.
    #[inline]
    pub fn next(&self, id: SlotId) -> Option<SlotId> {
        Self::non_sentinel(self.links[id.index()].next)
    }

    /// Links a slot that is not yet in the ring at the head.
    pub fn push_head(&mut self, id: SlotId) {
        debug_assert!(!id.is_sentinel());
        let slot = id.0;
        let head = self.links[0].next;
        self.links[slot as usize] = Link { prev: 0, next: head };
        self.links[head as usize].prev = slot;
        self.links[0].next = slot;
        self.len += 1;
    }

    /// Moves a linked slot to the head. No-op if it is already there.
    pub fn move_to_head(&mut self, id: SlotId) {
        let slot = id.0;
        if self.links[slot as usize].prev == 0 {
            return;
        }
        self.unlink(slot);
        let head = self.links[0].next;
        self.links[slot as usize] = Link { prev: 0, next: head };
        self.links[head as usize].prev = slot;
        self.links[0].next = slot;
    }

    /// Moves a linked slot to the tail. No-op if it is already there.
    pub fn move_to_tail(&mut self, id: SlotId) {
        let slot = id.0;
        if self.links[slot as usize].next == 0 {
            return;
        }
        self.unlink(slot);
        let tail = self.links[0].prev;
        self.links[slot as usize] = Link { prev: tail, next: 0 };
        self.links[tail as usize].next = slot;
        self.links[0].prev = slot;
    }

    /// Iterates linked slots from head to tail.
    pub fn iter(&self) -> LinkRingIter<'_> {
        LinkRingIter {
            ring: self,
            current: self.links[0].next,
        }
    }

    fn unlink(&mut self, slot: u32) {
        let Link { prev, next } = self.links[slot as usize];
        self.links[prev as usize].next = next;
        self.links[next as usize].prev = prev;
    }

    #[inline]
    fn non_sentinel(raw: u32) -> Option<SlotId> {
        (raw != 0).then_some(SlotId(raw))
    }

    /// Walks the ring in both directions and checks that the links agree.
    ///
    /// Returns the forward visiting order on success.
    pub(crate) fn validate(&self) -> Result<Vec<SlotId>, String> {
        let mut order = Vec::with_capacity(self.len);
        let mut prev = 0u32;
        let mut current = self.links[0].next;
        while current != 0 {
            if order.len() >= self.len {
                return Err(format!("ring longer than its length {}", self.len));
            }
            let link = self.links[current as usize];
            if link.prev != prev {
                return Err(format!(
                    "slot {} has prev {} but was reached from {}",
                    current, link.prev, prev
                ));
            }
            order.push(SlotId(current));
            prev = current;
            current = link.next;
        }
        if order.len() != self.len {
            return Err(format!(
                "ring visits {} slots but tracks {}",
                order.len(),
                self.len
            ));
        }
        if self.links[0].prev != prev {
            return Err(format!(
                "sentinel tail is {} but the last visited slot is {}",
                self.links[0].prev, prev
            ));
        }
        Ok(order)
    }
}

/// Iterator over ring slots from head to tail.
pub struct LinkRingIter<'a> {
    ring: &'a LinkRing,
    current: u32,
}

impl Iterator for LinkRingIter<'_> {
    type Item = SlotId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = LinkRing::non_sentinel(self.current)?;
        self.current = self.ring.links[self.current as usize].next;
        Some(id)
    }
}
