//! Fixed-capacity slot arena with 1-based handles.
//!
//! Slots are handed out in order until the arena is full and are never freed
//! individually; the owner reuses an existing slot in place once
//! [`FixedArena::is_full`] reports `true`. Index `0` is never a valid slot so
//! it can serve as the sentinel of a [`LinkRing`](crate::ds::LinkRing).
//!
//! ```text
//!   capacity = 4, assigned = 2
//!
//!   SlotId:   1       2       3       4
//!           ┌───────┬───────┬───────┬───────┐
//!           │ "a"   │ "b"   │       │       │
//!           └───────┴───────┴───────┴───────┘
//!                            ▲
//!                            next allocation
//! ```

/// Handle to a slot in a [`FixedArena`].
///
/// Handles are 1-based; `SlotId::SENTINEL` (index 0) is reserved for the
/// list anchor and never refers to a stored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(pub(crate) u32);

impl SlotId {
    /// The reserved list anchor.
    pub const SENTINEL: SlotId = SlotId(0);

    /// Largest capacity an arena can be created with.
    pub const MAX_CAPACITY: usize = (u32::MAX - 1) as usize;

    /// Returns the raw 1-based index.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub fn is_sentinel(self) -> bool {
        self.0 == 0
    }
}

/// Arena of at most `capacity` values addressed by [`SlotId`].
#[derive(Debug)]
pub struct FixedArena<T> {
    slots: Vec<T>,
    capacity: usize,
}

impl<T> FixedArena<T> {
    /// Creates an arena holding up to `capacity` values.
    ///
    /// Storage for every slot is reserved up front so filling the arena never
    /// reallocates.
    pub fn with_capacity(capacity: usize) -> Self {
        debug_assert!(capacity <= SlotId::MAX_CAPACITY);
        Self {
            slots: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Stores `value` in the next unused slot.
    ///
    /// Returns the value back if every slot has already been assigned.
    pub fn allocate(&mut self, value: T) -> Result<SlotId, T> {
        if self.is_full() {
            return Err(value);
        }
        self.slots.push(value);
        Ok(SlotId(self.slots.len() as u32))
    }

    #[inline]
    pub fn get(&self, id: SlotId) -> Option<&T> {
        id.index().checked_sub(1).and_then(|i| self.slots.get(i))
    }

    #[inline]
    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        id.index().checked_sub(1).and_then(|i| self.slots.get_mut(i))
    }

    /// Number of slots that have ever been assigned.
    #[inline]
    pub fn assigned(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.slots.len() == self.capacity
    }

    /// Iterates assigned slots in index order.
    pub fn iter(&self) -> impl Iterator<Item = (SlotId, &T)> {
        self.slots
            .iter()
            .enumerate()
            .map(|(i, value)| (SlotId(i as u32 + 1), value))
    }
}
