//! Observation hooks for cache operations.
//!
//! Every `put`, `get` and `delete` on a [`Cache`](crate::Cache) reports its
//! outcome to a [`HookChain`]: an ordered list of [`Observer`]s invoked
//! synchronously, in registration order, while the shard lock is held.
//! Observers must be fast and must not call back into the same cache.
//!
//! ## Event table
//!
//! | Action | Outcome    | Code | Value passed                     |
//! |--------|------------|------|----------------------------------|
//! | `Put`  | `Added`    | `1`  | the stored value                 |
//! | `Put`  | `Updated`  | `0`  | the stored value                 |
//! | `Put`  | `Evicted`  | `-1` | the evicted value (key = victim) |
//! | `Get`  | `Hit`      | `1`  | the value returned               |
//! | `Get`  | `Miss`     | `0`  | `None`                           |
//! | `Del`  | `Hit`      | `1`  | the value being released         |
//! | `Del`  | `Miss`     | `0`  | `None`                           |

use std::fmt;
use std::sync::Arc;

use crate::value::Value;

/// The operation being reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Action {
    Put = 1,
    Get = 2,
    Del = 3,
}

impl Action {
    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// The result of the reported operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// A new key was stored.
    Added,
    /// An existing key was overwritten.
    Updated,
    /// A live entry was overwritten to make room for a new key.
    Evicted,
    Hit,
    Miss,
}

impl Outcome {
    /// Numeric status: `1` added/hit, `0` updated/miss, `-1` evicted.
    #[inline]
    pub fn code(self) -> i8 {
        match self {
            Outcome::Added | Outcome::Hit => 1,
            Outcome::Updated | Outcome::Miss => 0,
            Outcome::Evicted => -1,
        }
    }
}

/// Receives cache events.
///
/// Implemented for every `Fn(Action, &str, Option<&Value<T>>, Outcome)`
/// closure that is `Send + Sync`.
pub trait Observer<T>: Send + Sync {
    fn observe(&self, action: Action, key: &str, value: Option<&Value<T>>, outcome: Outcome);
}

impl<T, F> Observer<T> for F
where
    F: Fn(Action, &str, Option<&Value<T>>, Outcome) + Send + Sync,
{
    #[inline]
    fn observe(&self, action: Action, key: &str, value: Option<&Value<T>>, outcome: Outcome) {
        self(action, key, value, outcome)
    }
}

/// Ordered list of observers.
pub struct HookChain<T> {
    observers: Vec<Arc<dyn Observer<T>>>,
}

impl<T> HookChain<T> {
    pub fn new() -> Self {
        Self {
            observers: Vec::new(),
        }
    }

    /// Appends an observer after the ones already registered.
    pub fn push(&mut self, observer: Arc<dyn Observer<T>>) {
        self.observers.push(observer);
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Notifies every observer in registration order.
    #[inline]
    pub fn emit(&self, action: Action, key: &str, value: Option<&Value<T>>, outcome: Outcome) {
        for observer in &self.observers {
            observer.observe(action, key, value, outcome);
        }
    }
}

impl<T> Default for HookChain<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for HookChain<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookChain")
            .field("observers", &self.observers.len())
            .finish()
    }
}
