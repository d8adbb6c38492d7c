pub mod lru;

pub use lru::{Entry, LruEngine, PutStatus};
