pub mod link_ring;
pub mod shard;
pub mod slot_arena;

pub use link_ring::LinkRing;
pub use shard::ShardRouter;
pub use slot_arena::{FixedArena, SlotId};
