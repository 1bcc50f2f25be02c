//! Buffer pool: a fixed set of page frames with pinned-page LRU replacement.

mod descriptor;
mod handle;
mod lru;
mod pool;

pub use handle::PageHandle;
pub use pool::PagePool;
