//! Buffer pool for caching file pages in memory.
//!
//! The pool sits between higher layers and the page I/O hooks, keeping a
//! fixed working set of pages in memory to absorb repeated access.

use std::collections::HashMap;

use crate::storage::io::PageIo;
use crate::storage::page::{FileId, PageData, PageNo, PageTag};

use super::descriptor::Descriptor;
use super::lru::LruList;

/// Buffer pool over a fixed number of page frames.
///
/// The pool owns `page_sum` frames for its lifetime and maps pages from the
/// backing store into them on demand. When every frame is occupied, the
/// least recently used unpinned frame is evicted, its content flushed first
/// if it was marked dirty.
///
/// # Bookkeeping
///
/// Three structures share the frame index space:
/// - `frames[i]` is the page memory itself,
/// - `descriptors[i]` records which page occupies frame `i`, its pin count
///   and dirty flag,
/// - `lru` orders the indices by recency, tail = eviction victim.
///
/// A hash index maps the packed [`PageTag::key`] of every resident page to
/// its frame index; a descriptor without a tag is never in the index.
///
/// # Single ownership
///
/// The pool is built for a single-threaded owner: every operation takes
/// `&mut self`, completes synchronously, and fires at most one
/// materialize and one flush hook before returning.
pub struct PagePool<Io> {
    io: Io,
    frames: Vec<PageData>,
    descriptors: Vec<Descriptor>,
    lru: LruList,
    page_table: HashMap<u64, usize>,
}

impl<Io: PageIo> PagePool<Io> {
    /// Creates a pool with `page_sum` frames backed by `io`.
    ///
    /// # Panics
    ///
    /// Panics if `page_sum` is 0.
    pub fn new(page_sum: usize, io: Io) -> Self {
        assert!(page_sum > 0, "page_sum must be > 0");
        Self {
            io,
            frames: (0..page_sum).map(|_| PageData::zeroed()).collect(),
            descriptors: (0..page_sum).map(|_| Descriptor::new()).collect(),
            lru: LruList::new(page_sum),
            page_table: HashMap::with_capacity(page_sum),
        }
    }

    /// Returns the frame holding page `page_no` of `fd`, loading it on a
    /// miss.
    ///
    /// A hit promotes the frame to most-recently-used and returns it
    /// directly; no hook fires. A miss claims the least recently used
    /// frame: the old occupant is flushed if dirty and dropped from the
    /// index, then the new page is materialized into the frame.
    ///
    /// Returns `None` when the victim frame is pinned, which with a fully
    /// pinned pool means no frame is eligible; the pool is left untouched
    /// in that case and the caller decides how to proceed.
    ///
    /// The returned slice borrows the pool, so the borrow checker already
    /// prevents holding it across another pool call. A caller that needs a
    /// page to stay resident across calls must [`pin`](Self::pin) it.
    pub fn get_page_data(&mut self, fd: FileId, page_no: PageNo) -> Option<&mut [u8]> {
        let tag = PageTag::new(fd, page_no);
        if let Some(&frame) = self.page_table.get(&tag.key()) {
            self.lru.promote(frame);
            return Some(&mut self.frames[frame][..]);
        }

        let victim = self.lru.tail();
        if self.descriptors[victim].is_pinned() {
            return None;
        }

        if let Some(old) = self.descriptors[victim].tag {
            if self.descriptors[victim].dirty {
                self.io.flush(old.fd, old.page_no, &self.frames[victim]);
            }
            self.page_table.remove(&old.key());
        }

        // Bookkeeping is settled before materialization: the index and the
        // recency order already describe the new occupant when the hook runs.
        self.page_table.insert(tag.key(), victim);
        self.lru.promote(victim);
        self.descriptors[victim].assign(tag);
        self.io.materialize(fd, page_no, &mut self.frames[victim]);
        Some(&mut self.frames[victim][..])
    }

    /// Pins a resident page, excluding its frame from eviction.
    ///
    /// Pins stack: every `pin` must be matched by an `unpin` before the
    /// frame becomes evictable again.
    ///
    /// # Panics
    ///
    /// Panics if the page is not resident; pinning a page that was never
    /// loaded (or already evicted) is a caller bug.
    pub fn pin(&mut self, fd: FileId, page_no: PageNo) {
        let frame = self.resident_frame(fd, page_no);
        self.descriptors[frame].pin();
    }

    /// Releases one pin of a resident page.
    ///
    /// # Panics
    ///
    /// Panics if the page is not resident or not pinned.
    pub fn unpin(&mut self, fd: FileId, page_no: PageNo) {
        let frame = self.resident_frame(fd, page_no);
        self.descriptors[frame].unpin();
    }

    /// Marks a resident page as modified, so its frame is flushed before
    /// reuse.
    ///
    /// # Panics
    ///
    /// Panics if the page is not resident.
    pub fn mark_dirty(&mut self, fd: FileId, page_no: PageNo) {
        let frame = self.resident_frame(fd, page_no);
        self.descriptors[frame].dirty = true;
    }

    /// Returns the number of frames in the pool.
    pub fn page_sum(&self) -> usize {
        self.frames.len()
    }

    /// Returns the number of pages currently resident.
    pub fn resident_pages(&self) -> usize {
        self.page_table.len()
    }

    /// Returns the page I/O hooks the pool was built with.
    pub fn io(&self) -> &Io {
        &self.io
    }

    /// Mutable access to the page I/O hooks.
    ///
    /// Mutating backing content this way bypasses the cache; resident pages
    /// keep whatever the pool last materialized.
    pub fn io_mut(&mut self) -> &mut Io {
        &mut self.io
    }

    fn resident_frame(&self, fd: FileId, page_no: PageNo) -> usize {
        let tag = PageTag::new(fd, page_no);
        match self.page_table.get(&tag.key()) {
            Some(&frame) => frame,
            None => panic!("page ({fd:?}, {page_no:?}) is not resident in the pool"),
        }
    }
}
