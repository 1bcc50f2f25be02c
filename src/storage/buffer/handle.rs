//! Scoped page accessor with pin release on drop.

use crate::storage::io::PageIo;
use crate::storage::page::{FileId, PageNo};

use super::pool::PagePool;

/// Accessor for one page of one file, bound to a borrowed pool.
///
/// The handle remembers whether it pinned its page and releases that pin
/// when it goes out of scope, on every exit path. Callers that bail out
/// early (including via `?`) therefore never leak a pin.
///
/// # Example
///
/// ```
/// use keeldb::storage::{FileId, MemoryIo, PageHandle, PageNo, PagePool};
///
/// let mut pool = PagePool::new(4, MemoryIo::new());
/// let mut handle = PageHandle::new(&mut pool, FileId::new(1), PageNo::new(0));
/// handle.data().unwrap()[0] = 42;
/// handle.pin();
/// // dropping the handle releases the pin
/// ```
pub struct PageHandle<'a, Io: PageIo> {
    pool: &'a mut PagePool<Io>,
    fd: FileId,
    page_no: PageNo,
    pinned: bool,
}

impl<'a, Io: PageIo> PageHandle<'a, Io> {
    /// Binds a handle to page `page_no` of `fd`.
    ///
    /// Binding is cheap and touches nothing in the pool; the page is only
    /// loaded when [`data`](Self::data) is called.
    pub fn new(pool: &'a mut PagePool<Io>, fd: FileId, page_no: PageNo) -> Self {
        Self {
            pool,
            fd,
            page_no,
            pinned: false,
        }
    }

    /// Returns the page number this handle is bound to.
    pub fn page_no(&self) -> PageNo {
        self.page_no
    }

    /// Fetches the page's frame from the pool, loading the page on a miss.
    ///
    /// Returns `None` when the pool has no eligible eviction victim.
    pub fn data(&mut self) -> Option<&mut [u8]> {
        self.pool.get_page_data(self.fd, self.page_no)
    }

    /// Pins the page and remembers the pin for release on drop.
    ///
    /// Not idempotent: pinning twice stacks two pins in the pool, of which
    /// drop releases one.
    ///
    /// # Panics
    ///
    /// Panics if the page is not resident; call [`data`](Self::data) first.
    pub fn pin(&mut self) {
        self.pinned = true;
        self.pool.pin(self.fd, self.page_no);
    }

    /// Releases the handle's pin ahead of drop.
    ///
    /// # Panics
    ///
    /// Panics if the page is not resident or not pinned.
    pub fn unpin(&mut self) {
        self.pinned = false;
        self.pool.unpin(self.fd, self.page_no);
    }
}

impl<Io: PageIo> Drop for PageHandle<'_, Io> {
    fn drop(&mut self) {
        if self.pinned {
            self.pool.unpin(self.fd, self.page_no);
        }
    }
}
