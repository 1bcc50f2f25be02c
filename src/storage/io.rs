//! Page materialization and flush hooks.
//!
//! The buffer pool never performs I/O itself; it drives the two hooks of
//! the [`PageIo`] trait at well-defined points of its replacement cycle.

mod memory;

pub use memory::MemoryIo;

use super::page::{FileId, PageNo};

/// The pair of hooks the buffer pool uses to move page content in and out
/// of frames.
///
/// # Contract
///
/// - `materialize` is invoked once per cache miss, after the pool has
///   claimed a frame for the page and updated its bookkeeping. The
///   implementation fills `frame` with the page's backing content.
/// - `flush` is invoked before a dirty victim's frame is reused. The
///   implementation writes `frame` back to the backing store.
/// - Both hooks are total: there is no failure channel at this seam. An
///   adapter that can fail must handle or stage its errors internally.
/// - Hooks must not call back into the pool that invoked them. The pool
///   owns its `PageIo` value, so the borrow checker already rules out
///   re-entry in safe code.
pub trait PageIo {
    /// Fills `frame` with the backing content of page `page_no` of `fd`.
    fn materialize(&mut self, fd: FileId, page_no: PageNo, frame: &mut [u8]);

    /// Writes `frame` back as the content of page `page_no` of `fd`.
    fn flush(&mut self, fd: FileId, page_no: PageNo, frame: &[u8]);
}
