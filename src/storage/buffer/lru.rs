//! Recency ordering for the buffer pool's frames.

/// Circular doubly-linked recency list over node indices.
///
/// The list owns no payload; it orders the indices `0..len` that the pool
/// uses for descriptors and frames alike. `head` is the most recently used
/// node and `tail` the least recently used; the ring is closed, so
/// `tail.next == head` and `head.prev == tail` at all times.
///
/// Nodes are never inserted or removed after construction, only promoted,
/// which keeps every splice O(1) and the ring always complete.
pub(super) struct LruList {
    links: Vec<Link>,
    head: usize,
    tail: usize,
}

struct Link {
    prev: usize,
    next: usize,
}

impl LruList {
    /// Builds a ring over `len` nodes with node 0 as head and `len - 1`
    /// as tail.
    ///
    /// # Panics
    ///
    /// Panics if `len` is 0.
    pub fn new(len: usize) -> Self {
        assert!(len > 0, "recency list needs at least one node");
        let links = (0..len)
            .map(|i| Link {
                prev: (i + len - 1) % len,
                next: (i + 1) % len,
            })
            .collect();
        Self {
            links,
            head: 0,
            tail: len - 1,
        }
    }

    /// Least recently used node; the eviction victim.
    pub fn tail(&self) -> usize {
        self.tail
    }

    /// Moves node `n` to the head position.
    ///
    /// Promoting the head is a no-op. Promoting the tail just rotates the
    /// ring. Any other node is detached and re-inserted between the current
    /// tail and head.
    pub fn promote(&mut self, n: usize) {
        if n == self.head {
            return;
        }
        if n == self.tail {
            self.tail = self.links[n].prev;
            self.head = n;
            return;
        }
        // detach
        let (prev, next) = (self.links[n].prev, self.links[n].next);
        self.links[prev].next = next;
        self.links[next].prev = prev;
        // re-insert between tail and head
        self.links[n].prev = self.tail;
        self.links[n].next = self.head;
        self.links[self.tail].next = n;
        self.links[self.head].prev = n;
        self.head = n;
    }
}
