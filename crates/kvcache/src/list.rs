//! Recency list for the LRU cache
//!
//! Doubly linked list stored in an arena: nodes refer to each other by index.
//! Slots 0 and 1 are the head and tail sentinels, so linking at either end
//! never has to special-case an empty list. Freed slots are recycled through
//! a free list.

use kvtable::Result;

const HEAD: usize = 0;
const TAIL: usize = 1;

/// Handle to a live node in a [`RecencyList`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(usize);

#[derive(Debug, Clone)]
struct Node {
    key: i64,
    value: i64,
    prev: usize,
    next: usize,
}

impl Node {
    fn sentinel() -> Self {
        Node {
            key: 0,
            value: 0,
            prev: HEAD,
            next: TAIL,
        }
    }
}

/// Entries ordered from most- to least-recently used
#[derive(Debug, Clone)]
pub(crate) struct RecencyList {
    nodes: Vec<Node>,
    free_list: Vec<usize>,
    len: usize,
}

impl RecencyList {
    pub(crate) fn new() -> Self {
        Self {
            nodes: vec![Node::sentinel(), Node::sentinel()],
            free_list: Vec::new(),
            len: 0,
        }
    }

    /// Make sure the next `additional` pushes will not allocate
    pub(crate) fn reserve(&mut self, additional: usize) -> Result<()> {
        let missing = additional.saturating_sub(self.free_list.len());
        self.nodes.try_reserve(missing)?;
        Ok(())
    }

    /// Insert a new most-recently-used entry
    pub(crate) fn push_front(&mut self, key: i64, value: i64) -> NodeId {
        let node = Node {
            key,
            value,
            prev: HEAD,
            next: HEAD,
        };
        let idx = match self.free_list.pop() {
            Some(idx) => {
                self.nodes[idx] = node;
                idx
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        };

        self.link_front(idx);
        self.len += 1;
        NodeId(idx)
    }

    /// Relocate a live node to the most-recently-used position
    pub(crate) fn move_to_front(&mut self, id: NodeId) {
        if self.nodes[HEAD].next == id.0 {
            return;
        }
        self.unlink(id.0);
        self.link_front(id.0);
    }

    /// Detach and return the least-recently-used entry
    pub(crate) fn pop_back(&mut self) -> Option<(i64, i64)> {
        if self.len == 0 {
            return None;
        }

        let idx = self.nodes[TAIL].prev;
        self.unlink(idx);
        self.free_list.push(idx);
        self.len -= 1;

        let node = &self.nodes[idx];
        Some((node.key, node.value))
    }

    pub(crate) fn value(&self, id: NodeId) -> i64 {
        self.nodes[id.0].value
    }

    pub(crate) fn set_value(&mut self, id: NodeId, value: i64) {
        self.nodes[id.0].value = value;
    }

    /// Least-recently-used entry, without touching recency
    pub(crate) fn back(&self) -> Option<(i64, i64)> {
        self.iter().next_back()
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Drop every entry; the arena keeps its allocation
    pub(crate) fn clear(&mut self) {
        self.nodes.truncate(2);
        self.nodes[HEAD] = Node::sentinel();
        self.nodes[TAIL] = Node::sentinel();
        self.free_list.clear();
        self.len = 0;
    }

    /// Walk from most- to least-recently used; `.rev()` walks the other way
    pub(crate) fn iter(&self) -> Iter<'_> {
        Iter {
            list: self,
            front: self.nodes[HEAD].next,
            back: self.nodes[TAIL].prev,
            remaining: self.len,
        }
    }

    fn link_front(&mut self, idx: usize) {
        let first = self.nodes[HEAD].next;
        self.nodes[idx].prev = HEAD;
        self.nodes[idx].next = first;
        self.nodes[first].prev = idx;
        self.nodes[HEAD].next = idx;
    }

    fn unlink(&mut self, idx: usize) {
        let Node { prev, next, .. } = self.nodes[idx];
        self.nodes[prev].next = next;
        self.nodes[next].prev = prev;
    }
}

/// Iterator over `(key, value)` pairs in recency order
pub struct Iter<'a> {
    list: &'a RecencyList,
    front: usize,
    back: usize,
    remaining: usize,
}

impl Iterator for Iter<'_> {
    type Item = (i64, i64);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = &self.list.nodes[self.front];
        self.front = node.next;
        self.remaining -= 1;
        Some((node.key, node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl DoubleEndedIterator for Iter<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = &self.list.nodes[self.back];
        self.back = node.prev;
        self.remaining -= 1;
        Some((node.key, node.value))
    }
}

impl ExactSizeIterator for Iter<'_> {}
