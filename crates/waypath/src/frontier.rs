//! Decrease-key priority frontier.
//!
//! Nodes are stored in a min-heap keyed by `(priority, tie)`. Updating a
//! node pushes a fresh entry; the superseded one stays in the heap and is
//! recognised as stale (its sequence number no longer matches the live one)
//! and discarded when it surfaces.

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap};
use std::marker::PhantomData;

use waypath_core::Node;

/// Secondary ordering among nodes of equal priority.
pub trait TieBreak {
    /// Tie key for `node`; `seq` increases with every insertion.
    fn key(node: Node, seq: u64) -> u64;
}

/// Equal priorities pop in insertion order (FIFO).
#[derive(Debug, Clone, Copy, Default)]
pub struct InsertionOrder;

impl TieBreak for InsertionOrder {
    #[inline]
    fn key(_node: Node, seq: u64) -> u64 {
        seq
    }
}

/// Equal priorities pop in ascending node id, independent of insertion
/// history.
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeIdOrder;

impl TieBreak for NodeIdOrder {
    #[inline]
    fn key(node: Node, _seq: u64) -> u64 {
        node.id()
    }
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    priority: f64,
    tie: u64,
    seq: u64,
    node: Node,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority
            .total_cmp(&other.priority)
            .then(self.tie.cmp(&other.tie))
            .then(self.seq.cmp(&other.seq))
    }
}

/// A priority frontier mapping node → priority.
pub struct Frontier<O: TieBreak = InsertionOrder> {
    heap: BinaryHeap<Reverse<Entry>>,
    // node -> (sequence number of its live entry, priority)
    live: HashMap<Node, (u64, f64)>,
    seq: u64,
    _order: PhantomData<O>,
}

impl<O: TieBreak> Frontier<O> {
    /// Create an empty frontier.
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            live: HashMap::new(),
            seq: 0,
            _order: PhantomData,
        }
    }

    /// Insert `node`, or move it to `priority` if already present
    /// (increase or decrease).
    pub fn set(&mut self, node: Node, priority: f64) {
        let seq = self.seq;
        self.seq += 1;
        self.live.insert(node, (seq, priority));
        self.heap.push(Reverse(Entry {
            priority,
            tie: O::key(node, seq),
            seq,
            node,
        }));
        if self.heap.len() > 4 * self.live.len() + 64 {
            self.compact();
        }
    }

    /// Current priority of `node`, if it is in the frontier.
    #[inline]
    pub fn priority(&self, node: Node) -> Option<f64> {
        self.live.get(&node).map(|&(_, p)| p)
    }

    /// Whether `node` is in the frontier.
    #[inline]
    pub fn contains(&self, node: Node) -> bool {
        self.live.contains_key(&node)
    }

    /// The minimum node and its priority, without removing it.
    pub fn peek(&mut self) -> Option<(Node, f64)> {
        self.discard_stale();
        self.heap.peek().map(|Reverse(e)| (e.node, e.priority))
    }

    /// Remove and return the minimum node and its priority.
    pub fn pop(&mut self) -> Option<(Node, f64)> {
        self.discard_stale();
        let Reverse(e) = self.heap.pop()?;
        self.live.remove(&e.node);
        Some((e.node, e.priority))
    }

    /// Remove `node`, returning its priority if it was present.
    pub fn remove(&mut self, node: Node) -> Option<f64> {
        self.live.remove(&node).map(|(_, p)| p)
    }

    /// Number of nodes in the frontier (stale heap entries excluded).
    #[inline]
    pub fn len(&self) -> usize {
        self.live.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Remove every node.
    pub fn clear(&mut self) {
        self.heap.clear();
        self.live.clear();
        self.seq = 0;
    }

    fn is_live(&self, e: &Entry) -> bool {
        matches!(self.live.get(&e.node), Some(&(seq, _)) if seq == e.seq)
    }

    fn discard_stale(&mut self) {
        while let Some(Reverse(top)) = self.heap.peek() {
            if self.is_live(top) {
                break;
            }
            self.heap.pop();
        }
    }

    // Rebuild the heap from the live entries only.
    fn compact(&mut self) {
        self.heap = self
            .live
            .iter()
            .map(|(&node, &(seq, priority))| {
                Reverse(Entry {
                    priority,
                    tie: O::key(node, seq),
                    seq,
                    node,
                })
            })
            .collect();
    }
}

impl<O: TieBreak> Default for Frontier<O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: TieBreak> std::fmt::Debug for Frontier<O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frontier")
            .field("len", &self.live.len())
            .field("heap_len", &self.heap.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(id: u64) -> Node {
        Node::new(id)
    }

    #[test]
    fn pops_in_priority_order() {
        let mut f: Frontier = Frontier::new();
        f.set(n(1), 3.0);
        f.set(n(2), 1.0);
        f.set(n(3), 2.0);
        assert_eq!(f.len(), 3);
        assert_eq!(f.pop(), Some((n(2), 1.0)));
        assert_eq!(f.pop(), Some((n(3), 2.0)));
        assert_eq!(f.pop(), Some((n(1), 3.0)));
        assert_eq!(f.pop(), None);
        assert!(f.is_empty());
    }

    #[test]
    fn decrease_and_increase_key() {
        let mut f: Frontier = Frontier::new();
        f.set(n(1), 5.0);
        f.set(n(2), 4.0);
        f.set(n(1), 1.0);
        assert_eq!(f.len(), 2);
        assert_eq!(f.peek(), Some((n(1), 1.0)));

        f.set(n(1), 9.0);
        assert_eq!(f.priority(n(1)), Some(9.0));
        assert_eq!(f.pop(), Some((n(2), 4.0)));
        // The two superseded entries for node 1 must not resurface.
        assert_eq!(f.pop(), Some((n(1), 9.0)));
        assert_eq!(f.pop(), None);
    }

    #[test]
    fn removed_nodes_are_skipped() {
        let mut f: Frontier = Frontier::new();
        f.set(n(1), 1.0);
        f.set(n(2), 2.0);
        assert_eq!(f.remove(n(1)), Some(1.0));
        assert!(!f.contains(n(1)));
        assert_eq!(f.pop(), Some((n(2), 2.0)));
        assert_eq!(f.pop(), None);
    }

    #[test]
    fn insertion_order_ties() {
        let mut f: Frontier<InsertionOrder> = Frontier::new();
        f.set(n(9), 1.0);
        f.set(n(3), 1.0);
        f.set(n(5), 1.0);
        assert_eq!(f.pop().map(|(x, _)| x), Some(n(9)));
        assert_eq!(f.pop().map(|(x, _)| x), Some(n(3)));
        assert_eq!(f.pop().map(|(x, _)| x), Some(n(5)));
    }

    #[test]
    fn node_id_ties() {
        let mut f: Frontier<NodeIdOrder> = Frontier::new();
        f.set(n(9), 1.0);
        f.set(n(3), 1.0);
        f.set(n(5), 1.0);
        f.set(n(1), 0.5);
        assert_eq!(f.pop().map(|(x, _)| x), Some(n(1)));
        assert_eq!(f.pop().map(|(x, _)| x), Some(n(3)));
        assert_eq!(f.pop().map(|(x, _)| x), Some(n(5)));
        assert_eq!(f.pop().map(|(x, _)| x), Some(n(9)));
    }

    #[test]
    fn infinity_sorts_last() {
        let mut f: Frontier = Frontier::new();
        f.set(n(1), f64::INFINITY);
        f.set(n(2), 1e300);
        assert_eq!(f.pop(), Some((n(2), 1e300)));
        assert_eq!(f.pop(), Some((n(1), f64::INFINITY)));
    }

    #[test]
    fn many_updates_compact_heap() {
        let mut f: Frontier = Frontier::new();
        for round in 0..200 {
            for id in 0..4 {
                f.set(n(id), (1000 - round) as f64 + id as f64);
            }
        }
        assert_eq!(f.len(), 4);
        assert!(f.heap.len() <= 4 * 4 + 64 + 1);
        let order: Vec<_> = std::iter::from_fn(|| f.pop()).map(|(x, _)| x).collect();
        assert_eq!(order, vec![n(0), n(1), n(2), n(3)]);
    }

    #[test]
    fn clear_resets() {
        let mut f: Frontier = Frontier::new();
        f.set(n(1), 1.0);
        f.clear();
        assert!(f.is_empty());
        assert_eq!(f.peek(), None);
    }
}
