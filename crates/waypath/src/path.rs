use std::collections::VecDeque;
use std::fmt;

use waypath_core::{Arc, Node};

use crate::mode::DijkstraMode;
use crate::traits::ArcCost;

/// An ordered walk: `node(0) --arc(0)--> node(1) ... node(n-1)`.
///
/// Always holds at least one node and exactly one arc fewer than nodes.
/// Searches build paths backward from the target with [`push_front`]
/// and callers receive them forward; both ends extend in amortized O(1).
///
/// [`push_front`]: Self::push_front
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path {
    nodes: VecDeque<Node>,
    arcs: VecDeque<Arc>,
}

impl Path {
    /// A path consisting of a single node and no arcs.
    pub fn trivial(node: Node) -> Self {
        Self {
            nodes: VecDeque::from([node]),
            arcs: VecDeque::new(),
        }
    }

    /// Prepend `node`, joined to the current first node by `arc`.
    pub(crate) fn push_front(&mut self, arc: Arc, node: Node) {
        self.arcs.push_front(arc);
        self.nodes.push_front(node);
    }

    /// Append `node`, joined to the current last node by `arc`.
    pub(crate) fn push_back(&mut self, arc: Arc, node: Node) {
        self.arcs.push_back(arc);
        self.nodes.push_back(node);
    }

    /// Append `tail`, whose first node must equal this path's last node.
    pub(crate) fn extend(&mut self, tail: &Path) {
        debug_assert_eq!(self.last(), tail.first());
        for (arc, &node) in tail.arcs.iter().zip(tail.nodes.iter().skip(1)) {
            self.push_back(*arc, node);
        }
    }

    /// The first `len` nodes (and the arcs between them) as a new path.
    pub(crate) fn prefix(&self, len: usize) -> Path {
        debug_assert!(len >= 1 && len <= self.nodes.len());
        Self {
            nodes: self.nodes.iter().take(len).copied().collect(),
            arcs: self.arcs.iter().take(len - 1).copied().collect(),
        }
    }

    #[inline]
    pub fn first(&self) -> Node {
        self.nodes[0]
    }

    #[inline]
    pub fn last(&self) -> Node {
        self.nodes[self.nodes.len() - 1]
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn arc_count(&self) -> usize {
        self.arcs.len()
    }

    /// Nodes in order, first to last.
    pub fn nodes(&self) -> impl ExactSizeIterator<Item = Node> + '_ {
        self.nodes.iter().copied()
    }

    /// Arcs in order, first to last.
    pub fn arcs(&self) -> impl ExactSizeIterator<Item = Arc> + '_ {
        self.arcs.iter().copied()
    }

    #[inline]
    pub fn node(&self, i: usize) -> Option<Node> {
        self.nodes.get(i).copied()
    }

    #[inline]
    pub fn arc(&self, i: usize) -> Option<Arc> {
        self.arcs.get(i).copied()
    }

    /// The arc leaving the first occurrence of `node` along this path.
    pub fn next_arc(&self, node: Node) -> Option<Arc> {
        let i = self.nodes.iter().position(|&x| x == node)?;
        self.arcs.get(i).copied()
    }

    /// The arc entering the first occurrence of `node` along this path.
    pub fn prev_arc(&self, node: Node) -> Option<Arc> {
        let i = self.nodes.iter().position(|&x| x == node)?;
        i.checked_sub(1).map(|j| self.arcs[j])
    }

    pub fn contains_node(&self, node: Node) -> bool {
        self.nodes.contains(&node)
    }

    /// A closed walk with at least one arc.
    pub fn is_cycle(&self) -> bool {
        !self.arcs.is_empty() && self.first() == self.last()
    }

    /// Whether no node repeats.
    pub fn is_simple(&self) -> bool {
        let mut seen = std::collections::HashSet::with_capacity(self.nodes.len());
        self.nodes.iter().all(|&n| seen.insert(n))
    }

    /// Aggregate cost under `mode`. Any `+inf` arc makes the whole path
    /// `+inf`.
    pub fn total_cost<C: ArcCost + ?Sized>(&self, cost: &C, mode: DijkstraMode) -> f64 {
        let mut acc = mode.identity();
        for &arc in &self.arcs {
            let c = cost.cost(arc);
            if c == f64::INFINITY {
                return f64::INFINITY;
            }
            acc = mode.combine(acc, c);
        }
        acc
    }

    /// The node sequence as a vector.
    pub fn to_node_vec(&self) -> Vec<Node> {
        self.nodes.iter().copied().collect()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, node) in self.nodes.iter().enumerate() {
            if i > 0 {
                f.write_str(" -> ")?;
            }
            write!(f, "{node}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(id: u64) -> Node {
        Node::new(id)
    }

    fn a(id: u64) -> Arc {
        Arc::new(id)
    }

    fn sample() -> Path {
        // 1 -a10-> 2 -a11-> 3, built from the back as searches do.
        let mut p = Path::trivial(n(3));
        p.push_front(a(11), n(2));
        p.push_front(a(10), n(1));
        p
    }

    #[test]
    fn front_construction_reads_forward() {
        let p = sample();
        assert_eq!(p.first(), n(1));
        assert_eq!(p.last(), n(3));
        assert_eq!(p.to_node_vec(), vec![n(1), n(2), n(3)]);
        assert_eq!(p.arcs().collect::<Vec<_>>(), vec![a(10), a(11)]);
        assert_eq!(p.to_string(), "#1 -> #2 -> #3");
    }

    #[test]
    fn arc_lookup_by_node() {
        let p = sample();
        assert_eq!(p.next_arc(n(1)), Some(a(10)));
        assert_eq!(p.next_arc(n(2)), Some(a(11)));
        assert_eq!(p.next_arc(n(3)), None);
        assert_eq!(p.prev_arc(n(1)), None);
        assert_eq!(p.prev_arc(n(3)), Some(a(11)));
        assert_eq!(p.next_arc(n(7)), None);
    }

    #[test]
    fn prefix_and_extend() {
        let p = sample();
        let root = p.prefix(2);
        assert_eq!(root.to_node_vec(), vec![n(1), n(2)]);
        assert_eq!(root.arc_count(), 1);

        let mut tail = Path::trivial(n(2));
        tail.push_back(a(12), n(4));
        let mut joined = root.clone();
        joined.extend(&tail);
        assert_eq!(joined.to_node_vec(), vec![n(1), n(2), n(4)]);
        assert_eq!(joined.arcs().collect::<Vec<_>>(), vec![a(10), a(12)]);
    }

    #[test]
    fn costs_by_mode() {
        let p = sample();
        let cost = |arc: Arc| if arc == a(10) { 2.0 } else { 1.0 };
        assert_eq!(p.total_cost(&cost, DijkstraMode::Sum), 3.0);
        assert_eq!(p.total_cost(&cost, DijkstraMode::Maximum), 2.0);
        let blocked = |arc: Arc| if arc == a(11) { f64::INFINITY } else { 1.0 };
        assert_eq!(p.total_cost(&blocked, DijkstraMode::Maximum), f64::INFINITY);
        assert_eq!(Path::trivial(n(1)).total_cost(&cost, DijkstraMode::Sum), 0.0);
    }

    #[test]
    fn cycle_and_simplicity() {
        let mut p = sample();
        assert!(p.is_simple());
        assert!(!p.is_cycle());
        p.push_back(a(13), n(1));
        assert!(p.is_cycle());
        assert!(!p.is_simple());
        assert!(!Path::trivial(n(1)).is_cycle());
    }
}
