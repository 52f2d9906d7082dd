use std::collections::HashSet;

use waypath_core::{Arc, Node};

use crate::error::SearchError;

/// Arc cost model consumed by the searches.
///
/// Implemented for every `Fn(Arc) -> f64`, so plain closures work. Must be
/// side-effect free and stable for a given arc during one run.
pub trait ArcCost {
    /// Raw cost of `arc`, validated against the active
    /// [`DijkstraMode`](crate::DijkstraMode) on every relaxation.
    fn cost(&self, arc: Arc) -> f64;

    /// Cost actually used to relax `arc` when walking it from `from` to
    /// `to`, given its validated raw cost. Defaults to the raw cost.
    #[inline]
    fn traversal(&self, arc: Arc, from: Node, to: Node, raw: f64) -> f64 {
        let _ = (arc, from, to);
        raw
    }
}

impl<F: Fn(Arc) -> f64> ArcCost for F {
    #[inline]
    fn cost(&self, arc: Arc) -> f64 {
        self(arc)
    }
}

/// Estimate of the remaining cost from a node to the target.
///
/// Must never overestimate (admissible) for A* to return optimal paths;
/// this is not checked.
pub trait Heuristic {
    fn estimate(&self, node: Node) -> f64;
}

impl<F: Fn(Node) -> f64> Heuristic for F {
    #[inline]
    fn estimate(&self, node: Node) -> f64 {
        self(node)
    }
}

/// A search that can be advanced one fixed node at a time.
pub trait Stepper {
    /// Fix one more node and return it, or `None` once nothing reachable
    /// remains.
    fn step(&mut self) -> Result<Option<Node>, SearchError>;
}

/// A cost model with some arcs and nodes removed: walking a banned arc, or
/// into a banned node, costs `+inf`.
pub(crate) struct Restricted<'a, C: ?Sized> {
    cost: &'a C,
    pub(crate) nodes: HashSet<Node>,
    pub(crate) arcs: HashSet<Arc>,
}

impl<'a, C: ArcCost + ?Sized> Restricted<'a, C> {
    pub(crate) fn new(cost: &'a C) -> Self {
        Self {
            cost,
            nodes: HashSet::new(),
            arcs: HashSet::new(),
        }
    }
}

impl<C: ArcCost + ?Sized> ArcCost for Restricted<'_, C> {
    #[inline]
    fn cost(&self, arc: Arc) -> f64 {
        self.cost.cost(arc)
    }

    fn traversal(&self, arc: Arc, from: Node, to: Node, raw: f64) -> f64 {
        if self.arcs.contains(&arc) || self.nodes.contains(&to) {
            f64::INFINITY
        } else {
            self.cost.traversal(arc, from, to, raw)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_are_costs() {
        let c = |arc: Arc| arc.id() as f64 * 2.0;
        assert_eq!(c.cost(Arc::new(3)), 6.0);
        assert_eq!(c.traversal(Arc::new(3), Node::new(0), Node::new(1), 6.0), 6.0);
        let h = |node: Node| node.id() as f64;
        assert_eq!(h.estimate(Node::new(4)), 4.0);
    }

    #[test]
    fn restricted_bans_arcs_and_nodes() {
        let base = |_: Arc| 1.0;
        let mut r = Restricted::new(&base);
        r.arcs.insert(Arc::new(0));
        r.nodes.insert(Node::new(5));
        let (a, b) = (Node::new(1), Node::new(2));
        assert_eq!(r.cost(Arc::new(0)), 1.0);
        assert_eq!(r.traversal(Arc::new(0), a, b, 1.0), f64::INFINITY);
        assert_eq!(r.traversal(Arc::new(1), a, Node::new(5), 1.0), f64::INFINITY);
        assert_eq!(r.traversal(Arc::new(1), Node::new(5), a, 1.0), 1.0);
    }
}
