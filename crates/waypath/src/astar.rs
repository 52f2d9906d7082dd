//! A* search as a reweighted Dijkstra.
//!
//! Every arc `u -> v` is relaxed with `cost - h(u) + h(v)` and sources are
//! seeded with `h(source)`, so the frontier is ordered by `g + h`. Distances
//! reported to callers have the heuristic subtracted again.

use waypath_core::{Arc, CancelToken, Graph, Node};

use crate::dijkstra::Dijkstra;
use crate::error::SearchError;
use crate::mode::DijkstraMode;
use crate::pacing::Pacing;
use crate::path::Path;
use crate::traits::{ArcCost, Heuristic, Stepper};

struct Reweighted<C, H> {
    cost: C,
    heuristic: H,
}

impl<C: ArcCost, H: Heuristic> ArcCost for Reweighted<C, H> {
    #[inline]
    fn cost(&self, arc: Arc) -> f64 {
        self.cost.cost(arc)
    }

    #[inline]
    fn traversal(&self, arc: Arc, from: Node, to: Node, raw: f64) -> f64 {
        self.cost.traversal(arc, from, to, raw) - self.heuristic.estimate(from)
            + self.heuristic.estimate(to)
    }
}

/// Heuristic-guided shortest paths (Sum mode).
///
/// The heuristic estimates the remaining cost from a node to the target
/// and should be finite for every node that can lie on a path. It must be
/// admissible (never overestimate) for the result to be optimal. This is
/// not checked: an inadmissible heuristic still yields a valid path, which
/// may be more expensive than the optimum.
pub struct AStar<'g, G: Graph + ?Sized, C: ArcCost, H: Heuristic> {
    inner: Dijkstra<'g, G, Reweighted<C, H>>,
}

impl<'g, G: Graph + ?Sized, C: ArcCost, H: Heuristic> AStar<'g, G, C, H> {
    pub fn new(graph: &'g G, cost: C, heuristic: H) -> Self {
        Self {
            inner: Dijkstra::new(graph, Reweighted { cost, heuristic }, DijkstraMode::Sum),
        }
    }

    #[inline]
    fn h(&self, node: Node) -> f64 {
        self.inner.cost_fn().heuristic.estimate(node)
    }

    /// Add a source with cost 0. Fails if it is already reached.
    pub fn add_source(&mut self, node: Node) -> Result<(), SearchError> {
        if !self.inner.graph().has_node(node) {
            return Err(SearchError::UnknownNode(node));
        }
        self.inner.add_source_with_cost(node, self.h(node))
    }

    /// Fix the node with the smallest `g + h`.
    pub fn step(&mut self) -> Result<Option<Node>, SearchError> {
        Stepper::step(self)
    }

    /// Search until `target` is fixed. Returns `None` if it is unreachable.
    pub fn run_until_reached(&mut self, target: Node) -> Result<Option<Node>, SearchError> {
        self.inner.run_until_fixed(target)
    }

    /// [`run_until_reached`](Self::run_until_reached) with cooperative
    /// pacing and cancellation; see [`Dijkstra::run_paced`].
    pub fn run_until_reached_paced(
        &mut self,
        target: Node,
        pacing: Pacing,
        token: &CancelToken,
        on_yield: impl FnMut(u64),
    ) -> Result<Option<Node>, SearchError> {
        self.inner.run_until_fixed_paced(target, pacing, token, on_yield)
    }

    pub fn reached(&self, node: Node) -> bool {
        self.inner.reached(node)
    }

    pub fn fixed(&self, node: Node) -> bool {
        self.inner.fixed(node)
    }

    /// Best known cost from a source to `node`, heuristic excluded; `+inf`
    /// if unreached.
    pub fn distance(&self, node: Node) -> f64 {
        if !self.inner.reached(node) {
            return f64::INFINITY;
        }
        self.inner.distance(node) - self.h(node)
    }

    pub fn parent_arc(&self, node: Node) -> Option<Arc> {
        self.inner.parent_arc(node)
    }

    pub fn path(&self, node: Node) -> Option<Path> {
        self.inner.path(node)
    }

    /// See [`Dijkstra::path_into`].
    pub fn path_into(&self, node: Node, buf: &mut [Node]) -> isize {
        self.inner.path_into(node, buf)
    }

    pub fn fixed_count(&self) -> usize {
        self.inner.fixed_count()
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }
}

impl<G: Graph + ?Sized, C: ArcCost, H: Heuristic> Stepper for AStar<'_, G, C, H> {
    fn step(&mut self) -> Result<Option<Node>, SearchError> {
        self.inner.step()
    }
}
