//! Incremental Dijkstra search.
//!
//! The search is an explicit state machine: seed it with
//! [`add_source`](Dijkstra::add_source), advance it with
//! [`step`](Dijkstra::step) or one of the `run*` methods, and inspect the
//! reached/fixed sets between steps. Stopping early and resuming later is
//! always allowed.

use waypath_core::{Arc, ArcFilter, CancelToken, Graph, Node};

use crate::error::SearchError;
use crate::frontier::{InsertionOrder, NodeIdOrder, TieBreak};
use crate::mode::DijkstraMode;
use crate::pacing::{drive, Pacer, Pacing};
use crate::path::Path;
use crate::state::SearchState;
use crate::traits::{ArcCost, Stepper};

/// Single- or multi-source Dijkstra over forward arcs.
///
/// `O` picks how equal-cost frontier nodes are ordered; see
/// [`DeterministicDijkstra`].
pub struct Dijkstra<'g, G: Graph + ?Sized, C: ArcCost, O: TieBreak = InsertionOrder> {
    graph: &'g G,
    cost: C,
    mode: DijkstraMode,
    state: SearchState<O>,
}

/// Dijkstra whose frontier breaks cost ties by ascending node id, so the
/// fix order and the recorded parent arcs are reproducible run to run.
pub type DeterministicDijkstra<'g, G, C> = Dijkstra<'g, G, C, NodeIdOrder>;

impl<'g, G: Graph + ?Sized, C: ArcCost> Dijkstra<'g, G, C, InsertionOrder> {
    /// Create an empty search. Equal-cost nodes are fixed in the order they
    /// entered the frontier.
    pub fn new(graph: &'g G, cost: C, mode: DijkstraMode) -> Self {
        Self::with_order(graph, cost, mode)
    }
}

impl<'g, G: Graph + ?Sized, C: ArcCost> Dijkstra<'g, G, C, NodeIdOrder> {
    /// Create an empty deterministic search.
    pub fn deterministic(graph: &'g G, cost: C, mode: DijkstraMode) -> Self {
        Self::with_order(graph, cost, mode)
    }
}

impl<'g, G: Graph + ?Sized, C: ArcCost, O: TieBreak> Dijkstra<'g, G, C, O> {
    /// Create an empty search with an explicit tie-break strategy.
    pub fn with_order(graph: &'g G, cost: C, mode: DijkstraMode) -> Self {
        Self {
            graph,
            cost,
            mode,
            state: SearchState::new(),
        }
    }

    #[inline]
    pub fn graph(&self) -> &'g G {
        self.graph
    }

    #[inline]
    pub fn mode(&self) -> DijkstraMode {
        self.mode
    }

    #[inline]
    pub fn cost_fn(&self) -> &C {
        &self.cost
    }

    /// Add a source with the mode's identity cost.
    pub fn add_source(&mut self, node: Node) -> Result<(), SearchError> {
        self.add_source_with_cost(node, self.mode.identity())
    }

    /// Add a source with a custom starting cost.
    ///
    /// Fails with [`SearchError::AlreadyReached`] if `node` is already
    /// reached (as a source or otherwise).
    pub fn add_source_with_cost(&mut self, node: Node, cost: f64) -> Result<(), SearchError> {
        if !self.graph.has_node(node) {
            return Err(SearchError::UnknownNode(node));
        }
        self.state.add_source(node, cost)
    }

    /// Fix the cheapest frontier node and relax its outgoing arcs.
    ///
    /// Returns `None` once the frontier is empty or only holds `+inf` nodes.
    /// A rejected cost ends the search: this and every `run*` call fail
    /// with that error until [`clear`](Self::clear).
    pub fn step(&mut self) -> Result<Option<Node>, SearchError> {
        Stepper::step(self)
    }

    /// Step until the frontier is exhausted.
    pub fn run(&mut self) -> Result<(), SearchError> {
        drive(self, |_| false, None).map(|_| ())
    }

    /// Step until `target` is fixed. Returns `None` if it is unreachable.
    pub fn run_until_fixed(&mut self, target: Node) -> Result<Option<Node>, SearchError> {
        self.run_until_fixed_inner(target, None)
    }

    /// Step until a node satisfying `pred` gets fixed, and return it.
    /// Nodes fixed before this call are not considered.
    pub fn run_until_fixed_where(
        &mut self,
        pred: impl FnMut(Node) -> bool,
    ) -> Result<Option<Node>, SearchError> {
        drive(self, pred, None)
    }

    /// [`run`](Self::run) with cooperative pacing: every
    /// `pacing.yield_every()` steps `on_yield` is called with the step count,
    /// then `token` is polled. Cancellation surfaces as
    /// [`SearchError::Cancelled`] before any further state change; the
    /// search can be resumed afterwards.
    pub fn run_paced(
        &mut self,
        pacing: Pacing,
        token: &CancelToken,
        mut on_yield: impl FnMut(u64),
    ) -> Result<(), SearchError> {
        let mut pacer = Pacer::new(pacing, token, &mut on_yield);
        drive(self, |_| false, Some(&mut pacer)).map(|_| ())
    }

    /// [`run_until_fixed`](Self::run_until_fixed) with cooperative pacing.
    pub fn run_until_fixed_paced(
        &mut self,
        target: Node,
        pacing: Pacing,
        token: &CancelToken,
        mut on_yield: impl FnMut(u64),
    ) -> Result<Option<Node>, SearchError> {
        let mut pacer = Pacer::new(pacing, token, &mut on_yield);
        self.run_until_fixed_inner(target, Some(&mut pacer))
    }

    fn run_until_fixed_inner(
        &mut self,
        target: Node,
        pacer: Option<&mut Pacer<'_>>,
    ) -> Result<Option<Node>, SearchError> {
        if !self.graph.has_node(target) {
            return Err(SearchError::UnknownNode(target));
        }
        if let Some(e) = self.state.failure() {
            return Err(e.clone());
        }
        if self.state.fixed(target) {
            return Ok(Some(target));
        }
        drive(self, |n| n == target, pacer)
    }

    #[inline]
    fn check(&self, node: Node) {
        assert!(self.graph.has_node(node), "node {node} is not in the graph");
    }

    /// Whether `node` has a tentative cost (fixed nodes included).
    pub fn reached(&self, node: Node) -> bool {
        self.check(node);
        self.state.reached(node)
    }

    /// Whether `node`'s optimal cost is settled.
    pub fn fixed(&self, node: Node) -> bool {
        self.check(node);
        self.state.fixed(node)
    }

    /// Current best cost of `node`; `+inf` if unreached. Final once the
    /// node is fixed.
    pub fn distance(&self, node: Node) -> f64 {
        self.check(node);
        self.state.distance(node)
    }

    /// The arc through which `node` was reached; `None` for sources and
    /// unreached nodes.
    pub fn parent_arc(&self, node: Node) -> Option<Arc> {
        self.check(node);
        self.state.parent_arc(node)
    }

    /// The path from a source to `node` along parent arcs, or `None` if
    /// `node` is unreached.
    pub fn path(&self, node: Node) -> Option<Path> {
        self.check(node);
        self.state.path(node)
    }

    /// Allocation-free [`path`](Self::path): writes the node sequence into
    /// `buf` and returns its length, `0` if unreachable, or the negated
    /// required capacity if `buf` is too small.
    pub fn path_into(&self, node: Node, buf: &mut [Node]) -> isize {
        self.check(node);
        self.state.path_into(node, buf)
    }

    pub fn reached_count(&self) -> usize {
        self.state.reached_count()
    }

    pub fn fixed_count(&self) -> usize {
        self.state.fixed_count()
    }

    /// Number of reached-but-not-fixed nodes.
    pub fn frontier_len(&self) -> usize {
        self.state.frontier_len()
    }

    /// Reached nodes in the order they were first reached.
    pub fn reached_nodes(&self) -> impl Iterator<Item = Node> + '_ {
        self.state.reached_nodes()
    }

    /// Reset to the just-constructed state.
    pub fn clear(&mut self) {
        self.state.clear();
    }
}

impl<G: Graph + ?Sized, C: ArcCost, O: TieBreak> Stepper for Dijkstra<'_, G, C, O> {
    fn step(&mut self) -> Result<Option<Node>, SearchError> {
        self.state
            .step(self.graph, &self.cost, self.mode, ArcFilter::Forward)
    }
}
