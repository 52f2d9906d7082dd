//! Point-to-point Dijkstra growing one tree from each end.

use waypath_core::{Arc, ArcFilter, CancelToken, Graph, Node};

use crate::error::SearchError;
use crate::frontier::InsertionOrder;
use crate::mode::DijkstraMode;
use crate::pacing::{drive, Pacer, Pacing};
use crate::path::Path;
use crate::state::SearchState;
use crate::traits::{ArcCost, Stepper};

/// Where the two trees touch: `from` is reached forward, `to` backward,
/// joined by `arc` (or `from == to` with no arc).
#[derive(Clone, Copy, Debug)]
struct Meeting {
    from: Node,
    arc: Option<Arc>,
    to: Node,
}

/// Bidirectional Dijkstra between a single source and target.
///
/// In Sum mode the forward tree follows forward arcs from the source and
/// the backward tree follows backward arcs from the target; the side with
/// the smaller frontier minimum is expanded each step, and the search stops
/// once the two minima add up to at least the best meeting cost found. In
/// Maximum mode the search is an ordinary forward Dijkstra.
pub struct BidirectionalDijkstra<'g, G: Graph + ?Sized, C: ArcCost> {
    graph: &'g G,
    cost: C,
    mode: DijkstraMode,
    forward: SearchState<InsertionOrder>,
    backward: SearchState<InsertionOrder>,
    one_sided: bool,
    best: f64,
    meeting: Option<Meeting>,
    arc_buf: Vec<Arc>,
}

impl<'g, G: Graph + ?Sized, C: ArcCost> BidirectionalDijkstra<'g, G, C> {
    pub fn new(graph: &'g G, cost: C, mode: DijkstraMode) -> Self {
        Self {
            graph,
            cost,
            mode,
            forward: SearchState::new(),
            backward: SearchState::new(),
            one_sided: false,
            best: f64::INFINITY,
            meeting: None,
            arc_buf: Vec::new(),
        }
    }

    /// A cheapest path from `source` to `target`, or `None` if there is
    /// none. `source == target` yields the single-node path.
    pub fn find(&mut self, source: Node, target: Node) -> Result<Option<Path>, SearchError> {
        self.find_inner(source, target, None)
    }

    /// [`find`](Self::find) with cooperative pacing and cancellation.
    /// A cancelled query leaves no usable result; the next call starts over.
    pub fn find_paced(
        &mut self,
        source: Node,
        target: Node,
        pacing: Pacing,
        token: &CancelToken,
        mut on_yield: impl FnMut(u64),
    ) -> Result<Option<Path>, SearchError> {
        let mut pacer = Pacer::new(pacing, token, &mut on_yield);
        self.find_inner(source, target, Some(&mut pacer))
    }

    /// Cost of the path returned by the last successful query; `+inf` if
    /// the target was unreachable.
    pub fn best_cost(&self) -> f64 {
        self.best
    }

    fn find_inner(
        &mut self,
        source: Node,
        target: Node,
        pacer: Option<&mut Pacer<'_>>,
    ) -> Result<Option<Path>, SearchError> {
        for node in [source, target] {
            if !self.graph.has_node(node) {
                return Err(SearchError::UnknownNode(node));
            }
        }
        self.forward.clear();
        self.backward.clear();
        self.meeting = None;
        self.best = f64::INFINITY;

        if source == target {
            self.best = self.mode.identity();
            return Ok(Some(Path::trivial(source)));
        }

        let identity = self.mode.identity();
        self.one_sided = self.mode != DijkstraMode::Sum;
        self.forward.add_source(source, identity)?;
        if self.one_sided {
            drive(self, |n| n == target, pacer)?;
            if !self.forward.fixed(target) {
                return Ok(None);
            }
            self.best = self.forward.distance(target);
            return Ok(self.forward.path(target));
        }

        self.backward.add_source(target, identity)?;
        drive(self, |_| false, pacer)?;
        let Some(meeting) = self.meeting else {
            return Ok(None);
        };
        Ok(self.assemble(meeting))
    }

    fn assemble(&self, meeting: Meeting) -> Option<Path> {
        let mut path = self.forward.path(meeting.from)?;
        if let Some(arc) = meeting.arc {
            path.push_back(arc, meeting.to);
        }
        // The backward tree's path runs target..=meeting.to.
        let back = self.backward.path(meeting.to)?;
        let nodes = back.to_node_vec();
        let arcs: Vec<Arc> = back.arcs().collect();
        for i in (0..arcs.len()).rev() {
            path.push_back(arcs[i], nodes[i]);
        }
        Some(path)
    }

    // Offer every meeting through `node`, which was just fixed on one side.
    fn meet(&mut self, node: Node, forward_side: bool) -> Result<(), SearchError> {
        let (this, other, filter) = if forward_side {
            (&self.forward, &self.backward, ArcFilter::Forward)
        } else {
            (&self.backward, &self.forward, ArcFilter::Backward)
        };
        let base = this.distance(node);
        let mut best = self.best;
        let mut meeting = self.meeting;

        if other.reached(node) {
            let total = base + other.distance(node);
            if total < best {
                best = total;
                meeting = Some(Meeting {
                    from: node,
                    arc: None,
                    to: node,
                });
            }
        }

        let mut arcs = std::mem::take(&mut self.arc_buf);
        arcs.clear();
        self.graph.arcs_of(node, filter, &mut arcs);
        for &arc in &arcs {
            let far = self.graph.other(arc, node);
            if !other.reached(far) {
                continue;
            }
            let raw = self.cost.cost(arc);
            if !self.mode.accepts(raw) {
                self.arc_buf = arcs;
                return Err(SearchError::InvalidCost { arc, cost: raw });
            }
            let (from, to) = if forward_side { (node, far) } else { (far, node) };
            let total = base + self.cost.traversal(arc, from, to, raw) + other.distance(far);
            if total < best {
                best = total;
                meeting = Some(Meeting {
                    from,
                    arc: Some(arc),
                    to,
                });
            }
        }
        self.arc_buf = arcs;

        if best < self.best {
            log::trace!("trees meet at cost {best} via {node}");
            self.best = best;
            self.meeting = meeting;
        }
        Ok(())
    }
}

impl<G: Graph + ?Sized, C: ArcCost> Stepper for BidirectionalDijkstra<'_, G, C> {
    fn step(&mut self) -> Result<Option<Node>, SearchError> {
        if self.one_sided {
            return self
                .forward
                .step(self.graph, &self.cost, self.mode, ArcFilter::Forward);
        }
        let (Some(f), Some(b)) = (self.forward.frontier_min(), self.backward.frontier_min())
        else {
            return Ok(None);
        };
        if f + b >= self.best {
            return Ok(None);
        }
        let forward_side = f <= b;
        let fixed = if forward_side {
            self.forward
                .step(self.graph, &self.cost, self.mode, ArcFilter::Forward)?
        } else {
            self.backward
                .step(self.graph, &self.cost, self.mode, ArcFilter::Backward)?
        };
        let Some(node) = fixed else {
            return Ok(None);
        };
        self.meet(node, forward_side)?;
        Ok(Some(node))
    }
}
