//! Bellman-Ford shortest paths with negative-cycle detection.

use std::collections::HashMap;

use waypath_core::{Arc, ArcFilter, Graph, Node};

use crate::error::SearchError;
use crate::path::Path;
use crate::traits::ArcCost;

#[derive(Clone, Copy, Debug)]
struct Label {
    node: Node,
    dist: f64,
    parent_arc: Option<Arc>,
    parent: u32,
}

/// Multi-source shortest paths allowing negative arc costs (Sum mode).
///
/// Unlike [`Dijkstra`](crate::Dijkstra) the sources are given up front to
/// [`run`](Self::run), which computes every distance at once. If a negative
/// cycle is reachable from a source, it is recorded and every later query
/// fails with [`SearchError::NegativeCycle`] until [`clear`](Self::clear).
/// A rejected (NaN) cost poisons the queries the same way.
pub struct BellmanFord<'g, G: Graph + ?Sized, C: ArcCost> {
    graph: &'g G,
    cost: C,
    labels: Vec<Label>,
    index: HashMap<Node, u32>,
    cycle: Option<Path>,
    failure: Option<SearchError>,
}

impl<'g, G: Graph + ?Sized, C: ArcCost> BellmanFord<'g, G, C> {
    pub fn new(graph: &'g G, cost: C) -> Self {
        Self {
            graph,
            cost,
            labels: Vec::new(),
            index: HashMap::new(),
            cycle: None,
            failure: None,
        }
    }

    /// Clear, then compute distances from `sources` (cost 0 each; repeated
    /// sources are ignored).
    ///
    /// Returns `Err(NegativeCycle)` if a negative cycle is reachable; the
    /// cycle stays available through [`negative_cycle`](Self::negative_cycle).
    pub fn run<I: IntoIterator<Item = Node>>(&mut self, sources: I) -> Result<(), SearchError> {
        self.clear();
        let sources: Vec<Node> = sources.into_iter().collect();
        if let Some(&s) = sources.iter().find(|&&s| !self.graph.has_node(s)) {
            return Err(SearchError::UnknownNode(s));
        }
        for s in sources {
            if !self.index.contains_key(&s) {
                self.push(s, 0.0, None, u32::MAX);
            }
        }

        let mut arcs = Vec::new();
        self.graph.arcs(ArcFilter::All, &mut arcs);
        let rounds = self.graph.node_count();

        for round in 1..=rounds {
            let mut improved = None;
            for &arc in &arcs {
                let c = self.cost.cost(arc);
                if c.is_nan() {
                    let e = SearchError::InvalidCost { arc, cost: c };
                    self.failure = Some(e.clone());
                    return Err(e);
                }
                let (u, v) = (self.graph.u(arc), self.graph.v(arc));
                if let Some(x) = self.relax(u, v, arc, c) {
                    improved = Some(x);
                }
                if self.graph.is_edge(arc) {
                    if let Some(x) = self.relax(v, u, arc, c) {
                        improved = Some(x);
                    }
                }
            }
            let Some(last) = improved else {
                log::trace!("bellman-ford converged after {round} rounds");
                return Ok(());
            };
            if round == rounds {
                let cycle = self.trace_cycle(last, rounds);
                log::debug!("negative cycle detected through {} arcs", cycle.arc_count());
                self.cycle = Some(cycle);
                self.failure = Some(SearchError::NegativeCycle);
                return Err(SearchError::NegativeCycle);
            }
        }
        Ok(())
    }

    fn push(&mut self, node: Node, dist: f64, parent_arc: Option<Arc>, parent: u32) -> u32 {
        let i = self.labels.len() as u32;
        self.index.insert(node, i);
        self.labels.push(Label {
            node,
            dist,
            parent_arc,
            parent,
        });
        i
    }

    // Relax `from -> to`; returns the index of `to` if its distance improved.
    fn relax(&mut self, from: Node, to: Node, arc: Arc, c: f64) -> Option<u32> {
        let &fi = self.index.get(&from)?;
        let candidate = self.labels[fi as usize].dist + c;
        match self.index.get(&to).copied() {
            Some(ti) => {
                let label = &mut self.labels[ti as usize];
                if candidate < label.dist {
                    label.dist = candidate;
                    label.parent_arc = Some(arc);
                    label.parent = fi;
                    return Some(ti);
                }
                None
            }
            None if candidate < f64::INFINITY => Some(self.push(to, candidate, Some(arc), fi)),
            None => None,
        }
    }

    fn parent_of(&self, i: u32) -> Option<u32> {
        let label = &self.labels[i as usize];
        label.parent_arc.map(|_| label.parent)
    }

    // Walk back far enough to land on the cycle, then collect it.
    fn trace_cycle(&self, start: u32, rounds: usize) -> Path {
        let mut on_cycle = start;
        for _ in 0..rounds {
            match self.parent_of(on_cycle) {
                Some(p) => on_cycle = p,
                None => break,
            }
        }
        let head = self.labels[on_cycle as usize];
        let mut cycle = Path::trivial(head.node);
        let mut i = on_cycle;
        while let Some(arc) = self.labels[i as usize].parent_arc {
            i = self.labels[i as usize].parent;
            cycle.push_front(arc, self.labels[i as usize].node);
            if i == on_cycle || cycle.arc_count() > rounds {
                break;
            }
        }
        cycle
    }

    /// The negative cycle found by the last [`run`](Self::run), if any.
    pub fn negative_cycle(&self) -> Option<&Path> {
        self.cycle.as_ref()
    }

    fn label(&self, node: Node) -> Result<Option<&Label>, SearchError> {
        assert!(self.graph.has_node(node), "node {node} is not in the graph");
        if let Some(e) = &self.failure {
            return Err(e.clone());
        }
        Ok(self.index.get(&node).map(|&i| &self.labels[i as usize]))
    }

    pub fn reached(&self, node: Node) -> Result<bool, SearchError> {
        Ok(self.label(node)?.is_some())
    }

    /// Shortest distance to `node`; `+inf` if unreachable.
    pub fn distance(&self, node: Node) -> Result<f64, SearchError> {
        Ok(self.label(node)?.map_or(f64::INFINITY, |l| l.dist))
    }

    /// Last arc of a shortest path to `node`; `None` for sources and
    /// unreachable nodes.
    pub fn parent_arc(&self, node: Node) -> Result<Option<Arc>, SearchError> {
        Ok(self.label(node)?.and_then(|l| l.parent_arc))
    }

    /// A shortest path from a source to `node`, or `None` if unreachable.
    pub fn path(&self, node: Node) -> Result<Option<Path>, SearchError> {
        let Some(label) = self.label(node)? else {
            return Ok(None);
        };
        let mut path = Path::trivial(label.node);
        let mut i = self.index[&node];
        while let Some(arc) = self.labels[i as usize].parent_arc {
            i = self.labels[i as usize].parent;
            path.push_front(arc, self.labels[i as usize].node);
        }
        Ok(Some(path))
    }

    /// Allocation-free [`path`](Self::path); same return convention as
    /// [`Dijkstra::path_into`](crate::Dijkstra::path_into).
    pub fn path_into(&self, node: Node, buf: &mut [Node]) -> Result<isize, SearchError> {
        if self.label(node)?.is_none() {
            return Ok(0);
        }
        let start = self.index[&node];
        let mut len = 1usize;
        let mut i = start;
        while let Some(p) = self.parent_of(i) {
            i = p;
            len += 1;
        }
        if len > buf.len() {
            return Ok(-(len as isize));
        }
        let mut i = start;
        for k in (0..len).rev() {
            buf[k] = self.labels[i as usize].node;
            if let Some(p) = self.parent_of(i) {
                i = p;
            }
        }
        Ok(len as isize)
    }

    /// Forget all results, including a detected negative cycle or a
    /// rejected cost.
    pub fn clear(&mut self) {
        self.labels.clear();
        self.index.clear();
        self.cycle = None;
        self.failure = None;
    }
}
