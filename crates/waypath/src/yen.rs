//! K shortest simple paths (Yen).

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashSet};

use waypath_core::{ArcFilter, Graph, Node};

use crate::dijkstra::Dijkstra;
use crate::error::SearchError;
use crate::mode::DijkstraMode;
use crate::path::Path;
use crate::traits::{ArcCost, Restricted};

struct Candidate {
    cost: f64,
    seq: u64,
    path: Path,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cost
            .total_cmp(&other.cost)
            .then(self.seq.cmp(&other.seq))
    }
}

/// Incremental enumeration of simple `source -> target` paths in
/// non-decreasing cost order.
///
/// Each call to [`next_path`](Self::next_path) (or [`Iterator::next`])
/// accepts one more path. Paths are distinct as node sequences; paths with
/// an infinite-cost arc are never produced.
pub struct Yen<'g, G: Graph + ?Sized, C: ArcCost> {
    graph: &'g G,
    cost: C,
    mode: DijkstraMode,
    source: Node,
    target: Node,
    accepted: Vec<Path>,
    candidates: BinaryHeap<Reverse<Candidate>>,
    seen: HashSet<Vec<Node>>,
    seq: u64,
    done: bool,
}

impl<'g, G: Graph + ?Sized, C: ArcCost> Yen<'g, G, C> {
    pub fn new(graph: &'g G, cost: C, mode: DijkstraMode, source: Node, target: Node) -> Self {
        Self {
            graph,
            cost,
            mode,
            source,
            target,
            accepted: Vec::new(),
            candidates: BinaryHeap::new(),
            seen: HashSet::new(),
            seq: 0,
            done: false,
        }
    }

    /// Paths accepted so far, cheapest first.
    pub fn accepted(&self) -> &[Path] {
        &self.accepted
    }

    /// Accept and return the next cheapest path, or `None` once every
    /// simple path has been produced. An error ends the enumeration.
    pub fn next_path(&mut self) -> Result<Option<&Path>, SearchError> {
        if self.done {
            return Ok(None);
        }
        match self.advance() {
            Ok(true) => Ok(self.accepted.last()),
            Ok(false) => {
                self.done = true;
                Ok(None)
            }
            Err(e) => {
                self.done = true;
                Err(e)
            }
        }
    }

    fn advance(&mut self) -> Result<bool, SearchError> {
        if self.accepted.is_empty() {
            for node in [self.source, self.target] {
                if !self.graph.has_node(node) {
                    return Err(SearchError::UnknownNode(node));
                }
            }
            let first = self.spur_path(self.source, Restricted::new(&self.cost))?;
            return Ok(match first {
                Some(path) => {
                    self.seen.insert(path.to_node_vec());
                    self.accept(path);
                    true
                }
                None => false,
            });
        }

        self.collect_candidates()?;
        Ok(match self.candidates.pop() {
            Some(Reverse(candidate)) => {
                self.accept(candidate.path);
                true
            }
            None => false,
        })
    }

    fn accept(&mut self, path: Path) {
        log::debug!(
            "accepted path {} with cost {}",
            self.accepted.len() + 1,
            path.total_cost(&self.cost, self.mode)
        );
        self.accepted.push(path);
    }

    // Deviate from the last accepted path at every node but its last.
    fn collect_candidates(&mut self) -> Result<(), SearchError> {
        let Some(last) = self.accepted.last().cloned() else {
            return Ok(());
        };
        let mut arcs = Vec::new();
        for i in 0..last.node_count() - 1 {
            let root = last.prefix(i + 1);
            let spur = root.last();
            let root_nodes = root.to_node_vec();

            let mut restricted = Restricted::new(&self.cost);
            restricted.nodes.extend(root_nodes[..i].iter().copied());
            // Paths are told apart by their nodes, so every arc from the spur
            // to an already used next node is banned, parallel twins included.
            let used_next: HashSet<Node> = self
                .accepted
                .iter()
                .filter(|p| {
                    p.node_count() > i + 1 && p.nodes().take(i + 1).eq(root_nodes.iter().copied())
                })
                .filter_map(|p| p.node(i + 1))
                .collect();
            arcs.clear();
            self.graph.arcs_of(spur, ArcFilter::Forward, &mut arcs);
            restricted.arcs.extend(
                arcs.iter()
                    .copied()
                    .filter(|&arc| used_next.contains(&self.graph.other(arc, spur))),
            );

            let Some(tail) = self.spur_path(spur, restricted)? else {
                continue;
            };
            let mut candidate = root;
            candidate.extend(&tail);
            let cost = candidate.total_cost(&self.cost, self.mode);
            if cost == f64::INFINITY || !self.seen.insert(candidate.to_node_vec()) {
                continue;
            }
            self.seq += 1;
            self.candidates.push(Reverse(Candidate {
                cost,
                seq: self.seq,
                path: candidate,
            }));
        }
        Ok(())
    }

    fn spur_path(&self, from: Node, cost: Restricted<'_, C>) -> Result<Option<Path>, SearchError> {
        let mut search = Dijkstra::new(self.graph, cost, self.mode);
        search.add_source(from)?;
        Ok(match search.run_until_fixed(self.target)? {
            Some(target) => search.path(target),
            None => None,
        })
    }
}

impl<G: Graph + ?Sized, C: ArcCost> Iterator for Yen<'_, G, C> {
    type Item = Result<Path, SearchError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_path().map(|p| p.cloned()).transpose()
    }
}

/// Up to `k` cheapest simple paths from `source` to `target`, cheapest
/// first. Fewer are returned when fewer exist.
pub fn k_shortest_paths<G, C>(
    graph: &G,
    source: Node,
    target: Node,
    k: usize,
    cost: C,
    mode: DijkstraMode,
) -> Result<Vec<Path>, SearchError>
where
    G: Graph + ?Sized,
    C: ArcCost,
{
    Yen::new(graph, cost, mode, source, target).take(k).collect()
}
