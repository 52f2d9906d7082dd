//! Random instances and brute-force oracles for the randomized tests.

use std::collections::HashSet;

use rand::{Rng, RngExt};
use waypath_core::{Arc, ArcFilter, CustomGraph, Graph, Node};

use crate::path::Path;

/// `n` nodes and `m` random arcs; roughly one in four is an undirected edge.
/// Self-loops and parallel arcs may occur.
pub(crate) fn random_graph<R: Rng>(rng: &mut R, n: usize, m: usize) -> CustomGraph {
    let mut g = CustomGraph::with_nodes(n);
    for _ in 0..m {
        let u = Node::new(rng.random_range(0..n as u64));
        let v = Node::new(rng.random_range(0..n as u64));
        if rng.random_range(0..4u32) == 0 {
            g.add_edge(u, v);
        } else {
            g.add_directed(u, v);
        }
    }
    g
}

/// Like [`random_graph`] but without self-loops, and with at most one arc
/// or edge between any pair of nodes, so a path is determined by its nodes.
pub(crate) fn random_simple_graph<R: Rng>(rng: &mut R, n: usize, m: usize) -> CustomGraph {
    let mut g = CustomGraph::with_nodes(n);
    let mut pairs = HashSet::new();
    for _ in 0..m {
        let u = rng.random_range(0..n as u64);
        let v = rng.random_range(0..n as u64);
        if u == v || !pairs.insert((u.min(v), u.max(v))) {
            continue;
        }
        if rng.random_range(0..4u32) == 0 {
            g.add_edge(Node::new(u), Node::new(v));
        } else {
            g.add_directed(Node::new(u), Node::new(v));
        }
    }
    g
}

/// Integer-valued costs in `lo..=hi`, indexed by arc id.
pub(crate) fn random_costs<R: Rng>(rng: &mut R, g: &CustomGraph, lo: u32, hi: u32) -> Vec<f64> {
    (0..g.arc_count(ArcFilter::All))
        .map(|_| rng.random_range(lo..=hi) as f64)
        .collect()
}

/// Every simple path from `s` to `t`, by exhaustive DFS.
pub(crate) fn simple_paths<G: Graph>(g: &G, s: Node, t: Node) -> Vec<Path> {
    fn dfs<G: Graph>(g: &G, t: Node, current: &mut Path, out: &mut Vec<Path>) {
        let at = current.last();
        if at == t {
            out.push(current.clone());
            return;
        }
        let mut arcs = Vec::new();
        g.arcs_of(at, ArcFilter::Forward, &mut arcs);
        for arc in arcs {
            let next = g.other(arc, at);
            if current.contains_node(next) {
                continue;
            }
            let mut extended = current.clone();
            extended.push_back(arc, next);
            dfs(g, t, &mut extended, out);
        }
    }

    let mut out = Vec::new();
    dfs(g, t, &mut Path::trivial(s), &mut out);
    out
}

/// Whether two paths share no arc.
pub(crate) fn arc_disjoint(a: &Path, b: &Path) -> bool {
    let arcs: Vec<Arc> = a.arcs().collect();
    b.arcs().all(|x| !arcs.contains(&x))
}

/// Whether `p` is a walk in `g`: every arc joins its neighbouring nodes and
/// is traversed in an allowed direction.
pub(crate) fn is_walk<G: Graph>(g: &G, p: &Path) -> bool {
    (0..p.arc_count()).all(|i| {
        let (Some(from), Some(to), Some(arc)) = (p.node(i), p.node(i + 1), p.arc(i)) else {
            return false;
        };
        if g.is_edge(arc) {
            (g.u(arc) == from && g.v(arc) == to) || (g.u(arc) == to && g.v(arc) == from)
        } else {
            g.u(arc) == from && g.v(arc) == to
        }
    })
}
