//! [`CustomGraph`]: a small mutable adjacency-list graph.

use crate::graph::{Arc, ArcFilter, Directedness, Graph, Node};

#[derive(Clone, Copy, Debug)]
struct ArcEnds {
    u: Node,
    v: Node,
    directedness: Directedness,
}

/// Adjacency-list graph mixing directed arcs and undirected edges.
///
/// Node and arc identifiers are dense, starting at 0, in insertion order.
/// Parallel arcs and self-loops are allowed.
#[derive(Clone, Debug, Default)]
pub struct CustomGraph {
    arcs: Vec<ArcEnds>,
    // Incident arcs per node, in insertion order.
    incidence: Vec<Vec<Arc>>,
    edge_count: usize,
}

impl CustomGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a graph with `n` isolated nodes, `Node::new(0)` .. `Node::new(n - 1)`.
    pub fn with_nodes(n: usize) -> Self {
        Self {
            arcs: Vec::new(),
            incidence: vec![Vec::new(); n],
            edge_count: 0,
        }
    }

    /// Add an isolated node and return it.
    pub fn add_node(&mut self) -> Node {
        self.incidence.push(Vec::new());
        Node::new(self.incidence.len() as u64 - 1)
    }

    /// Add an arc between two existing nodes and return it.
    ///
    /// # Panics
    ///
    /// Panics if either endpoint does not belong to this graph.
    pub fn add_arc(&mut self, u: Node, v: Node, directedness: Directedness) -> Arc {
        assert!(self.has_node(u), "add_arc: unknown node {u}");
        assert!(self.has_node(v), "add_arc: unknown node {v}");
        let arc = Arc::new(self.arcs.len() as u64);
        self.arcs.push(ArcEnds { u, v, directedness });
        self.incidence[u.id() as usize].push(arc);
        if u != v {
            self.incidence[v.id() as usize].push(arc);
        }
        if directedness == Directedness::Undirected {
            self.edge_count += 1;
        }
        arc
    }

    /// Shorthand for a directed arc `u -> v`.
    pub fn add_directed(&mut self, u: Node, v: Node) -> Arc {
        self.add_arc(u, v, Directedness::Directed)
    }

    /// Shorthand for an undirected edge `u -- v`.
    pub fn add_edge(&mut self, u: Node, v: Node) -> Arc {
        self.add_arc(u, v, Directedness::Undirected)
    }

    #[inline]
    fn ends(&self, arc: Arc) -> &ArcEnds {
        assert!(self.has_arc(arc), "unknown arc {arc}");
        &self.arcs[arc.id() as usize]
    }
}

impl Graph for CustomGraph {
    fn node_count(&self) -> usize {
        self.incidence.len()
    }

    fn arc_count(&self, filter: ArcFilter) -> usize {
        match filter {
            ArcFilter::Edge => self.edge_count,
            _ => self.arcs.len(),
        }
    }

    #[inline]
    fn has_node(&self, node: Node) -> bool {
        (node.id() as usize) < self.incidence.len()
    }

    #[inline]
    fn has_arc(&self, arc: Arc) -> bool {
        (arc.id() as usize) < self.arcs.len()
    }

    fn nodes(&self, buf: &mut Vec<Node>) {
        buf.extend((0..self.incidence.len() as u64).map(Node::new));
    }

    fn arcs(&self, filter: ArcFilter, buf: &mut Vec<Arc>) {
        for (i, ends) in self.arcs.iter().enumerate() {
            if filter != ArcFilter::Edge || ends.directedness == Directedness::Undirected {
                buf.push(Arc::new(i as u64));
            }
        }
    }

    fn arcs_of(&self, node: Node, filter: ArcFilter, buf: &mut Vec<Arc>) {
        assert!(self.has_node(node), "arcs_of: unknown node {node}");
        for &arc in &self.incidence[node.id() as usize] {
            let ends = &self.arcs[arc.id() as usize];
            if filter.accepts(node, ends.u, ends.v, ends.directedness) {
                buf.push(arc);
            }
        }
    }

    #[inline]
    fn u(&self, arc: Arc) -> Node {
        self.ends(arc).u
    }

    #[inline]
    fn v(&self, arc: Arc) -> Node {
        self.ends(arc).v
    }

    #[inline]
    fn is_edge(&self, arc: Arc) -> bool {
        self.ends(arc).directedness == Directedness::Undirected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adj(g: &CustomGraph, n: Node, filter: ArcFilter) -> Vec<Arc> {
        let mut buf = Vec::new();
        g.arcs_of(n, filter, &mut buf);
        buf
    }

    #[test]
    fn build_and_count() {
        let mut g = CustomGraph::new();
        let a = g.add_node();
        let b = g.add_node();
        let c = g.add_node();
        g.add_directed(a, b);
        g.add_edge(b, c);
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.arc_count(ArcFilter::All), 2);
        assert_eq!(g.arc_count(ArcFilter::Edge), 1);
        assert!(g.has_node(c));
        assert!(!g.has_node(Node::new(3)));
    }

    #[test]
    fn directional_adjacency() {
        let mut g = CustomGraph::with_nodes(3);
        let (a, b, c) = (Node::new(0), Node::new(1), Node::new(2));
        let ab = g.add_directed(a, b);
        let bc = g.add_edge(b, c);

        assert_eq!(adj(&g, a, ArcFilter::Forward), vec![ab]);
        assert_eq!(adj(&g, b, ArcFilter::Forward), vec![bc]);
        assert_eq!(adj(&g, b, ArcFilter::Backward), vec![ab, bc]);
        assert_eq!(adj(&g, b, ArcFilter::Edge), vec![bc]);
        assert_eq!(adj(&g, c, ArcFilter::All), vec![bc]);
        assert_eq!(g.other(bc, c), b);
        assert!(g.is_edge(bc));
        assert!(!g.is_edge(ab));
    }

    #[test]
    fn self_loop_reported_once() {
        let mut g = CustomGraph::with_nodes(1);
        let n = Node::new(0);
        let l = g.add_directed(n, n);
        assert_eq!(adj(&g, n, ArcFilter::All), vec![l]);
        assert_eq!(g.other(l, n), n);
    }

    #[test]
    fn global_arc_enumeration() {
        let mut g = CustomGraph::with_nodes(2);
        let x = g.add_directed(Node::new(0), Node::new(1));
        let y = g.add_edge(Node::new(1), Node::new(0));
        let mut buf = Vec::new();
        g.arcs(ArcFilter::All, &mut buf);
        assert_eq!(buf, vec![x, y]);
        buf.clear();
        g.arcs(ArcFilter::Edge, &mut buf);
        assert_eq!(buf, vec![y]);
        let mut nodes = Vec::new();
        g.nodes(&mut nodes);
        assert_eq!(nodes, vec![Node::new(0), Node::new(1)]);
    }

    #[test]
    #[should_panic]
    fn add_arc_unknown_node_panics() {
        let mut g = CustomGraph::with_nodes(1);
        g.add_directed(Node::new(0), Node::new(5));
    }
}
