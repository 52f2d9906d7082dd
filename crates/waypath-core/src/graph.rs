//! Graph primitives: [`Node`], [`Arc`], [`ArcFilter`] and the read-only
//! [`Graph`] interface every search algorithm consumes.

use std::fmt;

// ---------------------------------------------------------------------------
// Node / Arc
// ---------------------------------------------------------------------------

/// An opaque node identifier, scoped to one graph instance.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node(u64);

impl Node {
    /// Wrap a raw identifier.
    #[inline]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// The raw identifier. Deterministic searches order ties by this value.
    #[inline]
    pub const fn id(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An opaque arc identifier. Endpoints and directedness are looked up
/// through the owning [`Graph`], never stored on the arc itself.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Arc(u64);

impl Arc {
    /// Wrap a raw identifier.
    #[inline]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// The raw identifier.
    #[inline]
    pub const fn id(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Arc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "arc#{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

/// Whether an arc has an orientation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Directedness {
    /// A directed arc from `u` to `v`.
    Directed,
    /// An undirected edge, traversable both ways.
    Undirected,
}

/// Selects which arcs an adjacency query returns.
///
/// | Filter | global [`Graph::arcs`] | per-node [`Graph::arcs_of`] |
/// |---|---|---|
/// | `All` | every arc | every incident arc |
/// | `Edge` | undirected edges | incident undirected edges |
/// | `Forward` | every arc | arcs leaving the node, plus edges |
/// | `Backward` | every arc | arcs entering the node, plus edges |
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ArcFilter {
    #[default]
    All,
    Edge,
    Forward,
    Backward,
}

impl ArcFilter {
    /// Whether an arc with endpoints `(u, v)` passes this filter when seen
    /// from `node`.
    #[inline]
    pub fn accepts(self, node: Node, u: Node, v: Node, directedness: Directedness) -> bool {
        let edge = directedness == Directedness::Undirected;
        match self {
            Self::All => true,
            Self::Edge => edge,
            Self::Forward => edge || u == node,
            Self::Backward => edge || v == node,
        }
    }
}

// ---------------------------------------------------------------------------
// Graph
// ---------------------------------------------------------------------------

/// Read-only graph interface consumed by the search algorithms.
///
/// Enumerating methods append into `buf`; the caller clears it before
/// calling. Algorithms never mutate the graph and never cache adjacency
/// across steps.
pub trait Graph {
    /// Number of nodes.
    fn node_count(&self) -> usize;

    /// Number of arcs passing `filter` (see [`ArcFilter`]).
    fn arc_count(&self, filter: ArcFilter) -> usize;

    /// Whether `node` belongs to this graph.
    fn has_node(&self, node: Node) -> bool;

    /// Whether `arc` belongs to this graph.
    fn has_arc(&self, arc: Arc) -> bool;

    /// Append every node into `buf`.
    fn nodes(&self, buf: &mut Vec<Node>);

    /// Append every arc passing `filter` into `buf`.
    fn arcs(&self, filter: ArcFilter, buf: &mut Vec<Arc>);

    /// Append the arcs incident to `node` that pass `filter` into `buf`.
    /// A self-loop is reported once.
    fn arcs_of(&self, node: Node, filter: ArcFilter, buf: &mut Vec<Arc>);

    /// First endpoint (the tail of a directed arc).
    fn u(&self, arc: Arc) -> Node;

    /// Second endpoint (the head of a directed arc).
    fn v(&self, arc: Arc) -> Node;

    /// Whether `arc` is an undirected edge.
    fn is_edge(&self, arc: Arc) -> bool;

    /// The endpoint of `arc` opposite to `node`.
    #[inline]
    fn other(&self, arc: Arc, node: Node) -> Node {
        let u = self.u(arc);
        if u == node { self.v(arc) } else { u }
    }

    /// Directedness of `arc`.
    #[inline]
    fn directedness(&self, arc: Arc) -> Directedness {
        if self.is_edge(arc) {
            Directedness::Undirected
        } else {
            Directedness::Directed
        }
    }
}

impl<G: Graph + ?Sized> Graph for &G {
    fn node_count(&self) -> usize {
        (**self).node_count()
    }
    fn arc_count(&self, filter: ArcFilter) -> usize {
        (**self).arc_count(filter)
    }
    fn has_node(&self, node: Node) -> bool {
        (**self).has_node(node)
    }
    fn has_arc(&self, arc: Arc) -> bool {
        (**self).has_arc(arc)
    }
    fn nodes(&self, buf: &mut Vec<Node>) {
        (**self).nodes(buf)
    }
    fn arcs(&self, filter: ArcFilter, buf: &mut Vec<Arc>) {
        (**self).arcs(filter, buf)
    }
    fn arcs_of(&self, node: Node, filter: ArcFilter, buf: &mut Vec<Arc>) {
        (**self).arcs_of(node, filter, buf)
    }
    fn u(&self, arc: Arc) -> Node {
        (**self).u(arc)
    }
    fn v(&self, arc: Arc) -> Node {
        (**self).v(arc)
    }
    fn is_edge(&self, arc: Arc) -> bool {
        (**self).is_edge(arc)
    }
}
