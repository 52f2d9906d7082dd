use std::fmt;

use waypath_core::{Arc, Node};

/// Errors raised by the search algorithms.
///
/// An unreachable target is never an error; it is reported through
/// infinite distances, `None` paths, or a `0` span write.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchError {
    /// The cost function returned a value the active mode forbids
    /// (negative or NaN in Sum mode, NaN anywhere).
    InvalidCost { arc: Arc, cost: f64 },
    /// `add_source` was called on a node that is already reached.
    AlreadyReached(Node),
    /// The node does not belong to the graph.
    UnknownNode(Node),
    /// Bellman-Ford found a negative cycle reachable from a source; the
    /// instance is poisoned until cleared.
    NegativeCycle,
    /// A paced run observed its cancellation token before finishing.
    Cancelled,
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCost { arc, cost } => write!(f, "invalid cost {cost} on {arc}"),
            Self::AlreadyReached(node) => write!(f, "node {node} is already reached"),
            Self::UnknownNode(node) => write!(f, "node {node} is not in the graph"),
            Self::NegativeCycle => write!(f, "negative cycle detected"),
            Self::Cancelled => write!(f, "search cancelled"),
        }
    }
}

impl std::error::Error for SearchError {}
