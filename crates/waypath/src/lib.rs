//! Shortest-path search over abstract graphs.
//!
//! Every algorithm works against the read-only [`Graph`] trait from
//! `waypath-core`, with arc costs supplied as an [`ArcCost`] (any
//! `Fn(Arc) -> f64` will do):
//!
//! - **Dijkstra**, incremental and resumable ([`Dijkstra`]), optionally with
//!   reproducible tie-breaking ([`DeterministicDijkstra`])
//! - **Bellman-Ford** with negative-cycle detection ([`BellmanFord`])
//! - **A\*** via heuristic reweighting ([`AStar`])
//! - **Bidirectional Dijkstra** for point-to-point queries
//!   ([`BidirectionalDijkstra`])
//! - **K shortest simple paths** ([`Yen`], [`k_shortest_paths`])
//! - **Disjoint paths**, greedy ([`greedy_disjoint_paths`]) and the optimal
//!   arc-disjoint pair ([`optimal_disjoint_pair`])
//!
//! Costs aggregate by [`DijkstraMode`]: a sum, or the bottleneck maximum.
//!
//! # Cooperative execution
//!
//! Long searches have `*_paced` entry points taking a [`Pacing`] interval,
//! a [`CancelToken`] and an `on_yield` callback. The callback runs every
//! `yield_every` steps, after which the token is polled; a cancelled run
//! stops with [`SearchError::Cancelled`] before touching any more state.

mod astar;
mod bellman_ford;
mod bidirectional;
mod dijkstra;
mod disjoint;
mod error;
mod frontier;
mod mode;
mod pacing;
mod path;
mod state;
mod traits;
mod yen;

#[cfg(test)]
mod testing;

pub use astar::AStar;
pub use bellman_ford::BellmanFord;
pub use bidirectional::BidirectionalDijkstra;
pub use dijkstra::{DeterministicDijkstra, Dijkstra};
pub use disjoint::{Disjointness, greedy_disjoint_paths, optimal_disjoint_pair};
pub use error::SearchError;
pub use frontier::{Frontier, InsertionOrder, NodeIdOrder, TieBreak};
pub use mode::DijkstraMode;
pub use pacing::Pacing;
pub use path::Path;
pub use traits::{ArcCost, Heuristic, Stepper};
pub use yen::{Yen, k_shortest_paths};

pub use waypath_core::{Arc, ArcFilter, CancelToken, CustomGraph, Directedness, Graph, Node};
