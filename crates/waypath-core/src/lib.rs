//! **waypath-core** — graph abstraction and shared primitives for the
//! *waypath* search engine.
//!
//! This crate provides the foundational types used by every algorithm:
//! opaque node/arc identifiers, the read-only [`Graph`] interface, a small
//! mutable [`CustomGraph`] implementation, and the [`CancelToken`] used by
//! cooperative (paced) searches.

pub mod cancel;
pub mod custom;
pub mod graph;

pub use cancel::CancelToken;
pub use custom::CustomGraph;
pub use graph::{Arc, ArcFilter, Directedness, Graph, Node};
