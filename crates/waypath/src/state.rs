//! Frontier-driven relaxation core shared by every Dijkstra-family search.
//!
//! Visited nodes live in an arena of [`Slot`]s; parents are slot indices,
//! so paths are materialised by walking indices backward and pushing each
//! node at the front of the result.

use std::collections::HashMap;

use waypath_core::{Arc, ArcFilter, Graph, Node};

use crate::error::SearchError;
use crate::frontier::{Frontier, TieBreak};
use crate::mode::DijkstraMode;
use crate::path::Path;
use crate::traits::ArcCost;

#[derive(Clone, Copy, Debug)]
pub(crate) struct Slot {
    pub(crate) node: Node,
    pub(crate) cost: f64,
    pub(crate) parent_arc: Option<Arc>,
    pub(crate) parent: u32,
    pub(crate) fixed: bool,
}

/// Reached set, fixed set and frontier of one search.
pub(crate) struct SearchState<O: TieBreak> {
    slots: Vec<Slot>,
    index: HashMap<Node, u32>,
    frontier: Frontier<O>,
    fixed_count: usize,
    arc_buf: Vec<Arc>,
    // Set by a rejected cost; the state is half-relaxed from then on.
    failure: Option<SearchError>,
}

impl<O: TieBreak> SearchState<O> {
    pub(crate) fn new() -> Self {
        Self {
            slots: Vec::new(),
            index: HashMap::new(),
            frontier: Frontier::new(),
            fixed_count: 0,
            arc_buf: Vec::new(),
            failure: None,
        }
    }

    /// Back to the just-constructed state. Keeps allocations.
    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.index.clear();
        self.frontier.clear();
        self.fixed_count = 0;
        self.failure = None;
    }

    /// The cost error that ended this search, if any.
    #[inline]
    pub(crate) fn failure(&self) -> Option<&SearchError> {
        self.failure.as_ref()
    }

    #[inline]
    pub(crate) fn slot(&self, node: Node) -> Option<&Slot> {
        self.index.get(&node).map(|&i| &self.slots[i as usize])
    }

    #[inline]
    pub(crate) fn reached(&self, node: Node) -> bool {
        self.index.contains_key(&node)
    }

    #[inline]
    pub(crate) fn fixed(&self, node: Node) -> bool {
        self.slot(node).is_some_and(|s| s.fixed)
    }

    #[inline]
    pub(crate) fn distance(&self, node: Node) -> f64 {
        self.slot(node).map_or(f64::INFINITY, |s| s.cost)
    }

    #[inline]
    pub(crate) fn parent_arc(&self, node: Node) -> Option<Arc> {
        self.slot(node).and_then(|s| s.parent_arc)
    }

    #[inline]
    pub(crate) fn reached_count(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub(crate) fn fixed_count(&self) -> usize {
        self.fixed_count
    }

    #[inline]
    pub(crate) fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    /// Smallest tentative cost still waiting in the frontier.
    pub(crate) fn frontier_min(&mut self) -> Option<f64> {
        self.frontier.peek().map(|(_, p)| p)
    }

    /// Reached nodes in the order they were first reached.
    pub(crate) fn reached_nodes(&self) -> impl Iterator<Item = Node> + '_ {
        self.slots.iter().map(|s| s.node)
    }

    /// Seed `node` as reached with `cost` and no parent.
    pub(crate) fn add_source(&mut self, node: Node, cost: f64) -> Result<(), SearchError> {
        if self.reached(node) {
            return Err(SearchError::AlreadyReached(node));
        }
        self.index.insert(node, self.slots.len() as u32);
        self.slots.push(Slot {
            node,
            cost,
            parent_arc: None,
            parent: u32::MAX,
            fixed: false,
        });
        self.frontier.set(node, cost);
        Ok(())
    }

    /// Fix the frontier minimum and relax its `filter`-ed arcs.
    ///
    /// Returns `None` when the frontier is empty or its minimum is `+inf`;
    /// in the latter case nothing is fixed. Once a cost is rejected every
    /// later call fails with the same error until [`clear`](Self::clear).
    pub(crate) fn step<G, C>(
        &mut self,
        graph: &G,
        cost: &C,
        mode: DijkstraMode,
        filter: ArcFilter,
    ) -> Result<Option<Node>, SearchError>
    where
        G: Graph + ?Sized,
        C: ArcCost + ?Sized,
    {
        if let Some(e) = &self.failure {
            return Err(e.clone());
        }
        let Some((node, priority)) = self.frontier.peek() else {
            return Ok(None);
        };
        if priority == f64::INFINITY {
            return Ok(None);
        }
        self.frontier.pop();

        let si = self.index[&node];
        let base = {
            let slot = &mut self.slots[si as usize];
            slot.fixed = true;
            slot.cost
        };
        self.fixed_count += 1;

        let mut arcs = std::mem::take(&mut self.arc_buf);
        arcs.clear();
        graph.arcs_of(node, filter, &mut arcs);
        let outcome = arcs
            .iter()
            .try_for_each(|&arc| self.relax(graph, cost, mode, si, node, base, arc));
        self.arc_buf = arcs;
        if let Err(e) = outcome {
            self.failure = Some(e.clone());
            return Err(e);
        }
        Ok(Some(node))
    }

    #[allow(clippy::too_many_arguments)]
    fn relax<G, C>(
        &mut self,
        graph: &G,
        cost: &C,
        mode: DijkstraMode,
        from_slot: u32,
        from: Node,
        base: f64,
        arc: Arc,
    ) -> Result<(), SearchError>
    where
        G: Graph + ?Sized,
        C: ArcCost + ?Sized,
    {
        let to = graph.other(arc, from);
        let existing = self.index.get(&to).copied();
        if let Some(ti) = existing {
            if self.slots[ti as usize].fixed {
                return Ok(());
            }
        }

        let raw = cost.cost(arc);
        if !mode.accepts(raw) {
            return Err(SearchError::InvalidCost { arc, cost: raw });
        }
        let candidate = mode.combine(base, cost.traversal(arc, from, to, raw));

        match existing {
            Some(ti) => {
                let slot = &mut self.slots[ti as usize];
                if candidate < slot.cost {
                    slot.cost = candidate;
                    slot.parent_arc = Some(arc);
                    slot.parent = from_slot;
                    self.frontier.set(to, candidate);
                }
            }
            None if candidate < f64::INFINITY => {
                self.index.insert(to, self.slots.len() as u32);
                self.slots.push(Slot {
                    node: to,
                    cost: candidate,
                    parent_arc: Some(arc),
                    parent: from_slot,
                    fixed: false,
                });
                self.frontier.set(to, candidate);
            }
            None => {}
        }
        Ok(())
    }

    /// Walk parents from `node` back to its source.
    pub(crate) fn path(&self, node: Node) -> Option<Path> {
        let mut i = *self.index.get(&node)? as usize;
        let mut path = Path::trivial(node);
        while let Some(arc) = self.slots[i].parent_arc {
            i = self.slots[i].parent as usize;
            path.push_front(arc, self.slots[i].node);
        }
        Some(path)
    }

    /// Write the node sequence source..=`node` into `buf` without
    /// allocating. Returns the length written, `0` if `node` is unreached,
    /// or `-required` if `buf` is too small.
    pub(crate) fn path_into(&self, node: Node, buf: &mut [Node]) -> isize {
        let Some(&start) = self.index.get(&node) else {
            return 0;
        };
        let mut len = 1usize;
        let mut i = start as usize;
        while self.slots[i].parent_arc.is_some() {
            i = self.slots[i].parent as usize;
            len += 1;
        }
        if len > buf.len() {
            return -(len as isize);
        }
        let mut i = start as usize;
        for k in (0..len).rev() {
            buf[k] = self.slots[i].node;
            if self.slots[i].parent_arc.is_some() {
                i = self.slots[i].parent as usize;
            }
        }
        len as isize
    }
}
