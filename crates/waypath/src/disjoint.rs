//! Arc- and node-disjoint path pairs and families.

use std::collections::{HashMap, HashSet};

use waypath_core::{Arc, ArcFilter, CustomGraph, Graph, Node};

use crate::dijkstra::Dijkstra;
use crate::error::SearchError;
use crate::mode::DijkstraMode;
use crate::path::Path;
use crate::traits::{ArcCost, Restricted};

/// What successive paths of [`greedy_disjoint_paths`] may not share.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Disjointness {
    /// No arc is used twice.
    #[default]
    Edge,
    /// No arc and no node other than the endpoints is used twice.
    Node,
}

fn check_endpoints<G: Graph + ?Sized>(graph: &G, source: Node, target: Node) -> Result<(), SearchError> {
    for node in [source, target] {
        if !graph.has_node(node) {
            return Err(SearchError::UnknownNode(node));
        }
    }
    Ok(())
}

/// Up to `k` disjoint paths, found one at a time: each is a cheapest path
/// avoiding everything the previous ones used.
///
/// Fast, but the family is not guaranteed to be the cheapest one, nor the
/// largest. When `source == target` the single trivial path is returned.
pub fn greedy_disjoint_paths<G, C>(
    graph: &G,
    source: Node,
    target: Node,
    k: usize,
    cost: C,
    mode: DijkstraMode,
    disjointness: Disjointness,
) -> Result<Vec<Path>, SearchError>
where
    G: Graph + ?Sized,
    C: ArcCost,
{
    check_endpoints(graph, source, target)?;
    let mut paths = Vec::new();
    let mut used_arcs = HashSet::new();
    let mut used_nodes = HashSet::new();
    while paths.len() < k {
        let mut restricted = Restricted::new(&cost);
        restricted.arcs.clone_from(&used_arcs);
        restricted.nodes.clone_from(&used_nodes);
        let mut search = Dijkstra::new(graph, restricted, mode);
        search.add_source(source)?;
        let Some(path) = search.run_until_fixed(target)?.and_then(|t| search.path(t)) else {
            break;
        };
        let trivial = path.arc_count() == 0;
        used_arcs.extend(path.arcs());
        if disjointness == Disjointness::Node && path.node_count() > 2 {
            used_nodes.extend(path.nodes().skip(1).take(path.node_count() - 2));
        }
        paths.push(path);
        if trivial {
            break;
        }
    }
    log::debug!("greedy search found {} of {k} disjoint paths", paths.len());
    Ok(paths)
}

#[derive(Clone, Copy, Debug)]
enum Residual {
    /// Walk `arc` from `from` to `to`.
    Use { arc: Arc, from: Node, to: Node },
    /// Undo the first path's traversal of `arc`.
    Cancel(Arc),
}

/// The cheapest pair of arc-disjoint `source -> target` paths (Sum mode).
///
/// A shortest path is found first; costs are then reduced by the distance
/// labels so they stay non-negative, the first path's arcs are replaced by
/// zero-cost reversals, and a second search in that residual graph finds
/// the augmenting path. Arcs used by the first path and undone by the
/// second cancel out, and what remains splits into two disjoint paths of
/// minimum total cost.
///
/// The pair is always computed in [`DijkstraMode::Sum`] and always has
/// two members, so there is no `k` or mode to choose; families of other
/// sizes and bottleneck costs go through [`greedy_disjoint_paths`].
///
/// Returns `None` when `source == target` or when no two arc-disjoint
/// paths exist.
pub fn optimal_disjoint_pair<G, C>(
    graph: &G,
    source: Node,
    target: Node,
    cost: C,
) -> Result<Option<(Path, Path)>, SearchError>
where
    G: Graph + ?Sized,
    C: ArcCost,
{
    check_endpoints(graph, source, target)?;
    if source == target {
        return Ok(None);
    }

    let mut first_search = Dijkstra::new(graph, Restricted::new(&cost), DijkstraMode::Sum);
    first_search.add_source(source)?;
    first_search.run()?;
    let Some(first) = first_search.path(target) else {
        return Ok(None);
    };

    let mut first_uses: HashMap<Arc, (Node, Node)> = HashMap::new();
    for i in 0..first.arc_count() {
        if let (Some(arc), Some(from), Some(to)) = (first.arc(i), first.node(i), first.node(i + 1)) {
            first_uses.insert(arc, (from, to));
        }
    }

    // Residual graph over dense node ids.
    let mut nodes = Vec::new();
    graph.nodes(&mut nodes);
    let dense: HashMap<Node, Node> = nodes
        .iter()
        .enumerate()
        .map(|(i, &node)| (node, Node::new(i as u64)))
        .collect();
    let mut residual = CustomGraph::with_nodes(nodes.len());
    let mut kinds = Vec::new();
    let mut reduced = Vec::new();

    let mut arcs = Vec::new();
    graph.arcs(ArcFilter::All, &mut arcs);
    for arc in arcs {
        let c = cost.cost(arc);
        if !DijkstraMode::Sum.accepts(c) {
            return Err(SearchError::InvalidCost { arc, cost: c });
        }
        if c == f64::INFINITY {
            continue;
        }
        if let Some(&(from, to)) = first_uses.get(&arc) {
            residual.add_directed(dense[&to], dense[&from]);
            kinds.push(Residual::Cancel(arc));
            reduced.push(0.0);
            continue;
        }
        let (u, v) = (graph.u(arc), graph.v(arc));
        let mut directions = vec![(u, v)];
        if graph.is_edge(arc) {
            directions.push((v, u));
        }
        for (from, to) in directions {
            let (df, dt) = (first_search.distance(from), first_search.distance(to));
            if from == to || df == f64::INFINITY {
                continue;
            }
            residual.add_directed(dense[&from], dense[&to]);
            kinds.push(Residual::Use { arc, from, to });
            reduced.push((c + df - dt).max(0.0));
        }
    }

    let residual_cost = |a: Arc| reduced[a.id() as usize];
    let mut second_search = Dijkstra::new(&residual, residual_cost, DijkstraMode::Sum);
    second_search.add_source(dense[&source])?;
    let Some(t) = second_search.run_until_fixed(dense[&target])? else {
        return Ok(None);
    };
    let Some(second) = second_search.path(t) else {
        return Ok(None);
    };

    // Union of both traversals, minus cancelled pairs.
    let mut outgoing: HashMap<Node, Vec<(Arc, Node)>> = HashMap::new();
    let mut cancelled = Vec::new();
    for residual_arc in second.arcs() {
        match kinds[residual_arc.id() as usize] {
            Residual::Use { arc, from, to } => outgoing.entry(from).or_default().push((arc, to)),
            Residual::Cancel(arc) => cancelled.push(arc),
        }
    }
    for (&arc, &(from, to)) in &first_uses {
        if !cancelled.contains(&arc) {
            outgoing.entry(from).or_default().push((arc, to));
        }
    }
    for list in outgoing.values_mut() {
        list.sort_by_key(|&(arc, _)| arc);
    }

    let (Some(a), Some(b)) = (
        walk(&mut outgoing, source, target),
        walk(&mut outgoing, source, target),
    ) else {
        return Ok(None);
    };
    log::debug!(
        "disjoint pair found with total cost {}",
        a.total_cost(&cost, DijkstraMode::Sum) + b.total_cost(&cost, DijkstraMode::Sum)
    );
    Ok(Some((a, b)))
}

// Consume traversals from `source` until `target`, cutting out any loop.
fn walk(outgoing: &mut HashMap<Node, Vec<(Arc, Node)>>, source: Node, target: Node) -> Option<Path> {
    let mut path = Path::trivial(source);
    while path.last() != target {
        let (arc, next) = outgoing.get_mut(&path.last())?.pop()?;
        let revisit = path.nodes().position(|x| x == next);
        match revisit {
            Some(i) => path = path.prefix(i + 1),
            None => path.push_back(arc, next),
        }
    }
    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{arc_disjoint, is_walk, random_costs, random_graph, simple_paths};

    fn n(id: u64) -> Node {
        Node::new(id)
    }

    // s=0 a=1 b=2 t=3: the cheapest path s-a-b-t blocks both halves of the
    // only disjoint pair s-a-t / s-b-t.
    fn trap() -> (CustomGraph, Vec<f64>) {
        let mut g = CustomGraph::with_nodes(4);
        let mut costs = Vec::new();
        for (u, v, c) in [(0, 1, 1.0), (1, 2, 1.0), (2, 3, 1.0), (0, 2, 3.0), (1, 3, 3.0)] {
            g.add_directed(n(u), n(v));
            costs.push(c);
        }
        (g, costs)
    }

    fn pair_cost(pair: &(Path, Path), cost: &impl ArcCost) -> f64 {
        pair.0.total_cost(cost, DijkstraMode::Sum) + pair.1.total_cost(cost, DijkstraMode::Sum)
    }

    #[test]
    fn greedy_falls_into_trap_optimal_does_not() {
        let (g, costs) = trap();
        let cost = |arc: Arc| costs[arc.id() as usize];
        let greedy =
            greedy_disjoint_paths(&g, n(0), n(3), 2, cost, DijkstraMode::Sum, Disjointness::Edge)
                .unwrap();
        assert_eq!(greedy.len(), 1);
        assert_eq!(greedy[0].to_node_vec(), vec![n(0), n(1), n(2), n(3)]);

        let pair = optimal_disjoint_pair(&g, n(0), n(3), cost).unwrap().unwrap();
        assert!(arc_disjoint(&pair.0, &pair.1));
        assert_eq!(pair_cost(&pair, &cost), 8.0);
        let mut shapes = vec![pair.0.to_node_vec(), pair.1.to_node_vec()];
        shapes.sort();
        assert_eq!(shapes, vec![vec![n(0), n(1), n(3)], vec![n(0), n(2), n(3)]]);
    }

    #[test]
    fn greedy_edge_versus_node() {
        // Two routes share node 1; a third avoids it.
        let mut g = CustomGraph::with_nodes(6);
        let mut costs = Vec::new();
        for (u, v, c) in [
            (0, 1, 1.0),
            (1, 4, 1.0),
            (0, 2, 1.0),
            (2, 1, 1.0),
            (1, 5, 1.0),
            (5, 4, 1.0),
            (0, 3, 5.0),
            (3, 4, 5.0),
        ] {
            g.add_directed(n(u), n(v));
            costs.push(c);
        }
        let cost = |arc: Arc| costs[arc.id() as usize];
        let by_edge =
            greedy_disjoint_paths(&g, n(0), n(4), 5, cost, DijkstraMode::Sum, Disjointness::Edge)
                .unwrap();
        let shapes: Vec<Vec<Node>> = by_edge.iter().map(Path::to_node_vec).collect();
        assert_eq!(
            shapes,
            vec![
                vec![n(0), n(1), n(4)],
                vec![n(0), n(2), n(1), n(5), n(4)],
                vec![n(0), n(3), n(4)],
            ]
        );

        let by_node =
            greedy_disjoint_paths(&g, n(0), n(4), 5, cost, DijkstraMode::Sum, Disjointness::Node)
                .unwrap();
        assert_eq!(by_node.len(), 2);
        assert_eq!(by_node[1].to_node_vec(), vec![n(0), n(3), n(4)]);

        let capped =
            greedy_disjoint_paths(&g, n(0), n(4), 1, cost, DijkstraMode::Sum, Disjointness::Edge)
                .unwrap();
        assert_eq!(capped.len(), 1);
    }

    #[test]
    fn greedy_follows_bottleneck_costs() {
        // 0-1-2-3 has the larger sum but the smaller largest arc.
        let mut g = CustomGraph::with_nodes(4);
        let mut costs = Vec::new();
        for (u, v, c) in [(0, 1, 1.0), (1, 2, 1.0), (2, 3, 4.0), (0, 3, 5.0)] {
            g.add_directed(n(u), n(v));
            costs.push(c);
        }
        let cost = |arc: Arc| costs[arc.id() as usize];
        let long = vec![n(0), n(1), n(2), n(3)];
        let short = vec![n(0), n(3)];

        let by_sum =
            greedy_disjoint_paths(&g, n(0), n(3), 2, cost, DijkstraMode::Sum, Disjointness::Edge)
                .unwrap();
        let shapes: Vec<Vec<Node>> = by_sum.iter().map(Path::to_node_vec).collect();
        assert_eq!(shapes, vec![short.clone(), long.clone()]);

        for disjointness in [Disjointness::Edge, Disjointness::Node] {
            let by_max =
                greedy_disjoint_paths(&g, n(0), n(3), 2, cost, DijkstraMode::Maximum, disjointness)
                    .unwrap();
            let shapes: Vec<Vec<Node>> = by_max.iter().map(Path::to_node_vec).collect();
            assert_eq!(shapes, vec![long.clone(), short.clone()]);
            assert_eq!(by_max[0].total_cost(&cost, DijkstraMode::Maximum), 4.0);
            assert_eq!(by_max[1].total_cost(&cost, DijkstraMode::Maximum), 5.0);
        }
    }

    #[test]
    fn degenerate_queries() {
        let mut g = CustomGraph::with_nodes(3);
        g.add_edge(n(0), n(1));
        let one = |_: Arc| 1.0;
        let same =
            greedy_disjoint_paths(&g, n(1), n(1), 4, one, DijkstraMode::Sum, Disjointness::Edge)
                .unwrap();
        assert_eq!(same, vec![Path::trivial(n(1))]);
        assert_eq!(optimal_disjoint_pair(&g, n(1), n(1), one).unwrap(), None);
        assert_eq!(optimal_disjoint_pair(&g, n(0), n(2), one).unwrap(), None);
        // A single edge cannot carry two disjoint paths.
        assert_eq!(optimal_disjoint_pair(&g, n(0), n(1), one).unwrap(), None);
        assert_eq!(
            optimal_disjoint_pair(&g, n(0), n(7), one),
            Err(SearchError::UnknownNode(n(7)))
        );
        assert!(matches!(
            optimal_disjoint_pair(&g, n(0), n(1), |_: Arc| -1.0),
            Err(SearchError::InvalidCost { .. })
        ));
    }

    #[test]
    fn undirected_pair_reuses_no_edge() {
        // Square 0-1-3-2-0 plus the diagonal 1-2.
        let mut g = CustomGraph::with_nodes(4);
        let mut costs = Vec::new();
        for (u, v, c) in [(0, 1, 1.0), (1, 3, 1.0), (0, 2, 1.0), (2, 3, 1.0), (1, 2, 0.0)] {
            g.add_edge(n(u), n(v));
            costs.push(c);
        }
        let cost = |arc: Arc| costs[arc.id() as usize];
        let pair = optimal_disjoint_pair(&g, n(0), n(3), cost).unwrap().unwrap();
        assert!(arc_disjoint(&pair.0, &pair.1));
        assert!(is_walk(&g, &pair.0) && is_walk(&g, &pair.1));
        assert_eq!(pair_cost(&pair, &cost), 4.0);
    }

    #[test]
    fn optimal_matches_brute_force_and_beats_greedy() {
        let mut rng = rand::rng();
        for _ in 0..60 {
            let g = random_graph(&mut rng, 6, 12);
            let costs = random_costs(&mut rng, &g, 0, 9);
            let cost = |arc: Arc| costs[arc.id() as usize];

            let all = simple_paths(&g, n(0), n(5));
            let mut best = f64::INFINITY;
            for (i, a) in all.iter().enumerate() {
                for b in &all[i + 1..] {
                    if arc_disjoint(a, b) {
                        let total = a.total_cost(&cost, DijkstraMode::Sum)
                            + b.total_cost(&cost, DijkstraMode::Sum);
                        best = best.min(total);
                    }
                }
            }

            let found = optimal_disjoint_pair(&g, n(0), n(5), cost).unwrap();
            match &found {
                None => assert_eq!(best, f64::INFINITY),
                Some(pair) => {
                    for p in [&pair.0, &pair.1] {
                        assert!(is_walk(&g, p));
                        assert!(p.is_simple());
                        assert_eq!((p.first(), p.last()), (n(0), n(5)));
                    }
                    assert!(arc_disjoint(&pair.0, &pair.1));
                    assert_eq!(pair_cost(pair, &cost), best);
                }
            }

            let greedy = greedy_disjoint_paths(
                &g,
                n(0),
                n(5),
                2,
                cost,
                DijkstraMode::Sum,
                Disjointness::Edge,
            )
            .unwrap();
            if greedy.len() == 2 {
                let pair = found.as_ref().unwrap();
                let greedy_total = greedy
                    .iter()
                    .map(|p| p.total_cost(&cost, DijkstraMode::Sum))
                    .sum::<f64>();
                assert!(pair_cost(pair, &cost) <= greedy_total);
            }
        }
    }
}
