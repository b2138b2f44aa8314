//! Augmenting-path searches over the allocation network.
//!
//! Two variants share the predecessor-array reconstruction: the full
//! Bellman-Ford relaxation used by the Edmonds-Karp engine, and the
//! edge-stack longest-path search used by the Ford-Fulkerson engine. Both
//! return the found path ordered sink first, source last.
use crate::flow_graph::FlowNetwork;
use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SearchError {
    /// The longest-path relaxation did not settle within its iteration
    /// bound. A valid rating network never cycles with positive gain, so
    /// this surfaces malformed input, not a transient condition.
    #[error("path search did not settle within {iterations} iterations; the rating network contains a negative cycle")]
    SuspectedNegativeCycle { iterations: usize },
}

/// Bellman-Ford over the whole edge set, tolerant of negative weights.
/// Relaxes up to `count - 1` passes and exits early once a pass performs no
/// update. `None` means the sink is unreachable, the normal termination
/// signal of the Edmonds-Karp loop.
///
/// Negative-cycle detection is deliberately absent: the builder applies one
/// sign multiplier to every rating edge and augmentation only ever inserts
/// the exact negation of a removed edge, so no residual cycle can sum below
/// zero.
pub fn shortest_path(
    graph: &FlowNetwork,
    source: NodeIndex,
    sink: NodeIndex,
) -> Option<Vec<NodeIndex>> {
    let count = graph.node_count();
    let mut dist: Vec<Option<i64>> = vec![None; count];
    let mut pred: Vec<Option<NodeIndex>> = vec![None; count];
    dist[source.index()] = Some(0);
    for pass in 1..count {
        let mut updated = false;
        for edge in graph.edge_references() {
            let from_dist = match dist[edge.source().index()] {
                Some(d) => d,
                None => continue,
            };
            let candidate = from_dist + edge.weight().weight;
            let to = edge.target().index();
            if dist[to].map_or(true, |current| candidate < current) {
                dist[to] = Some(candidate);
                pred[to] = Some(edge.source());
                updated = true;
            }
        }
        if !updated {
            trace!("RELAX\tSettled\t{}", pass);
            break;
        }
    }
    pred[sink.index()]?;
    Some(walk_back(&pred, source, sink))
}

/// Label-correcting longest-path search. The network encodes gain rather
/// than cost, so relaxation keeps the largest distance. A work stack holds
/// edges to relax, seeded with the source's outgoing edges; improving a
/// node's distance pushes all of its outgoing edges back onto the stack.
/// Bounded by `count^3` pops; exceeding the bound is fatal.
pub fn longest_path(
    graph: &FlowNetwork,
    source: NodeIndex,
    sink: NodeIndex,
) -> Result<Option<Vec<NodeIndex>>, SearchError> {
    let count = graph.node_count();
    let bound = count.saturating_pow(3);
    let mut dist: Vec<Option<i64>> = vec![None; count];
    let mut pred: Vec<Option<NodeIndex>> = vec![None; count];
    dist[source.index()] = Some(0);
    let mut stack: Vec<EdgeIndex> = graph.edges(source).map(|edge| edge.id()).collect();
    let mut iterations = 0;
    while let Some(edge) = stack.pop() {
        iterations += 1;
        if iterations > bound {
            return Err(SearchError::SuspectedNegativeCycle { iterations: bound });
        }
        let (from, to) = graph.edge_endpoints(edge).unwrap();
        let from_dist = match dist[from.index()] {
            Some(d) => d,
            None => continue,
        };
        let candidate = from_dist + graph[edge].weight;
        if dist[to.index()].map_or(true, |current| candidate > current) {
            dist[to.index()] = Some(candidate);
            pred[to.index()] = Some(from);
            stack.extend(graph.edges(to).map(|next| next.id()));
        }
    }
    Ok(pred[sink.index()].map(|_| walk_back(&pred, source, sink)))
}

/// Follow the predecessor chain from the sink down to the source.
/// The caller has checked `pred[sink]`, so the chain is complete.
fn walk_back(pred: &[Option<NodeIndex>], source: NodeIndex, sink: NodeIndex) -> Vec<NodeIndex> {
    let mut path = vec![sink];
    let mut current = sink;
    while current != source {
        let previous = pred[current.index()].unwrap();
        path.push(previous);
        current = previous;
    }
    path
}
