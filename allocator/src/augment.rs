//! Path augmentation, the only mutator of edge state after construction.
use crate::flow_graph::FlowNetwork;
use itertools::Itertools;
use petgraph::graph::NodeIndex;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AugmentError {
    /// The path does not describe at least one hop, or names a hop with no
    /// edge left in the network. A contract violation by the caller, never
    /// retried.
    #[error("augmenting path must walk existing edges from source to sink")]
    InvalidPath,
}

/// Push one unit of flow along `path` (ordered sink first, as returned by
/// the searches).
///
/// The final hop into the sink rides the choice->sink capacity edge: while
/// it has `space > 1` it is decremented in place, keeping the
/// multi-capacity edge alive. Every other consumed edge is removed and
/// replaced by its reverse with negated weight, so an edge and its reverse
/// never coexist and no duplicate forward edge can appear.
pub fn augment_path(
    graph: &mut FlowNetwork,
    path: &[NodeIndex],
    sink: NodeIndex,
) -> Result<(), AugmentError> {
    if path.len() < 2 {
        return Err(AugmentError::InvalidPath);
    }
    // The path arrives sink->source; walk it in flow direction.
    for (&from, &to) in path.iter().rev().tuple_windows() {
        let edge = graph.find_edge(from, to).ok_or(AugmentError::InvalidPath)?;
        if to == sink && graph[edge].space > 1 {
            graph[edge].space -= 1;
            continue;
        }
        let consumed = graph.remove_edge(edge).unwrap();
        graph.add_edge(to, from, consumed.reversed());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow_graph::FlowEdge;

    /// source -> user -> choice -> sink with the given sink capacity.
    fn chain(space: u32) -> (FlowNetwork, Vec<NodeIndex>) {
        let mut graph = FlowNetwork::new();
        let s = graph.add_node(());
        let u = graph.add_node(());
        let c = graph.add_node(());
        let t = graph.add_node(());
        graph.add_edge(s, u, FlowEdge::new(0, 1));
        graph.add_edge(u, c, FlowEdge::new(-4, 1));
        graph.add_edge(c, t, FlowEdge::new(0, space));
        (graph, vec![t, c, u, s])
    }

    #[test]
    fn rejects_short_path() {
        let (mut graph, path) = chain(1);
        let sink = path[0];
        assert_eq!(
            augment_path(&mut graph, &path[..1], sink),
            Err(AugmentError::InvalidPath)
        );
        assert_eq!(
            augment_path(&mut graph, &[], sink),
            Err(AugmentError::InvalidPath)
        );
    }

    #[test]
    fn rejects_missing_edge() {
        let (mut graph, mut path) = chain(1);
        let sink = path[0];
        path.swap(1, 2);
        assert_eq!(
            augment_path(&mut graph, &path, sink),
            Err(AugmentError::InvalidPath)
        );
    }

    #[test]
    fn multi_capacity_sink_edge_is_decremented() {
        let (mut graph, path) = chain(3);
        let sink = path[0];
        let choice = path[1];
        augment_path(&mut graph, &path, sink).unwrap();
        let edge = graph.find_edge(choice, sink).unwrap();
        assert_eq!(graph[edge].space, 2);
        // The user edge was reversed with negated weight.
        let user = path[2];
        let reversed = graph.find_edge(choice, user).unwrap();
        assert_eq!(graph[reversed].weight, 4);
        assert!(graph.find_edge(user, choice).is_none());
    }

    #[test]
    fn saturated_sink_edge_is_reversed() {
        let (mut graph, path) = chain(1);
        let sink = path[0];
        let choice = path[1];
        augment_path(&mut graph, &path, sink).unwrap();
        assert!(graph.find_edge(choice, sink).is_none());
        assert!(graph.find_edge(sink, choice).is_some());
    }

    #[test]
    fn source_edge_is_consumed() {
        let (mut graph, path) = chain(2);
        let sink = path[0];
        let source = path[3];
        let user = path[2];
        augment_path(&mut graph, &path, sink).unwrap();
        assert!(graph.find_edge(source, user).is_none());
        assert!(graph.find_edge(user, source).is_some());
    }

    #[test]
    fn no_forward_edge_duplicates() {
        let (mut graph, path) = chain(2);
        let sink = path[0];
        augment_path(&mut graph, &path, sink).unwrap();
        for from in graph.node_indices() {
            for to in graph.node_indices() {
                assert!(graph.edges_connecting(from, to).count() <= 1);
                if from != to && graph.find_edge(from, to).is_some() {
                    assert!(graph.find_edge(to, from).is_none());
                }
            }
        }
    }
}
