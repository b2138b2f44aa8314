//! Read the final residual network into the external allocation mapping.
use crate::flow_graph::FlowNetwork;
use crate::index_map::IndexMap;
use definitions::{Allocation, Choice};
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;

/// Collect each choice node's outgoing edges. After augmentation those are
/// the reversed user edges, so their destinations are exactly the users
/// assigned to the choice. Destinations outside the user mapping (the sink
/// edge's terminal, reversed source edges) are skipped. Every input choice
/// keys the result, unfilled ones with an empty list; reading unchanged
/// state twice yields identical output.
pub fn extract_allocation(
    graph: &FlowNetwork,
    choices: &[Choice],
    index: &IndexMap,
) -> Allocation {
    let mut allocation = Allocation::default();
    for choice in choices {
        let assigned: Vec<u64> = match index.choice_index(choice.id) {
            Some(choice_index) => graph
                .edges(NodeIndex::new(choice_index))
                .filter_map(|edge| index.user_of(edge.target().index()))
                .collect(),
            None => Vec::new(),
        };
        debug!("ASSIGNED\t{}\t{}", choice.id, assigned.len());
        allocation.assignments.insert(choice.id, assigned);
    }
    allocation
}
