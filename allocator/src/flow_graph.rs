//! Flow network model for the augmenting-path engines.
//! - FlowEdge
//! - FlowNetwork
//! - build_network
use crate::index_map::IndexMap;
use definitions::{Choice, Rating};
use petgraph::graph::{DiGraph, NodeIndex};

/// Edge attributes of the allocation network.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct FlowEdge {
    /// Rating-derived traversal cost. Reverse edges carry the negation of
    /// the forward edge they replaced.
    pub weight: i64,
    /// Remaining capacity. Meaningful only on choice->sink edges; every
    /// other edge moves exactly one unit.
    pub space: u32,
}

impl FlowEdge {
    pub fn new(weight: i64, space: u32) -> FlowEdge {
        FlowEdge { weight, space }
    }
    /// The residual counterpart inserted when this edge is consumed.
    pub fn reversed(&self) -> FlowEdge {
        FlowEdge {
            weight: -self.weight,
            space: self.space,
        }
    }
}

/// The network is a plain petgraph arena: nodes are added once, in dense
/// index order, so `NodeIndex::index()` equals the [IndexMap] node index.
/// Augmentation mutates edges only, never nodes.
pub type FlowNetwork = DiGraph<(), FlowEdge>;

/// Build the bipartite layering source -> users -> choices -> sink.
///
/// - source -> user: weight 0, one unit each;
/// - user -> choice: one edge per rating with `rating > 0`, weight
///   `multiplier * rating`;
/// - choice -> sink: weight 0, `space = maxsize`.
///
/// Ratings at zero or below produce no edge, and a choice with
/// `maxsize == 0` gets no sink edge. The returned graph fully replaces any
/// previous state; construction is never incremental.
pub fn build_network(
    choices: &[Choice],
    ratings: &[Rating],
    index: &IndexMap,
    multiplier: i64,
) -> FlowNetwork {
    let mut graph = FlowNetwork::with_capacity(index.node_count(), ratings.len());
    for _ in 0..index.node_count() {
        graph.add_node(());
    }
    let source = NodeIndex::new(index.source());
    let sink = NodeIndex::new(index.sink());
    // Insert user edges in node-index order to keep runs reproducible.
    let mut users: Vec<_> = index.users().collect();
    users.sort_unstable_by_key(|&(_, user_index)| user_index);
    for (_, user_index) in users {
        graph.add_edge(source, NodeIndex::new(user_index), FlowEdge::new(0, 1));
    }
    for choice in choices {
        if choice.maxsize == 0 {
            continue;
        }
        if let Some(choice_index) = index.choice_index(choice.id) {
            graph.add_edge(
                NodeIndex::new(choice_index),
                sink,
                FlowEdge::new(0, choice.maxsize),
            );
        }
    }
    for rating in ratings {
        if rating.rating <= 0 {
            continue;
        }
        // Both endpoints are mapped, the rating itself created the mapping.
        let user = NodeIndex::new(index.user_index(rating.userid).unwrap());
        let choice = NodeIndex::new(index.choice_index(rating.choiceid).unwrap());
        graph.add_edge(user, choice, FlowEdge::new(multiplier * rating.rating, 1));
    }
    trace!(
        "NETWORK\t{}\tNodes\t{}\tEdges",
        graph.node_count(),
        graph.edge_count()
    );
    graph
}
