//! Edmonds-Karp engine: augment along min-cost shortest paths until no
//! augmenting path remains.
use crate::augment::augment_path;
use crate::extract::extract_allocation;
use crate::flow_graph::build_network;
use crate::index_map::IndexMap;
use crate::search::shortest_path;
use crate::{DistributionError, Distributor};
use definitions::{Allocation, Choice, Rating};
use petgraph::graph::NodeIndex;

pub const NAME: &str = "edmondskarp";

/// The network is built with a -1 weight multiplier, turning "maximize
/// satisfied rating" into "find the Bellman-Ford shortest path". The loop
/// saturates naturally: each round consumes one unit of source or sink
/// capacity, and the search signals termination by finding no path.
pub struct EdmondsKarp;

impl Distributor for EdmondsKarp {
    fn compute_distribution(
        &self,
        choices: &[Choice],
        ratings: &[Rating],
        raters: &[u64],
    ) -> Result<Allocation, DistributionError> {
        let index = IndexMap::new(raters.len(), ratings);
        let mut graph = build_network(choices, ratings, &index, -1);
        let source = NodeIndex::new(index.source());
        let sink = NodeIndex::new(index.sink());
        let mut rounds = 0;
        while let Some(path) = shortest_path(&graph, source, sink) {
            trace!("AUGMENT\t{}\t{}", rounds, path.len());
            augment_path(&mut graph, &path, sink)?;
            rounds += 1;
        }
        debug!("EDMONDSKARP\t{}\tAugmentingPaths", rounds);
        Ok(extract_allocation(&graph, choices, &index))
    }
    fn name(&self) -> &'static str {
        NAME
    }
}
