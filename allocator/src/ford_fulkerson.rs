//! Ford-Fulkerson engine (Koegel variant): one attempted augmentation per
//! rater along a maximum-gain path.
use crate::augment::augment_path;
use crate::extract::extract_allocation;
use crate::flow_graph::build_network;
use crate::index_map::IndexMap;
use crate::search::longest_path;
use crate::{DistributionError, Distributor};
use definitions::{Allocation, Choice, Rating};
use petgraph::graph::NodeIndex;

pub const NAME: &str = "fordfulkerson";

/// The network keeps the raw rating sign, so the search maximizes gain
/// instead of minimizing cost. The loop runs exactly once per rater; a
/// round without an augmenting path is a no-op, it is not retried and does
/// not extend the loop.
pub struct FordFulkerson;

impl Distributor for FordFulkerson {
    fn compute_distribution(
        &self,
        choices: &[Choice],
        ratings: &[Rating],
        raters: &[u64],
    ) -> Result<Allocation, DistributionError> {
        let index = IndexMap::new(raters.len(), ratings);
        let mut graph = build_network(choices, ratings, &index, 1);
        let source = NodeIndex::new(index.source());
        let sink = NodeIndex::new(index.sink());
        let mut placed = 0;
        for round in 0..raters.len() {
            match longest_path(&graph, source, sink)? {
                Some(path) => {
                    trace!("AUGMENT\t{}\t{}", round, path.len());
                    augment_path(&mut graph, &path, sink)?;
                    placed += 1;
                }
                None => trace!("AUGMENT\t{}\tNoPath", round),
            }
        }
        debug!("FORDFULKERSON\t{}\tAugmentingPaths", placed);
        Ok(extract_allocation(&graph, choices, &index))
    }
    fn name(&self) -> &'static str {
        NAME
    }
}
