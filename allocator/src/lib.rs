//! Allocation engines distributing raters into capacity-limited choices.
//!
//! Two independent engine families operate on the same contract: the
//! augmenting-path flow engines ([edmonds_karp], [ford_fulkerson]) and the
//! deferred-acceptance matching engine ([deferred_acceptance]). Each consumes
//! the choice list, the rating list, and the rater list, and produces one
//! [Allocation](definitions::Allocation) covering every input choice.
pub mod augment;
pub mod deferred_acceptance;
pub mod edmonds_karp;
pub mod extract;
pub mod flow_graph;
pub mod ford_fulkerson;
pub mod index_map;
pub mod mocks;
pub mod satisfaction;
pub mod search;
#[macro_use]
extern crate log;

use definitions::{Allocation, Choice, Rating};
use thiserror::Error;

/// Fatal conditions aborting an allocation run.
/// Absence of an augmenting path and exhausted preference lists are normal
/// termination, encoded in control flow rather than in this enum.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DistributionError {
    #[error(transparent)]
    Search(#[from] search::SearchError),
    #[error(transparent)]
    Augment(#[from] augment::AugmentError),
}

/// One allocation strategy. Implementors are stateless apart from their
/// run configuration; every call builds, mutates, and discards its own state.
pub trait Distributor {
    fn compute_distribution(
        &self,
        choices: &[Choice],
        ratings: &[Rating],
        raters: &[u64],
    ) -> Result<Allocation, DistributionError>;
    /// The identifier the strategy is registered under.
    fn name(&self) -> &'static str;
}

/// The registered strategy identifiers, in factory lookup order.
pub const ALGORITHM_NAMES: [&str; 3] = [
    edmonds_karp::NAME,
    ford_fulkerson::NAME,
    deferred_acceptance::NAME,
];

/// Resolve a configuration-selected strategy identifier once per run.
/// The seed only influences the deferred-acceptance ranking shuffle.
pub fn distributor_by_name(name: &str, seed: u64) -> Option<Box<dyn Distributor>> {
    match name {
        edmonds_karp::NAME => Some(Box::new(edmonds_karp::EdmondsKarp)),
        ford_fulkerson::NAME => Some(Box::new(ford_fulkerson::FordFulkerson)),
        deferred_acceptance::NAME => {
            Some(Box::new(deferred_acceptance::DeferredAcceptance::with_seed(seed)))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn factory_resolves_registered_names() {
        for name in ALGORITHM_NAMES.iter() {
            let distributor = distributor_by_name(name, 0).unwrap();
            assert_eq!(distributor.name(), *name);
        }
    }
    #[test]
    fn factory_rejects_unknown_names() {
        assert!(distributor_by_name("simplex", 0).is_none());
        assert!(distributor_by_name("", 0).is_none());
    }
}
