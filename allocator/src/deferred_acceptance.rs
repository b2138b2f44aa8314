//! Deferred-acceptance matching engine.
//!
//! Independent of the flow machinery: users propose down their preference
//! lists, choices tentatively hold the best proposers up to capacity, and
//! optional choices that cannot reach their minimum size are closed, freeing
//! their occupants to propose elsewhere. Priority between proposers is a
//! global ranking shuffled once per run.
use crate::{DistributionError, Distributor};
use definitions::{Allocation, Choice, Rating};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoroshiro128StarStar;
use std::cmp::Reverse;
use std::collections::HashMap;

pub const NAME: &str = "deferred";

/// Run configuration. The seed fixes the ranking shuffle, keeping runs
/// reproducible; hosts wanting a fresh lottery pass a fresh seed.
#[derive(Debug, Clone, Copy)]
pub struct DeferredAcceptance {
    pub seed: u64,
}

impl DeferredAcceptance {
    pub fn with_seed(seed: u64) -> Self {
        Self { seed }
    }
}

impl Default for DeferredAcceptance {
    fn default() -> Self {
        Self::with_seed(0)
    }
}

impl Distributor for DeferredAcceptance {
    fn compute_distribution(
        &self,
        choices: &[Choice],
        ratings: &[Rating],
        raters: &[u64],
    ) -> Result<Allocation, DistributionError> {
        let mut rng = Xoroshiro128StarStar::seed_from_u64(self.seed);
        let mut matching = Matching::new(choices, ratings, raters, &mut rng);
        matching.run();
        debug!(
            "DEFERRED\t{}\tRejections\t{}\tClosed",
            matching.total_rejections,
            matching.choices.iter().filter(|c| c.closed).count()
        );
        Ok(matching.into_allocation(choices))
    }
    fn name(&self) -> &'static str {
        NAME
    }
}

#[derive(Debug, Clone)]
struct Proposer {
    id: u64,
    /// Choice ids, most preferred first. Derived from the user's positive
    /// ratings, strongest rating first, submission order on ties.
    preferencelist: Vec<u64>,
    /// Next preference to propose to. Advances on rejection, never on a
    /// tentative hold.
    cursor: usize,
    currentchoice: Option<u64>,
}

#[derive(Debug, Clone)]
struct ChoiceState {
    id: u64,
    minsize: u32,
    maxsize: u32,
    optional: bool,
    closed: bool,
    /// `(global rank, userid)`, kept sorted ascending by rank after each
    /// rejection pass. Lower rank wins.
    waitinglist: Vec<(usize, u64)>,
}

#[derive(Debug, Clone)]
struct Matching {
    proposers: Vec<Proposer>,
    choices: Vec<ChoiceState>,
    proposer_slot: HashMap<u64, usize>,
    choice_slot: HashMap<u64, usize>,
    /// The shuffled user permutation; position is the priority used for
    /// every admission decision of this run.
    globalranking: Vec<u64>,
    rank_of: HashMap<u64, usize>,
    total_rejections: usize,
}

impl Matching {
    fn new<R: Rng>(choices: &[Choice], ratings: &[Rating], raters: &[u64], rng: &mut R) -> Self {
        let mut globalranking = raters.to_vec();
        globalranking.shuffle(rng);
        let rank_of: HashMap<u64, usize> = globalranking
            .iter()
            .enumerate()
            .map(|(rank, &id)| (id, rank))
            .collect();
        let choice_slot: HashMap<u64, usize> = choices
            .iter()
            .enumerate()
            .map(|(slot, c)| (c.id, slot))
            .collect();
        // Positive ratings only, strongest first; ties keep submission order.
        let mut preferences: HashMap<u64, Vec<(i64, u64)>> = HashMap::new();
        for rating in ratings {
            if rating.rating <= 0 || !choice_slot.contains_key(&rating.choiceid) {
                continue;
            }
            preferences
                .entry(rating.userid)
                .or_insert_with(Vec::new)
                .push((rating.rating, rating.choiceid));
        }
        let proposers: Vec<Proposer> = raters
            .iter()
            .map(|&id| {
                let mut rated = preferences.remove(&id).unwrap_or_default();
                rated.sort_by_key(|&(rating, _)| Reverse(rating));
                Proposer {
                    id,
                    preferencelist: rated.into_iter().map(|(_, choiceid)| choiceid).collect(),
                    cursor: 0,
                    currentchoice: None,
                }
            })
            .collect();
        let proposer_slot = proposers
            .iter()
            .enumerate()
            .map(|(slot, p)| (p.id, slot))
            .collect();
        let choices = choices
            .iter()
            .map(|c| ChoiceState {
                id: c.id,
                minsize: c.minsize,
                maxsize: c.maxsize,
                optional: c.optional,
                closed: false,
                waitinglist: Vec::new(),
            })
            .collect();
        Self {
            proposers,
            choices,
            proposer_slot,
            choice_slot,
            globalranking,
            rank_of,
            total_rejections: 0,
        }
    }

    /// Every unassigned user proposes to their best remaining open choice.
    /// Returns the number of proposals made.
    fn propose_round(&mut self) -> usize {
        let mut proposals = 0;
        for slot in 0..self.proposers.len() {
            if self.proposers[slot].currentchoice.is_some() {
                continue;
            }
            loop {
                let proposer = &self.proposers[slot];
                let choiceid = match proposer.preferencelist.get(proposer.cursor).copied() {
                    Some(choiceid) => choiceid,
                    None => break,
                };
                let choice = &mut self.choices[self.choice_slot[&choiceid]];
                if choice.closed {
                    self.proposers[slot].cursor += 1;
                    continue;
                }
                let userid = self.proposers[slot].id;
                choice.waitinglist.push((self.rank_of[&userid], userid));
                self.proposers[slot].currentchoice = Some(choiceid);
                proposals += 1;
                break;
            }
        }
        proposals
    }

    /// Sort every open waiting list by global-ranking priority and reject
    /// the proposers beyond `maxsize`: their tentative assignment is
    /// cleared and their cursor moves past the rejecting choice. Returns
    /// the number of rejections.
    fn rejection_by_choices(&mut self) -> usize {
        let mut rejections = 0;
        for slot in 0..self.choices.len() {
            let rejected = {
                let choice = &mut self.choices[slot];
                if choice.closed {
                    continue;
                }
                choice.waitinglist.sort_by_key(|&(rank, _)| rank);
                if choice.waitinglist.len() <= choice.maxsize as usize {
                    continue;
                }
                choice.waitinglist.split_off(choice.maxsize as usize)
            };
            for (_, userid) in rejected {
                let proposer = &mut self.proposers[self.proposer_slot[&userid]];
                proposer.currentchoice = None;
                proposer.cursor += 1;
                rejections += 1;
            }
        }
        self.total_rejections += rejections;
        rejections
    }

    /// Close one optional choice that cannot reach `minsize`: the one with
    /// the fewest tentative assignees, smallest id on ties. Its occupants
    /// are evicted and may propose elsewhere; their cursors stay put, the
    /// proposal step skips closed choices. Returns false when no choice
    /// qualifies, so a resolved state is a no-op.
    fn close_underfilled_optional(&mut self) -> bool {
        let slot = self
            .choices
            .iter()
            .enumerate()
            .filter(|(_, c)| c.optional && !c.closed && (c.waitinglist.len() as u32) < c.minsize)
            .min_by_key(|(_, c)| (c.waitinglist.len(), c.id))
            .map(|(slot, _)| slot);
        let slot = match slot {
            Some(slot) => slot,
            None => return false,
        };
        let evicted = {
            let choice = &mut self.choices[slot];
            choice.closed = true;
            std::mem::take(&mut choice.waitinglist)
        };
        debug!("CLOSE\t{}\t{}", self.choices[slot].id, evicted.len());
        for (_, userid) in evicted {
            self.proposers[self.proposer_slot[&userid]].currentchoice = None;
        }
        true
    }

    /// Proposal/rejection rounds to a fixed point, closing one unfillable
    /// optional choice whenever proposals dry up. Returns whether the final
    /// pass rejected anyone (a clean fixed point returns false).
    fn run(&mut self) -> bool {
        trace!("RANKING\t{:?}", self.globalranking);
        loop {
            let proposals = self.propose_round();
            let rejections = self.rejection_by_choices();
            if proposals == 0 && rejections == 0 {
                if self.close_underfilled_optional() {
                    continue;
                }
                return false;
            }
        }
    }

    /// Final waiting lists, one entry per input choice.
    fn into_allocation(self, choices: &[Choice]) -> Allocation {
        let mut allocation = Allocation::default();
        for choice in choices {
            let state = &self.choices[self.choice_slot[&choice.id]];
            let assigned = state.waitinglist.iter().map(|&(_, id)| id).collect();
            allocation.assignments.insert(choice.id, assigned);
        }
        allocation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks;

    fn matching(choices: &[Choice], ratings: &[Rating], raters: &[u64]) -> Matching {
        let mut rng = Xoroshiro128StarStar::seed_from_u64(0);
        Matching::new(choices, ratings, raters, &mut rng)
    }

    #[test]
    fn preference_lists_are_rating_descending() {
        let choices = vec![Choice::new(1, 1), Choice::new(2, 1), Choice::new(3, 1)];
        let ratings = vec![
            Rating::new(10, 1, 2),
            Rating::new(10, 2, 5),
            Rating::new(10, 3, 0),
        ];
        let m = matching(&choices, &ratings, &[10]);
        assert_eq!(m.proposers[0].preferencelist, vec![2, 1]);
    }

    #[test]
    fn distinct_first_preferences_need_no_rejection() {
        let input = mocks::mock_distinct_first_preferences();
        let mut m = matching(&input.choices, &input.ratings, &input.raters);
        m.run();
        assert_eq!(m.total_rejections, 0);
        let allocation = m.into_allocation(&input.choices);
        assert_eq!(allocation.assigned_to(mocks::CHOICE_A), &[1]);
        assert_eq!(allocation.assigned_to(mocks::CHOICE_B), &[2]);
        assert_eq!(allocation.assigned_to(mocks::CHOICE_C), &[3]);
    }

    #[test]
    fn waitlists_stay_sorted_and_bounded() {
        let choices = vec![Choice::new(1, 2), Choice::new(2, 5)];
        let ratings: Vec<Rating> = (10..18)
            .map(|user| Rating::new(user, 1, 5))
            .chain((10..18).map(|user| Rating::new(user, 2, 1)))
            .collect();
        let raters: Vec<u64> = (10..18).collect();
        let mut m = matching(&choices, &ratings, &raters);
        let proposals = m.propose_round();
        assert_eq!(proposals, 8);
        m.rejection_by_choices();
        for choice in m.choices.iter() {
            assert!(choice.waitinglist.len() <= choice.maxsize as usize);
            let ranks: Vec<usize> = choice.waitinglist.iter().map(|&(rank, _)| rank).collect();
            let mut sorted = ranks.clone();
            sorted.sort_unstable();
            assert_eq!(ranks, sorted);
        }
    }

    #[test]
    fn rejection_respects_global_ranking() {
        let choices = vec![Choice::new(1, 1)];
        let ratings = vec![Rating::new(10, 1, 5), Rating::new(11, 1, 5)];
        let mut m = matching(&choices, &ratings, &[10, 11]);
        m.propose_round();
        m.rejection_by_choices();
        let winner = m.choices[0].waitinglist[0].1;
        assert_eq!(winner, m.globalranking[0]);
    }

    #[test]
    fn underfilled_optional_choice_is_closed() {
        let input = mocks::mock_optional_closure();
        let mut m = matching(&input.choices, &input.ratings, &input.raters);
        m.run();
        let optional = &m.choices[m.choice_slot[&mocks::CHOICE_OPT]];
        assert!(optional.closed);
        assert!(optional.waitinglist.is_empty());
        // The evicted user landed on the fallback choice.
        let allocation = m.into_allocation(&input.choices);
        assert_eq!(allocation.assigned_to(mocks::CHOICE_A), &[1]);
        assert!(allocation.assigned_to(mocks::CHOICE_OPT).is_empty());
    }

    #[test]
    fn empty_optional_choice_closes_without_evictions() {
        let choices = vec![Choice::with_bounds(1, 1, 2, true)];
        let mut m = matching(&choices, &[], &[10]);
        m.run();
        assert!(m.choices[0].closed);
        assert!(m.choices[0].waitinglist.is_empty());
    }

    #[test]
    fn closure_is_idempotent_on_resolved_state() {
        let input = mocks::mock_optional_closure();
        let mut m = matching(&input.choices, &input.ratings, &input.raters);
        m.run();
        let snapshot: Vec<bool> = m.choices.iter().map(|c| c.closed).collect();
        assert!(!m.close_underfilled_optional());
        let after: Vec<bool> = m.choices.iter().map(|c| c.closed).collect();
        assert_eq!(snapshot, after);
    }

    #[test]
    fn closure_prefers_fewest_assignees_then_smallest_id() {
        // Both optional choices are underfilled; 2 holds one user, 1 holds
        // none, so 2 survives the first pass and 1 closes first.
        let choices = vec![
            Choice::with_bounds(1, 2, 2, true),
            Choice::with_bounds(2, 2, 2, true),
        ];
        let ratings = vec![Rating::new(10, 2, 5)];
        let mut m = matching(&choices, &ratings, &[10]);
        m.propose_round();
        m.rejection_by_choices();
        assert!(m.close_underfilled_optional());
        assert!(m.choices[0].closed);
        assert!(!m.choices[1].closed);
    }

    #[test]
    fn final_sizes_satisfy_the_minimum_size_law() {
        let input = mocks::mock_optional_closure();
        let allocation = DeferredAcceptance::default()
            .compute_distribution(&input.choices, &input.ratings, &input.raters)
            .unwrap();
        for choice in input.choices.iter() {
            let assigned = allocation.assigned_to(choice.id).len();
            let within =
                choice.minsize as usize <= assigned && assigned <= choice.maxsize as usize;
            if choice.optional {
                assert!(assigned == 0 || within);
            } else {
                assert!(within);
            }
        }
    }

    #[test]
    fn engine_is_reproducible_per_seed() {
        let input = mocks::mock_crowded_choice();
        let engine = DeferredAcceptance::with_seed(42);
        let first = engine
            .compute_distribution(&input.choices, &input.ratings, &input.raters)
            .unwrap();
        let second = engine
            .compute_distribution(&input.choices, &input.ratings, &input.raters)
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn engine_respects_capacity_and_uniqueness() {
        let input = mocks::mock_crowded_choice();
        let allocation = DeferredAcceptance::with_seed(7)
            .compute_distribution(&input.choices, &input.ratings, &input.raters)
            .unwrap();
        let mut seen = std::collections::HashSet::new();
        for choice in input.choices.iter() {
            let assigned = allocation.assigned_to(choice.id);
            assert!(assigned.len() <= choice.maxsize as usize);
            for user in assigned {
                assert!(seen.insert(*user));
            }
        }
    }

    #[test]
    fn exhausted_preferences_leave_user_unassigned() {
        let choices = vec![Choice::new(1, 1)];
        let ratings = vec![Rating::new(10, 1, 5), Rating::new(11, 1, 3)];
        let mut m = matching(&choices, &ratings, &[10, 11]);
        m.run();
        let placed: Vec<u64> = m.choices[0].waitinglist.iter().map(|&(_, id)| id).collect();
        assert_eq!(placed.len(), 1);
        let loser = if placed[0] == 10 { 11 } else { 10 };
        let loser_state = &m.proposers[m.proposer_slot[&loser]];
        assert_eq!(loser_state.currentchoice, None);
        assert_eq!(loser_state.cursor, 1);
    }
}
