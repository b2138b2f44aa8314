//! Dense node-index mapping between external ids and flow-network nodes.
//!
//! The network uses a fixed layout: index 0 is the source, `1..=usercount`
//! holds users, `usercount+1..=usercount+choicecount` holds choices, and the
//! last index is the sink. The four mapping tables are built once per run
//! and never mutated afterwards.
use definitions::Rating;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct IndexMap {
    usercount: usize,
    choicecount: usize,
    user_to_index: HashMap<u64, usize>,
    index_to_user: HashMap<usize, u64>,
    choice_to_index: HashMap<u64, usize>,
    index_to_choice: HashMap<usize, u64>,
}

impl IndexMap {
    /// Assign node indices in first-encounter order over the rating list.
    /// Users and choices without any rating stay unmapped; the extraction
    /// step treats unmapped choices as unfilled.
    pub fn new(usercount: usize, ratings: &[Rating]) -> Self {
        let mut user_to_index: HashMap<u64, usize> = HashMap::new();
        let mut choice_to_index: HashMap<u64, usize> = HashMap::new();
        for rating in ratings {
            let next = user_to_index.len() + 1;
            user_to_index.entry(rating.userid).or_insert(next);
            let next = choice_to_index.len() + usercount + 1;
            choice_to_index.entry(rating.choiceid).or_insert(next);
        }
        let index_to_user = user_to_index.iter().map(|(&id, &idx)| (idx, id)).collect();
        let index_to_choice = choice_to_index.iter().map(|(&id, &idx)| (idx, id)).collect();
        Self {
            usercount,
            choicecount: choice_to_index.len(),
            user_to_index,
            index_to_user,
            choice_to_index,
            index_to_choice,
        }
    }
    pub fn source(&self) -> usize {
        0
    }
    pub fn sink(&self) -> usize {
        self.node_count() - 1
    }
    /// Source + user arena + choice arena + sink.
    pub fn node_count(&self) -> usize {
        self.usercount + self.choicecount + 2
    }
    pub fn usercount(&self) -> usize {
        self.usercount
    }
    pub fn user_index(&self, userid: u64) -> Option<usize> {
        self.user_to_index.get(&userid).copied()
    }
    pub fn user_of(&self, index: usize) -> Option<u64> {
        self.index_to_user.get(&index).copied()
    }
    pub fn choice_index(&self, choiceid: u64) -> Option<usize> {
        self.choice_to_index.get(&choiceid).copied()
    }
    pub fn choice_of(&self, index: usize) -> Option<u64> {
        self.index_to_choice.get(&index).copied()
    }
    /// Iterate mapped users as `(userid, node index)`.
    pub fn users(&self) -> impl Iterator<Item = (u64, usize)> + '_ {
        self.user_to_index.iter().map(|(&id, &idx)| (id, idx))
    }
}
