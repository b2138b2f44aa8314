//! Definitions -- A tiny interface for the rating-based allocation problem.
//! Roughly speaking, we incorporate with host systems, pass messages, or interact with other CLI via JSON object format. Specifically, one message comes in, the [AllocationInput](AllocationInput), and one message goes out, the [Allocation](Allocation).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A capacity-limited choice (a group, a slot, a seat pool) users can be assigned to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Choice {
    pub id: u64,
    /// Host-side display name. It is carried through for reporting and never consulted by the engines.
    #[serde(default)]
    pub title: String,
    /// Smallest admissible group size. Only the deferred-acceptance engine consumes it.
    #[serde(default)]
    pub minsize: u32,
    /// Largest admissible group size.
    pub maxsize: u32,
    /// An optional choice may be closed when it cannot reach `minsize`.
    #[serde(default)]
    pub optional: bool,
}

impl Choice {
    pub fn new(id: u64, maxsize: u32) -> Self {
        Self {
            id,
            title: String::new(),
            minsize: 0,
            maxsize,
            optional: false,
        }
    }
    pub fn with_bounds(id: u64, minsize: u32, maxsize: u32, optional: bool) -> Self {
        Self {
            id,
            title: String::new(),
            minsize,
            maxsize,
            optional,
        }
    }
}

/// One user's preference strength for one choice.
/// A rating of zero or below means "not selected"; such ratings never produce an assignment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Rating {
    pub userid: u64,
    pub choiceid: u64,
    pub rating: i64,
}

impl Rating {
    pub fn new(userid: u64, choiceid: u64, rating: i64) -> Self {
        Self {
            userid,
            choiceid,
            rating,
        }
    }
}

/// The input message: everything one allocation run consumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationInput {
    pub choices: Vec<Choice>,
    pub ratings: Vec<Rating>,
    /// All eligible users, including those who submitted no rating.
    pub raters: Vec<u64>,
}

impl AllocationInput {
    pub fn new(choices: Vec<Choice>, ratings: Vec<Rating>, raters: Vec<u64>) -> Self {
        Self {
            choices,
            ratings,
            raters,
        }
    }
}

/// The output message: every input choice id maps to its assigned users,
/// an empty list when the choice ends up unfilled.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Allocation {
    pub assignments: BTreeMap<u64, Vec<u64>>,
}

impl Allocation {
    /// Users assigned to the given choice. Missing ids read as unfilled.
    pub fn assigned_to(&self, choiceid: u64) -> &[u64] {
        self.assignments
            .get(&choiceid)
            .map(|users| users.as_slice())
            .unwrap_or(&[])
    }
    /// Total number of placed users over all choices.
    pub fn assigned_count(&self) -> usize {
        self.assignments.values().map(|users| users.len()).sum()
    }
    /// The choice a user was placed into, if any.
    pub fn choice_of(&self, userid: u64) -> Option<u64> {
        self.assignments
            .iter()
            .find(|(_, users)| users.contains(&userid))
            .map(|(&choiceid, _)| choiceid)
    }
}
