//! Hand-built fixture inputs shared by the engine tests.
use definitions::{AllocationInput, Choice, Rating};

pub const CHOICE_A: u64 = 900;
pub const CHOICE_B: u64 = 901;
pub const CHOICE_C: u64 = 902;
pub const CHOICE_OPT: u64 = 903;

///
/// Three users on two singleton choices. The optimal pairing places user 1
/// on A and user 3 on B, leaving user 2 out.
///
pub fn mock_two_singleton_choices() -> AllocationInput {
    AllocationInput::new(
        vec![Choice::new(CHOICE_A, 1), Choice::new(CHOICE_B, 1)],
        vec![
            Rating::new(1, CHOICE_A, 5),
            Rating::new(2, CHOICE_A, 3),
            Rating::new(2, CHOICE_B, 2),
            Rating::new(3, CHOICE_B, 4),
        ],
        vec![1, 2, 3],
    )
}

///
/// Three users with full preference lists over three singleton choices,
/// arranged so every top preference differs. Deferred acceptance settles
/// in one round with no rejection.
///
pub fn mock_distinct_first_preferences() -> AllocationInput {
    AllocationInput::new(
        vec![
            Choice::new(CHOICE_A, 1),
            Choice::new(CHOICE_B, 1),
            Choice::new(CHOICE_C, 1),
        ],
        vec![
            Rating::new(1, CHOICE_A, 3),
            Rating::new(1, CHOICE_B, 2),
            Rating::new(1, CHOICE_C, 1),
            Rating::new(2, CHOICE_B, 3),
            Rating::new(2, CHOICE_C, 2),
            Rating::new(2, CHOICE_A, 1),
            Rating::new(3, CHOICE_C, 3),
            Rating::new(3, CHOICE_A, 2),
            Rating::new(3, CHOICE_B, 1),
        ],
        vec![1, 2, 3],
    )
}

///
/// One optional choice that cannot reach its minimum size plus a mandatory
/// fallback. User 1 prefers the optional choice, gets evicted when it
/// closes, and lands on the fallback.
///
pub fn mock_optional_closure() -> AllocationInput {
    AllocationInput::new(
        vec![
            Choice::with_bounds(CHOICE_OPT, 2, 2, true),
            Choice::new(CHOICE_A, 1),
        ],
        vec![Rating::new(1, CHOICE_OPT, 5), Rating::new(1, CHOICE_A, 1)],
        vec![1],
    )
}

///
/// Five users crowding two choices with total capacity four; any maximal
/// assignment places four users.
///
pub fn mock_crowded_choice() -> AllocationInput {
    AllocationInput::new(
        vec![Choice::new(CHOICE_A, 3), Choice::new(CHOICE_B, 1)],
        vec![
            Rating::new(1, CHOICE_A, 5),
            Rating::new(2, CHOICE_A, 4),
            Rating::new(3, CHOICE_A, 3),
            Rating::new(3, CHOICE_B, 1),
            Rating::new(4, CHOICE_A, 2),
            Rating::new(4, CHOICE_B, 4),
            Rating::new(5, CHOICE_A, 1),
            Rating::new(5, CHOICE_B, 5),
        ],
        vec![1, 2, 3, 4, 5],
    )
}
