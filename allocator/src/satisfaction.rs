//! Post-run summary of an allocation against the submitted ratings.
//! Pure reporting: nothing here feeds back into the engines.
use definitions::{Allocation, AllocationInput};
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct ChoiceFill {
    pub choiceid: u64,
    pub assigned: usize,
    pub minsize: u32,
    pub maxsize: u32,
}

impl ChoiceFill {
    /// Whether the assigned count sits inside `[minsize, maxsize]`.
    pub fn within_bounds(&self) -> bool {
        self.minsize as usize <= self.assigned && self.assigned <= self.maxsize as usize
    }
}

#[derive(Debug, Clone)]
pub struct SatisfactionSummary {
    /// Sum of the ratings each placed user gave their assigned choice.
    pub total_rating: i64,
    pub placed: usize,
    /// Raters present in no choice's assigned set, in input order.
    pub unplaced: Vec<u64>,
    pub fills: Vec<ChoiceFill>,
}

pub fn summarize(input: &AllocationInput, allocation: &Allocation) -> SatisfactionSummary {
    let rating_of: HashMap<(u64, u64), i64> = input
        .ratings
        .iter()
        .map(|r| ((r.userid, r.choiceid), r.rating))
        .collect();
    let rating_of_ref = &rating_of;
    let total_rating = allocation
        .assignments
        .iter()
        .flat_map(|(&choiceid, users)| {
            users
                .iter()
                .map(move |&userid| rating_of_ref.get(&(userid, choiceid)).copied().unwrap_or(0))
        })
        .sum();
    let unplaced: Vec<u64> = input
        .raters
        .iter()
        .filter(|&&userid| allocation.choice_of(userid).is_none())
        .copied()
        .collect();
    let fills = input
        .choices
        .iter()
        .map(|choice| ChoiceFill {
            choiceid: choice.id,
            assigned: allocation.assigned_to(choice.id).len(),
            minsize: choice.minsize,
            maxsize: choice.maxsize,
        })
        .collect();
    SatisfactionSummary {
        total_rating,
        placed: allocation.assigned_count(),
        unplaced,
        fills,
    }
}

impl SatisfactionSummary {
    pub fn write<W: std::io::Write>(&self, mut wtr: W) -> std::io::Result<()> {
        writeln!(&mut wtr, "Allocation")?;
        writeln!(
            &mut wtr,
            "Total Rating:{}\n# of Placed:{}\n# of Unplaced:{}",
            self.total_rating,
            self.placed,
            self.unplaced.len()
        )?;
        for fill in self.fills.iter() {
            writeln!(
                &mut wtr,
                "Choice:{}\tAssigned:{}\tMin:{}\tMax:{}",
                fill.choiceid, fill.assigned, fill.minsize, fill.maxsize
            )?;
        }
        for userid in self.unplaced.iter() {
            writeln!(&mut wtr, "Unplaced:{}", userid)?;
        }
        Ok(())
    }
}
