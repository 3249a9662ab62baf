//! Fair-share distribution of whole tree units across countries.
//!
//! This is the placement policy for physical planting counts. It is independent of the CO2
//! arithmetic in [`crate::model`], which credits absorption proportionally to each country's
//! share of the global potential.

use serde::{Deserialize, Serialize};

use crate::model::HECTARES_PER_TREE_UNIT;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeAllocation {
    /// Units per ISO code, in the order the capacities were given.
    pub units: Vec<(String, u64)>,
    pub requested: u64,
    /// Budget left over once a round's even share rounded down to zero or every country
    /// was full.
    pub unallocated: u64,
    pub rounds: u32,
}

impl TreeAllocation {
    pub fn units_for(&self, iso: &str) -> u64 {
        self.units
            .iter()
            .find(|(code, _)| code == iso)
            .map(|(_, units)| *units)
            .unwrap_or(0)
    }

    pub fn allocated(&self) -> u64 {
        self.units.iter().map(|(_, units)| units).sum()
    }
}

pub fn tree_units_for_area(hectares: f64) -> u64 {
    (hectares / HECTARES_PER_TREE_UNIT).floor().max(0.0) as u64
}

/// Hands out `total_units` in rounds. Each round gives every still-eligible country
/// `floor(remaining / eligible)` units, capped by its free capacity; full countries drop out.
/// Stops when nothing remains, nobody is eligible, or the even share is zero. A remainder
/// smaller than the number of eligible countries is never handed out one by one.
pub fn allocate_trees_round_robin(total_units: u64, capacities: &[(String, u64)]) -> TreeAllocation {
    let mut assigned = vec![0_u64; capacities.len()];
    let mut eligible: Vec<usize> = (0..capacities.len()).collect();
    let mut remaining = total_units;
    let mut rounds = 0_u32;

    while remaining > 0 && !eligible.is_empty() {
        let per_country = remaining / eligible.len() as u64;
        if per_country == 0 {
            break;
        }
        rounds += 1;

        let mut granted_this_round = 0_u64;
        let mut next_round = Vec::with_capacity(eligible.len());
        for &index in &eligible {
            let capacity = capacities[index].1;
            let space_left = capacity - assigned[index];
            let granted = per_country.min(space_left);
            assigned[index] += granted;
            granted_this_round += granted;
            if assigned[index] < capacity {
                next_round.push(index);
            }
        }
        remaining -= granted_this_round;
        eligible = next_round;

        if granted_this_round == 0 {
            break;
        }
    }

    TreeAllocation {
        units: capacities
            .iter()
            .zip(assigned)
            .map(|((iso, _), units)| (iso.clone(), units))
            .collect(),
        requested: total_units,
        unallocated: remaining,
        rounds,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capacities(entries: &[(&str, u64)]) -> Vec<(String, u64)> {
        entries
            .iter()
            .map(|(iso, capacity)| (iso.to_string(), *capacity))
            .collect()
    }

    #[test]
    fn converts_hectares_to_whole_units() {
        assert_eq!(tree_units_for_area(0.0), 0);
        assert_eq!(tree_units_for_area(999_999.0), 0);
        assert_eq!(tree_units_for_area(14_500_000.0), 14);
    }

    #[test]
    fn even_split_when_capacity_is_plentiful() {
        let caps = capacities(&[("BRA", 100), ("COL", 100), ("IDN", 100)]);
        let allocation = allocate_trees_round_robin(9, &caps);
        assert_eq!(allocation.units_for("BRA"), 3);
        assert_eq!(allocation.units_for("COL"), 3);
        assert_eq!(allocation.units_for("IDN"), 3);
        assert_eq!(allocation.unallocated, 0);
        assert_eq!(allocation.rounds, 1);
    }

    #[test]
    fn remainder_below_country_count_is_left_unallocated() {
        let caps = capacities(&[("BRA", 100), ("COL", 100), ("IDN", 100)]);
        let allocation = allocate_trees_round_robin(11, &caps);
        assert_eq!(allocation.allocated(), 9);
        assert_eq!(allocation.unallocated, 2);
    }

    #[test]
    fn full_countries_drop_out_and_others_absorb_the_rest() {
        let caps = capacities(&[("PHL", 1), ("BRA", 100), ("RUS", 100)]);
        let allocation = allocate_trees_round_robin(12, &caps);
        // Round 1: 4 each, PHL capped at 1. Round 2: 1 each. Round 3: share rounds to 0.
        assert_eq!(allocation.units_for("PHL"), 1);
        assert_eq!(allocation.units_for("BRA"), 5);
        assert_eq!(allocation.units_for("RUS"), 5);
        assert_eq!(allocation.unallocated, 1);
        assert_eq!(allocation.rounds, 2);
    }

    #[test]
    fn never_exceeds_budget_or_capacity() {
        let caps = capacities(&[("A", 3), ("B", 0), ("C", 7), ("D", 2), ("E", 50)]);
        for total in 0..120 {
            let allocation = allocate_trees_round_robin(total, &caps);
            assert!(allocation.allocated() <= total);
            assert_eq!(allocation.allocated() + allocation.unallocated, total);
            for ((iso, cap), (_, units)) in caps.iter().zip(allocation.units.iter()) {
                assert!(units <= cap, "{iso} got {units} over capacity {cap}");
            }
        }
    }

    #[test]
    fn stops_when_every_country_is_full() {
        let caps = capacities(&[("A", 2), ("B", 3)]);
        let allocation = allocate_trees_round_robin(1_000, &caps);
        assert_eq!(allocation.allocated(), 5);
        assert_eq!(allocation.unallocated, 995);
    }

    #[test]
    fn same_inputs_give_same_assignment() {
        let caps = capacities(&[("A", 5), ("B", 9), ("C", 1)]);
        assert_eq!(
            allocate_trees_round_robin(13, &caps),
            allocate_trees_round_robin(13, &caps)
        );
    }

    #[test]
    fn empty_country_list_allocates_nothing() {
        let allocation = allocate_trees_round_robin(10, &[]);
        assert!(allocation.units.is_empty());
        assert_eq!(allocation.unallocated, 10);
        assert_eq!(allocation.rounds, 0);
    }
}
