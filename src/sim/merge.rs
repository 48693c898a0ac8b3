//! Merge detection and application
//!
//! Two phases. The scan walks the fruit list in order and pairs each eligible
//! fruit with the first later fruit of the same rank that overlaps it, marking
//! both indices as used. The apply phase then removes every used fruit at
//! once and inserts the successors. Pairs are therefore disjoint and the
//! earliest colliding partner always wins.

use super::fruit::{Fruit, merged_fruit};
use super::physics::check_collision;
use crate::params::Params;

/// A matched pair and the fruit it becomes
#[derive(Debug, Clone, PartialEq)]
pub struct MergePlan {
    /// Index of the earlier fruit in the scanned slice
    pub first: usize,
    /// Index of the later fruit in the scanned slice
    pub second: usize,
    pub merged: Fruit,
}

/// Build the successor of two same-rank fruits
pub fn merge_pair(a: &Fruit, b: &Fruit, params: &Params) -> Fruit {
    let midpoint = (a.pos + b.pos) * 0.5;
    let mut merged = merged_fruit(a.rank + 1, midpoint, a.freshness, b.freshness, params);
    merged.vel = (a.vel + b.vel) * 0.5;
    merged
}

/// Scan for disjoint mergeable pairs without mutating anything
pub fn find_merges(fruits: &[Fruit], params: &Params) -> Vec<MergePlan> {
    let top = params.top_rank();
    let eligible = |f: &Fruit| f.can_merge() && f.rank < top;

    let mut used = vec![false; fruits.len()];
    let mut plans = Vec::new();

    let mut i = 0;
    while i < fruits.len() {
        let a = &fruits[i];
        if used[i] || !eligible(a) {
            i += 1;
            continue;
        }

        let partner = (i + 1..fruits.len()).find(|&j| {
            let b = &fruits[j];
            !used[j] && eligible(b) && b.rank == a.rank && check_collision(a, b)
        });

        match partner {
            Some(j) => {
                used[i] = true;
                used[j] = true;
                plans.push(MergePlan {
                    first: i,
                    second: j,
                    merged: merge_pair(a, &fruits[j], params),
                });
                // Stay on `i`: it is now used, so the next pass moves on
            }
            None => i += 1,
        }
    }

    plans
}

/// Remove merged pairs and insert their successors
///
/// Successors are appended in plan order. Top-rank successors never enter
/// the list; they are returned as deliveries.
pub fn apply_merges(fruits: &mut Vec<Fruit>, plans: Vec<MergePlan>, params: &Params) -> Vec<Fruit> {
    if plans.is_empty() {
        return Vec::new();
    }

    let mut consumed = vec![false; fruits.len()];
    for plan in &plans {
        consumed[plan.first] = true;
        consumed[plan.second] = true;
    }
    let mut index = 0;
    fruits.retain(|_| {
        let keep = !consumed[index];
        index += 1;
        keep
    });

    let mut delivered = Vec::new();
    for plan in plans {
        if plan.merged.is_top_rank(params) {
            delivered.push(plan.merged);
        } else {
            fruits.push(plan.merged);
        }
    }
    delivered
}

/// Scan and apply in one call, returning delivered top-rank fruit
pub fn merge_pass(fruits: &mut Vec<Fruit>, params: &Params) -> Vec<Fruit> {
    let plans = find_merges(fruits, params);
    apply_merges(fruits, plans, params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use proptest::prelude::*;

    fn fruit_at(rank: usize, x: f32, y: f32, freshness: f32, params: &Params) -> Fruit {
        let mut fruit = Fruit::new(rank, Vec2::new(x, y), freshness, params);
        fruit.dropped = true;
        fruit
    }

    #[test]
    fn test_two_rank_zero_fruit_merge() {
        let params = Params::default();
        let mut a = fruit_at(0, 100.0, 150.0, 30.0, &params);
        let mut b = fruit_at(0, 110.0, 150.0, 25.0, &params);
        a.vel = Vec2::new(10.0, 0.0);
        b.vel = Vec2::new(-20.0, 4.0);
        let mut fruits = vec![a, b];

        let delivered = merge_pass(&mut fruits, &params);
        assert!(delivered.is_empty());
        assert_eq!(fruits.len(), 1);

        let merged = &fruits[0];
        assert_eq!(merged.rank, 1);
        assert_eq!(merged.pos, Vec2::new(105.0, 150.0));
        assert_eq!(merged.vel, Vec2::new(-5.0, 2.0));
        assert_eq!(merged.freshness, 75.0);
        assert!(merged.dropped);
        assert_eq!(merged.merge_cooldown, 0.5);
        assert_eq!(merged.radius, 16.0);
    }

    #[test]
    fn test_merged_freshness_capped() {
        let params = Params::default();
        let mut fruits = vec![
            fruit_at(1, 100.0, 150.0, 90.0, &params),
            fruit_at(1, 110.0, 150.0, 90.0, &params),
        ];
        merge_pass(&mut fruits, &params);
        assert_eq!(fruits[0].freshness, 100.0);
    }

    #[test]
    fn test_rank_mismatch_never_merges() {
        let params = Params::default();
        let fruits = vec![
            fruit_at(0, 100.0, 150.0, 50.0, &params),
            fruit_at(1, 105.0, 150.0, 50.0, &params),
        ];
        assert!(find_merges(&fruits, &params).is_empty());
    }

    #[test]
    fn test_cooldown_and_held_block_merge() {
        let params = Params::default();
        let mut cooling = fruit_at(0, 100.0, 150.0, 50.0, &params);
        cooling.merge_cooldown = 0.2;
        let fruits = vec![cooling, fruit_at(0, 105.0, 150.0, 50.0, &params)];
        assert!(find_merges(&fruits, &params).is_empty());

        let held = Fruit::new(0, Vec2::new(100.0, 150.0), 50.0, &params);
        let fruits = vec![held, fruit_at(0, 105.0, 150.0, 50.0, &params)];
        assert!(find_merges(&fruits, &params).is_empty());
    }

    #[test]
    fn test_non_colliding_same_rank_do_not_merge() {
        let params = Params::default();
        let fruits = vec![
            fruit_at(0, 100.0, 150.0, 50.0, &params),
            fruit_at(0, 130.0, 150.0, 50.0, &params),
        ];
        assert!(find_merges(&fruits, &params).is_empty());
    }

    #[test]
    fn test_first_match_in_scan_order_wins() {
        let params = Params::default();
        // Fruit 0 overlaps both 1 and 2; 1 comes first so 2 is left over
        let fruits = vec![
            fruit_at(0, 100.0, 150.0, 50.0, &params),
            fruit_at(0, 115.0, 150.0, 50.0, &params),
            fruit_at(0, 85.0, 150.0, 50.0, &params),
        ];
        let plans = find_merges(&fruits, &params);
        assert_eq!(plans.len(), 1);
        assert_eq!((plans[0].first, plans[0].second), (0, 1));
    }

    #[test]
    fn test_pairs_are_disjoint() {
        let params = Params::default();
        // A tight cluster of four rank-0 fruit gives exactly two merges
        let fruits = vec![
            fruit_at(0, 100.0, 150.0, 50.0, &params),
            fruit_at(0, 105.0, 150.0, 50.0, &params),
            fruit_at(0, 110.0, 150.0, 50.0, &params),
            fruit_at(0, 115.0, 150.0, 50.0, &params),
        ];
        let plans = find_merges(&fruits, &params);
        assert_eq!(plans.len(), 2);
        assert_eq!((plans[0].first, plans[0].second), (0, 1));
        assert_eq!((plans[1].first, plans[1].second), (2, 3));
    }

    #[test]
    fn test_successor_does_not_remerge_same_tick() {
        let params = Params::default();
        let mut fruits = vec![
            fruit_at(0, 100.0, 150.0, 50.0, &params),
            fruit_at(0, 105.0, 150.0, 50.0, &params),
            fruit_at(1, 102.0, 150.0, 50.0, &params),
        ];
        merge_pass(&mut fruits, &params);
        // The rank-1 successor sits on cooldown next to the existing rank-1 fruit
        assert_eq!(fruits.len(), 2);
        assert!(fruits.iter().all(|f| f.rank == 1));
        assert!(find_merges(&fruits, &params).is_empty());
    }

    #[test]
    fn test_apply_keeps_unmatched_order() {
        let params = Params::default();
        let mut fruits = vec![
            fruit_at(2, 20.0, 150.0, 50.0, &params),
            fruit_at(0, 100.0, 150.0, 50.0, &params),
            fruit_at(3, 200.0, 150.0, 50.0, &params),
            fruit_at(0, 105.0, 150.0, 50.0, &params),
        ];
        merge_pass(&mut fruits, &params);
        let ranks: Vec<usize> = fruits.iter().map(|f| f.rank).collect();
        assert_eq!(ranks, vec![2, 3, 1]);
    }

    #[test]
    fn test_top_rank_delivered_not_inserted() {
        let params = Params::default();
        let mut fruits = vec![
            fruit_at(4, 100.0, 150.0, 40.0, &params),
            fruit_at(4, 120.0, 150.0, 35.0, &params),
        ];
        let delivered = merge_pass(&mut fruits, &params);
        assert!(fruits.is_empty());
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].rank, 5);
        assert_eq!(delivered[0].freshness, 95.0);
    }

    #[test]
    fn test_top_rank_fruit_never_merges() {
        let params = Params::default();
        let fruits = vec![
            fruit_at(5, 100.0, 150.0, 40.0, &params),
            fruit_at(5, 110.0, 150.0, 40.0, &params),
        ];
        assert!(find_merges(&fruits, &params).is_empty());
    }

    proptest! {
        #[test]
        fn prop_merge_pass_invariants(
            layout in prop::collection::vec((0usize..5, 0.0f32..240.0, 0.0f32..200.0), 0..12),
        ) {
            let params = Params::default();
            let mut fruits: Vec<Fruit> = layout
                .iter()
                .map(|&(rank, x, y)| fruit_at(rank, x, y, 50.0, &params))
                .collect();
            let before = fruits.len();
            let plans = find_merges(&fruits, &params);

            let mut seen = vec![false; before];
            for plan in &plans {
                prop_assert!(!seen[plan.first] && !seen[plan.second]);
                seen[plan.first] = true;
                seen[plan.second] = true;
                prop_assert_eq!(fruits[plan.first].rank, fruits[plan.second].rank);
                prop_assert_eq!(plan.merged.rank, fruits[plan.first].rank + 1);
            }

            let merges = plans.len();
            let delivered = apply_merges(&mut fruits, plans, &params);
            prop_assert_eq!(fruits.len() + delivered.len(), before - merges);
            prop_assert!(fruits.iter().all(|f| !f.is_top_rank(&params)));
            prop_assert!(delivered.iter().all(|f| f.is_top_rank(&params)));
        }
    }
}
