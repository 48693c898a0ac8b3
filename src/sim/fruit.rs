//! Fruit entity and freshness model
//!
//! Radius, colour and decay rate are pure functions of rank, looked up from
//! the parameter set. Freshness only ever goes down, except when a merge
//! creates a new fruit.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::SPAWN_Y;
use crate::params::{FruitSpec, Params};

/// Coarse freshness band for visual feedback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FreshnessLevel {
    High,
    Medium,
    Low,
    Rotten,
}

impl FreshnessLevel {
    /// Classify a freshness ratio (freshness / fresh_max)
    pub fn from_ratio(ratio: f32) -> Self {
        if ratio > 0.7 {
            FreshnessLevel::High
        } else if ratio > 0.4 {
            FreshnessLevel::Medium
        } else if ratio > 0.15 {
            FreshnessLevel::Low
        } else {
            FreshnessLevel::Rotten
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FreshnessLevel::High => "high",
            FreshnessLevel::Medium => "medium",
            FreshnessLevel::Low => "low",
            FreshnessLevel::Rotten => "rotten",
        }
    }
}

/// A fruit entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fruit {
    pub rank: usize,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub freshness: f32,
    /// False while held above the play area; only dropped fruit simulate
    pub dropped: bool,
    /// Seconds until the fruit may merge; ready once `<= 0`
    pub merge_cooldown: f32,
}

impl Fruit {
    /// Create a held (not yet dropped) fruit of `rank`
    ///
    /// # Panics
    /// Panics if `rank` is not in the catalogue.
    pub fn new(rank: usize, pos: Vec2, freshness: f32, params: &Params) -> Self {
        let radius = params.fruit(rank).radius;
        Self {
            rank,
            pos,
            vel: Vec2::ZERO,
            radius,
            freshness: freshness.max(0.0),
            dropped: false,
            merge_cooldown: 0.0,
        }
    }

    /// Create a spawnable fruit with randomly drawn freshness
    ///
    /// # Panics
    /// Panics if `rank` is not one of the spawnable low ranks.
    pub fn spawn<R: Rng + ?Sized>(rank: usize, pos: Vec2, params: &Params, rng: &mut R) -> Self {
        assert!(
            rank < params.spawn_rank_count(),
            "rank {rank} cannot be spawned (spawnable ranks: 0..{})",
            params.spawn_rank_count()
        );
        let f = &params.freshness;
        let freshness = f.spawn_distribution.sample(rng, f.spawn_min, f.spawn_max);
        Self::new(rank, pos, freshness, params)
    }

    /// Catalogue entry for this fruit's rank
    pub fn spec<'a>(&self, params: &'a Params) -> &'a FruitSpec {
        params.fruit(self.rank)
    }

    /// Advance freshness decay and merge cooldown by `dt` seconds
    pub fn decay(&mut self, dt: f32, params: &Params) {
        if !self.dropped {
            return;
        }

        let rate = params.decay_rate(self.rank);
        self.freshness = (self.freshness - rate * dt).max(0.0);

        if self.merge_cooldown > 0.0 {
            self.merge_cooldown -= dt;
        }
    }

    /// Freshness band relative to `fresh_max`
    pub fn freshness_level(&self, params: &Params) -> FreshnessLevel {
        FreshnessLevel::from_ratio(self.freshness / params.freshness.fresh_max)
    }

    /// Whether this fruit may take part in a merge this tick
    #[inline]
    pub fn can_merge(&self) -> bool {
        self.dropped && self.merge_cooldown <= 0.0
    }

    /// Whether this fruit has reached the delivery rank
    #[inline]
    pub fn is_top_rank(&self, params: &Params) -> bool {
        self.rank == params.top_rank()
    }
}

/// Create the next held fruit at horizontal position `x`
///
/// The rank is drawn uniformly from the spawnable low ranks.
pub fn spawn_fruit<R: Rng + ?Sized>(x: f32, params: &Params, rng: &mut R) -> Fruit {
    let rank = rng.random_range(0..params.spawn_rank_count());
    Fruit::spawn(rank, Vec2::new(x, SPAWN_Y), params, rng)
}

/// Create the successor of a merge
///
/// Freshness is the parents' sum plus the merge bonus, capped at `fresh_cap`.
/// The successor is already dropped and starts on cooldown.
pub fn merged_fruit(rank: usize, pos: Vec2, fresh_a: f32, fresh_b: f32, params: &Params) -> Fruit {
    let f = &params.freshness;
    let freshness = (fresh_a + fresh_b + f.merge_bonus).min(f.fresh_cap);

    let mut fruit = Fruit::new(rank, pos, freshness, params);
    fruit.dropped = true;
    fruit.merge_cooldown = params.physics.merge_cooldown;
    fruit
}
