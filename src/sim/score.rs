//! Delivery scoring with rot penalty
//!
//! Every rotten delivery multiplies the accumulated fresh value by
//! `1 - rot_rate`, so the penalty compounds but never flips sign.

use serde::{Deserialize, Serialize};

use crate::params::Params;

/// End-of-run assessment shown on the result screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// No rotten deliveries
    Perfect,
    /// At most two rotten deliveries
    Good,
    /// Rot cost less than 30% of the fresh value
    NotBad,
    TooMuchRot,
}

impl Verdict {
    pub fn message(&self) -> &'static str {
        match self {
            Verdict::Perfect => "PERFECT! No rotten mikan!",
            Verdict::Good => "Good job! Very fresh!",
            Verdict::NotBad => "Not bad, but watch freshness",
            Verdict::TooMuchRot => "Too much rot! Merge faster!",
        }
    }
}

/// Accumulates deliveries for one session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreTracker {
    delivered_count: u32,
    rotten_count: u32,
    fresh_sum: f32,
    /// Freshness of each delivery, oldest first
    history: Vec<f32>,
}

impl ScoreTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a delivery; returns true if it counted as rotten
    pub fn deliver(&mut self, freshness: f32, params: &Params) -> bool {
        self.delivered_count += 1;
        self.fresh_sum += freshness;
        self.history.push(freshness);

        let rotten = freshness <= params.rot.rotten_threshold;
        if rotten {
            self.rotten_count += 1;
        }
        rotten
    }

    pub fn delivered_count(&self) -> u32 {
        self.delivered_count
    }

    pub fn rotten_count(&self) -> u32 {
        self.rotten_count
    }

    pub fn fresh_sum(&self) -> f32 {
        self.fresh_sum
    }

    pub fn history(&self) -> &[f32] {
        &self.history
    }

    /// Fresh value after the compounded rot penalty
    pub fn effective_fresh(&self, params: &Params) -> f32 {
        if self.rotten_count == 0 {
            return self.fresh_sum;
        }
        let multiplier = (1.0 - params.rot.rot_rate).powi(self.rotten_count as i32);
        self.fresh_sum * multiplier
    }

    /// Final score: weighted effective freshness plus a per-delivery bonus
    pub fn score(&self, params: &Params) -> u64 {
        let s = &params.score;
        let raw = self.effective_fresh(params) * s.fresh_to_score
            + self.delivered_count as f32 * s.count_bonus;
        raw.floor().max(0.0) as u64
    }

    /// Share of the fresh value lost to rot, in percent
    pub fn rot_damage_percent(&self, params: &Params) -> f32 {
        if self.fresh_sum == 0.0 {
            return 0.0;
        }
        let damage = self.fresh_sum - self.effective_fresh(params);
        damage / self.fresh_sum * 100.0
    }

    pub fn verdict(&self, params: &Params) -> Verdict {
        match self.rotten_count {
            0 => Verdict::Perfect,
            1..=2 => Verdict::Good,
            _ if self.rot_damage_percent(params) < 30.0 => Verdict::NotBad,
            _ => Verdict::TooMuchRot,
        }
    }

    /// Clear everything for a new session
    pub fn reset(&mut self) {
        self.delivered_count = 0;
        self.rotten_count = 0;
        self.fresh_sum = 0.0;
        self.history.clear();
    }
}
