//! Simulation tuning parameters
//!
//! A read-only value handed to every core operation. The outer layer loads it
//! from JSON; any section or field missing from the document falls back to the
//! defaults below.

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::SPAWN_RANKS;

/// Errors raised while building a parameter set.
#[derive(Debug, Error)]
pub enum ParamsError {
    /// A value breaks the configuration contract (e.g. `rot_rate` outside `[0, 1)`).
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
    /// The JSON document could not be parsed.
    #[error("failed to parse parameters: {0}")]
    Parse(#[from] serde_json::Error),
}

/// How freshness is drawn for newly spawned fruit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SpawnDistribution {
    /// Uniform over `[min, max]`
    Uniform,
    /// Triangular over `[min, max]` with the mode at `max`
    #[default]
    #[serde(alias = "triangular")]
    TriangularBiasedHigh,
}

impl SpawnDistribution {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpawnDistribution::Uniform => "uniform",
            SpawnDistribution::TriangularBiasedHigh => "triangular",
        }
    }

    /// Draw a value in `[min, max]`. Callers guarantee `min <= max`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R, min: f32, max: f32) -> f32 {
        let span = max - min;
        let u: f32 = rng.random();
        let value = match self {
            SpawnDistribution::Uniform => min + span * u,
            // Inverse CDF of a triangle whose peak sits on the upper bound
            SpawnDistribution::TriangularBiasedHigh => min + span * u.sqrt(),
        };
        value.clamp(min, max)
    }
}

/// Freshness spawn, decay and merge-recovery values
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FreshnessParams {
    /// Reference maximum used for freshness level ratios
    pub fresh_max: f32,
    pub spawn_distribution: SpawnDistribution,
    pub spawn_min: f32,
    pub spawn_max: f32,
    /// Decay per second at rank 0
    pub decay_base: f32,
    /// Geometric decay multiplier per rank
    pub decay_stage_mult: f32,
    /// Freshness added on top of both parents when merging
    pub merge_bonus: f32,
    /// Upper bound for merged freshness
    pub fresh_cap: f32,
}

impl Default for FreshnessParams {
    fn default() -> Self {
        Self {
            fresh_max: 100.0,
            spawn_distribution: SpawnDistribution::TriangularBiasedHigh,
            spawn_min: 50.0,
            spawn_max: 100.0,
            decay_base: 2.0,
            decay_stage_mult: 1.2,
            merge_bonus: 20.0,
            fresh_cap: 100.0,
        }
    }
}

/// Rot penalty values
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RotParams {
    /// Deliveries at or below this freshness count as rotten
    pub rotten_threshold: f32,
    /// Fraction of fresh value lost per rotten delivery, in `[0, 1)`
    pub rot_rate: f32,
}

impl Default for RotParams {
    fn default() -> Self {
        Self {
            rotten_threshold: 30.0,
            rot_rate: 0.08,
        }
    }
}

/// Final score weights
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreParams {
    pub fresh_to_score: f32,
    pub count_bonus: f32,
}

impl Default for ScoreParams {
    fn default() -> Self {
        Self {
            fresh_to_score: 1.0,
            count_bonus: 40.0,
        }
    }
}

/// Danger line and grace period
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameOverParams {
    /// Danger line as a fraction of play-area height (from the top)
    pub line_y: f32,
    /// Time a fruit may stay above the line before the game ends
    pub grace_ms: f32,
}

impl Default for GameOverParams {
    fn default() -> Self {
        Self {
            line_y: 0.2,
            grace_ms: 3000.0,
        }
    }
}

/// Motion and collision response values
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsParams {
    /// Downward acceleration (pixels/s²)
    pub gravity: f32,
    /// Restitution applied on wall and fruit contacts
    pub bounce: f32,
    /// Per-tick velocity damping factor
    pub friction: f32,
    /// Seconds a merge successor must wait before merging again
    pub merge_cooldown: f32,
}

impl Default for PhysicsParams {
    fn default() -> Self {
        Self {
            gravity: 300.0,
            bounce: 0.3,
            friction: 0.98,
            merge_cooldown: 0.5,
        }
    }
}

/// Per-rank fruit catalogue entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FruitSpec {
    pub name: String,
    pub display_name: String,
    pub radius: f32,
    /// Palette index used by the presentation layer
    pub color: u8,
}

impl FruitSpec {
    fn new(name: &str, display_name: &str, radius: f32, color: u8) -> Self {
        Self {
            name: name.to_string(),
            display_name: display_name.to_string(),
            radius,
            color,
        }
    }
}

fn default_fruits() -> Vec<FruitSpec> {
    vec![
        FruitSpec::new("ume", "梅", 12.0, 10),
        FruitSpec::new("kaki", "柿", 16.0, 9),
        FruitSpec::new("momo", "桃", 20.0, 8),
        FruitSpec::new("budou", "ぶどう", 24.0, 5),
        FruitSpec::new("dekopon", "デコポン", 28.0, 4),
        FruitSpec::new("mikan", "みかん", 32.0, 10),
    ]
}

/// Complete parameter set
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    pub freshness: FreshnessParams,
    pub rot: RotParams,
    pub score: ScoreParams,
    pub game_over: GameOverParams,
    pub physics: PhysicsParams,
    /// Fruit catalogue indexed by rank; the last entry is the delivery rank
    pub fruits: Vec<FruitSpec>,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            freshness: FreshnessParams::default(),
            rot: RotParams::default(),
            score: ScoreParams::default(),
            game_over: GameOverParams::default(),
            physics: PhysicsParams::default(),
            fruits: default_fruits(),
        }
    }
}

impl Params {
    /// Parse and validate a JSON parameter document
    pub fn from_json(json: &str) -> Result<Self, ParamsError> {
        let params: Params = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    /// Parse a JSON document, falling back to defaults when it is unusable
    pub fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(params) => {
                log::info!("Loaded parameters ({} fruit ranks)", params.rank_count());
                params
            }
            Err(err) => {
                log::warn!("{err}, using default parameters");
                Self::default()
            }
        }
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> Result<String, ParamsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check the configuration contract the core relies on
    pub fn validate(&self) -> Result<(), ParamsError> {
        let f = &self.freshness;
        if self.fruits.len() <= SPAWN_RANKS {
            return Err(ParamsError::InvalidConfig(
                "fruits must list more ranks than can be spawned",
            ));
        }
        if self
            .fruits
            .iter()
            .any(|spec| !spec.radius.is_finite() || spec.radius <= 0.0)
        {
            return Err(ParamsError::InvalidConfig("fruit radius must be positive"));
        }
        if f.fresh_max <= 0.0 || f.fresh_cap <= 0.0 {
            return Err(ParamsError::InvalidConfig(
                "fresh_max and fresh_cap must be positive",
            ));
        }
        if f.spawn_min < 0.0 || f.spawn_min > f.spawn_max {
            return Err(ParamsError::InvalidConfig(
                "spawn range must satisfy 0 <= spawn_min <= spawn_max",
            ));
        }
        if f.spawn_max > f.fresh_cap {
            return Err(ParamsError::InvalidConfig("spawn_max must not exceed fresh_cap"));
        }
        // Higher ranks must decay strictly faster
        if f.decay_base <= 0.0 {
            return Err(ParamsError::InvalidConfig("decay_base must be positive"));
        }
        if f.decay_stage_mult <= 1.0 {
            return Err(ParamsError::InvalidConfig("decay_stage_mult must be greater than 1"));
        }
        if !(0.0..1.0).contains(&self.rot.rot_rate) {
            return Err(ParamsError::InvalidConfig("rot_rate must lie in [0, 1)"));
        }
        if self.physics.friction <= 0.0 || self.physics.friction > 1.0 {
            return Err(ParamsError::InvalidConfig("friction must lie in (0, 1]"));
        }
        if !(0.0..=1.0).contains(&self.physics.bounce) {
            return Err(ParamsError::InvalidConfig("bounce must lie in [0, 1]"));
        }
        if self.physics.merge_cooldown < 0.0 {
            return Err(ParamsError::InvalidConfig("merge_cooldown must not be negative"));
        }
        if self.game_over.line_y <= 0.0 || self.game_over.line_y >= 1.0 {
            return Err(ParamsError::InvalidConfig("line_y must lie in (0, 1)"));
        }
        if self.game_over.grace_ms < 0.0 {
            return Err(ParamsError::InvalidConfig("grace_ms must not be negative"));
        }
        Ok(())
    }

    /// Number of fruit ranks
    #[inline]
    pub fn rank_count(&self) -> usize {
        self.fruits.len()
    }

    /// Rank that is delivered instead of staying in play
    #[inline]
    pub fn top_rank(&self) -> usize {
        self.fruits.len().saturating_sub(1)
    }

    /// Ranks a freshly spawned fruit may take (`0..spawn_rank_count()`)
    #[inline]
    pub fn spawn_rank_count(&self) -> usize {
        SPAWN_RANKS.min(self.top_rank())
    }

    /// Catalogue entry for `rank`
    ///
    /// # Panics
    /// Panics if `rank` is outside the catalogue.
    pub fn fruit(&self, rank: usize) -> &FruitSpec {
        match self.fruits.get(rank) {
            Some(spec) => spec,
            None => panic!(
                "fruit rank {rank} out of range (catalogue has {} ranks)",
                self.fruits.len()
            ),
        }
    }

    /// Freshness lost per second by a dropped fruit of `rank`
    #[inline]
    pub fn decay_rate(&self, rank: usize) -> f32 {
        self.freshness.decay_base * self.freshness.decay_stage_mult.powi(rank as i32)
    }
}
