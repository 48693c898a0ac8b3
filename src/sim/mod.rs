//! Fruit simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by index in the fruit list)
//! - No rendering, input or storage dependencies

pub mod fruit;
pub mod merge;
pub mod physics;
pub mod score;
pub mod state;
pub mod tick;

pub use fruit::{FreshnessLevel, Fruit, merged_fruit, spawn_fruit};
pub use merge::{MergePlan, apply_merges, find_merges, merge_pair, merge_pass};
pub use physics::{Contact, PhysicsEngine, check_collision, circle_contact};
pub use score::{ScoreTracker, Verdict};
pub use state::{EndReason, GameEvent, GamePhase, GameState};
pub use tick::{StepOutcome, TickInput, step, tick};
