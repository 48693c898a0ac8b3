//! Mikan Delivery - fruit merging simulation with freshness and rot
//!
//! Core modules:
//! - `sim`: Fixed-timestep simulation (physics, merging, freshness, scoring)
//! - `params`: Data-driven tuning values supplied read-only to the core

pub mod params;
pub mod sim;

pub use params::{Params, ParamsError, SpawnDistribution};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (30 Hz frame loop)
    pub const SIM_DT: f32 = 1.0 / 30.0;

    /// Play area dimensions
    pub const PLAY_WIDTH: f32 = 240.0;
    pub const PLAY_HEIGHT: f32 = 200.0;

    /// Height at which the held fruit waits before being dropped
    pub const SPAWN_Y: f32 = 50.0;
    /// Height at which a dropped fruit enters the play area
    pub const DROP_Y: f32 = 40.0;
    /// Delay between consecutive drops (seconds)
    pub const DROP_COOLDOWN: f32 = 0.5;

    /// Number of low ranks a spawned fruit may start at
    pub const SPAWN_RANKS: usize = 3;
}

/// Clamp a horizontal coordinate so a circle of `radius` stays inside `[0, width]`
#[inline]
pub fn clamp_horizontal(x: f32, radius: f32, width: f32) -> f32 {
    x.min(width - radius).max(radius)
}
