//! Fixed timestep simulation tick
//!
//! `step` is the core advance: physics, then freshness decay, then the merge
//! pass. `tick` wraps it with the play-session rules (aiming, dropping,
//! pausing, delivery scoring and the danger-line check).

use glam::Vec2;

use super::fruit::Fruit;
use super::merge::{apply_merges, find_merges};
use super::physics::PhysicsEngine;
use super::state::{EndReason, GameEvent, GamePhase, GameState};
use crate::params::Params;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer position over the play area, if known
    pub pointer_x: Option<f32>,
    /// Drop the held fruit
    pub drop: bool,
    /// Pause toggle
    pub pause: bool,
    /// End the run and score what has been delivered
    pub ship_out: bool,
}

/// Physics update followed by decay of every fruit
fn advance_motion(engine: &PhysicsEngine, fruits: &mut [Fruit], dt: f32, params: &Params) {
    engine.update(fruits, dt, &params.physics);
    for fruit in fruits.iter_mut() {
        fruit.decay(dt, params);
    }
}

/// What one `step` did to the active fruit
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepOutcome {
    /// Rank and position of every merge successor, in scan order
    pub merged: Vec<(usize, Vec2)>,
    /// Top-rank successors, taken out of play
    pub delivered: Vec<Fruit>,
}

/// Advance the active fruit by one timestep
pub fn step(engine: &PhysicsEngine, fruits: &mut Vec<Fruit>, dt: f32, params: &Params) -> StepOutcome {
    advance_motion(engine, fruits, dt, params);
    let plans = find_merges(fruits, params);
    let merged = plans
        .iter()
        .map(|plan| (plan.merged.rank, plan.merged.pos))
        .collect();
    let delivered = apply_merges(fruits, plans, params);
    StepOutcome { merged, delivered }
}

/// Advance the play session by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, params: &Params, dt: f32) {
    if state.phase == GamePhase::GameOver {
        return;
    }

    if input.pause {
        state.phase = match state.phase {
            GamePhase::Playing => GamePhase::Paused,
            _ => GamePhase::Playing,
        };
    }

    // Shipping out is allowed while paused
    if input.ship_out {
        state.end_game(EndReason::ShippedOut, params);
        return;
    }

    if state.phase == GamePhase::Paused {
        return;
    }

    state.time_ticks += 1;

    if state.drop_cooldown > 0.0 {
        state.drop_cooldown -= dt;
    }

    if let Some(x) = input.pointer_x {
        state.aim(x);
    }
    if input.drop && state.can_drop() {
        state.drop_held(params);
    }

    let outcome = step(&state.physics, &mut state.fruits, dt, params);

    for (rank, pos) in outcome.merged {
        state.events.push(GameEvent::Merged { rank, pos });
    }

    for fruit in outcome.delivered {
        let rotten = state.score.deliver(fruit.freshness, params);
        log::info!(
            "Delivered {} with freshness {:.1} ({}){}",
            fruit.spec(params).name,
            fruit.freshness,
            fruit.freshness_level(params).as_str(),
            if rotten { ", rotten" } else { "" }
        );
        state.events.push(GameEvent::Delivered {
            freshness: fruit.freshness,
            rotten,
        });
    }

    check_game_over(state, params, dt);
}

/// Track time spent above the danger line and end the run when it runs out
fn check_game_over(state: &mut GameState, params: &Params, dt: f32) {
    if !state.in_danger() {
        state.above_line_time = 0.0;
        return;
    }

    state.above_line_time += dt;
    if state.above_line_time >= params.game_over.grace_ms / 1000.0 {
        state.end_game(EndReason::Jammed, params);
    }
}
