//! Play session state
//!
//! Owns the active fruit collection, the held fruit waiting to be dropped,
//! the score tracker and the run's RNG. One `GameState` is one game.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::fruit::{Fruit, spawn_fruit};
use super::physics::PhysicsEngine;
use super::score::ScoreTracker;
use crate::clamp_horizontal;
use crate::consts::*;
use crate::params::Params;

/// Current phase of play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Playing,
    Paused,
    /// Run ended; see `GameState::end_reason`
    GameOver,
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    /// A fruit stayed above the danger line past the grace period
    Jammed,
    /// The player chose to ship out
    ShippedOut,
}

impl EndReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            EndReason::Jammed => "JAMMED!",
            EndReason::ShippedOut => "SHIPPED OUT",
        }
    }
}

/// Things that happened during a tick, for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Dropped { rank: usize, x: f32 },
    Merged { rank: usize, pos: Vec2 },
    Delivered { freshness: f32, rotten: bool },
    GameOver { reason: EndReason },
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
    pub physics: PhysicsEngine,
    /// Dropped fruit in play
    pub fruits: Vec<Fruit>,
    /// Fruit following the pointer, not yet dropped
    pub held: Fruit,
    /// Seconds until another drop is allowed
    pub drop_cooldown: f32,
    pub phase: GamePhase,
    pub end_reason: Option<EndReason>,
    pub score: ScoreTracker,
    /// Seconds any fruit has continuously spent above the danger line
    pub above_line_time: f32,
    /// Danger line height in play-area coordinates
    pub danger_line_y: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Events produced since the last drain
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new session with the given seed
    pub fn new(seed: u64, params: &Params) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let held = spawn_fruit(PLAY_WIDTH / 2.0, params, &mut rng);

        Self {
            seed,
            rng,
            physics: PhysicsEngine::new(PLAY_WIDTH, PLAY_HEIGHT),
            fruits: Vec::new(),
            held,
            drop_cooldown: 0.0,
            phase: GamePhase::Playing,
            end_reason: None,
            score: ScoreTracker::new(),
            above_line_time: 0.0,
            danger_line_y: danger_line(PLAY_HEIGHT, params),
            time_ticks: 0,
            events: Vec::new(),
        }
    }

    /// Start a new game, keeping the RNG stream
    pub fn reset(&mut self, params: &Params) {
        self.fruits.clear();
        self.held = spawn_fruit(self.physics.width / 2.0, params, &mut self.rng);
        self.drop_cooldown = 0.0;
        self.phase = GamePhase::Playing;
        self.end_reason = None;
        self.score.reset();
        self.above_line_time = 0.0;
        self.danger_line_y = danger_line(self.physics.height, params);
        self.time_ticks = 0;
        self.events.clear();
    }

    /// Move the held fruit toward the pointer, kept inside the side walls
    pub fn aim(&mut self, x: f32) {
        self.held.pos.x = clamp_horizontal(x, self.held.radius, self.physics.width);
    }

    /// Whether a drop is allowed right now
    pub fn can_drop(&self) -> bool {
        self.phase == GamePhase::Playing && self.drop_cooldown <= 0.0
    }

    /// Release the held fruit into play and spawn the next one
    pub fn drop_held(&mut self, params: &Params) {
        let next = spawn_fruit(self.physics.width / 2.0, params, &mut self.rng);
        let mut fruit = std::mem::replace(&mut self.held, next);
        fruit.dropped = true;
        fruit.pos.y = DROP_Y;

        log::debug!(
            "Dropped rank {} at x={:.1} (freshness {:.1})",
            fruit.rank,
            fruit.pos.x,
            fruit.freshness
        );
        self.events.push(GameEvent::Dropped {
            rank: fruit.rank,
            x: fruit.pos.x,
        });
        self.fruits.push(fruit);
        self.drop_cooldown = DROP_COOLDOWN;
    }

    /// Whether any fruit pokes above the danger line
    pub fn in_danger(&self) -> bool {
        self.fruits
            .iter()
            .any(|f| f.pos.y - f.radius < self.danger_line_y)
    }

    /// Seconds left before a jam ends the game, while in danger
    pub fn grace_remaining(&self, params: &Params) -> Option<f32> {
        if self.above_line_time > 0.0 {
            Some((params.game_over.grace_ms / 1000.0 - self.above_line_time).max(0.0))
        } else {
            None
        }
    }

    /// End the run
    pub fn end_game(&mut self, reason: EndReason, params: &Params) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        self.phase = GamePhase::GameOver;
        self.end_reason = Some(reason);
        self.events.push(GameEvent::GameOver { reason });
        log::info!(
            "Game over ({}): {} delivered, {} rotten, score {}",
            reason.as_str(),
            self.score.delivered_count(),
            self.score.rotten_count(),
            self.score.score(params)
        );
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

/// Danger line height, truncated to whole play-area units
fn danger_line(height: f32, params: &Params) -> f32 {
    (height * params.game_over.line_y).floor()
}
