//! Circle physics for dropped fruit
//!
//! Gravity and friction integration, then wall/floor clamping, then pairwise
//! circle separation with an impulse response. Pairs are resolved one after
//! another in index order, so a later pair sees the corrections made by
//! earlier pairs in the same tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::fruit::Fruit;
use crate::clamp_horizontal;
use crate::params::PhysicsParams;

/// Floor rebound speed below which a fruit comes to rest vertically
pub const SETTLE_SPEED: f32 = 10.0;

/// Contact between two overlapping circles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit vector from the first circle's centre toward the second
    pub normal: Vec2,
    /// Penetration depth (sum of radii minus centre distance)
    pub overlap: f32,
}

/// Overlap between two circles, if any
///
/// Coincident centres have no defined normal and report no contact.
pub fn circle_contact(a_pos: Vec2, a_radius: f32, b_pos: Vec2, b_radius: f32) -> Option<Contact> {
    let delta = b_pos - a_pos;
    let dist = delta.length();
    let min_dist = a_radius + b_radius;

    if dist < min_dist && dist > 0.0 {
        Some(Contact {
            normal: delta / dist,
            overlap: min_dist - dist,
        })
    } else {
        None
    }
}

/// Check whether two fruits overlap (centre distance < sum of radii)
#[inline]
pub fn check_collision(a: &Fruit, b: &Fruit) -> bool {
    a.pos.distance(b.pos) < a.radius + b.radius
}

/// Physics world bounded by the play area
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicsEngine {
    pub width: f32,
    pub height: f32,
}

impl PhysicsEngine {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Advance every dropped fruit by `dt` and resolve contacts
    pub fn update(&self, fruits: &mut [Fruit], dt: f32, params: &PhysicsParams) {
        for fruit in fruits.iter_mut().filter(|f| f.dropped) {
            fruit.vel.y += params.gravity * dt;
            fruit.vel *= params.friction;
            fruit.pos += fruit.vel * dt;
        }

        self.resolve_wall_collisions(fruits, params.bounce);
        resolve_fruit_collisions(fruits, params.bounce);
    }

    /// Clamp fruits inside the side walls and above the floor
    pub fn resolve_wall_collisions(&self, fruits: &mut [Fruit], bounce: f32) {
        for fruit in fruits.iter_mut().filter(|f| f.dropped) {
            let r = fruit.radius;

            if fruit.pos.x - r < 0.0 {
                fruit.vel.x = fruit.vel.x.abs() * bounce;
            }
            if fruit.pos.x + r > self.width {
                fruit.vel.x = -fruit.vel.x.abs() * bounce;
            }
            fruit.pos.x = clamp_horizontal(fruit.pos.x, r, self.width);

            // No ceiling: fruit may sit above the top edge
            if fruit.pos.y + r > self.height {
                fruit.pos.y = self.height - r;
                fruit.vel.y = -fruit.vel.y.abs() * bounce;
                if fruit.vel.y.abs() < SETTLE_SPEED {
                    fruit.vel.y = 0.0;
                }
            }
        }
    }
}

/// Separate overlapping dropped fruits and exchange approach velocity
pub fn resolve_fruit_collisions(fruits: &mut [Fruit], bounce: f32) {
    for i in 0..fruits.len() {
        for j in (i + 1)..fruits.len() {
            let (head, tail) = fruits.split_at_mut(j);
            let a = &mut head[i];
            let b = &mut tail[0];
            if !a.dropped || !b.dropped {
                continue;
            }

            let Some(contact) = circle_contact(a.pos, a.radius, b.pos, b.radius) else {
                continue;
            };

            let push = contact.normal * (contact.overlap * 0.5);
            a.pos -= push;
            b.pos += push;

            let approach = (b.vel - a.vel).dot(contact.normal);
            if approach < 0.0 {
                let impulse = contact.normal * (approach * bounce);
                a.vel += impulse;
                b.vel -= impulse;
            }
        }
    }
}
