//! Straight-line flight shared by interceptors and enemy projectiles
//!
//! Position is a pure function of progress: `lerp(start, target, progress)`.
//! Flight time is `1 / speed` ticks regardless of distance.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::lerp_point;

/// Kinematic state of a projectile in flight
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Flight {
    pub start: Vec2,
    pub pos: Vec2,
    pub target: Vec2,
    /// 0 at launch, >= 1 on arrival
    pub progress: f32,
    /// Progress gained per tick
    pub speed: f32,
}

impl Flight {
    pub fn new(start: Vec2, target: Vec2, speed: f32) -> Self {
        Self {
            start,
            pos: start,
            target,
            progress: 0.0,
            speed: speed.max(0.0),
        }
    }

    /// Advance one tick. Returns true once the projectile has arrived.
    pub fn advance(&mut self) -> bool {
        self.progress += self.speed;
        self.pos = lerp_point(self.start, self.target, self.progress);
        self.has_arrived()
    }

    pub fn has_arrived(&self) -> bool {
        self.progress >= 1.0
    }

    /// Where this flight will be at the given progress (clamped to the target)
    pub fn position_at(&self, progress: f32) -> Vec2 {
        lerp_point(self.start, self.target, progress.clamp(0.0, 1.0))
    }

    /// Ticks until arrival at the current speed
    pub fn ticks_remaining(&self) -> f32 {
        if self.speed <= 0.0 {
            return f32::INFINITY;
        }
        ((1.0 - self.progress) / self.speed).max(0.0)
    }
}
