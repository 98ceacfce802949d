//! Blast lifecycle and collision resolution
//!
//! A blast grows to its max radius, then shrinks while fading out. Intercept
//! blasts destroy enemy projectiles they touch while still growing; each kill
//! detonates a chained intercept blast at the enemy's position.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::GameState;
use crate::tuning::Tuning;

/// What caused a detonation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlastKind {
    /// Player interceptor or chain reaction: destroys enemies on contact
    Intercept,
    /// Enemy ground impact: cosmetic only
    Impact,
}

/// Blast lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlastPhase {
    Growing,
    Shrinking,
}

/// An expanding detonation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Blast {
    pub id: u32,
    pub pos: Vec2,
    pub kind: BlastKind,
    pub phase: BlastPhase,
    pub current_radius: f32,
    pub max_radius: f32,
    /// 1 when fresh, removed at 0
    pub alpha: f32,
}

impl Blast {
    pub fn new(id: u32, pos: Vec2, kind: BlastKind, max_radius: f32) -> Self {
        Self {
            id,
            pos,
            kind,
            phase: BlastPhase::Growing,
            current_radius: 0.0,
            max_radius,
            alpha: 1.0,
        }
    }

    /// Advance the lifecycle by one tick.
    ///
    /// A blast stays `Growing` for the tick it reaches full size, so it gets
    /// one collision pass at max radius before it starts to shrink.
    pub fn step(&mut self, tuning: &Tuning) {
        match self.phase {
            BlastPhase::Growing if self.current_radius < self.max_radius => {
                self.current_radius =
                    (self.current_radius + tuning.blast_growth_rate).min(self.max_radius);
            }
            BlastPhase::Growing => {
                self.phase = BlastPhase::Shrinking;
                self.shrink(tuning);
            }
            BlastPhase::Shrinking => self.shrink(tuning),
        }
    }

    fn shrink(&mut self, tuning: &Tuning) {
        self.current_radius = (self.current_radius - tuning.blast_shrink_rate).max(0.0);
        self.alpha = (self.alpha - tuning.blast_fade_rate).max(0.0);
    }

    /// Whether this blast currently destroys enemies it touches
    pub fn is_lethal(&self) -> bool {
        self.kind == BlastKind::Intercept && self.phase == BlastPhase::Growing
    }

    /// Strict containment: a point exactly on the rim survives
    pub fn contains(&self, point: Vec2) -> bool {
        self.pos.distance(point) < self.current_radius
    }

    pub fn is_expired(&self) -> bool {
        self.alpha <= 0.0
    }
}

/// Advance every blast, resolve collisions, and merge chained detonations.
///
/// Chained blasts are collected during the pass and appended afterwards, so
/// they start growing (and colliding) on the next tick.
pub fn update_blasts(state: &mut GameState) {
    let mut kill_points: Vec<Vec2> = Vec::new();

    let tuning = &state.tuning;
    let enemies = &mut state.enemies;
    for blast in state.blasts.iter_mut() {
        blast.step(tuning);

        if blast.is_lethal() {
            enemies.retain(|enemy| {
                if blast.contains(enemy.flight.pos) {
                    kill_points.push(enemy.flight.pos);
                    false
                } else {
                    true
                }
            });
        }
    }
    state.blasts.retain(|b| !b.is_expired());

    if kill_points.is_empty() {
        return;
    }

    let kill_score = state.tuning.kill_score;
    let chain_radius = state.tuning.chain_blast_radius;
    let mut pending = Vec::with_capacity(kill_points.len());
    for point in kill_points {
        state.round_score += kill_score;
        state.total_score += kill_score;
        pending.push(state.detonate(point, BlastKind::Intercept, chain_radius));
    }
    log::debug!(
        "{} enemies intercepted (round score {})",
        pending.len(),
        state.round_score
    );
    state.blasts.extend(pending);
}
