//! Player fire command
//!
//! A tap or click becomes an interceptor launched from the nearest (by
//! horizontal distance) active launcher that still has ammo.

use glam::Vec2;

use super::flight::Flight;
use super::state::{GameState, GameStatus, Interceptor, Launcher};
use crate::consts::PLAYFIELD_HEIGHT;

/// Index of the launcher that should answer a shot at `target_x`.
/// Ties go to the first launcher in iteration order.
pub fn select_launcher(launchers: &[Launcher], target_x: f32) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, launcher) in launchers.iter().enumerate() {
        if !launcher.can_fire() {
            continue;
        }
        let dist = (launcher.pos.x - target_x).abs();
        if best.is_none_or(|(_, best_dist)| dist < best_dist) {
            best = Some((i, dist));
        }
    }
    best.map(|(i, _)| i)
}

/// Whether a target point is above the no-fire band
pub fn in_fire_zone(state: &GameState, target: Vec2) -> bool {
    target.y < PLAYFIELD_HEIGHT - state.tuning.no_fire_margin
}

/// Fire an interceptor at `target`. Returns the new interceptor's id, or
/// `None` when the command was dropped (not playing, target in the no-fire
/// band, or no launcher able to fire).
pub fn fire(state: &mut GameState, target: Vec2) -> Option<u32> {
    if state.status != GameStatus::Playing {
        return None;
    }
    if !in_fire_zone(state, target) {
        log::debug!("Shot at {:?} ignored: below the no-fire line", target);
        return None;
    }
    let Some(index) = select_launcher(&state.launchers, target.x) else {
        log::debug!("Shot at {:?} dropped: no launcher can fire", target);
        return None;
    };

    let launcher = &mut state.launchers[index];
    launcher.ammo -= 1;
    let start = launcher.pos;

    let id = state.next_entity_id();
    let speed = state.tuning.interceptor_speed;
    state.interceptors.push(Interceptor {
        id,
        flight: Flight::new(start, target, speed),
    });
    Some(id)
}
