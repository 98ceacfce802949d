//! Enemy spawn policy
//!
//! Spawn rate and enemy speed both escalate with the round and are
//! recomputed from the current round on every tick.

use glam::Vec2;
use rand::Rng;

use super::flight::Flight;
use super::state::{EnemyProjectile, GameState};
use crate::consts::PLAYFIELD_WIDTH;
use crate::tuning::Tuning;

/// Milliseconds between spawns for a round (floored)
pub fn spawn_interval_ms(tuning: &Tuning, round: u32) -> f64 {
    (tuning.spawn_interval_base_ms - tuning.spawn_interval_step_ms * round as f64)
        .max(tuning.spawn_interval_min_ms)
}

/// Enemy progress increment per tick for a round (capped)
pub fn enemy_speed(tuning: &Tuning, round: u32) -> f32 {
    (tuning.enemy_speed_base + tuning.enemy_speed_step * round as f32).min(tuning.enemy_speed_max)
}

/// Spawn an enemy if the interval for the current round has elapsed.
/// Returns true when the spawn timer fired.
pub fn update(state: &mut GameState, now_ms: f64) -> bool {
    let interval = spawn_interval_ms(&state.tuning, state.round);
    if now_ms - state.last_spawn_ms <= interval {
        return false;
    }
    spawn_enemy(state);
    state.last_spawn_ms = now_ms;
    true
}

/// Launch one enemy from a random point on the top edge toward a random
/// active city or launcher. No-op when nothing is left to target.
pub fn spawn_enemy(state: &mut GameState) -> Option<u32> {
    let targets: Vec<Vec2> = state
        .cities
        .iter()
        .filter(|c| c.active)
        .map(|c| c.pos)
        .chain(state.launchers.iter().filter(|l| l.active).map(|l| l.pos))
        .collect();

    if targets.is_empty() {
        log::debug!("Spawn skipped: no active targets");
        return None;
    }

    let target = targets[state.rng.random_range(0..targets.len())];
    let start_x = state.rng.random_range(0.0..PLAYFIELD_WIDTH);
    let speed = enemy_speed(&state.tuning, state.round);

    let id = state.next_entity_id();
    state.enemies.push(EnemyProjectile {
        id,
        flight: Flight::new(Vec2::new(start_x, 0.0), target, speed),
    });
    Some(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_interval_schedule() {
        let tuning = Tuning::default();
        assert_eq!(spawn_interval_ms(&tuning, 1), 1350.0);
        assert_eq!(spawn_interval_ms(&tuning, 5), 750.0);
        assert_eq!(spawn_interval_ms(&tuning, 8), 300.0);
        assert_eq!(spawn_interval_ms(&tuning, 50), 300.0);
    }

    #[test]
    fn test_speed_schedule() {
        let tuning = Tuning::default();
        assert!((enemy_speed(&tuning, 1) - 0.0014).abs() < 1e-7);
        assert!((enemy_speed(&tuning, 10) - 0.005).abs() < 1e-7);
        assert_eq!(enemy_speed(&tuning, 18), 0.008);
        assert_eq!(enemy_speed(&tuning, 100), 0.008);
    }

    #[test]
    fn test_update_respects_interval() {
        let mut state = GameState::new(3);
        state.start_new_game();
        // Round 1: 1350 ms interval, strictly greater required
        assert!(!update(&mut state, 1350.0));
        assert!(update(&mut state, 1351.0));
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.last_spawn_ms, 1351.0);
        assert!(!update(&mut state, 2000.0));
        assert!(update(&mut state, 2702.0));
        assert_eq!(state.enemies.len(), 2);
    }

    #[test]
    fn test_enemy_targets_active_structure() {
        let mut state = GameState::new(11);
        state.start_new_game();
        for city in state.cities.iter_mut() {
            city.active = false;
        }
        state.launchers[0].active = false;
        state.launchers[2].active = false;

        for _ in 0..20 {
            spawn_enemy(&mut state);
        }
        assert_eq!(state.enemies.len(), 20);
        for enemy in &state.enemies {
            assert_eq!(enemy.flight.target, state.launchers[1].pos);
            assert_eq!(enemy.flight.start.y, 0.0);
            assert!(enemy.flight.start.x >= 0.0 && enemy.flight.start.x < PLAYFIELD_WIDTH);
            assert_eq!(enemy.flight.progress, 0.0);
        }
    }

    #[test]
    fn test_spawn_without_targets_is_noop() {
        let mut state = GameState::new(11);
        state.start_new_game();
        state.cities.iter_mut().for_each(|c| c.active = false);
        state.launchers.iter_mut().for_each(|l| l.active = false);
        assert_eq!(spawn_enemy(&mut state), None);
        assert!(state.enemies.is_empty());
    }

    #[test]
    fn test_speed_uses_live_round() {
        let mut state = GameState::new(5);
        state.start_new_game();
        state.round = 6;
        spawn_enemy(&mut state);
        assert!((state.enemies[0].flight.speed - 0.0034).abs() < 1e-7);
    }

    proptest! {
        #[test]
        fn schedule_stays_within_bounds(round in 1u32..500) {
            let tuning = Tuning::default();
            let interval = spawn_interval_ms(&tuning, round);
            prop_assert!(interval >= 300.0 && interval <= 1500.0);
            prop_assert!(spawn_interval_ms(&tuning, round + 1) <= interval);
            let speed = enemy_speed(&tuning, round);
            prop_assert!(speed > 0.0 && speed <= 0.008);
            prop_assert!(enemy_speed(&tuning, round + 1) >= speed);
        }
    }
}
