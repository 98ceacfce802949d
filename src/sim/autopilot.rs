//! Idle/demo player
//!
//! Picks the enemy closest to impact, leads it by the interceptor flight
//! time, and fires unless something already covers that spot.

use glam::Vec2;

use super::fire::{fire, in_fire_zone, select_launcher};
use super::state::GameState;

/// Demo AI state
#[derive(Debug, Clone)]
pub struct Autopilot {
    /// Minimum ticks between shots
    pub fire_interval_ticks: u32,
    cooldown: u32,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self::new(8)
    }
}

impl Autopilot {
    pub fn new(fire_interval_ticks: u32) -> Self {
        Self {
            fire_interval_ticks,
            cooldown: 0,
        }
    }

    /// Run once per tick before the simulation step. Returns the id of the
    /// interceptor fired this tick, if any.
    pub fn update(&mut self, state: &mut GameState) -> Option<u32> {
        if self.cooldown > 0 {
            self.cooldown -= 1;
            return None;
        }
        let target = self.choose_target(state)?;
        let id = fire(state, target)?;
        self.cooldown = self.fire_interval_ticks;
        Some(id)
    }

    /// Lead point for the most urgent uncovered enemy
    pub fn choose_target(&self, state: &GameState) -> Option<Vec2> {
        if !state.status.is_running() {
            return None;
        }

        let flight_ticks = (1.0 / state.tuning.interceptor_speed).ceil();
        let mut threats: Vec<_> = state.enemies.iter().collect();
        threats.sort_by(|a, b| {
            a.flight
                .ticks_remaining()
                .total_cmp(&b.flight.ticks_remaining())
        });

        threats.into_iter().find_map(|enemy| {
            let lead = enemy.flight.progress + enemy.flight.speed * flight_ticks;
            let aim = enemy.flight.position_at(lead);
            let reachable = in_fire_zone(state, aim)
                && select_launcher(&state.launchers, aim.x).is_some();
            (reachable && !is_covered(state, aim)).then_some(aim)
        })
    }
}

/// Whether an interceptor or live blast will already catch `point`
fn is_covered(state: &GameState, point: Vec2) -> bool {
    let reach = state.tuning.intercept_blast_radius * 0.75;
    let incoming = state
        .interceptors
        .iter()
        .any(|m| m.flight.target.distance(point) < reach);
    let burning = state
        .blasts
        .iter()
        .any(|b| b.is_lethal() && b.pos.distance(point) < b.max_radius);
    incoming || burning
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::flight::Flight;
    use crate::sim::state::{EnemyProjectile, GameStatus};
    use crate::sim::tick;

    fn playing_state() -> GameState {
        let mut state = GameState::new(77);
        state.start_new_game();
        state
    }

    fn add_enemy(state: &mut GameState, start: Vec2, target: Vec2, speed: f32) {
        let id = state.next_entity_id();
        state.enemies.push(EnemyProjectile {
            id,
            flight: Flight::new(start, target, speed),
        });
    }

    #[test]
    fn test_no_target_without_enemies() {
        let state = playing_state();
        assert_eq!(Autopilot::default().choose_target(&state), None);
    }

    #[test]
    fn test_targets_most_urgent_enemy() {
        let mut state = playing_state();
        let slow_target = state.cities[0].pos;
        let fast_target = state.cities[5].pos;
        add_enemy(&mut state, Vec2::new(100.0, 0.0), slow_target, 0.001);
        add_enemy(&mut state, Vec2::new(700.0, 0.0), fast_target, 0.005);

        let aim = Autopilot::default().choose_target(&state).unwrap();
        // Leads the fast enemy by 17 ticks of its own motion
        let expected = state.enemies[1].flight.position_at(0.005 * 17.0);
        assert!(aim.distance(expected) < 1e-3);
    }

    #[test]
    fn test_does_not_double_cover() {
        let mut state = playing_state();
        let target = state.cities[2].pos;
        add_enemy(&mut state, Vec2::new(290.0, 0.0), target, 0.002);

        let mut pilot = Autopilot::new(0);
        assert!(pilot.update(&mut state).is_some());
        assert_eq!(pilot.choose_target(&state), None);
        assert!(pilot.update(&mut state).is_none());
        assert_eq!(state.interceptors.len(), 1);
    }

    #[test]
    fn test_cooldown_spaces_shots() {
        let mut state = playing_state();
        let mut pilot = Autopilot::new(3);
        let left = state.cities[0].pos;
        let right = state.cities[5].pos;
        add_enemy(&mut state, Vec2::new(100.0, 0.0), left, 0.002);
        add_enemy(&mut state, Vec2::new(700.0, 0.0), right, 0.002);

        assert!(pilot.update(&mut state).is_some());
        for _ in 0..3 {
            assert!(pilot.update(&mut state).is_none());
        }
        assert!(pilot.update(&mut state).is_some());
    }

    #[test]
    fn test_autopilot_defends_a_round() {
        let mut state = playing_state();
        let mut pilot = Autopilot::default();
        let mut now = 0.0;
        for _ in 0..(60 * 60) {
            if state.status != GameStatus::Playing {
                break;
            }
            now += crate::consts::FRAME_MS;
            pilot.update(&mut state);
            tick(&mut state, now);
        }
        assert!(state.total_score > 0);
    }
}
