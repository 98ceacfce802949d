//! Scene assembly: turns a read-only view of the game into a triangle list
//!
//! Pure function of `GameState`, so it runs (and is tested) off-GPU.

use glam::Vec2;
use std::f32::consts::PI;

use super::shapes;
use super::vertex::{Vertex, colors, with_alpha};
use crate::consts::*;
use crate::sim::{BlastKind, GameState, Launcher};

/// Ammo pips per row under a launcher
const PIPS_PER_ROW: u32 = 10;

/// Build the full frame, back to front
pub fn build_scene(state: &GameState) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(4096);

    // Ground strip
    vertices.extend(shapes::rect(
        Vec2::new(0.0, PLAYFIELD_HEIGHT - 10.0),
        Vec2::new(PLAYFIELD_WIDTH, 10.0),
        colors::GROUND,
    ));

    for city in &state.cities {
        if city.active {
            // Block with a dome on top
            vertices.extend(shapes::rect(
                city.pos - Vec2::new(10.0, 10.0),
                Vec2::new(20.0, 10.0),
                colors::CITY,
            ));
            vertices.extend(shapes::sector(
                city.pos - Vec2::new(0.0, 10.0),
                10.0,
                PI,
                2.0 * PI,
                colors::CITY,
                12,
            ));
        } else {
            vertices.extend(rubble(city.pos));
        }
    }

    for launcher in &state.launchers {
        vertices.extend(launcher_shape(launcher));
    }

    for enemy in &state.enemies {
        let flight = &enemy.flight;
        vertices.extend(shapes::line(
            flight.start,
            flight.pos,
            2.0,
            with_alpha(colors::ENEMY, 0.2),
            colors::ENEMY,
        ));
        vertices.extend(shapes::circle(flight.pos, 6.0, colors::ENEMY, 12));
    }

    for interceptor in &state.interceptors {
        let flight = &interceptor.flight;
        vertices.extend(shapes::line(
            flight.start,
            flight.pos,
            2.0,
            with_alpha(colors::INTERCEPTOR, 0.3),
            colors::INTERCEPTOR,
        ));
        vertices.extend(shapes::circle(flight.pos, 4.0, colors::INTERCEPTOR, 10));
        vertices.extend(shapes::cross(flight.target, 5.0, 1.0, colors::CROSSHAIR));
    }

    for blast in &state.blasts {
        if blast.current_radius <= 0.0 {
            continue;
        }
        let base = match blast.kind {
            BlastKind::Intercept => colors::INTERCEPT_BLAST,
            BlastKind::Impact => colors::IMPACT_BLAST,
        };
        vertices.extend(shapes::circle(
            blast.pos,
            blast.current_radius,
            with_alpha(base, blast.alpha * 0.85),
            32,
        ));
        vertices.extend(shapes::ring(
            blast.pos,
            (blast.current_radius - 2.0).max(0.0),
            blast.current_radius,
            with_alpha(base, blast.alpha),
            32,
        ));
    }

    vertices
}

fn rubble(pos: Vec2) -> Vec<Vertex> {
    shapes::rect(pos - Vec2::new(12.0, 4.0), Vec2::new(24.0, 4.0), colors::RUBBLE)
}

/// Triangle battery with one pip per remaining round beneath it
fn launcher_shape(launcher: &Launcher) -> Vec<Vertex> {
    if !launcher.active {
        return rubble(launcher.pos);
    }
    let p = launcher.pos;
    let mut vertices = shapes::triangle(
        p + Vec2::new(-20.0, 0.0),
        p + Vec2::new(20.0, 0.0),
        p + Vec2::new(0.0, -25.0),
        colors::LAUNCHER,
    );

    let rows = launcher.max_ammo.div_ceil(PIPS_PER_ROW).max(1);
    let origin = p + Vec2::new(-(PIPS_PER_ROW as f32) * 2.0, 3.0);
    for i in 0..launcher.ammo {
        let col = i % PIPS_PER_ROW;
        let row = (i / PIPS_PER_ROW).min(rows - 1);
        vertices.extend(shapes::rect(
            origin + Vec2::new(col as f32 * 4.0, row as f32 * 3.0),
            Vec2::new(2.0, 2.0),
            colors::AMMO_PIP,
        ));
    }
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::fire;

    #[test]
    fn test_scene_is_whole_triangles() {
        let mut state = GameState::new(3);
        state.start_new_game();
        fire(&mut state, Vec2::new(300.0, 200.0));
        let vertices = build_scene(&state);
        assert!(!vertices.is_empty());
        assert_eq!(vertices.len() % 3, 0);
    }

    #[test]
    fn test_destroyed_structures_draw_less() {
        let mut state = GameState::new(3);
        state.start_new_game();
        let full = build_scene(&state).len();
        state.cities[0].active = false;
        state.launchers[1].active = false;
        assert!(build_scene(&state).len() < full);
    }

    #[test]
    fn test_ammo_pips_follow_ammo() {
        let mut state = GameState::new(3);
        state.start_new_game();
        let before = launcher_shape(&state.launchers[1]).len();
        state.launchers[1].ammo -= 5;
        let after = launcher_shape(&state.launchers[1]).len();
        assert_eq!(before - after, 5 * 6);
    }
}
