//! Nova Defense - A Missile Command style arcade defense game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (kinematics, blasts, rounds)
//! - `renderer`: WebGPU vector rendering
//! - `platform`: Browser frame scheduling and input mapping
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::Settings;
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Playfield dimensions (pixels, origin top-left, y down)
    pub const PLAYFIELD_WIDTH: f32 = 800.0;
    pub const PLAYFIELD_HEIGHT: f32 = 600.0;

    /// Nominal display refresh used for the native demo clock
    pub const FRAME_MS: f64 = 1000.0 / 60.0;

    /// City x positions (six cities, three on each side of the center launcher)
    pub const CITY_XS: [f32; 6] = [150.0, 220.0, 290.0, 510.0, 580.0, 650.0];
    /// City baseline (y of the city footprint center)
    pub const CITY_Y: f32 = PLAYFIELD_HEIGHT - 15.0;

    /// Launcher x positions (left, center, right)
    pub const LAUNCHER_XS: [f32; 3] = [50.0, PLAYFIELD_WIDTH / 2.0, PLAYFIELD_WIDTH - 50.0];
    /// Launcher baseline
    pub const LAUNCHER_Y: f32 = PLAYFIELD_HEIGHT - 20.0;
}

/// Linear interpolation between two points by a progress scalar
#[inline]
pub fn lerp_point(start: glam::Vec2, target: glam::Vec2, progress: f32) -> glam::Vec2 {
    start + (target - start) * progress
}
