//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One step per display frame, motion measured in ticks
//! - Seeded RNG only
//! - Stable iteration order (insertion order, ids ascending)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod blast;
pub mod fire;
pub mod flight;
pub mod spawn;
pub mod state;
pub mod tick;

pub use autopilot::Autopilot;
pub use blast::{Blast, BlastKind, BlastPhase};
pub use fire::{fire, select_launcher};
pub use flight::Flight;
pub use state::{
    City, EnemyProjectile, GameEvent, GameState, GameStatus, Interceptor, Launcher,
};
pub use tick::tick;
