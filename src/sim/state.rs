//! Game state and core simulation types
//!
//! Everything the simulation loop mutates lives in [`GameState`], which is
//! passed by exclusive reference into [`super::tick`].

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::blast::{Blast, BlastKind};
use super::flight::Flight;
use crate::consts::*;
use crate::tuning::Tuning;

/// Game status; the frame loop only keeps running while `Playing`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// Title screen, nothing simulated yet
    Start,
    /// Active gameplay
    Playing,
    /// Round target reached, waiting for the player to continue
    RoundComplete,
    /// Every launcher destroyed
    Lost,
}

impl GameStatus {
    /// Whether the frame loop should schedule another tick
    pub fn is_running(self) -> bool {
        self == GameStatus::Playing
    }
}

/// A player-fired interceptor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interceptor {
    pub id: u32,
    pub flight: Flight,
}

/// An incoming enemy projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyProjectile {
    pub id: u32,
    pub flight: Flight,
}

/// A defended city
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct City {
    pub id: u32,
    pub pos: Vec2,
    pub active: bool,
}

/// A missile battery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Launcher {
    pub id: u32,
    pub pos: Vec2,
    pub active: bool,
    pub ammo: u32,
    pub max_ammo: u32,
}

impl Launcher {
    /// Active and not out of ammo
    pub fn can_fire(&self) -> bool {
        self.active && self.ammo > 0
    }
}

/// Notifications for the leaf collaborators (audio, HUD, logs)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Explosion { pos: Vec2, kind: BlastKind },
    CityDestroyed { id: u32 },
    LauncherDestroyed { id: u32 },
    RoundStarted { round: u32 },
    RoundComplete { round: u32, total_score: u64 },
    Lost { round: u32, total_score: u64 },
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    /// Balance table
    pub tuning: Tuning,
    pub status: GameStatus,
    /// Current round (1-indexed)
    pub round: u32,
    /// Score earned this round (drives round completion)
    pub round_score: u64,
    /// Cumulative score for the game
    pub total_score: u64,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Timestamp of the last enemy spawn (ms, frame clock)
    pub last_spawn_ms: f64,
    pub interceptors: Vec<Interceptor>,
    pub enemies: Vec<EnemyProjectile>,
    pub blasts: Vec<Blast>,
    pub cities: Vec<City>,
    pub launchers: Vec<Launcher>,
    /// Events since the last drain
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a title-screen state with the default balance
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    /// Create a title-screen state with a custom balance table
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            status: GameStatus::Start,
            round: 1,
            round_score: 0,
            total_score: 0,
            time_ticks: 0,
            last_spawn_ms: 0.0,
            interceptors: Vec::new(),
            enemies: Vec::new(),
            blasts: Vec::new(),
            cities: Vec::new(),
            launchers: Vec::new(),
            events: Vec::new(),
            next_id: 1,
        };

        // Populate the field so the title screen has something to show
        state.build_cities();
        state.reset_round();

        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Begin a brand-new game: round 1, zero score, six fresh cities
    pub fn start_new_game(&mut self) {
        self.round = 1;
        self.total_score = 0;
        self.build_cities();
        self.reset_round();
        self.status = GameStatus::Playing;
        self.events.push(GameEvent::RoundStarted { round: self.round });
        log::info!("New game started (seed {})", self.seed);
    }

    /// Advance to the next round, keeping cities and cumulative score.
    ///
    /// Only valid from `RoundComplete`; returns false (and does nothing)
    /// otherwise.
    pub fn start_next_round(&mut self) -> bool {
        if self.status != GameStatus::RoundComplete {
            log::debug!("Ignoring next-round command in {:?}", self.status);
            return false;
        }
        self.round += 1;
        self.reset_round();
        self.status = GameStatus::Playing;
        self.events.push(GameEvent::RoundStarted { round: self.round });
        log::info!(
            "Round {} started ({} cities standing, score {})",
            self.round,
            self.active_city_count(),
            self.total_score
        );
        true
    }

    fn build_cities(&mut self) {
        let cities: Vec<City> = CITY_XS
            .iter()
            .map(|&x| City {
                id: self.next_entity_id(),
                pos: Vec2::new(x, CITY_Y),
                active: true,
            })
            .collect();
        self.cities = cities;
    }

    /// Recreate launchers with full ammo and clear everything in flight
    fn reset_round(&mut self) {
        let ammo = self.tuning.launcher_ammo;
        let launchers: Vec<Launcher> = LAUNCHER_XS
            .iter()
            .zip(ammo)
            .map(|(&x, ammo)| Launcher {
                id: self.next_entity_id(),
                pos: Vec2::new(x, LAUNCHER_Y),
                active: true,
                ammo,
                max_ammo: ammo,
            })
            .collect();
        self.launchers = launchers;
        self.round_score = 0;
        self.interceptors.clear();
        self.enemies.clear();
        self.blasts.clear();
    }

    /// Create a blast at `pos` and announce it. The caller decides where the
    /// blast is stored (directly, or in a pending list during a pass).
    pub fn detonate(&mut self, pos: Vec2, kind: BlastKind, max_radius: f32) -> Blast {
        let blast = Blast::new(self.next_entity_id(), pos, kind, max_radius);
        self.events.push(GameEvent::Explosion { pos, kind });
        blast
    }

    /// Deactivate every structure whose x is within hit proximity of `impact_x`
    pub fn apply_impact(&mut self, impact_x: f32) {
        let proximity = self.tuning.hit_proximity;
        for city in self.cities.iter_mut() {
            if city.active && (city.pos.x - impact_x).abs() < proximity {
                city.active = false;
                self.events.push(GameEvent::CityDestroyed { id: city.id });
                log::info!("City at x={} destroyed", city.pos.x);
            }
        }
        for launcher in self.launchers.iter_mut() {
            if launcher.active && (launcher.pos.x - impact_x).abs() < proximity {
                launcher.active = false;
                self.events.push(GameEvent::LauncherDestroyed { id: launcher.id });
                log::info!("Launcher at x={} destroyed", launcher.pos.x);
            }
        }
    }

    pub fn active_city_count(&self) -> usize {
        self.cities.iter().filter(|c| c.active).count()
    }

    pub fn active_launcher_count(&self) -> usize {
        self.launchers.iter().filter(|l| l.active).count()
    }

    /// Total ammo left across active launchers
    pub fn ammo_remaining(&self) -> u32 {
        self.launchers
            .iter()
            .filter(|l| l.active)
            .map(|l| l.ammo)
            .sum()
    }

    /// Take all pending events (for the audio/HUD collaborators)
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
