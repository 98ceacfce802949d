//! Data-driven game balance
//!
//! Every gameplay constant lives in [`Tuning`]. The defaults are the shipped
//! balance; a partial JSON document can override any subset of fields.

use serde::{Deserialize, Serialize};

/// Errors from loading or validating a tuning table
#[derive(Debug)]
pub enum TuningError {
    /// The override document is not valid JSON for this table
    Parse(serde_json::Error),
    /// A field holds a value the simulation cannot run with
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

impl From<serde_json::Error> for TuningError {
    fn from(e: serde_json::Error) -> Self {
        TuningError::Parse(e)
    }
}

impl std::fmt::Display for TuningError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TuningError::Parse(e) => write!(f, "Tuning parse error: {}", e),
            TuningError::Invalid { field, reason } => {
                write!(f, "Invalid tuning value for `{}`: {}", field, reason)
            }
        }
    }
}

impl std::error::Error for TuningError {}

/// Game balance table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Spawn policy ===
    /// Spawn interval at round 0 (ms)
    pub spawn_interval_base_ms: f64,
    /// Interval reduction per round (ms)
    pub spawn_interval_step_ms: f64,
    /// Fastest allowed spawn interval (ms)
    pub spawn_interval_min_ms: f64,
    /// Enemy progress increment per tick at round 0
    pub enemy_speed_base: f32,
    /// Enemy speed increase per round
    pub enemy_speed_step: f32,
    /// Enemy speed cap
    pub enemy_speed_max: f32,

    // === Player fire ===
    /// Interceptor progress increment per tick (flight time is constant)
    pub interceptor_speed: f32,
    /// Height of the no-fire band along the bottom edge
    pub no_fire_margin: f32,
    /// Starting ammo for the left, center and right launcher
    pub launcher_ammo: [u32; 3],

    // === Blasts ===
    /// Max radius of an interceptor detonation
    pub intercept_blast_radius: f32,
    /// Max radius of an enemy ground impact
    pub impact_blast_radius: f32,
    /// Max radius of a chained detonation
    pub chain_blast_radius: f32,
    /// Radius gained per tick while growing
    pub blast_growth_rate: f32,
    /// Radius lost per tick while shrinking
    pub blast_shrink_rate: f32,
    /// Alpha lost per tick while shrinking
    pub blast_fade_rate: f32,

    // === Damage and scoring ===
    /// Horizontal distance within which an impact destroys a structure
    pub hit_proximity: f32,
    /// Score per destroyed enemy
    pub kill_score: u64,
    /// Round score that completes a round
    pub round_score_target: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            spawn_interval_base_ms: 1500.0,
            spawn_interval_step_ms: 150.0,
            spawn_interval_min_ms: 300.0,
            enemy_speed_base: 0.001,
            enemy_speed_step: 0.0004,
            enemy_speed_max: 0.008,

            interceptor_speed: 0.06,
            no_fire_margin: 50.0,
            launcher_ammo: [20, 40, 20],

            intercept_blast_radius: 40.0,
            impact_blast_radius: 30.0,
            chain_blast_radius: 30.0,
            blast_growth_rate: 1.5,
            blast_shrink_rate: 0.5,
            blast_fade_rate: 0.02,

            hit_proximity: 10.0,
            kill_score: 20,
            round_score_target: 800,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON override; missing fields keep defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Serialize the full table (handy for dumping the shipped balance)
    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot make progress with
    pub fn validate(&self) -> Result<(), TuningError> {
        fn positive(field: &'static str, value: f64) -> Result<(), TuningError> {
            if value > 0.0 && value.is_finite() {
                Ok(())
            } else {
                Err(TuningError::Invalid {
                    field,
                    reason: "must be positive and finite",
                })
            }
        }

        positive("spawn_interval_base_ms", self.spawn_interval_base_ms)?;
        positive("spawn_interval_min_ms", self.spawn_interval_min_ms)?;
        positive("enemy_speed_base", self.enemy_speed_base as f64)?;
        positive("enemy_speed_max", self.enemy_speed_max as f64)?;
        positive("interceptor_speed", self.interceptor_speed as f64)?;
        positive("intercept_blast_radius", self.intercept_blast_radius as f64)?;
        positive("impact_blast_radius", self.impact_blast_radius as f64)?;
        positive("chain_blast_radius", self.chain_blast_radius as f64)?;
        positive("blast_growth_rate", self.blast_growth_rate as f64)?;
        positive("blast_fade_rate", self.blast_fade_rate as f64)?;

        if self.spawn_interval_step_ms < 0.0 {
            return Err(TuningError::Invalid {
                field: "spawn_interval_step_ms",
                reason: "must not be negative",
            });
        }
        if self.spawn_interval_min_ms > self.spawn_interval_base_ms {
            return Err(TuningError::Invalid {
                field: "spawn_interval_min_ms",
                reason: "must not exceed spawn_interval_base_ms",
            });
        }
        if self.enemy_speed_max < self.enemy_speed_base {
            return Err(TuningError::Invalid {
                field: "enemy_speed_max",
                reason: "must not be below enemy_speed_base",
            });
        }
        if self.blast_shrink_rate < 0.0 {
            return Err(TuningError::Invalid {
                field: "blast_shrink_rate",
                reason: "must not be negative",
            });
        }
        if self.round_score_target == 0 {
            return Err(TuningError::Invalid {
                field: "round_score_target",
                reason: "must be at least 1",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "kill_score": 25, "launcher_ammo": [5, 10, 5] }"#)
            .expect("valid override");
        assert_eq!(tuning.kill_score, 25);
        assert_eq!(tuning.launcher_ammo, [5, 10, 5]);
        assert_eq!(tuning.round_score_target, 800);
        assert_eq!(tuning.interceptor_speed, 0.06);
    }

    #[test]
    fn test_rejects_bad_json() {
        let err = Tuning::from_json("{ not json").unwrap_err();
        assert!(matches!(err, TuningError::Parse(_)));
    }

    #[test]
    fn test_rejects_floor_above_base() {
        let err = Tuning::from_json(r#"{ "spawn_interval_min_ms": 2000.0 }"#).unwrap_err();
        match err {
            TuningError::Invalid { field, .. } => assert_eq!(field, "spawn_interval_min_ms"),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_rejects_zero_interceptor_speed() {
        let err = Tuning::from_json(r#"{ "interceptor_speed": 0.0 }"#).unwrap_err();
        assert!(err.to_string().contains("interceptor_speed"));
    }

    #[test]
    fn test_json_dump_reloads() {
        let json = Tuning::default().to_json().unwrap();
        assert_eq!(Tuning::from_json(&json).unwrap(), Tuning::default());
    }
}
