//! Data-driven game balance
//!
//! Everything a designer might want to tweak without touching the tick.
//! Defaults reproduce the shipped mini-game. Distances are in viewport
//! pixels; speeds are pixels per tick.

use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// Game balance parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player ===
    /// Player sprite size at reference scale
    pub player_base_size: f32,
    /// Player sprite never shrinks below this
    pub player_min_size: f32,
    /// Distance kept between the player and the top/bottom edges
    pub play_margin: f32,

    // === Bullets ===
    /// Horizontal distance per tick
    pub bullet_speed: f32,
    /// Bullets spawn this far right of the player sprite
    pub bullet_spawn_offset: f32,
    /// Added to enemy radius when testing hits
    pub bullet_hit_radius: f32,
    /// Bullets are dropped this far past the right edge
    pub bullet_despawn_margin: f32,
    /// Fire automatically on a timer
    pub autofire: bool,
    /// Autofire period
    pub autofire_interval_ms: u64,

    // === Enemies ===
    /// Speed floor before jitter and level bonus
    pub enemy_base_speed: f32,
    /// Uniform speed jitter in [0, jitter)
    pub enemy_speed_jitter: f32,
    /// Smallest enemy diameter at reference scale
    pub enemy_min_size: f32,
    /// Uniform size jitter in [0, jitter)
    pub enemy_size_jitter: f32,
    /// Enemies are dropped this far past the left edge
    pub enemy_despawn_margin: f32,

    // === Spawner ===
    /// Spawn period at level 0
    pub spawn_base_interval_ms: u64,
    /// Period shortens by this much per level
    pub spawn_level_step_ms: u64,
    /// Period never drops below this
    pub spawn_min_interval_ms: u64,

    // === Contact ===
    /// Enemies closer than player_size + this on x can touch the player
    pub contact_margin: f32,
    /// Vertical distance under which an enemy touches the player
    pub contact_radius: f32,

    // === Starfield ===
    pub star_count: usize,
    /// Stars wrap once they pass this far left of the edge
    pub star_wrap_margin: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            // Player
            player_base_size: 60.0,
            player_min_size: 40.0,
            play_margin: 60.0,

            // Bullets
            bullet_speed: 14.0,
            bullet_spawn_offset: 20.0,
            bullet_hit_radius: 10.0,
            bullet_despawn_margin: 30.0,
            autofire: true,
            autofire_interval_ms: 400,

            // Enemies
            enemy_base_speed: 3.0,
            enemy_speed_jitter: 2.0,
            enemy_min_size: 25.0,
            enemy_size_jitter: 15.0,
            enemy_despawn_margin: 60.0,

            // Spawner
            spawn_base_interval_ms: 1500,
            spawn_level_step_ms: 200,
            spawn_min_interval_ms: 800,

            // Contact
            contact_margin: 30.0,
            contact_radius: 35.0,

            // Starfield
            star_count: 30,
            star_wrap_margin: 5.0,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON tuning document.
    ///
    /// Missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        log::info!("Loaded tuning overrides");
        Ok(tuning)
    }

    /// Serialize to pretty JSON (handy as a template for overrides)
    pub fn to_json(&self) -> Result<String, SimError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values that would break the tick
    pub fn validate(&self) -> Result<(), SimError> {
        let lengths = [
            ("player_base_size", self.player_base_size),
            ("player_min_size", self.player_min_size),
            ("play_margin", self.play_margin),
            ("bullet_spawn_offset", self.bullet_spawn_offset),
            ("bullet_hit_radius", self.bullet_hit_radius),
            ("bullet_despawn_margin", self.bullet_despawn_margin),
            ("enemy_speed_jitter", self.enemy_speed_jitter),
            ("enemy_size_jitter", self.enemy_size_jitter),
            ("enemy_despawn_margin", self.enemy_despawn_margin),
            ("contact_margin", self.contact_margin),
            ("contact_radius", self.contact_radius),
            ("star_wrap_margin", self.star_wrap_margin),
        ];
        for (name, value) in lengths {
            if !value.is_finite() || value < 0.0 {
                return Err(SimError::Tuning(format!("{name} must be finite and >= 0")));
            }
        }

        let positives = [
            ("bullet_speed", self.bullet_speed),
            ("enemy_base_speed", self.enemy_base_speed),
            ("enemy_min_size", self.enemy_min_size),
        ];
        for (name, value) in positives {
            if !value.is_finite() || value <= 0.0 {
                return Err(SimError::Tuning(format!("{name} must be finite and > 0")));
            }
        }

        if self.autofire_interval_ms == 0 || self.spawn_min_interval_ms == 0 {
            return Err(SimError::Tuning("timer intervals must be non-zero".into()));
        }
        if self.spawn_min_interval_ms > self.spawn_base_interval_ms {
            return Err(SimError::Tuning(
                "spawn_min_interval_ms exceeds spawn_base_interval_ms".into(),
            ));
        }
        Ok(())
    }

    /// Player sprite size for a given layout scale
    pub fn player_size(&self, scale: f32) -> f32 {
        (self.player_base_size * scale).max(self.player_min_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "bullet_speed": 20.0, "autofire": false }"#).unwrap();
        assert_eq!(tuning.bullet_speed, 20.0);
        assert!(!tuning.autofire);
        assert_eq!(tuning.contact_radius, Tuning::default().contact_radius);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(Tuning::from_json(r#"{ "bullet_speed": 0.0 }"#).is_err());
        assert!(Tuning::from_json(r#"{ "autofire_interval_ms": 0 }"#).is_err());
        assert!(Tuning::from_json(r#"{ "spawn_min_interval_ms": 5000 }"#).is_err());
        assert!(Tuning::from_json("not json").is_err());
    }

    #[test]
    fn test_json_roundtrip_template() {
        let json = Tuning::default().to_json().unwrap();
        assert_eq!(Tuning::from_json(&json).unwrap(), Tuning::default());
    }

    #[test]
    fn test_player_size_floor() {
        let tuning = Tuning::default();
        assert_eq!(tuning.player_size(1.0), 60.0);
        assert_eq!(tuning.player_size(0.5), 40.0);
        assert_eq!(tuning.player_size(2.0), 120.0);
    }
}
