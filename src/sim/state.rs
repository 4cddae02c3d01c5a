//! Game state and core simulation types
//!
//! The world is owned by the simulation; hosts only ever see a `Snapshot`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SimError;
use crate::tuning::Tuning;

/// Lifecycle of one game session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Timers live, world advancing
    Running,
    /// Timers suspended
    Paused,
    /// Target score reached with health left
    Won,
    /// Health ran out first
    Lost,
}

impl Phase {
    /// Won or Lost
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Won | Phase::Lost)
    }
}

/// Something the host may want to react to (sound, haptics, flashes).
/// Cleared at the start of every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    EnemyDestroyed { bullet_id: u32, enemy_id: u32 },
    PlayerHit { enemy_id: u32, health: u8 },
    Won,
    Lost,
}

/// Play area in screen pixels, plus layout values derived from it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    /// Layout scale relative to the 800x400 reference
    pub scale: f32,
    /// Player sprite size (also the x extent used for contact and muzzle)
    pub player_size: f32,
    /// Lowest allowed player/spawn y
    pub min_y: f32,
    /// Highest allowed player/spawn y
    pub max_y: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32, tuning: &Tuning) -> Result<Self, SimError> {
        let usable = width.is_finite()
            && height.is_finite()
            && width > 0.0
            && height > 2.0 * tuning.play_margin;
        if !usable {
            return Err(SimError::InvalidViewport { width, height });
        }

        let scale = (width / REFERENCE_WIDTH).min(height / REFERENCE_HEIGHT);
        Ok(Self {
            width,
            height,
            scale,
            player_size: tuning.player_size(scale),
            min_y: tuning.play_margin,
            max_y: height - tuning.play_margin,
        })
    }

    /// Clamp a vertical position into the play band
    #[inline]
    pub fn clamp_y(&self, y: f32) -> f32 {
        y.clamp(self.min_y, self.max_y)
    }

    /// Vertical centre of the viewport
    #[inline]
    pub fn center_y(&self) -> f32 {
        self.height / 2.0
    }
}

/// A player projectile. Travels right along a fixed row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    pub id: u32,
    pub pos: Vec2,
}

/// An incoming enemy. Travels left along a fixed row at its own speed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
    /// Pixels per tick
    pub speed: f32,
    /// Diameter
    pub size: f32,
}

impl Enemy {
    #[inline]
    pub fn radius(&self) -> f32 {
        self.size / 2.0
    }
}

/// Background parallax star (no gameplay effect)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Star {
    pub id: u32,
    pub pos: Vec2,
    pub size: f32,
    pub speed: f32,
}

/// Complete mutable simulation state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    /// Difficulty level (>= 1)
    pub level: u32,
    /// Score needed to win
    pub target_score: u32,
    pub score: u32,
    /// 0..=MAX_HEALTH
    pub health: u8,
    pub phase: Phase,
    /// Player's vertical position (always inside the viewport's play band)
    pub player_y: f32,
    /// Live bullets, oldest first
    pub bullets: Vec<Bullet>,
    /// Live enemies, spawn order
    pub enemies: Vec<Enemy>,
    pub stars: Vec<Star>,
    pub viewport: Viewport,
    /// Ticks simulated this session
    pub time_ticks: u64,
    /// Events produced by the latest tick
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    next_bullet_id: u32,
    next_enemy_id: u32,
}

impl World {
    /// Fresh world for a level. The level must already be validated.
    pub fn new(level: u32, viewport: Viewport) -> Self {
        Self {
            level,
            target_score: crate::target_score_for(level),
            score: 0,
            health: MAX_HEALTH,
            phase: Phase::Running,
            player_y: viewport.center_y(),
            bullets: Vec::new(),
            enemies: Vec::new(),
            stars: Vec::new(),
            viewport,
            time_ticks: 0,
            events: Vec::new(),
            next_bullet_id: 0,
            next_enemy_id: 0,
        }
    }

    /// Allocate a bullet id (never reused within the session)
    pub fn next_bullet_id(&mut self) -> u32 {
        let id = self.next_bullet_id;
        self.next_bullet_id = self.next_bullet_id.wrapping_add(1);
        id
    }

    /// Allocate an enemy id (never reused within the session)
    pub fn next_enemy_id(&mut self) -> u32 {
        let id = self.next_enemy_id;
        self.next_enemy_id = self.next_enemy_id.wrapping_add(1);
        id
    }

    /// Put score, health, entities and phase back to their starting values.
    /// Level, target, viewport, player position, stars and id counters survive.
    pub fn reset_round(&mut self) {
        self.score = 0;
        self.health = MAX_HEALTH;
        self.phase = Phase::Running;
        self.bullets.clear();
        self.enemies.clear();
        self.events.clear();
    }

    /// Fraction of the target score reached, in [0, 1]
    pub fn progress(&self) -> f32 {
        if self.target_score == 0 {
            return 1.0;
        }
        (self.score as f32 / self.target_score as f32).min(1.0)
    }

    /// Owned copy of everything the host renders
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            level: self.level,
            score: self.score,
            target_score: self.target_score,
            progress: self.progress(),
            health: self.health,
            phase: self.phase,
            player_y: self.player_y,
            player_size: self.viewport.player_size,
            bullets: self.bullets.clone(),
            enemies: self.enemies.clone(),
            stars: self.stars.clone(),
            events: self.events.clone(),
        }
    }
}

/// Per-frame view of the world handed to the renderer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub level: u32,
    pub score: u32,
    pub target_score: u32,
    pub progress: f32,
    pub health: u8,
    pub phase: Phase,
    pub player_y: f32,
    pub player_size: f32,
    pub bullets: Vec<Bullet>,
    pub enemies: Vec<Enemy>,
    pub stars: Vec<Star>,
    pub events: Vec<GameEvent>,
}
