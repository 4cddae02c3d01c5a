//! Wormhole Shooter - side-scrolling arcade mini-game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (motion, spawning, collisions, game state)
//! - `simulation`: `ShooterSimulation`, the host-facing component
//! - `session`: Timer driver that serializes tick/autofire/spawn and host commands
//! - `tuning`: Data-driven game balance
//! - `error`: Crate error type

pub mod error;
pub mod session;
pub mod sim;
pub mod simulation;
pub mod tuning;

pub use error::SimError;
pub use session::{HostCommand, Session};
pub use sim::{Bullet, Enemy, GameEvent, Phase, Snapshot, Star, Viewport, World};
pub use simulation::{ShooterSimulation, SimOptions};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Simulation rate (ticks per second)
    pub const TICK_HZ: u64 = 60;
    /// Fixed tick period in microseconds
    pub const TICK_PERIOD_US: u64 = 1_000_000 / TICK_HZ;
    /// Longest frame the session will integrate at once (prevents spiral of death)
    pub const MAX_FRAME_US: u64 = 100_000;

    /// Player hit points at session start
    pub const MAX_HEALTH: u8 = 3;
    /// Score awarded per enemy destroyed
    pub const KILL_SCORE: u32 = 10;
    /// Target score is this times the level
    pub const POINTS_PER_LEVEL: u32 = 100;

    /// Layout reference size; scale is 1.0 at exactly this viewport
    pub const REFERENCE_WIDTH: f32 = 800.0;
    pub const REFERENCE_HEIGHT: f32 = 400.0;

    /// Viewport used when the host doesn't supply one
    pub const DEFAULT_WIDTH: f32 = 800.0;
    pub const DEFAULT_HEIGHT: f32 = 400.0;
}

/// Target score for a level (saturates for absurd levels)
#[inline]
pub fn target_score_for(level: u32) -> u32 {
    consts::POINTS_PER_LEVEL.saturating_mul(level)
}

/// Milliseconds to microseconds
#[inline]
pub fn ms_to_us(ms: u64) -> u64 {
    ms.saturating_mul(1_000)
}
