//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Injected RNG only
//! - Stable iteration order (bullets oldest first, enemies by spawn order)
//! - No rendering, timers, or host callbacks

pub mod collision;
pub mod rng;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{
    bullet_hits_enemy, enemy_touches_player, resolve_bullet_hits, resolve_player_contacts,
};
pub use rng::{PcgSource, SequenceRng, SpawnRng};
pub use spawn::{fire, scatter_stars, spawn_enemy, spawn_interval_ms};
pub use state::{Bullet, Enemy, GameEvent, Phase, Snapshot, Star, Viewport, World};
pub use tick::tick;
