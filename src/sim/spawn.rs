//! Entity creation: bullets, enemies, and the starfield
//!
//! Spawners check the phase themselves. A timer that fires just after the
//! world left `Running` is harmless.

use glam::Vec2;

use super::rng::SpawnRng;
use super::state::{Bullet, Enemy, Phase, Star, World};
use crate::tuning::Tuning;

/// Spawner period for a level, in milliseconds.
///
/// Shrinks linearly with level and floors at the tuning minimum
/// (defaults: `max(800, 1500 - 200 * level)`).
pub fn spawn_interval_ms(level: u32, tuning: &Tuning) -> u64 {
    let reduction = tuning.spawn_level_step_ms.saturating_mul(u64::from(level));
    tuning
        .spawn_base_interval_ms
        .saturating_sub(reduction)
        .max(tuning.spawn_min_interval_ms)
}

/// Fire one bullet from the player's muzzle. Returns its id.
pub fn fire(world: &mut World, tuning: &Tuning) -> Option<u32> {
    if world.phase != Phase::Running {
        return None;
    }

    let id = world.next_bullet_id();
    let x = world.viewport.player_size + tuning.bullet_spawn_offset;
    world.bullets.push(Bullet {
        id,
        pos: Vec2::new(x, world.player_y),
    });
    Some(id)
}

/// Spawn one enemy at the right edge. Returns its id.
pub fn spawn_enemy<R: SpawnRng + ?Sized>(
    world: &mut World,
    tuning: &Tuning,
    rng: &mut R,
) -> Option<u32> {
    if world.phase != Phase::Running {
        return None;
    }

    let vp = world.viewport;
    let y = rng.range(vp.min_y, vp.max_y - vp.min_y);
    let speed = rng.range(tuning.enemy_base_speed, tuning.enemy_speed_jitter) + world.level as f32;
    let size = rng.range(tuning.enemy_min_size, tuning.enemy_size_jitter) * vp.scale;

    let id = world.next_enemy_id();
    world.enemies.push(Enemy {
        id,
        pos: Vec2::new(vp.width, y),
        speed,
        size,
    });
    log::debug!("Spawned enemy {id} at y={y:.1} speed={speed:.2} size={size:.1}");
    Some(id)
}

/// Replace the starfield with a fresh uniform scatter over the viewport
pub fn scatter_stars<R: SpawnRng + ?Sized>(world: &mut World, tuning: &Tuning, rng: &mut R) {
    let vp = world.viewport;
    world.stars = (0..tuning.star_count)
        .map(|i| Star {
            id: i as u32,
            pos: Vec2::new(rng.unit() * vp.width, rng.unit() * vp.height),
            size: rng.range(1.0, 2.0),
            speed: rng.range(1.0, 2.0),
        })
        .collect();
}
