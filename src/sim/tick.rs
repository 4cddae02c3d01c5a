//! Fixed timestep simulation tick
//!
//! Advances the world by one 60 Hz step. Speeds are expressed per tick, so
//! there is no dt parameter.

use super::collision::{resolve_bullet_hits, resolve_player_contacts};
use super::rng::SpawnRng;
use super::state::{GameEvent, Phase, World};
use crate::tuning::Tuning;

/// Advance the world by one tick.
///
/// Order matters for determinism: stars, bullets, enemies, bullet hits
/// (may end in `Won`), then player contacts (may end in `Lost`).
/// Does nothing unless the world is `Running`.
pub fn tick<R: SpawnRng + ?Sized>(world: &mut World, tuning: &Tuning, rng: &mut R) {
    if world.phase != Phase::Running {
        return;
    }

    world.events.clear();
    world.time_ticks += 1;

    advance_stars(world, tuning, rng);
    advance_bullets(world, tuning);
    advance_enemies(world, tuning);

    if resolve_bullet_hits(world, tuning) {
        world.phase = Phase::Won;
        world.events.push(GameEvent::Won);
        log::info!(
            "Level {} cleared: score {}/{} with {} health",
            world.level,
            world.score,
            world.target_score,
            world.health
        );
        return;
    }

    if resolve_player_contacts(world, tuning) {
        world.phase = Phase::Lost;
        world.events.push(GameEvent::Lost);
        log::info!(
            "Level {} lost at score {}/{}",
            world.level,
            world.score,
            world.target_score
        );
    }
}

/// Scroll the background; stars leaving on the left re-enter on the right
fn advance_stars<R: SpawnRng + ?Sized>(world: &mut World, tuning: &Tuning, rng: &mut R) {
    let width = world.viewport.width;
    let height = world.viewport.height;
    for star in &mut world.stars {
        star.pos.x -= star.speed;
        if star.pos.x < -tuning.star_wrap_margin {
            star.pos.x = width;
            star.pos.y = rng.unit() * height;
        }
    }
}

fn advance_bullets(world: &mut World, tuning: &Tuning) {
    let limit = world.viewport.width + tuning.bullet_despawn_margin;
    for bullet in &mut world.bullets {
        bullet.pos.x += tuning.bullet_speed;
    }
    world.bullets.retain(|b| b.pos.x < limit);
}

fn advance_enemies(world: &mut World, tuning: &Tuning) {
    let limit = -tuning.enemy_despawn_margin;
    for enemy in &mut world.enemies {
        enemy.pos.x -= enemy.speed;
    }
    world.enemies.retain(|e| e.pos.x > limit);
}
