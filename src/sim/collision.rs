//! Collision detection and resolution
//!
//! Two ordered passes per tick: bullets against enemies, then surviving
//! enemies against the player. Iteration follows collection order (bullets
//! oldest first, enemies in spawn order) so outcomes are deterministic.

use glam::Vec2;

use super::state::{Enemy, GameEvent, World};
use crate::consts::KILL_SCORE;
use crate::tuning::Tuning;

/// Bullet centre is inside the enemy's radius grown by the bullet hit radius
#[inline]
pub fn bullet_hits_enemy(bullet_pos: Vec2, enemy: &Enemy, hit_radius: f32) -> bool {
    bullet_pos.distance(enemy.pos) < enemy.radius() + hit_radius
}

/// Enemy has reached the player's column and is on (roughly) the same row
#[inline]
pub fn enemy_touches_player(
    enemy: &Enemy,
    player_y: f32,
    player_size: f32,
    tuning: &Tuning,
) -> bool {
    enemy.pos.x < player_size + tuning.contact_margin
        && (enemy.pos.y - player_y).abs() < tuning.contact_radius
}

/// Resolve bullet-enemy hits.
///
/// Each bullet kills at most the first live enemy it overlaps; an enemy
/// can only be killed once. Stops as soon as the target score is reached.
/// Returns true when that happened.
pub fn resolve_bullet_hits(world: &mut World, tuning: &Tuning) -> bool {
    if world.bullets.is_empty() || world.enemies.is_empty() {
        return false;
    }

    let mut bullet_dead = vec![false; world.bullets.len()];
    let mut enemy_dead = vec![false; world.enemies.len()];
    let mut target_reached = false;

    for (bi, bullet) in world.bullets.iter().enumerate() {
        let hit = world
            .enemies
            .iter()
            .enumerate()
            .find(|(ei, enemy)| {
                !enemy_dead[*ei] && bullet_hits_enemy(bullet.pos, enemy, tuning.bullet_hit_radius)
            })
            .map(|(ei, enemy)| (ei, enemy.id));

        let Some((ei, enemy_id)) = hit else {
            continue;
        };

        bullet_dead[bi] = true;
        enemy_dead[ei] = true;
        world.score = world.score.saturating_add(KILL_SCORE);
        world.events.push(GameEvent::EnemyDestroyed {
            bullet_id: bullet.id,
            enemy_id,
        });

        if world.score >= world.target_score {
            target_reached = true;
            break;
        }
    }

    retain_alive(&mut world.bullets, &bullet_dead);
    retain_alive(&mut world.enemies, &enemy_dead);
    target_reached
}

/// Resolve enemy-player contacts.
///
/// Every touching enemy is removed and costs one health. Stops once health
/// hits zero. Returns true when that happened.
pub fn resolve_player_contacts(world: &mut World, tuning: &Tuning) -> bool {
    let player_y = world.player_y;
    let player_size = world.viewport.player_size;
    let mut enemy_dead = vec![false; world.enemies.len()];
    let mut health_exhausted = false;

    for (ei, enemy) in world.enemies.iter().enumerate() {
        if !enemy_touches_player(enemy, player_y, player_size, tuning) {
            continue;
        }

        enemy_dead[ei] = true;
        world.health = world.health.saturating_sub(1);
        world.events.push(GameEvent::PlayerHit {
            enemy_id: enemy.id,
            health: world.health,
        });

        if world.health == 0 {
            health_exhausted = true;
            break;
        }
    }

    retain_alive(&mut world.enemies, &enemy_dead);
    health_exhausted
}

/// Drop entries flagged dead, preserving order
fn retain_alive<T>(items: &mut Vec<T>, dead: &[bool]) {
    let mut index = 0;
    items.retain(|_| {
        let keep = !dead[index];
        index += 1;
        keep
    });
}
