//! Per-tick velocity resolution and integration.
//!
//! The player moves on held directions at a fixed speed per axis. Diagonal
//! input drives both axes at full speed, so diagonal movement is faster than
//! axis-aligned movement. Hostiles and bosses always head straight for the player
//! with no pathfinding and no separation between each other.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::components::{Facing, Kind};
use crate::entity::boxes_overlap;
use crate::vector_math::seek;
use crate::world::World;

/// Buttons held during one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[expect(
    clippy::struct_excessive_bools,
    reason = "Each flag is the held state of one independent button."
)]
pub struct Controls {
    /// Move towards negative y.
    pub up: bool,
    /// Move towards positive y.
    pub down: bool,
    /// Move towards negative x.
    pub left: bool,
    /// Move towards positive x.
    pub right: bool,
    /// Melee; repeats while held.
    pub attack: bool,
    /// Spell; fires on the press edge only.
    pub spell: bool,
}

/// Velocity and facing derived from held directions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Steering {
    /// Units per second along each held axis.
    pub velocity: Vec2,
    /// `None` when no direction is held; the previous facing is kept.
    pub facing: Option<Facing>,
}

/// Translates held directions into an axis-aligned velocity.
///
/// Left wins over right and up wins over down. Horizontal input decides the
/// facing; vertical input only does so when no horizontal key is held.
///
/// # Examples
/// ```
/// use glam::Vec2;
/// use skirmish::components::Facing;
/// use skirmish::movement::{steer, Controls};
///
/// let diagonal = Controls { up: true, right: true, ..Controls::default() };
/// let steering = steer(diagonal, 200.0);
/// assert_eq!(steering.velocity, Vec2::new(200.0, -200.0));
/// assert_eq!(steering.facing, Some(Facing::Right));
/// ```
#[must_use]
pub const fn steer(controls: Controls, speed: f32) -> Steering {
    let mut velocity = Vec2::ZERO;
    let mut facing = None;

    if controls.left {
        velocity.x = -speed;
        facing = Some(Facing::Left);
    } else if controls.right {
        velocity.x = speed;
        facing = Some(Facing::Right);
    }

    if controls.up {
        velocity.y = -speed;
        if velocity.x == 0.0 {
            facing = Some(Facing::Up);
        }
    } else if controls.down {
        velocity.y = speed;
        if velocity.x == 0.0 {
            facing = Some(Facing::Down);
        }
    }

    Steering { velocity, facing }
}

/// Applies `controls` to the player and returns its new velocity.
pub fn steer_player(world: &mut World, controls: Controls) -> Vec2 {
    let Some(player) = world.player_entity_mut() else {
        return Vec2::ZERO;
    };
    let steering = steer(controls, player.speed);
    player.velocity = steering.velocity;
    if let Some(facing) = steering.facing {
        player.facing = facing;
    }
    steering.velocity
}

/// Points every hostile and boss at the player at its own speed.
pub fn pursue_player(world: &mut World) {
    let target = world.player_position();
    for id in world.registry.enemies() {
        if let Some(enemy) = world.registry.get_mut(id) {
            enemy.velocity = seek(enemy.position, target, enemy.speed);
        }
    }
}

/// Advances every moving entity by one tick of `dt` seconds.
///
/// Actors stay inside the world square and the player cannot enter
/// obstacles. Attack volumes move freely until they expire.
pub fn integrate(world: &mut World, dt: f32) {
    move_player(world, dt);
    let size = Vec2::splat(world.size);
    let moving: Vec<_> = world
        .registry
        .iter()
        .filter(|e| e.tag() != Kind::Player && e.velocity != Vec2::ZERO)
        .map(|e| e.id)
        .collect();
    for id in moving {
        if let Some(entity) = world.registry.get_mut(id) {
            let next = entity.position + entity.velocity * dt;
            entity.position = if entity.tag().is_enemy() {
                next.clamp(Vec2::ZERO, size)
            } else {
                next
            };
        }
    }
}

fn move_player(world: &mut World, dt: f32) {
    let Some(player) = world.player_entity() else {
        return;
    };
    let (start, step, half) = (player.position, player.velocity * dt, player.half_extent());
    if step == Vec2::ZERO {
        return;
    }

    // A player already inside an obstacle may walk out of it freely.
    let stuck = blocked_by_obstacle(world, start, half);
    let candidates = [
        start + step,
        start + Vec2::new(step.x, 0.0),
        start + Vec2::new(0.0, step.y),
    ];
    let destination = candidates
        .into_iter()
        .map(|c| world.clamp(c))
        .find(|&c| stuck || !blocked_by_obstacle(world, c, half))
        .unwrap_or(start);

    if let Some(mover) = world.player_entity_mut() {
        mover.position = destination;
    }
}

/// Whether a box of `half` extent centred at `position` overlaps an obstacle.
#[must_use]
pub fn blocked_by_obstacle(world: &World, position: Vec2, half: f32) -> bool {
    world
        .registry
        .iter()
        .filter(|e| e.tag() == Kind::Obstacle)
        .any(|o| boxes_overlap(position, half, o.position, o.half_extent()))
}
