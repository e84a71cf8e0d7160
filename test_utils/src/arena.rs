//! Small deterministic worlds and input helpers.

use glam::Vec2;
use skirmish::components::{Collectable, CollectableSource};
use skirmish::entity::Attributes;
use skirmish::{Controls, EntityId, EntityKind, Facing, GameEvent, GameLoop, SimConfig};

/// Seeded configuration whose empty arenas stay empty for a long time.
#[must_use]
pub fn quiet_config() -> SimConfig {
    SimConfig {
        seed: Some(17),
        wave_delay_ticks: 100_000,
        ..SimConfig::default()
    }
}

/// A session holding only the player.
///
/// # Panics
/// Panics if [`quiet_config`] stops validating.
#[must_use]
pub fn arena() -> GameLoop {
    arena_with(quiet_config())
}

/// A session holding only the player, built from `config`.
///
/// # Panics
/// Panics if `config` is invalid.
#[must_use]
pub fn arena_with(config: SimConfig) -> GameLoop {
    GameLoop::empty(config).expect("test config should be valid")
}

fn at_offset(sim: &GameLoop, offset: Vec2) -> Vec2 {
    sim.world().player_position() + offset
}

/// Places a stationary skeleton `offset` away from the player.
pub fn place_hostile(sim: &mut GameLoop, offset: Vec2, health: u32) -> EntityId {
    let position = at_offset(sim, offset);
    sim.world_mut().registry.spawn(
        EntityKind::Hostile {
            type_name: "Skeleton".to_owned(),
        },
        Attributes::at(position)
            .with_health(health)
            .with_strength(20),
    )
}

/// Places a stationary boss with the configured health `offset` away from
/// the player.
pub fn place_boss(sim: &mut GameLoop, offset: Vec2) -> EntityId {
    let position = at_offset(sim, offset);
    let stats = sim.config().boss;
    sim.world_mut().registry.spawn(
        EntityKind::Boss,
        Attributes::at(position)
            .with_health(stats.health)
            .with_strength(stats.strength),
    )
}

pub fn place_chest(sim: &mut GameLoop, offset: Vec2, value: u32) -> EntityId {
    let position = at_offset(sim, offset);
    sim.world_mut().registry.spawn(
        EntityKind::Collectable(Collectable {
            value,
            source: CollectableSource::Chest,
        }),
        Attributes::at(position),
    )
}

pub fn place_merchant(sim: &mut GameLoop, offset: Vec2, name: &str) -> EntityId {
    let position = at_offset(sim, offset);
    sim.world_mut().registry.spawn(
        EntityKind::Npc {
            name: name.to_owned(),
        },
        Attributes::at(position),
    )
}

/// Turns the player without moving it.
pub fn face(sim: &mut GameLoop, facing: Facing) {
    if let Some(player) = sim.world_mut().player_entity_mut() {
        player.facing = facing;
    }
}

/// Controls holding the single direction `facing`.
///
/// # Examples
/// ```
/// use skirmish::Facing;
/// let controls = test_utils::hold(Facing::Left);
/// assert!(controls.left && !controls.right);
/// ```
#[must_use]
pub fn hold(facing: Facing) -> Controls {
    Controls {
        up: facing == Facing::Up,
        down: facing == Facing::Down,
        left: facing == Facing::Left,
        right: facing == Facing::Right,
        ..Controls::default()
    }
}

/// Ticks `sim` `ticks` times under `controls` and collects every event.
pub fn run(sim: &mut GameLoop, controls: Controls, ticks: u32) -> Vec<GameEvent> {
    (0..ticks)
        .flat_map(|_| sim.tick(controls).events)
        .collect()
}
