//! Melee and spell triggers and the lifetime of attack volumes.

use glam::Vec2;
use log::debug;

use crate::components::{EntityKind, Kind, Projectile};
use crate::entity::{Attributes, EntityId};
use crate::events::GameEvent;
use crate::scheduler::Effect;
use crate::world::World;
use crate::{
    MELEE_LIFESPAN_TICKS, MELEE_REACH, MELEE_WINDOW_TICKS, SPELL_COOLDOWN_TICKS,
    SPELL_DAMAGE_MULTIPLIER, SPELL_LIFESPAN_TICKS, SPELL_SPEED,
};

/// Starts a melee swing while `held` unless one is already in progress.
///
/// The swing opens the attacking window, which a scheduled effect closes
/// [`MELEE_WINDOW_TICKS`] later, and places a stationary hit volume in front
/// of the player carrying the player's strength as damage.
pub fn try_melee(world: &mut World, held: bool, events: &mut Vec<GameEvent>) -> Option<EntityId> {
    if !held || world.attacking {
        return None;
    }
    let player = world.player_entity()?;
    let owner = player.id;
    let position = player.position + player.facing.offset(MELEE_REACH);
    let damage = player.strength;

    world.attacking = true;
    world
        .scheduler
        .after(world.tick, MELEE_WINDOW_TICKS, Effect::EndMeleeWindow);
    let volume = world.registry.spawn(
        EntityKind::Projectile(Projectile {
            damage,
            owner,
            ticks_left: MELEE_LIFESPAN_TICKS,
            is_spell: false,
        }),
        Attributes::at(position),
    );
    debug!("melee volume {volume} at {position} for {damage}");
    events.push(GameEvent::MeleeStarted { volume });
    Some(volume)
}

/// Casts a spell on the press edge when the cooldown has run out.
pub fn try_spell(
    world: &mut World,
    pressed: bool,
    events: &mut Vec<GameEvent>,
) -> Option<EntityId> {
    if !pressed || world.spell_cooldown > 0 {
        return None;
    }
    let player = world.player_entity()?;
    let owner = player.id;
    let position = player.position;
    let velocity: Vec2 = player.facing.offset(SPELL_SPEED);
    let damage = player.strength.saturating_mul(SPELL_DAMAGE_MULTIPLIER);

    world.spell_cooldown = SPELL_COOLDOWN_TICKS;
    let projectile = world.registry.spawn(
        EntityKind::Projectile(Projectile {
            damage,
            owner,
            ticks_left: SPELL_LIFESPAN_TICKS,
            is_spell: true,
        }),
        Attributes::at(position).with_velocity(velocity),
    );
    debug!("spell {projectile} cast towards {velocity} for {damage}");
    events.push(GameEvent::SpellCast { projectile });
    Some(projectile)
}

/// Counts the spell cooldown down by one tick, stopping at zero.
pub const fn cool_down(world: &mut World) {
    world.spell_cooldown = world.spell_cooldown.saturating_sub(1);
}

/// Ages every attack volume by one tick and destroys those that expired.
pub fn age_volumes(world: &mut World) {
    for id in world.registry.query(Kind::Projectile) {
        let expired = match world.registry.get_mut(id).map(|e| &mut e.kind) {
            Some(EntityKind::Projectile(projectile)) => {
                projectile.ticks_left = projectile.ticks_left.saturating_sub(1);
                projectile.ticks_left == 0
            }
            _ => false,
        };
        if expired {
            world.registry.destroy(id);
        }
    }
}
