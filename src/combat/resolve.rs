//! Per-tick collision resolution.
//!
//! Steps run in a fixed order: enemy contact with the player, attack volumes
//! against enemies, attack volumes against obstacles and merchants, then the
//! player against collectables. Destruction requested by one step is flushed
//! before the next step runs, so a volume consumed by an enemy can never also
//! strike an obstacle.

use glam::Vec2;
use log::{debug, info};
use rand::Rng;

use super::damage::{apply_hit, HitOutcome};
use super::{CombatRules, TradeHandler};
use crate::components::{Collectable, CollectableSource, EntityKind, Kind, LifeState};
use crate::entity::{boxes_overlap, Attributes, EntityId};
use crate::events::GameEvent;
use crate::movement::blocked_by_obstacle;
use crate::scheduler::Effect;
use crate::vector_math::{bearing, heading};
use crate::world::World;
use crate::{
    BOSS_GOLD, BOSS_KNOCKBACK, BOSS_XP, CHEST_VALUE_MAX, CONTACT_GRACE_TICKS, FRAME_SECONDS,
    HOSTILE_KNOCKBACK, HOSTILE_XP, PICKUP_GOLD, PICKUP_XP,
};

/// Attack volume captured before a resolution step mutates the registry.
#[derive(Clone, Copy)]
struct Volume {
    id: EntityId,
    position: Vec2,
    half: f32,
    damage: u32,
    is_spell: bool,
}

fn volumes(world: &World) -> Vec<Volume> {
    world
        .registry
        .query(Kind::Projectile)
        .iter()
        .filter_map(|id| {
            let entity = world.registry.get(id)?;
            let EntityKind::Projectile(projectile) = entity.kind else {
                return None;
            };
            Some(Volume {
                id,
                position: entity.position,
                half: entity.half_extent(),
                damage: projectile.damage,
                is_spell: projectile.is_spell,
            })
        })
        .collect()
}

/// Runs every collision step for the current tick.
///
/// Events describing what happened are appended to `events`. Resolution
/// stops as soon as the player dies.
pub fn resolve_collisions<R: Rng + ?Sized>(
    world: &mut World,
    rules: CombatRules,
    rng: &mut R,
    trade: &mut dyn TradeHandler,
    events: &mut Vec<GameEvent>,
) {
    resolve_contact(world, rules, events);
    world.registry.flush();
    if world.is_game_over {
        return;
    }
    resolve_strikes(world, rules, rng, events);
    world.registry.flush();
    resolve_blocking(world, trade, events);
    world.registry.flush();
    resolve_pickups(world, events);
    world.registry.flush();
}

/// Knocks the player back from every touching enemy and applies contact damage.
fn resolve_contact(world: &mut World, rules: CombatRules, events: &mut Vec<GameEvent>) {
    let Some(player) = world.player_entity().cloned() else {
        return;
    };
    for id in world.registry.enemies() {
        let Some(enemy) = world.registry.get(id) else {
            continue;
        };
        if !enemy.is_alive() || !enemy.overlaps(&player) {
            continue;
        }
        let push_speed = if enemy.tag() == Kind::Boss {
            BOSS_KNOCKBACK
        } else {
            HOSTILE_KNOCKBACK
        };
        let strength = enemy.strength;
        let push = heading(bearing(enemy.position, player.position), push_speed);
        knock_back(world, push);

        if rules.contact_damage && !world.contact_grace {
            world.contact_grace = true;
            world
                .scheduler
                .after(world.tick, CONTACT_GRACE_TICKS, Effect::EndContactGrace);
            let hurt = world.damage_player(strength);
            events.push(GameEvent::PlayerHurt {
                by: id,
                damage: strength,
                remaining: hurt.remaining,
            });
            if hurt.fatal {
                events.push(GameEvent::GameOver);
                return;
            }
        }
    }
}

fn knock_back(world: &mut World, push: Vec2) {
    let Some(player) = world.player_entity() else {
        return;
    };
    let half = player.half_extent();
    let displaced = world.clamp(player.position + push * FRAME_SECONDS);
    let free = !blocked_by_obstacle(world, displaced, half);
    if let Some(pushed) = world.player_entity_mut() {
        pushed.velocity = push;
        if free {
            pushed.position = displaced;
        }
    }
}

/// Applies each attack volume to the first live enemy it overlaps.
fn resolve_strikes<R: Rng + ?Sized>(
    world: &mut World,
    rules: CombatRules,
    rng: &mut R,
    events: &mut Vec<GameEvent>,
) {
    let enemies = world.registry.enemies();
    for volume in volumes(world) {
        let struck = enemies.iter().find(|&id| {
            world.registry.get(id).is_some_and(|enemy| {
                enemy.is_alive()
                    && boxes_overlap(
                        volume.position,
                        volume.half,
                        enemy.position,
                        enemy.half_extent(),
                    )
            })
        });
        let Some(target) = struck else {
            continue;
        };
        world.registry.destroy(volume.id);
        let Some(enemy) = world.registry.get_mut(target) else {
            continue;
        };
        match apply_hit(enemy, volume.damage) {
            HitOutcome::Ignored => {}
            HitOutcome::Wounded { damage, remaining } => events.push(GameEvent::Hit {
                target,
                damage,
                remaining,
            }),
            HitOutcome::Killed { damage } => {
                events.push(GameEvent::Hit {
                    target,
                    damage,
                    remaining: 0,
                });
                on_death(world, target, rules, rng, events);
            }
        }
    }
}

/// Fires the one-shot death effects of an enemy in the `Dying` state.
fn on_death<R: Rng + ?Sized>(
    world: &mut World,
    id: EntityId,
    rules: CombatRules,
    rng: &mut R,
    events: &mut Vec<GameEvent>,
) {
    let Some(enemy) = world.registry.get_mut(id) else {
        return;
    };
    if enemy.life != LifeState::Dying {
        return;
    }
    let boss = enemy.tag() == Kind::Boss;
    let position = enemy.position;
    enemy.kind = EntityKind::Corpse { boss };
    enemy.velocity = Vec2::ZERO;
    enemy.life = LifeState::Removed;

    if boss {
        info!("boss {id} slain at {position}");
        events.push(GameEvent::BossKilled { target: id });
        world.add_gold(BOSS_GOLD);
        reward_xp(world, BOSS_XP, events);
        return;
    }

    debug!("hostile {id} slain at {position}");
    events.push(GameEvent::HostileKilled { target: id });
    reward_xp(world, HOSTILE_XP, events);
    if rng.random_bool(rules.loot_chance) {
        let value = rng.random_range(0..CHEST_VALUE_MAX);
        let collectable = world.registry.spawn(
            EntityKind::Collectable(Collectable {
                value,
                source: CollectableSource::Loot,
            }),
            Attributes::at(position),
        );
        debug!("loot {collectable} worth {value} dropped by {id}");
        events.push(GameEvent::LootDropped { collectable });
    }
}

fn reward_xp(world: &mut World, amount: u32, events: &mut Vec<GameEvent>) {
    if let Some(up) = world.grant_xp(amount) {
        events.push(GameEvent::LevelUp { level: up.level });
    }
}

/// Consumes volumes that hit obstacles, and melee volumes that hit merchants.
fn resolve_blocking(world: &mut World, trade: &mut dyn TradeHandler, events: &mut Vec<GameEvent>) {
    for volume in volumes(world) {
        let touching: Vec<_> = world
            .registry
            .iter()
            .filter(|other| {
                boxes_overlap(
                    volume.position,
                    volume.half,
                    other.position,
                    other.half_extent(),
                )
            })
            .collect();
        let obstacle = touching.iter().any(|other| other.tag() == Kind::Obstacle);
        let merchant = touching
            .iter()
            .filter(|_| !volume.is_spell)
            .filter_map(|other| match &other.kind {
                EntityKind::Npc { name } => Some((other.id, name.clone())),
                _ => None,
            })
            .min_by_key(|(id, _)| *id);
        if let Some((npc, name)) = merchant {
            world.registry.destroy(volume.id);
            debug!("melee {} struck merchant {name} ({npc})", volume.id);
            trade.open_trade(npc, &name);
            events.push(GameEvent::TradeRequested { npc, name });
        } else if obstacle {
            world.registry.destroy(volume.id);
        }
    }
}

/// Picks up every collectable the player touches.
fn resolve_pickups(world: &mut World, events: &mut Vec<GameEvent>) {
    let Some(player) = world.player_entity().cloned() else {
        return;
    };
    for id in world.registry.query(Kind::Collectable) {
        let touched = world.registry.get(id).and_then(|entity| match entity.kind {
            EntityKind::Collectable(c) if entity.overlaps(&player) => Some(c.value),
            _ => None,
        });
        let Some(value) = touched else {
            continue;
        };
        world.registry.destroy(id);
        world.add_gold(PICKUP_GOLD);
        events.push(GameEvent::Collected {
            value,
            gold: world.gold,
        });
        reward_xp(world, PICKUP_XP, events);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::{MockTradeHandler, NoTrade};
    use crate::components::{Health, Obstacle, Projectile};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use rstest::{fixture, rstest};

    const NEVER_LOOT: CombatRules = CombatRules {
        loot_chance: 0.0,
        contact_damage: true,
    };

    #[fixture]
    fn world() -> World {
        World::new(1920.0)
    }

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(7)
    }

    fn resolve(world: &mut World, rules: CombatRules) -> Vec<GameEvent> {
        let mut events = Vec::new();
        resolve_collisions(world, rules, &mut rng(), &mut NoTrade, &mut events);
        events
    }

    fn hostile_at(world: &mut World, position: Vec2, health: u32) -> EntityId {
        world.registry.spawn(
            EntityKind::Hostile {
                type_name: "Skeleton".to_owned(),
            },
            Attributes::at(position)
                .with_health(health)
                .with_speed(70.0)
                .with_strength(20),
        )
    }

    fn volume_at(world: &mut World, position: Vec2, damage: u32, is_spell: bool) -> EntityId {
        let owner = world.player;
        world.registry.spawn(
            EntityKind::Projectile(Projectile {
                damage,
                owner,
                ticks_left: 12,
                is_spell,
            }),
            Attributes::at(position),
        )
    }

    fn away_from_player(world: &World) -> Vec2 {
        world.player_position() + Vec2::new(300.0, 0.0)
    }

    #[rstest]
    fn contact_knocks_back_and_hurts_once(mut world: World) {
        let centre = world.player_position();
        hostile_at(&mut world, centre + Vec2::new(10.0, 0.0), 100);
        let events = resolve(&mut world, NEVER_LOOT);
        let player = world.player_entity().expect("player");
        assert_eq!(player.velocity, Vec2::new(-400.0, 0.0));
        assert!(player.position.x < centre.x);
        assert_eq!(world.player_health().current, 80);
        assert!(world.contact_grace);
        assert!(matches!(events.as_slice(), [GameEvent::PlayerHurt { damage: 20, .. }]));

        resolve(&mut world, NEVER_LOOT);
        assert_eq!(world.player_health().current, 80);
    }

    #[rstest]
    fn boss_contact_pushes_harder(mut world: World) {
        let centre = world.player_position();
        world.registry.spawn(
            EntityKind::Boss,
            Attributes::at(centre + Vec2::new(0.0, 20.0)).with_health(10),
        );
        resolve(
            &mut world,
            CombatRules {
                contact_damage: false,
                ..NEVER_LOOT
            },
        );
        let velocity = world.player_entity().map(|p| p.velocity).expect("player");
        assert!((velocity.y + 600.0).abs() < 1e-3);
        assert_eq!(world.player_health().current, 100);
    }

    #[rstest]
    fn fatal_contact_ends_resolution(mut world: World) {
        if let Some(health) = world.player_entity_mut().and_then(|p| p.health.as_mut()) {
            *health = Health { current: 5, max: 100 };
        }
        let centre = world.player_position();
        hostile_at(&mut world, centre, 100);
        let volume = volume_at(&mut world, centre, 20, false);
        let events = resolve(&mut world, NEVER_LOOT);
        assert!(world.is_game_over);
        assert_eq!(events.last(), Some(&GameEvent::GameOver));
        assert!(world.registry.contains(volume));
    }

    #[rstest]
    fn a_volume_damages_only_one_target(mut world: World) {
        let spot = away_from_player(&world);
        let first = hostile_at(&mut world, spot, 100);
        let second = hostile_at(&mut world, spot, 100);
        let volume = volume_at(&mut world, spot, 30, false);
        let events = resolve(&mut world, NEVER_LOOT);
        assert!(!world.registry.contains(volume));
        let health = |id: EntityId| world.registry.get(id).and_then(|e| e.health).map(|h| h.current);
        assert_eq!(health(first), Some(70));
        assert_eq!(health(second), Some(100));
        assert_eq!(
            events,
            vec![GameEvent::Hit {
                target: first,
                damage: 30,
                remaining: 70
            }]
        );
    }

    #[rstest]
    fn killing_a_hostile_leaves_a_corpse_and_grants_xp(mut world: World) {
        let spot = away_from_player(&world);
        let target = hostile_at(&mut world, spot, 20);
        volume_at(&mut world, spot, 20, false);
        volume_at(&mut world, spot, 20, true);
        let events = resolve(&mut world, NEVER_LOOT);
        let corpse = world.registry.get(target).expect("corpse stays");
        assert_eq!(corpse.kind, EntityKind::Corpse { boss: false });
        assert_eq!(corpse.life, LifeState::Removed);
        assert_eq!(world.progression.xp, HOSTILE_XP);
        let kills = events
            .iter()
            .filter(|e| matches!(e, GameEvent::HostileKilled { .. }))
            .count();
        assert_eq!(kills, 1);
        assert_eq!(world.registry.count(Kind::Projectile), 1);
    }

    #[rstest]
    fn boss_kill_pays_gold_and_xp(mut world: World) {
        let spot = away_from_player(&world);
        let boss = world.registry.spawn(EntityKind::Boss, Attributes::at(spot).with_health(1));
        volume_at(&mut world, spot, 5, true);
        let events = resolve(&mut world, NEVER_LOOT);
        assert!(events.contains(&GameEvent::BossKilled { target: boss }));
        assert_eq!(world.gold, BOSS_GOLD);
        assert_eq!(world.progression.level, 2);
        assert_eq!(world.progression.xp, 0);
        assert!(events.contains(&GameEvent::LevelUp { level: 2 }));
    }

    #[rstest]
    fn certain_loot_drops_at_the_death_position(mut world: World) {
        let spot = away_from_player(&world);
        hostile_at(&mut world, spot, 1);
        volume_at(&mut world, spot, 1, false);
        let events = resolve(
            &mut world,
            CombatRules {
                loot_chance: 1.0,
                contact_damage: true,
            },
        );
        let Some(GameEvent::LootDropped { collectable }) = events.last() else {
            panic!("expected a loot drop, got {events:?}");
        };
        let loot = world.registry.get(*collectable).expect("loot");
        assert_eq!(loot.position, spot);
        assert!(matches!(
            loot.kind,
            EntityKind::Collectable(Collectable {
                source: CollectableSource::Loot,
                value,
            }) if value < CHEST_VALUE_MAX
        ));
    }

    #[rstest]
    fn bosses_never_drop_loot(mut world: World) {
        let spot = away_from_player(&world);
        let boss = world
            .registry
            .spawn(EntityKind::Boss, Attributes::at(spot).with_health(1));
        volume_at(&mut world, spot, 1, false);
        let events = resolve(
            &mut world,
            CombatRules {
                loot_chance: 1.0,
                contact_damage: false,
            },
        );
        assert!(events.contains(&GameEvent::BossKilled { target: boss }));
        assert!(events
            .iter()
            .all(|e| !matches!(e, GameEvent::LootDropped { .. })));
        assert_eq!(world.registry.count(Kind::Collectable), 0);
    }

    #[rstest]
    fn obstacles_absorb_volumes(mut world: World) {
        let spot = away_from_player(&world);
        world.registry.spawn(
            EntityKind::Obstacle(Obstacle {
                type_name: "rock".to_owned(),
                flipped: false,
                scale: 2.0,
                clustered: false,
            }),
            Attributes::at(spot),
        );
        let volume = volume_at(&mut world, spot, 20, true);
        let events = resolve(&mut world, NEVER_LOOT);
        assert!(!world.registry.contains(volume));
        assert!(events.is_empty());
    }

    #[rstest]
    fn striking_a_merchant_requests_a_trade(mut world: World) {
        let spot = away_from_player(&world);
        let npc = world.registry.spawn(
            EntityKind::Npc {
                name: "Merchant".to_owned(),
            },
            Attributes::at(spot),
        );
        let volume = volume_at(&mut world, spot, 20, false);
        let mut trade = MockTradeHandler::new();
        trade
            .expect_open_trade()
            .withf(move |id, name| *id == npc && name == "Merchant")
            .times(1)
            .return_const(());
        let mut events = Vec::new();
        resolve_collisions(&mut world, NEVER_LOOT, &mut rng(), &mut trade, &mut events);
        assert!(!world.registry.contains(volume));
        assert!(world.registry.contains(npc));
        assert_eq!(
            events,
            vec![GameEvent::TradeRequested {
                npc,
                name: "Merchant".to_owned()
            }]
        );
    }

    #[rstest]
    fn pickups_pay_fixed_rewards(mut world: World) {
        let centre = world.player_position();
        let chest = world.registry.spawn(
            EntityKind::Collectable(Collectable {
                value: 120,
                source: CollectableSource::Chest,
            }),
            Attributes::at(centre + Vec2::new(5.0, 5.0)),
        );
        let events = resolve(&mut world, NEVER_LOOT);
        assert!(!world.registry.contains(chest));
        assert_eq!(world.gold, PICKUP_GOLD);
        assert_eq!(world.progression.xp, PICKUP_XP);
        assert_eq!(
            events,
            vec![GameEvent::Collected {
                value: 120,
                gold: PICKUP_GOLD
            }]
        );
    }
}
