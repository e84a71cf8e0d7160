//! World generation and enemy wave spawning.
//!
//! Generation runs once per world: the cosmetic grid is laid out by
//! [`World::new`], then [`generate`] places weighted obstacles, tree
//! clusters, treasure chests, merchants and the first hostile wave. All
//! positions are uniform over fixed margins inside the world square. Layouts
//! are not reproducible unless the caller seeds the RNG.

use std::ops::RangeInclusive;

use glam::Vec2;
use log::{debug, info};
use rand::Rng;

use crate::components::{Collectable, CollectableSource, EntityKind, Obstacle};
use crate::config::{EnemyType, ObstacleType, SimConfig};
use crate::entity::{Attributes, EntityId};
use crate::world::World;
use crate::{
    CHEST_VALUE_MAX, CLUSTER_JITTER, CLUSTER_MARGIN, CLUSTER_SIZE_MAX, CLUSTER_SIZE_MIN,
    DEFAULT_HOSTILE_SPEED, OBSTACLE_FLIP_CHANCE, OBSTACLE_SCALE, OBSTACLE_SHRINK_CHANCE,
    OBSTACLE_SHRUNK_SCALE, SPAWN_MARGIN,
};

/// Counts of what [`generate`] placed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Layout {
    /// Individually placed obstacles.
    pub obstacles: u32,
    /// Obstacles placed as members of clusters.
    pub clustered: u32,
    /// Chests.
    pub collectables: u32,
    /// Hostiles in the first wave.
    pub hostiles: u32,
    /// Merchant NPCs.
    pub merchants: u32,
}

/// Enemies added by one wave.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Wave {
    /// One-based wave counter.
    pub number: u32,
    /// Hostiles spawned, in spawn order.
    pub hostiles: Vec<EntityId>,
    /// The boss, on boss waves.
    pub boss: Option<EntityId>,
}

/// Draws one row from a weighted table.
///
/// A uniform roll in `[0, total)` has each row's weight subtracted in turn;
/// the row that brings the roll to zero or below is chosen. Returns `None`
/// only for an empty table.
///
/// # Examples
/// ```
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
/// use skirmish::config::ObstacleType;
/// use skirmish::spawner::pick_weighted;
///
/// let table = vec![ObstacleType { name: "rock".into(), weight: 1 }];
/// let mut rng = ChaCha8Rng::seed_from_u64(1);
/// assert_eq!(pick_weighted(&table, &mut rng).map(|t| t.name.as_str()), Some("rock"));
/// ```
pub fn pick_weighted<'a, R: Rng + ?Sized>(
    table: &'a [ObstacleType],
    rng: &mut R,
) -> Option<&'a ObstacleType> {
    let total: u32 = table.iter().map(|row| row.weight).sum();
    let first = table.first()?;
    if total == 0 {
        return Some(first);
    }
    let mut roll = rng.random::<f64>() * f64::from(total);
    for row in table {
        let weight = f64::from(row.weight);
        if roll <= weight && row.weight > 0 {
            return Some(row);
        }
        roll -= weight;
    }
    Some(first)
}

/// Inclusive coordinate range keeping `margin` clear of the world edges.
const fn span(size: f32, margin: f32) -> RangeInclusive<f32> {
    let clear = margin.min(size / 2.0);
    clear..=size - clear
}

fn random_point<R: Rng + ?Sized>(rng: &mut R, range: &RangeInclusive<f32>) -> Vec2 {
    Vec2::new(
        rng.random_range(range.clone()),
        rng.random_range(range.clone()),
    )
}

/// Populates `world` with obstacles, chests, merchants and the first wave.
pub fn generate<R: Rng + ?Sized>(world: &mut World, config: &SimConfig, rng: &mut R) -> Layout {
    let mut layout = Layout::default();
    let placement = span(world.size, SPAWN_MARGIN);

    for _ in 0..config.obstacle_count {
        let Some(row) = pick_weighted(&config.obstacles, rng) else {
            break;
        };
        let obstacle = Obstacle {
            type_name: row.name.clone(),
            flipped: rng.random_bool(OBSTACLE_FLIP_CHANCE),
            scale: if rng.random_bool(OBSTACLE_SHRINK_CHANCE) {
                OBSTACLE_SHRUNK_SCALE
            } else {
                OBSTACLE_SCALE
            },
            clustered: false,
        };
        let position = random_point(rng, &placement);
        world
            .registry
            .spawn(EntityKind::Obstacle(obstacle), Attributes::at(position));
        layout.obstacles += 1;
    }

    if let Some(cluster_type) = config.obstacles.first() {
        let centres = span(world.size, CLUSTER_MARGIN);
        for _ in 0..config.cluster_count {
            let centre = random_point(rng, &centres);
            let members = rng.random_range(CLUSTER_SIZE_MIN..=CLUSTER_SIZE_MAX);
            for _ in 0..members {
                let jitter = Vec2::new(
                    rng.random_range(-CLUSTER_JITTER..=CLUSTER_JITTER),
                    rng.random_range(-CLUSTER_JITTER..=CLUSTER_JITTER),
                );
                world.registry.spawn(
                    EntityKind::Obstacle(Obstacle {
                        type_name: cluster_type.name.clone(),
                        flipped: false,
                        scale: OBSTACLE_SCALE,
                        clustered: true,
                    }),
                    Attributes::at(centre + jitter),
                );
                layout.clustered += 1;
            }
        }
    }

    for _ in 0..config.collectable_count {
        let value = rng.random_range(0..CHEST_VALUE_MAX);
        let position = random_point(rng, &placement);
        world.registry.spawn(
            EntityKind::Collectable(Collectable {
                value,
                source: CollectableSource::Chest,
            }),
            Attributes::at(position),
        );
        layout.collectables += 1;
    }

    for name in &config.merchants {
        let position = random_point(rng, &placement);
        let id = world
            .registry
            .spawn(EntityKind::Npc { name: name.clone() }, Attributes::at(position));
        debug!("merchant {name} ({id}) placed at {position}");
        layout.merchants += 1;
    }

    let first = spawn_wave(world, config, rng);
    layout.hostiles = u32::try_from(first.hostiles.len()).unwrap_or(u32::MAX);

    info!(
        "generated world: {} obstacles, {} clustered, {} chests, {} merchants, {} hostiles",
        layout.obstacles, layout.clustered, layout.collectables, layout.merchants, layout.hostiles
    );
    layout
}

/// Spawns one hostile of type `enemy` at `position`.
pub fn spawn_hostile(world: &mut World, enemy: &EnemyType, position: Vec2) -> EntityId {
    world.registry.spawn(
        EntityKind::Hostile {
            type_name: enemy.name.clone(),
        },
        Attributes::at(position)
            .with_health(enemy.health)
            .with_speed(enemy.speed.unwrap_or(DEFAULT_HOSTILE_SPEED))
            .with_strength(enemy.strength),
    )
}

/// Spawns the next wave of hostiles, plus a boss on every
/// `boss_wave_interval`-th wave.
pub fn spawn_wave<R: Rng + ?Sized>(world: &mut World, config: &SimConfig, rng: &mut R) -> Wave {
    world.wave += 1;
    let placement = span(world.size, SPAWN_MARGIN);
    let mut hostiles = Vec::new();
    for _ in 0..config.initial_hostiles {
        let Some(enemy) = pick_uniform(&config.enemies, rng) else {
            break;
        };
        let position = random_point(rng, &placement);
        hostiles.push(spawn_hostile(world, enemy, position));
    }
    let boss = (config.boss_wave_interval > 0 && world.wave % config.boss_wave_interval == 0)
        .then(|| spawn_boss(world, config, rng));
    info!(
        "wave {} spawned with {} hostiles{}",
        world.wave,
        hostiles.len(),
        if boss.is_some() { " and a boss" } else { "" }
    );
    Wave {
        number: world.wave,
        hostiles,
        boss,
    }
}

fn pick_uniform<'a, R: Rng + ?Sized>(table: &'a [EnemyType], rng: &mut R) -> Option<&'a EnemyType> {
    if table.is_empty() {
        return None;
    }
    table.get(rng.random_range(0..table.len()))
}

/// Spawns a boss at a random position.
pub fn spawn_boss<R: Rng + ?Sized>(world: &mut World, config: &SimConfig, rng: &mut R) -> EntityId {
    let position = random_point(rng, &span(world.size, SPAWN_MARGIN));
    let stats = config.boss;
    let id = world.registry.spawn(
        EntityKind::Boss,
        Attributes::at(position)
            .with_health(stats.health)
            .with_speed(stats.speed)
            .with_strength(stats.strength),
    );
    info!("boss {id} appeared at {position}");
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Kind;
    use hashbrown::HashMap;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use rstest::{fixture, rstest};

    #[fixture]
    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(42)
    }

    #[rstest]
    fn weighted_draw_tracks_weights(mut rng: ChaCha8Rng) {
        let table = SimConfig::default().obstacles;
        let draws = 130_000_u32;
        let mut counts: HashMap<&str, u32> = HashMap::new();
        for _ in 0..draws {
            let row = pick_weighted(&table, &mut rng).expect("non-empty table");
            *counts.entry(row.name.as_str()).or_default() += 1;
        }
        for row in &table {
            let seen = f64::from(counts.get(row.name.as_str()).copied().unwrap_or(0));
            let expected = f64::from(row.weight) / 13.0;
            let observed = seen / f64::from(draws);
            assert!(
                (observed - expected).abs() < 0.01,
                "{} drawn {observed:.4}, expected {expected:.4}",
                row.name
            );
        }
    }

    #[rstest]
    fn zero_weight_rows_are_never_drawn(mut rng: ChaCha8Rng) {
        let table = vec![
            ObstacleType {
                name: "never".to_owned(),
                weight: 0,
            },
            ObstacleType {
                name: "always".to_owned(),
                weight: 3,
            },
        ];
        for _ in 0..1_000 {
            let row = pick_weighted(&table, &mut rng).expect("non-empty table");
            assert_eq!(row.name, "always");
        }
        assert!(pick_weighted(&[], &mut rng).is_none());
    }

    #[rstest]
    fn generation_places_every_group(mut rng: ChaCha8Rng) {
        let config = SimConfig::default();
        let mut world = World::new(config.world_size);
        let layout = generate(&mut world, &config, &mut rng);

        assert_eq!(layout.obstacles, 300);
        assert!((30..=60).contains(&layout.clustered));
        assert_eq!(layout.collectables, 100);
        assert_eq!(layout.hostiles, 5);
        assert_eq!(layout.merchants, 1);

        let obstacles = u32::try_from(world.registry.count(Kind::Obstacle)).expect("fits");
        assert_eq!(obstacles, layout.obstacles + layout.clustered);
        assert_eq!(world.registry.count(Kind::Collectable), 100);
        assert_eq!(world.registry.count(Kind::Hostile), 5);
        assert_eq!(world.registry.count(Kind::Boss), 0);
        assert_eq!(world.wave, 1);
    }

    #[rstest]
    fn placements_respect_margins(mut rng: ChaCha8Rng) {
        let config = SimConfig::default();
        let mut world = World::new(config.world_size);
        generate(&mut world, &config, &mut rng);
        let inner = 100.0..=1820.0;
        let loose = (200.0 - 30.0)..=(1720.0 + 30.0);
        for entity in world.registry.iter() {
            let range = match &entity.kind {
                EntityKind::Player => continue,
                EntityKind::Obstacle(o) if o.clustered => &loose,
                _ => &inner,
            };
            assert!(range.contains(&entity.position.x), "{entity:?}");
            assert!(range.contains(&entity.position.y), "{entity:?}");
        }
    }

    #[rstest]
    fn hostiles_take_their_stats_from_the_table(mut rng: ChaCha8Rng) {
        let config = SimConfig::default();
        let mut world = World::new(config.world_size);
        spawn_wave(&mut world, &config, &mut rng);
        for id in world.registry.query(Kind::Hostile) {
            let hostile = world.registry.get(id).expect("hostile");
            let EntityKind::Hostile { type_name } = &hostile.kind else {
                panic!("not a hostile");
            };
            let row = config
                .enemies
                .iter()
                .find(|e| &e.name == type_name)
                .expect("known type");
            assert_eq!(hostile.health.map(|h| h.max), Some(row.health));
            assert_eq!(Some(hostile.speed), row.speed);
            assert_eq!(hostile.strength, row.strength);
        }
    }

    #[rstest]
    fn missing_speed_falls_back_to_default() {
        let mut world = World::new(1920.0);
        let rat = EnemyType {
            name: "Rat".to_owned(),
            health: 5,
            speed: None,
            strength: 1,
        };
        let id = spawn_hostile(&mut world, &rat, Vec2::splat(500.0));
        assert_eq!(
            world.registry.get(id).map(|e| e.speed),
            Some(DEFAULT_HOSTILE_SPEED)
        );
    }

    #[rstest]
    fn every_third_wave_brings_a_boss(mut rng: ChaCha8Rng) {
        let config = SimConfig::default();
        let mut world = World::new(config.world_size);
        let bosses: Vec<bool> = (0..6)
            .map(|_| spawn_wave(&mut world, &config, &mut rng).boss.is_some())
            .collect();
        assert_eq!(bosses, vec![false, false, true, false, false, true]);
        let first_boss = world.registry.query(Kind::Boss).iter().next().expect("boss");
        let boss = world.registry.get(first_boss).expect("boss entity");
        assert_eq!(boss.health.map(|h| h.current), Some(10));
        assert!((boss.speed - 50.0).abs() < f32::EPSILON);
    }
}
