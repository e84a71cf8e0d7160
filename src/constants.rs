//! Game tuning constants used across systems.
//!
//! Durations are expressed in ticks. One tick is one rendered frame and the
//! simulation assumes a nominal rate of sixty frames per second, so speeds are
//! given in world units per second and scaled by [`FRAME_SECONDS`] each tick.

/// Nominal duration of a single tick in seconds.
pub const FRAME_SECONDS: f32 = 1.0 / 60.0;

/// Side length of the square world.
pub const WORLD_SIZE: f32 = 1920.0;
/// Spacing of the cosmetic background grid.
pub const GRID_SPACING: f32 = 64.0;
/// Inner margin used when scattering obstacles, chests and hostiles.
pub const SPAWN_MARGIN: f32 = 100.0;
/// Inner margin used when choosing obstacle cluster centres.
pub const CLUSTER_MARGIN: f32 = 200.0;
/// Maximum per-axis jitter of a cluster member around its centre.
pub const CLUSTER_JITTER: f32 = 30.0;
/// Fewest members in one cluster.
pub const CLUSTER_SIZE_MIN: u32 = 3;
/// Most members in one cluster.
pub const CLUSTER_SIZE_MAX: u32 = 6;

/// Individually placed obstacles per world.
pub const OBSTACLE_COUNT: u32 = 300;
/// Obstacle clusters per world.
pub const CLUSTER_COUNT: u32 = 10;
/// Treasure chests per world.
pub const COLLECTABLE_COUNT: u32 = 100;
/// Hostiles in each wave.
pub const INITIAL_HOSTILES: u32 = 5;
/// Exclusive upper bound on a chest's gold value.
pub const CHEST_VALUE_MAX: u32 = 150;
/// Chance that a placed obstacle is mirrored horizontally.
pub const OBSTACLE_FLIP_CHANCE: f64 = 0.3;
/// Chance that a placed obstacle uses [`OBSTACLE_SHRUNK_SCALE`].
pub const OBSTACLE_SHRINK_CHANCE: f64 = 0.1;
/// Cosmetic scale of an obstacle sprite.
pub const OBSTACLE_SCALE: f32 = 2.0;
/// Reduced cosmetic scale.
pub const OBSTACLE_SHRUNK_SCALE: f32 = 1.5;

/// Starting and base maximum health of the player.
pub const PLAYER_HEALTH: u32 = 100;
/// Player walking speed in units per second.
pub const PLAYER_SPEED: f32 = 200.0;
/// Starting strength; melee damage equals strength.
pub const PLAYER_STRENGTH: u32 = 20;
/// Pursuit speed used for hostiles whose type carries none.
pub const DEFAULT_HOSTILE_SPEED: f32 = 100.0;

/// Boss hit points; every hit removes exactly one.
pub const BOSS_HEALTH: u32 = 10;
/// Boss pursuit speed.
pub const BOSS_SPEED: f32 = 50.0;
/// Boss strength, used for optional contact damage.
pub const BOSS_STRENGTH: u32 = 40;
/// Every n-th wave brings a boss along with the hostiles.
pub const BOSS_WAVE_INTERVAL: u32 = 3;

/// Ticks during which a new melee attack is suppressed (200 ms).
pub const MELEE_WINDOW_TICKS: u64 = 12;
/// Lifetime of a melee hit volume in ticks (200 ms).
pub const MELEE_LIFESPAN_TICKS: u64 = 12;
/// Distance from the player at which the melee volume appears.
pub const MELEE_REACH: f32 = 20.0;
/// Spell projectile speed.
pub const SPELL_SPEED: f32 = 300.0;
/// Lifetime of a spell projectile in ticks (1000 ms).
pub const SPELL_LIFESPAN_TICKS: u64 = 60;
/// Ticks before another spell may be cast.
pub const SPELL_COOLDOWN_TICKS: u32 = 100;
/// Spell damage as a multiple of strength.
pub const SPELL_DAMAGE_MULTIPLIER: u32 = 2;

/// Speed of the push a hostile gives the player on contact.
pub const HOSTILE_KNOCKBACK: f32 = 400.0;
/// Speed of the push a boss gives the player on contact.
pub const BOSS_KNOCKBACK: f32 = 600.0;
/// Ticks after a contact hit during which further contact damage is ignored.
pub const CONTACT_GRACE_TICKS: u64 = 30;

/// Experience for killing a hostile.
pub const HOSTILE_XP: u32 = 10;
/// Experience for killing a boss.
pub const BOSS_XP: u32 = 50;
/// Gold for killing a boss.
pub const BOSS_GOLD: u32 = 100;
/// Chance that a killed hostile drops loot.
pub const LOOT_CHANCE: f64 = 0.3;
/// Gold for any pickup, whatever its value.
pub const PICKUP_GOLD: u32 = 10;
/// Experience for any pickup.
pub const PICKUP_XP: u32 = 5;

/// Experience needed to reach level 2.
pub const XP_TO_FIRST_LEVEL: f64 = 20.0;
/// Growth factor of the threshold per level.
pub const XP_CURVE: f64 = 1.5;
/// Maximum health gained per level.
pub const LEVEL_HEALTH_BONUS: u32 = 20;
/// Strength gained per level.
pub const LEVEL_STRENGTH_BONUS: u32 = 5;

/// Half extent of player, hostile, merchant, collectable and corpse boxes.
pub const ACTOR_HALF_EXTENT: f32 = 16.0;
/// Half extent of a boss box.
pub const BOSS_HALF_EXTENT: f32 = 32.0;
/// Half extent of an obstacle box.
pub const OBSTACLE_HALF_EXTENT: f32 = 8.0;
/// Half extent of melee and spell volumes.
pub const VOLUME_HALF_EXTENT: f32 = 12.0;
