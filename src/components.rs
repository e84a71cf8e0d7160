//! Data carried by simulated entities.
//! Includes health bookkeeping, facing, lifecycle state, and the per-kind payloads.
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::entity::EntityId;

/// Hit points of a destructible entity.
///
/// Arithmetic saturates at zero so stored health is never negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    /// Points left; never above `max`.
    pub current: u32,
    /// Pool size after the last level-up.
    pub max: u32,
}

impl Health {
    /// Creates a fully healed pool of `max` points.
    #[must_use]
    pub const fn full(max: u32) -> Self {
        Self { current: max, max }
    }

    /// Removes `amount` points, clamping at zero, and returns what remains.
    pub const fn take(&mut self, amount: u32) -> u32 {
        self.current = self.current.saturating_sub(amount);
        self.current
    }

    /// Raises the maximum by `bonus` and refills the pool.
    pub const fn raise_and_refill(&mut self, bonus: u32) {
        self.max = self.max.saturating_add(bonus);
        self.current = self.max;
    }

    /// Whether no points are left.
    #[must_use]
    pub const fn is_depleted(&self) -> bool {
        self.current == 0
    }
}

/// Cardinal direction an actor is facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facing {
    /// Towards negative y.
    Up,
    /// Towards positive y; the spawn facing.
    #[default]
    Down,
    /// Towards negative x.
    Left,
    /// Towards positive x.
    Right,
}

impl Facing {
    /// Returns a vector of length `magnitude` pointing this way.
    ///
    /// The world uses screen coordinates, so `Up` points towards negative y.
    ///
    /// # Examples
    /// ```
    /// use glam::Vec2;
    /// use skirmish::components::Facing;
    /// assert_eq!(Facing::Up.offset(20.0), Vec2::new(0.0, -20.0));
    /// assert_eq!(Facing::Right.offset(5.0), Vec2::new(5.0, 0.0));
    /// ```
    #[must_use]
    pub const fn offset(self, magnitude: f32) -> Vec2 {
        match self {
            Self::Up => Vec2::new(0.0, -magnitude),
            Self::Down => Vec2::new(0.0, magnitude),
            Self::Left => Vec2::new(-magnitude, 0.0),
            Self::Right => Vec2::new(magnitude, 0.0),
        }
    }
}

/// Lifecycle of a combat actor. There is no transition back to `Alive`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum LifeState {
    /// Can be hit.
    #[default]
    Alive,
    /// Health reached zero this tick; death effects are firing.
    Dying,
    /// Death effects fired and the actor left the combat groups.
    Removed,
}

/// An attack volume spawned by the player.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Projectile {
    /// Damage dealt to the first enemy struck.
    pub damage: u32,
    /// The player that spawned the volume.
    pub owner: EntityId,
    /// Ticks left before the volume expires on its own.
    pub ticks_left: u64,
    /// Spells travel and pass through merchants; melee volumes stay put.
    pub is_spell: bool,
}

/// Where a collectable came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CollectableSource {
    /// Placed during world generation.
    Chest,
    /// Dropped by a slain enemy.
    Loot,
}

/// A chest or loot drop the player collects by touching it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Collectable {
    /// Gold value shown to the player; pickups pay a fixed amount.
    pub value: u32,
    /// Chest or loot.
    pub source: CollectableSource,
}

/// Cosmetic description of a placed obstacle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Obstacle {
    /// Row of the obstacle table this was drawn from.
    pub type_name: String,
    /// Mirrored horizontally.
    pub flipped: bool,
    /// Sprite scale.
    pub scale: f32,
    /// Whether the obstacle belongs to a generated cluster.
    pub clustered: bool,
}

/// Kind-specific payload of an [`Entity`](crate::entity::Entity).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum EntityKind {
    /// The local player.
    Player,
    /// A pursuing enemy.
    Hostile {
        /// Row of the enemy table it was spawned from.
        type_name: String,
    },
    /// A pursuing enemy that loses one point per hit.
    Boss,
    /// Melee or spell attack volume.
    Projectile(Projectile),
    /// Chest or loot.
    Collectable(Collectable),
    /// Blocks the player and absorbs attack volumes.
    Obstacle(Obstacle),
    /// Inert remains of a slain enemy.
    Corpse {
        /// Whether the remains are a boss's.
        boss: bool,
    },
    /// Inert merchant that opens a trade when struck.
    Npc {
        /// Name shown on the trade screen.
        name: String,
    },
}

impl EntityKind {
    /// Payload-free tag of this kind.
    #[must_use]
    pub const fn kind(&self) -> Kind {
        match self {
            Self::Player => Kind::Player,
            Self::Hostile { .. } => Kind::Hostile,
            Self::Boss => Kind::Boss,
            Self::Projectile(_) => Kind::Projectile,
            Self::Collectable(_) => Kind::Collectable,
            Self::Obstacle(_) => Kind::Obstacle,
            Self::Corpse { .. } => Kind::Corpse,
            Self::Npc { .. } => Kind::Npc,
        }
    }
}

/// Payload-free tag used for registry queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[expect(missing_docs, reason = "Each tag mirrors the EntityKind variant of the same name.")]
pub enum Kind {
    Player,
    Hostile,
    Boss,
    Projectile,
    Collectable,
    Obstacle,
    Corpse,
    Npc,
}

impl Kind {
    /// Hostiles and bosses: the kinds that pursue the player and take hits.
    #[must_use]
    pub const fn is_enemy(self) -> bool {
        matches!(self, Self::Hostile | Self::Boss)
    }
}
