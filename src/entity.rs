//! The universal simulated unit and its identity.
use std::fmt;

use glam::Vec2;
use serde::Serialize;

use crate::components::{EntityKind, Facing, Health, Kind, LifeState};
use crate::{ACTOR_HALF_EXTENT, BOSS_HALF_EXTENT, OBSTACLE_HALF_EXTENT, VOLUME_HALF_EXTENT};

/// Registry-assigned identifier. Identifiers are never reused within a world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct EntityId(pub u64);

impl EntityId {
    /// The raw counter value.
    #[must_use]
    pub const fn into_inner(self) -> u64 {
        self.0
    }
}

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Initial attributes supplied when spawning an entity.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Attributes {
    /// Centre of the hit box.
    pub position: Vec2,
    /// Units per second.
    pub velocity: Vec2,
    /// Top speed in units per second.
    pub speed: f32,
    /// Base melee damage.
    pub strength: u32,
    /// Direction the entity looks in.
    pub facing: Facing,
    /// `None` marks the entity as indestructible.
    pub health: Option<Health>,
}

impl Attributes {
    /// Attributes for an entity standing still at `position`.
    #[must_use]
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Gives the entity a full pool of `max` points.
    #[must_use]
    pub const fn with_health(mut self, max: u32) -> Self {
        self.health = Some(Health::full(max));
        self
    }

    /// Sets the top speed.
    #[must_use]
    pub const fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    /// Sets the base damage.
    #[must_use]
    pub const fn with_strength(mut self, strength: u32) -> Self {
        self.strength = strength;
        self
    }

    /// Sets the starting velocity.
    #[must_use]
    pub const fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    /// Sets the starting facing.
    #[must_use]
    pub const fn facing(mut self, facing: Facing) -> Self {
        self.facing = facing;
        self
    }
}

/// A live entity owned by the [`EntityRegistry`](crate::registry::EntityRegistry).
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    /// Registry-assigned identity.
    pub id: EntityId,
    /// Role and role-specific payload.
    pub kind: EntityKind,
    /// Centre of the hit box.
    pub position: Vec2,
    /// Units per second, applied by integration each tick.
    pub velocity: Vec2,
    /// Top speed in units per second.
    pub speed: f32,
    /// Base melee damage.
    pub strength: u32,
    /// Direction the entity looks in.
    pub facing: Facing,
    /// `None` for indestructible entities.
    pub health: Option<Health>,
    /// Alive, dying or removed.
    pub life: LifeState,
}

impl Entity {
    pub(crate) fn new(id: EntityId, kind: EntityKind, attrs: Attributes) -> Self {
        Self {
            id,
            kind,
            position: attrs.position,
            velocity: attrs.velocity,
            speed: attrs.speed,
            strength: attrs.strength,
            facing: attrs.facing,
            health: attrs.health,
            life: LifeState::Alive,
        }
    }

    /// Payload-free tag of [`kind`](Self::kind).
    #[must_use]
    pub const fn tag(&self) -> Kind {
        self.kind.kind()
    }

    /// Half the side length of this entity's square hit box.
    #[must_use]
    pub const fn half_extent(&self) -> f32 {
        match self.tag() {
            Kind::Boss => BOSS_HALF_EXTENT,
            Kind::Obstacle => OBSTACLE_HALF_EXTENT,
            Kind::Projectile => VOLUME_HALF_EXTENT,
            Kind::Player | Kind::Hostile | Kind::Collectable | Kind::Corpse | Kind::Npc => {
                ACTOR_HALF_EXTENT
            }
        }
    }

    /// Axis-aligned overlap test between two hit boxes.
    ///
    /// Boxes that merely touch along an edge do not overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        boxes_overlap(
            self.position,
            self.half_extent(),
            other.position,
            other.half_extent(),
        )
    }

    /// Whether this entity can still be damaged.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.life == LifeState::Alive && self.health.is_some_and(|h| !h.is_depleted())
    }
}

/// Overlap test for two centred square boxes.
///
/// # Examples
/// ```
/// use glam::Vec2;
/// use skirmish::entity::boxes_overlap;
/// assert!(boxes_overlap(Vec2::ZERO, 16.0, Vec2::new(20.0, 0.0), 8.0));
/// assert!(!boxes_overlap(Vec2::ZERO, 16.0, Vec2::new(24.0, 0.0), 8.0));
/// ```
#[must_use]
pub fn boxes_overlap(a: Vec2, a_half: f32, b: Vec2, b_half: f32) -> bool {
    let reach = a_half + b_half;
    let gap = (a - b).abs();
    gap.x < reach && gap.y < reach
}
