//! Damage applied to enemies by attack volumes.

use crate::components::{Kind, LifeState};
use crate::entity::Entity;

/// What a single hit did to its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// The target was already dead or cannot be damaged.
    Ignored,
    /// The target survived with `remaining` health.
    Wounded {
        /// Points actually removed.
        damage: u32,
        /// Health left.
        remaining: u32,
    },
    /// Health reached zero; the target is now [`LifeState::Dying`].
    Killed {
        /// Points actually removed.
        damage: u32,
    },
}

/// Applies an attack of `damage` to `target`.
///
/// Bosses lose exactly one health point per hit whatever the attack's damage.
/// A target already dying or removed is left untouched, so death effects can
/// only be triggered once.
pub fn apply_hit(target: &mut Entity, damage: u32) -> HitOutcome {
    if !target.is_alive() {
        return HitOutcome::Ignored;
    }
    let dealt = if target.tag() == Kind::Boss { 1 } else { damage };
    let Some(health) = target.health.as_mut() else {
        return HitOutcome::Ignored;
    };
    let remaining = health.take(dealt);
    if remaining == 0 {
        target.life = LifeState::Dying;
        HitOutcome::Killed { damage: dealt }
    } else {
        HitOutcome::Wounded {
            damage: dealt,
            remaining,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::EntityKind;
    use crate::entity::{Attributes, EntityId};
    use glam::Vec2;
    use rstest::rstest;

    fn enemy(kind: EntityKind, health: u32) -> Entity {
        Entity::new(EntityId(7), kind, Attributes::at(Vec2::ZERO).with_health(health))
    }

    fn skeleton(health: u32) -> Entity {
        enemy(
            EntityKind::Hostile {
                type_name: "Skeleton".to_owned(),
            },
            health,
        )
    }

    #[rstest]
    #[case(100, 20, HitOutcome::Wounded { damage: 20, remaining: 80 })]
    #[case(20, 20, HitOutcome::Killed { damage: 20 })]
    #[case(10, 40, HitOutcome::Killed { damage: 40 })]
    fn hostiles_take_the_full_damage(
        #[case] health: u32,
        #[case] damage: u32,
        #[case] expected: HitOutcome,
    ) {
        let mut target = skeleton(health);
        assert_eq!(apply_hit(&mut target, damage), expected);
    }

    #[rstest]
    #[case(1)]
    #[case(20)]
    #[case(500)]
    fn bosses_lose_one_point_per_hit(#[case] damage: u32) {
        let mut boss = enemy(EntityKind::Boss, 10);
        assert_eq!(
            apply_hit(&mut boss, damage),
            HitOutcome::Wounded {
                damage: 1,
                remaining: 9
            }
        );
    }

    #[rstest]
    fn boss_dies_on_its_tenth_hit() {
        let mut boss = enemy(EntityKind::Boss, 10);
        for _ in 0..9 {
            assert!(matches!(
                apply_hit(&mut boss, 100),
                HitOutcome::Wounded { .. }
            ));
        }
        assert_eq!(apply_hit(&mut boss, 100), HitOutcome::Killed { damage: 1 });
        assert_eq!(boss.life, LifeState::Dying);
    }

    #[rstest]
    fn dying_targets_ignore_further_hits() {
        let mut target = skeleton(5);
        assert!(matches!(apply_hit(&mut target, 5), HitOutcome::Killed { .. }));
        assert_eq!(apply_hit(&mut target, 5), HitOutcome::Ignored);
        assert_eq!(target.health.map(|h| h.current), Some(0));
    }
}
