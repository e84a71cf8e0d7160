//! The bounded simulation space and its aggregate scalar state.
//!
//! A [`World`] owns the entity registry, the delayed-effect queue and every
//! per-session counter. Restarting a session discards the whole value.

use glam::Vec2;
use log::{debug, info};

use crate::components::{EntityKind, Facing, Health};
use crate::entity::{Attributes, Entity, EntityId};
use crate::progression::{LevelBonus, LevelUp, Progression};
use crate::registry::EntityRegistry;
use crate::scheduler::Scheduler;
use crate::{GRID_SPACING, PLAYER_HEALTH, PLAYER_SPEED, PLAYER_STRENGTH};

/// Cosmetic background grid laid out at generation time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    /// Distance between neighbouring lines.
    pub spacing: f32,
    /// Number of lines drawn along each axis.
    pub lines_per_axis: u32,
}

impl Grid {
    /// Lines every `spacing` units from zero up to, not including, `world_size`.
    #[must_use]
    pub const fn new(world_size: f32, spacing: f32) -> Self {
        let mut lines_per_axis = 0;
        let mut offset = 0.0;
        while offset < world_size {
            lines_per_axis += 1;
            offset += spacing;
        }
        Self {
            spacing,
            lines_per_axis,
        }
    }
}

/// Result of damaging the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerDamage {
    /// Player health after the hit.
    pub remaining: u32,
    /// True only for the hit that ended the session.
    pub fatal: bool,
}

/// Everything one session simulates.
#[derive(Debug)]
#[expect(
    clippy::struct_excessive_bools,
    reason = "Session flags are toggled independently by scheduled effects and the host."
)]
pub struct World {
    /// Every live entity, the player included.
    pub registry: EntityRegistry,
    /// The player's identifier; stable for the whole session.
    pub player: EntityId,
    /// Side length of the square play area.
    pub size: f32,
    /// Background grid.
    pub grid: Grid,
    /// Gold collected this session.
    pub gold: u32,
    /// Level and experience.
    pub progression: Progression,
    /// Ticks until the next spell may be cast.
    pub spell_cooldown: u32,
    /// Set while the melee window is open.
    pub attacking: bool,
    /// Set while contact damage is suppressed after a hit.
    pub contact_grace: bool,
    /// Set once the player's health reaches zero.
    pub is_game_over: bool,
    /// While set, ticks execute nothing.
    pub is_paused: bool,
    /// Number of executed ticks.
    pub tick: u64,
    /// Number of hostile waves spawned so far.
    pub wave: u32,
    /// Delayed effects keyed by tick.
    pub scheduler: Scheduler,
    bonus: LevelBonus,
}

impl World {
    /// Creates a world of side `size` holding only the player at its centre.
    ///
    /// # Examples
    /// ```
    /// use skirmish::world::World;
    /// let world = World::new(1920.0);
    /// let player = world.player_entity().expect("player exists");
    /// assert_eq!(player.position.x, 960.0);
    /// assert_eq!(player.health.map(|h| h.current), Some(100));
    /// ```
    #[must_use]
    pub fn new(size: f32) -> Self {
        let mut registry = EntityRegistry::new();
        let centre = Vec2::splat(size / 2.0);
        let player = registry.spawn(
            EntityKind::Player,
            Attributes::at(centre)
                .with_health(PLAYER_HEALTH)
                .with_speed(PLAYER_SPEED)
                .with_strength(PLAYER_STRENGTH)
                .facing(Facing::Down),
        );
        debug!("player {player} spawned at {centre}");
        Self {
            registry,
            player,
            size,
            grid: Grid::new(size, GRID_SPACING),
            gold: 0,
            progression: Progression::default(),
            spell_cooldown: 0,
            attacking: false,
            contact_grace: false,
            is_game_over: false,
            is_paused: false,
            tick: 0,
            wave: 0,
            scheduler: Scheduler::new(),
            bonus: LevelBonus::default(),
        }
    }

    /// The player, unless the registry lost it.
    #[must_use]
    pub fn player_entity(&self) -> Option<&Entity> {
        self.registry.get(self.player)
    }

    /// Mutable counterpart of [`player_entity`](Self::player_entity).
    pub fn player_entity_mut(&mut self) -> Option<&mut Entity> {
        self.registry.get_mut(self.player)
    }

    /// Where the player stands; the world centre if it is missing.
    #[must_use]
    pub fn player_position(&self) -> Vec2 {
        self.player_entity()
            .map_or(Vec2::splat(self.size / 2.0), |p| p.position)
    }

    /// The player's health; empty if it is missing.
    #[must_use]
    pub fn player_health(&self) -> Health {
        self.player_entity()
            .and_then(|p| p.health)
            .unwrap_or(Health::full(0))
    }

    /// The player's melee damage.
    #[must_use]
    pub fn player_strength(&self) -> u32 {
        self.player_entity().map_or(0, |p| p.strength)
    }

    /// Clamps `position` into the world square.
    #[must_use]
    pub fn clamp(&self, position: Vec2) -> Vec2 {
        position.clamp(Vec2::ZERO, Vec2::splat(self.size))
    }

    /// Adds experience, applying the level bonus to the player on a level-up.
    pub fn grant_xp(&mut self, amount: u32) -> Option<LevelUp> {
        let up = self.progression.grant(amount)?;
        let bonus = self.bonus;
        if let Some(player) = self.player_entity_mut() {
            if let Some(health) = player.health.as_mut() {
                health.raise_and_refill(bonus.max_health);
            }
            player.strength = player.strength.saturating_add(bonus.strength);
        }
        Some(up)
    }

    /// Adds `amount` to the purse.
    pub const fn add_gold(&mut self, amount: u32) {
        self.gold = self.gold.saturating_add(amount);
    }

    /// Removes `amount` health from the player, ending the session at zero.
    ///
    /// Damage after the session ended is ignored.
    pub fn damage_player(&mut self, amount: u32) -> PlayerDamage {
        if self.is_game_over {
            return PlayerDamage {
                remaining: 0,
                fatal: false,
            };
        }
        let remaining = self
            .player_entity_mut()
            .and_then(|p| p.health.as_mut())
            .map_or(0, |health| health.take(amount));
        let fatal = remaining == 0;
        if fatal {
            self.is_game_over = true;
            if let Some(player) = self.player_entity_mut() {
                player.velocity = Vec2::ZERO;
            }
            info!("player died on tick {}; game over", self.tick);
        }
        PlayerDamage { remaining, fatal }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn world() -> World {
        World::new(1920.0)
    }

    #[rstest]
    fn grid_counts_lines_per_axis(world: World) {
        assert_eq!(world.grid.lines_per_axis, 30);
    }

    #[rstest]
    fn level_up_heals_and_strengthens(mut world: World) {
        world.damage_player(60);
        let up = world.grant_xp(20).expect("level up");
        assert_eq!(up.level, 2);
        assert_eq!(world.player_health(), Health::full(120));
        assert_eq!(world.player_strength(), 25);
        assert_eq!(world.progression.xp, 0);
    }

    #[rstest]
    fn fatal_damage_ends_the_session_once(mut world: World) {
        let first = world.damage_player(70);
        assert_eq!(
            first,
            PlayerDamage {
                remaining: 30,
                fatal: false
            }
        );
        let second = world.damage_player(500);
        assert!(second.fatal);
        assert!(world.is_game_over);
        assert_eq!(world.player_health().current, 0);
        assert!(!world.damage_player(5).fatal);
    }

    #[rstest]
    fn clamp_keeps_positions_inside(world: World) {
        assert_eq!(world.clamp(Vec2::new(-5.0, 2000.0)), Vec2::new(0.0, 1920.0));
    }
}
