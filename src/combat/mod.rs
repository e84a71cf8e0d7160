//! Combat resolution: attack input, attack volumes, damage and death.
//!
//! This module re-exports the attack triggers, the damage model and the
//! per-tick collision resolver, and defines the hook used to open trades with
//! merchants.

mod attack;
mod damage;
mod resolve;

pub use attack::{age_volumes, cool_down, try_melee, try_spell};
pub use damage::{apply_hit, HitOutcome};
pub use resolve::resolve_collisions;

use log::debug;

use crate::config::SimConfig;
use crate::entity::EntityId;

/// Receives trade requests raised when the player strikes a merchant.
#[cfg_attr(test, mockall::automock)]
pub trait TradeHandler {
    /// Called once per melee volume that reaches the merchant `npc`.
    fn open_trade(&mut self, npc: EntityId, name: &str);
}

/// Handler used when nobody listens for trades; requests are only logged.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoTrade;

impl TradeHandler for NoTrade {
    fn open_trade(&mut self, npc: EntityId, name: &str) {
        debug!("trade with {name} ({npc}) requested but no handler is installed");
    }
}

/// Combat switches taken from the session configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CombatRules {
    /// Chance that a slain hostile leaves loot.
    pub loot_chance: f64,
    /// Whether touching an enemy hurts the player.
    pub contact_damage: bool,
}

impl From<&SimConfig> for CombatRules {
    fn from(config: &SimConfig) -> Self {
        Self {
            loot_chance: config.loot_chance,
            contact_damage: config.contact_damage,
        }
    }
}

impl Default for CombatRules {
    fn default() -> Self {
        Self::from(&SimConfig::default())
    }
}
