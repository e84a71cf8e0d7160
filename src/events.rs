//! Notifications produced while a tick executes.
//!
//! Events are reported back to the caller of
//! [`GameLoop::tick`](crate::game_loop::GameLoop::tick) for HUD updates,
//! sound cues and logging. They carry no authority; the world state is
//! already updated when they are emitted.

use serde::Serialize;

use crate::entity::EntityId;

/// Something noteworthy that happened during a tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
#[expect(
    missing_docs,
    reason = "Payload fields are named for what they carry; the variant docs cover them."
)]
pub enum GameEvent {
    /// The player swung; `volume` is the melee hit box.
    MeleeStarted { volume: EntityId },
    /// The player cast a spell projectile.
    SpellCast { projectile: EntityId },
    /// An attack volume struck an enemy.
    Hit {
        target: EntityId,
        damage: u32,
        remaining: u32,
    },
    /// A hostile died and left a corpse.
    HostileKilled { target: EntityId },
    /// A boss died and left a corpse.
    BossKilled { target: EntityId },
    /// A slain hostile left a collectable behind.
    LootDropped { collectable: EntityId },
    /// The player picked up `value` gold, bringing the purse to `gold`.
    Collected { value: u32, gold: u32 },
    /// An enemy touched the player.
    PlayerHurt {
        by: EntityId,
        damage: u32,
        remaining: u32,
    },
    /// The player reached `level`.
    LevelUp { level: u32 },
    /// A new wave entered the world.
    WaveSpawned {
        wave: u32,
        hostiles: u32,
        boss: bool,
    },
    /// A melee swing reached a merchant.
    TradeRequested { npc: EntityId, name: String },
    /// The player's health reached zero.
    GameOver,
}
