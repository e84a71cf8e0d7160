//! Tick orchestration.
//!
//! [`GameLoop`] owns the [`World`], the session RNG, presence sync and the
//! trade hook, and advances them one frame per [`GameLoop::tick`]. Each
//! executed tick runs, in order: presence hand-off, due delayed effects,
//! steering and pursuit, attack triggers, integration, collision resolution,
//! volume ageing and wave scheduling. Observers read state through
//! [`GameLoop::snapshot`] or receive one [`Snapshot`] per tick from
//! [`GameLoop::subscribe`].

use crossbeam::channel::{self, Receiver, Sender, TrySendError};
use glam::Vec2;
use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::combat::{
    age_volumes, cool_down, resolve_collisions, try_melee, try_spell, CombatRules, NoTrade,
    TradeHandler,
};
use crate::components::Kind;
use crate::config::{ConfigError, SimConfig};
use crate::entity::EntityId;
use crate::events::GameEvent;
use crate::movement::{integrate, pursue_player, steer_player, Controls};
use crate::presence::{PositionUpdate, PresenceSync, TransportLink};
use crate::scheduler::Effect;
use crate::spawner::{self, Layout};
use crate::world::{PlayerDamage, World};
use crate::FRAME_SECONDS;

/// Identifier used for the local player until a transport connects.
const OFFLINE_ID: &str = "local";

/// What one call to [`GameLoop::tick`] produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TickReport {
    /// Set when the player moved this tick; also sent to the transport.
    pub position_update: Option<PositionUpdate>,
    /// Everything noteworthy that happened, in order.
    pub events: Vec<GameEvent>,
}

/// Read-only view of the session for HUDs and overlays.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    /// Player position, horizontal.
    pub x: f32,
    /// Player position, vertical.
    pub y: f32,
    /// Player health.
    pub health: u32,
    /// Player health pool.
    pub max_health: u32,
    /// Player melee damage.
    pub strength: u32,
    /// Player level.
    pub level: u32,
    /// Experience towards the next level.
    pub xp: u32,
    /// Experience the next level needs.
    pub xp_to_next: f64,
    /// Gold collected.
    pub gold: u32,
    /// Ticks until a spell may be cast.
    pub spell_cooldown: u32,
    /// Whether the melee window is open.
    pub attacking: bool,
    /// Whether the session is paused.
    pub paused: bool,
    /// Whether the player has died.
    pub game_over: bool,
    /// Executed ticks.
    pub tick: u64,
    /// Waves spawned.
    pub wave: u32,
    /// Live hostiles.
    pub hostiles: usize,
    /// Live bosses.
    pub bosses: usize,
    /// Remote participants mirrored.
    pub mirrors: usize,
}

/// One game session: the world, its configuration and everything that feeds
/// it between ticks.
pub struct GameLoop {
    world: World,
    config: SimConfig,
    rules: CombatRules,
    rng: ChaCha8Rng,
    presence: PresenceSync,
    trade: Box<dyn TradeHandler + Send + Sync>,
    subscribers: Vec<Sender<Snapshot>>,
    spell_held: bool,
    layout: Layout,
}

impl GameLoop {
    /// Validates `config` and generates a fresh world.
    ///
    /// # Errors
    /// Returns the validation error when `config` is unusable.
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        let mut sim = Self::bare(config)?;
        sim.layout = spawner::generate(&mut sim.world, &sim.config, &mut sim.rng);
        Ok(sim)
    }

    /// Builds a loop whose world holds only the player.
    ///
    /// # Errors
    /// Returns the validation error when `config` is unusable.
    #[cfg(any(test, feature = "test-support"))]
    pub fn empty(config: SimConfig) -> Result<Self, ConfigError> {
        Self::bare(config)
    }

    fn bare(config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(|| rand::rng().random());
        info!("starting session with seed {seed}");
        let (presence, _link) = PresenceSync::new(OFFLINE_ID);
        Ok(Self {
            world: World::new(config.world_size),
            rules: CombatRules::from(&config),
            config,
            rng: ChaCha8Rng::seed_from_u64(seed),
            presence,
            trade: Box::new(NoTrade),
            subscribers: Vec::new(),
            spell_held: false,
            layout: Layout::default(),
        })
    }

    /// Advances the simulation by one frame under `controls`.
    ///
    /// Queued presence events are applied first, even while paused or after
    /// game over; nothing else happens in those states.
    pub fn tick(&mut self, controls: Controls) -> TickReport {
        self.presence.pump();
        let spell_pressed = controls.spell && !self.spell_held;
        self.spell_held = controls.spell;
        if self.world.is_paused || self.world.is_game_over {
            return TickReport::default();
        }

        let mut events = Vec::new();
        self.world.tick += 1;
        for effect in self.world.scheduler.drain_due(self.world.tick) {
            self.apply_effect(effect, &mut events);
        }

        steer_player(&mut self.world, controls);
        pursue_player(&mut self.world);
        try_melee(&mut self.world, controls.attack, &mut events);
        try_spell(&mut self.world, spell_pressed, &mut events);
        cool_down(&mut self.world);
        integrate(&mut self.world, FRAME_SECONDS);
        resolve_collisions(
            &mut self.world,
            self.rules,
            &mut self.rng,
            self.trade.as_mut(),
            &mut events,
        );

        if !self.world.is_game_over {
            age_volumes(&mut self.world);
            self.world.registry.flush();
            self.schedule_next_wave();
        }

        let position_update = self
            .world
            .player_entity()
            .filter(|player| player.velocity != Vec2::ZERO)
            .map(|player| PositionUpdate::from(player.position));
        if let Some(update) = position_update {
            self.presence.publish(update);
        }
        self.publish_snapshot();
        TickReport {
            position_update,
            events,
        }
    }

    fn apply_effect(&mut self, effect: Effect, events: &mut Vec<GameEvent>) {
        match effect {
            Effect::EndMeleeWindow => self.world.attacking = false,
            Effect::EndContactGrace => self.world.contact_grace = false,
            Effect::SpawnWave => {
                let wave = spawner::spawn_wave(&mut self.world, &self.config, &mut self.rng);
                events.push(GameEvent::WaveSpawned {
                    wave: wave.number,
                    hostiles: u32::try_from(wave.hostiles.len()).unwrap_or(u32::MAX),
                    boss: wave.boss.is_some(),
                });
            }
        }
    }

    fn schedule_next_wave(&mut self) {
        if self.world.registry.enemies().is_empty()
            && !self.world.scheduler.is_pending(Effect::SpawnWave)
        {
            debug!(
                "wave {} cleared on tick {}; next in {} ticks",
                self.world.wave, self.world.tick, self.config.wave_delay_ticks
            );
            self.world.scheduler.after(
                self.world.tick,
                self.config.wave_delay_ticks,
                Effect::SpawnWave,
            );
        }
    }

    /// Freezes the tick loop without touching world state.
    pub fn pause(&mut self) {
        if !self.world.is_paused {
            debug!("paused on tick {}", self.world.tick);
        }
        self.world.is_paused = true;
    }

    /// Lets ticks execute again.
    pub fn resume(&mut self) {
        if self.world.is_paused {
            debug!("resumed on tick {}", self.world.tick);
        }
        self.world.is_paused = false;
    }

    /// Discards the world and generates a new one.
    ///
    /// Presence mirrors, subscribers and the trade hook survive a restart.
    pub fn restart(&mut self) {
        info!(
            "restarting after {} ticks at level {}",
            self.world.tick, self.world.progression.level
        );
        self.world = World::new(self.config.world_size);
        self.layout = spawner::generate(&mut self.world, &self.config, &mut self.rng);
        self.spell_held = false;
        self.publish_snapshot();
    }

    /// Damages the player from outside the simulation, e.g. a battle overlay.
    ///
    /// Ignored once the game is over.
    pub fn damage_player(&mut self, amount: u32) -> PlayerDamage {
        let outcome = self.world.damage_player(amount);
        debug!(
            "external damage {amount}, {} health left",
            outcome.remaining
        );
        outcome
    }

    /// Spawns a boss immediately, unless the game is over.
    pub fn spawn_boss(&mut self) -> Option<EntityId> {
        if self.world.is_game_over {
            return None;
        }
        Some(spawner::spawn_boss(
            &mut self.world,
            &self.config,
            &mut self.rng,
        ))
    }

    /// Installs the handler notified when the player strikes a merchant.
    pub fn set_trade_handler(&mut self, handler: impl TradeHandler + Send + Sync + 'static) {
        self.trade = Box::new(handler);
    }

    /// Connects a transport as participant `local_id`, replacing any previous
    /// connection and its mirrors.
    pub fn connect(&mut self, local_id: impl Into<String>) -> TransportLink {
        let (presence, link) = PresenceSync::new(local_id);
        self.presence = presence;
        link
    }

    /// Current HUD values.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        let health = self.world.player_health();
        let position = self.world.player_position();
        let progression = self.world.progression;
        Snapshot {
            x: position.x,
            y: position.y,
            health: health.current,
            max_health: health.max,
            strength: self.world.player_strength(),
            level: progression.level,
            xp: progression.xp,
            xp_to_next: progression.xp_to_next,
            gold: self.world.gold,
            spell_cooldown: self.world.spell_cooldown,
            attacking: self.world.attacking,
            paused: self.world.is_paused,
            game_over: self.world.is_game_over,
            tick: self.world.tick,
            wave: self.world.wave,
            hostiles: self.world.registry.count(Kind::Hostile),
            bosses: self.world.registry.count(Kind::Boss),
            mirrors: self.presence.mirrors().len(),
        }
    }

    /// Returns a receiver that gets a snapshot after every executed tick.
    ///
    /// The channel holds one snapshot. A subscriber that falls behind misses
    /// the snapshots published while its slot is full. Dropping the receiver
    /// unsubscribes it.
    pub fn subscribe(&mut self) -> Receiver<Snapshot> {
        let (tx, rx) = channel::bounded(1);
        self.subscribers.push(tx);
        rx
    }

    fn publish_snapshot(&mut self) {
        if self.subscribers.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        self.subscribers.retain(|subscriber| {
            !matches!(
                subscriber.try_send(snapshot.clone()),
                Err(TrySendError::Disconnected(_))
            )
        });
    }

    /// The simulated world.
    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// Direct access for test setups.
    #[cfg(any(test, feature = "test-support"))]
    pub const fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// The validated configuration in use.
    #[must_use]
    pub const fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Remote participant mirrors.
    #[must_use]
    pub const fn presence(&self) -> &PresenceSync {
        &self.presence
    }

    /// Counts placed by the most recent world generation.
    #[must_use]
    pub const fn layout(&self) -> Layout {
        self.layout
    }
}
