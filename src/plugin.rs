//! Bevy plugin driving the game loop once per frame.
//!
//! The plugin owns a [`GameLoop`] as a resource and ticks it from `Update`
//! with whatever [`PlayerControls`] the host wrote that frame. The most recent
//! [`TickReport`] is kept in [`LastTick`] for HUD systems to read.

use bevy::ecs::prelude::On;
use bevy::prelude::*;
use log::error;
use thiserror::Error;

use crate::config::SimConfig;
use crate::game_loop::{GameLoop, TickReport};
use crate::movement::Controls;

/// The running session.
#[derive(Resource)]
pub struct Simulation(pub GameLoop);

/// Input applied on the next tick.
#[derive(Resource, Default, Debug, Clone, Copy)]
pub struct PlayerControls(pub Controls);

/// Report of the most recent tick.
#[derive(Resource, Default, Debug, Clone)]
pub struct LastTick(pub TickReport);

/// Raised when the plugin cannot start a session.
///
/// An observer logs these with `error!` so failures stay visible even when
/// `bevy_log` is disabled.
#[derive(Event, Debug, Clone, Error)]
#[error("simulation setup failed: {detail}")]
pub struct SimulationError {
    /// Why the session could not start.
    pub detail: String,
}

impl SimulationError {
    /// Wraps a human-readable failure description.
    #[must_use]
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value for Events V2."
)]
fn log_simulation_error(event: On<SimulationError>) {
    error!("{}", event.event());
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
/// Advances the session by one tick and stores its report.
pub fn tick_simulation_system(
    mut simulation: ResMut<Simulation>,
    controls: Res<PlayerControls>,
    mut last: ResMut<LastTick>,
) {
    last.0 = simulation.0.tick(controls.0);
}

/// Installs the simulation resources and the per-frame tick system.
#[derive(Default)]
pub struct SimulationPlugin {
    /// Configuration the session is generated from.
    pub config: SimConfig,
}

impl SimulationPlugin {
    /// A plugin that will start a session from `config`.
    #[must_use]
    pub const fn new(config: SimConfig) -> Self {
        Self { config }
    }
}

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.add_observer(log_simulation_error);

        let game = match GameLoop::new(self.config.clone()) {
            Ok(game) => game,
            Err(e) => {
                app.world_mut().trigger(SimulationError::new(e.to_string()));
                return;
            }
        };

        app.insert_resource(Simulation(game));
        app.init_resource::<PlayerControls>();
        app.init_resource::<LastTick>();
        app.add_systems(Update, tick_simulation_system);
    }
}
