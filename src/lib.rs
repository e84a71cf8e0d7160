#![cfg_attr(docsrs, feature(doc_cfg))]
//! Simulation core of a top-down 2D action game.
//!
//! A [`GameLoop`] advances a bounded [`World`](world::World) one frame at a
//! time: the player steers and attacks, hostiles and bosses chase the player,
//! attack volumes damage enemies, and kills feed gold and experience into the
//! level curve. Other room participants are mirrored through
//! [`presence`]. The [`SimulationPlugin`] runs the loop inside a Bevy app.
pub mod combat;
pub mod components;
pub mod config;
pub mod constants;
pub mod entity;
pub mod events;
pub mod game_loop;
pub mod logging;
pub mod movement;
pub mod plugin;
pub mod presence;
pub mod progression;
pub mod registry;
pub mod scheduler;
pub mod spawner;
pub mod vector_math;
pub mod world;
pub use constants::*;

// Re-export commonly used items
pub use components::{EntityKind, Facing, Health, Kind};
pub use config::{ConfigError, SimConfig};
pub use entity::{Entity, EntityId};
pub use events::GameEvent;
pub use game_loop::{GameLoop, Snapshot, TickReport};
pub use logging::init as init_logging;
pub use movement::Controls;
pub use plugin::{SimulationError, SimulationPlugin};
pub use presence::{PositionUpdate, PresenceEvent, PresenceSync, TransportLink};

pub mod prelude {
    //! Prelude exports used in documentation examples.
    //!
    //! ```rust,no_run
    //! use skirmish::prelude::*;
    //! ```

    pub use crate::combat::TradeHandler;
    pub use crate::Controls;
    pub use crate::GameEvent;
    pub use crate::GameLoop;
    pub use crate::SimConfig;
    pub use crate::SimulationPlugin;
    pub use crate::Snapshot;
}
