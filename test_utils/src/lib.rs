//! Shared builders for skirmish tests.
//!
//! Tests start from an [`arena`]: a session whose world holds only the player
//! at the centre, seeded and with waves held back, so outcomes do not depend
//! on random generation. Entities are then placed relative to the player.

pub mod arena;

pub use arena::{
    arena, arena_with, face, hold, place_boss, place_chest, place_hostile, place_merchant,
    quiet_config, run,
};
