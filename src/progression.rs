//! Experience and level tracking.

use log::info;
use serde::Serialize;

use crate::{LEVEL_HEALTH_BONUS, LEVEL_STRENGTH_BONUS, XP_CURVE, XP_TO_FIRST_LEVEL};

/// Outcome of crossing an experience threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LevelUp {
    /// The level just reached.
    pub level: u32,
    /// Experience needed for the one after.
    pub xp_to_next: f64,
}

/// Experience state of the local player.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Progression {
    /// Current level, starting at one.
    pub level: u32,
    /// Experience gathered since the last level-up.
    pub xp: u32,
    /// Threshold for the next level. Grows geometrically and is never capped.
    pub xp_to_next: f64,
}

impl Default for Progression {
    fn default() -> Self {
        Self {
            level: 1,
            xp: 0,
            xp_to_next: XP_TO_FIRST_LEVEL,
        }
    }
}

impl Progression {
    /// Adds `amount` experience and levels up when the threshold is reached.
    ///
    /// A level-up resets experience to zero rather than carrying the surplus,
    /// so a single grant can cross at most one threshold.
    ///
    /// # Examples
    /// ```
    /// use skirmish::progression::Progression;
    /// let mut progression = Progression::default();
    /// assert!(progression.grant(15).is_none());
    /// let up = progression.grant(5).expect("20 xp reaches level 2");
    /// assert_eq!(up.level, 2);
    /// assert_eq!(progression.xp, 0);
    /// assert!((progression.xp_to_next - 30.0).abs() < f64::EPSILON);
    /// ```
    pub fn grant(&mut self, amount: u32) -> Option<LevelUp> {
        self.xp = self.xp.saturating_add(amount);
        if f64::from(self.xp) < self.xp_to_next {
            return None;
        }
        self.level += 1;
        self.xp = 0;
        self.xp_to_next *= XP_CURVE;
        info!(
            "reached level {} (next at {} xp)",
            self.level, self.xp_to_next
        );
        Some(LevelUp {
            level: self.level,
            xp_to_next: self.xp_to_next,
        })
    }
}

/// Player stat increases granted per level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelBonus {
    /// Added to maximum health.
    pub max_health: u32,
    /// Added to melee damage.
    pub strength: u32,
}

impl Default for LevelBonus {
    fn default() -> Self {
        Self {
            max_health: LEVEL_HEALTH_BONUS,
            strength: LEVEL_STRENGTH_BONUS,
        }
    }
}
