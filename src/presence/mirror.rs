//! Inert mirrors of remote participants.

use glam::Vec2;
use hashbrown::HashMap;
use log::{debug, warn};

use super::message::{PlayerMoved, PresenceEvent, RemotePlayer};

/// Last known state of a remote participant.
#[derive(Debug, Clone, PartialEq)]
pub struct Mirror {
    /// Transport-assigned participant id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Last reported position.
    pub position: Vec2,
}

impl From<RemotePlayer> for Mirror {
    fn from(player: RemotePlayer) -> Self {
        let position = player.position();
        Self {
            id: player.id,
            name: player.name,
            position,
        }
    }
}

/// Mirrors keyed by participant id, never containing the local player.
#[derive(Debug, Default)]
pub struct MirrorSet {
    local_id: String,
    mirrors: HashMap<String, Mirror>,
}

impl MirrorSet {
    /// An empty set that ignores events about `local_id`.
    #[must_use]
    pub fn new(local_id: impl Into<String>) -> Self {
        Self {
            local_id: local_id.into(),
            mirrors: HashMap::new(),
        }
    }

    /// The local participant's id.
    #[must_use]
    pub fn local_id(&self) -> &str {
        &self.local_id
    }

    /// Applies one transport event.
    pub fn apply(&mut self, event: PresenceEvent) {
        match event {
            PresenceEvent::RoomState(players) => {
                self.mirrors.clear();
                for player in players {
                    self.upsert(player);
                }
                debug!("room state applied: {} remote players", self.mirrors.len());
            }
            PresenceEvent::PlayerJoined(player) => {
                debug!("player {} ({}) joined", player.name, player.id);
                self.upsert(player);
            }
            PresenceEvent::PlayerLeft(id) => {
                if self.mirrors.remove(&id).is_some() {
                    debug!("player {id} left");
                }
            }
            PresenceEvent::PlayerMoved(moved) => self.move_mirror(moved),
        }
    }

    fn upsert(&mut self, player: RemotePlayer) {
        if player.id == self.local_id {
            return;
        }
        self.mirrors.insert(player.id.clone(), Mirror::from(player));
    }

    fn move_mirror(&mut self, moved: PlayerMoved) {
        if moved.id == self.local_id {
            return;
        }
        let position = moved.position.map(Vec2::from);
        if let Some(mirror) = self.mirrors.get_mut(&moved.id) {
            let Some(to) = position else {
                warn!("move for player {} carried no position", moved.id);
                return;
            };
            mirror.position = to;
            return;
        }
        warn!("move for unknown player {}; treating it as a join", moved.id);
        self.mirrors.insert(
            moved.id.clone(),
            Mirror {
                name: moved.id.clone(),
                id: moved.id,
                position: position.unwrap_or_default(),
            },
        );
    }

    /// Mirror of participant `id`, if known.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Mirror> {
        self.mirrors.get(id)
    }

    /// Mirrors ordered by id.
    #[must_use]
    pub fn sorted(&self) -> Vec<&Mirror> {
        let mut mirrors: Vec<_> = self.mirrors.values().collect();
        mirrors.sort_unstable_by(|a, b| a.id.cmp(&b.id));
        mirrors
    }

    /// Number of mirrored participants.
    #[must_use]
    pub fn len(&self) -> usize {
        self.mirrors.len()
    }

    /// Whether nobody else is in the room.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mirrors.is_empty()
    }

    /// Forgets every mirror, as when leaving the room.
    pub fn clear(&mut self) {
        self.mirrors.clear();
    }
}
