//! Wire shapes exchanged with the multiplayer transport.
//!
//! Inbound events use the transport's own event names as tags and nest
//! coordinates under `position`, so a payload such as
//! `{"type":"playerMoved","data":{"id":"a","position":{"x":1,"y":2}}}`
//! decodes directly. Missing positions decode as best-effort defaults rather
//! than failing the whole event.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A point as the transport encodes it: `{"x": .., "y": ..}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WirePosition {
    /// Horizontal world coordinate.
    pub x: f32,
    /// Vertical world coordinate.
    pub y: f32,
}

impl From<Vec2> for WirePosition {
    fn from(position: Vec2) -> Self {
        Self {
            x: position.x,
            y: position.y,
        }
    }
}

impl From<WirePosition> for Vec2 {
    fn from(position: WirePosition) -> Self {
        Self::new(position.x, position.y)
    }
}

/// Local player position published at most once per tick while moving.
///
/// Serialises flat, matching the transport's `updatePosition` payload.
pub type PositionUpdate = WirePosition;

/// Another participant of the room as announced by the transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemotePlayer {
    /// Transport-assigned participant id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Defaults to the origin when the transport omits it.
    #[serde(default)]
    pub position: WirePosition,
}

impl RemotePlayer {
    /// The announced position as a world vector.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position.into()
    }
}

/// Position change of a remote participant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerMoved {
    /// Participant that moved.
    pub id: String,
    /// `None` when the transport sent no usable position.
    #[serde(default)]
    pub position: Option<WirePosition>,
}

/// Event delivered by the transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum PresenceEvent {
    /// Full room membership, sent on (re)join.
    RoomState(Vec<RemotePlayer>),
    /// A participant entered the room.
    PlayerJoined(RemotePlayer),
    /// Identifier of the participant that left.
    PlayerLeft(String),
    /// A participant's new position.
    PlayerMoved(PlayerMoved),
}

impl PresenceEvent {
    /// Decodes one transport payload.
    ///
    /// # Errors
    /// Returns the decoding error for payloads that are not a known event.
    ///
    /// # Examples
    /// ```
    /// use skirmish::presence::PresenceEvent;
    /// let event = PresenceEvent::from_json(r#"{"type":"playerLeft","data":"a"}"#).unwrap();
    /// assert_eq!(event, PresenceEvent::PlayerLeft("a".into()));
    /// ```
    pub fn from_json(payload: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(payload)
    }
}
