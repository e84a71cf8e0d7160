//! Presence sync: mirrors of other room participants and the local player's
//! outbound position stream.
//!
//! The transport may live on another thread. It pushes [`PresenceEvent`]s
//! through a [`TransportLink`]; the tick loop drains them with
//! [`PresenceSync::pump`] before simulating, so the mirror set never changes
//! in the middle of a tick. Mirrors carry no combat semantics.

mod inbox;
mod message;
mod mirror;

pub use inbox::{PresenceInbox, TransportLink};
pub use message::{PlayerMoved, PositionUpdate, PresenceEvent, RemotePlayer, WirePosition};
pub use mirror::{Mirror, MirrorSet};

use log::trace;

/// Mirror set plus the simulation end of the transport channels.
#[derive(Debug)]
pub struct PresenceSync {
    mirrors: MirrorSet,
    inbox: PresenceInbox,
}

impl PresenceSync {
    /// Creates the component for the local participant `local_id`, plus the
    /// link handed to the transport.
    ///
    /// # Examples
    /// ```
    /// use skirmish::presence::{PresenceEvent, PresenceSync, RemotePlayer, WirePosition};
    ///
    /// let (mut presence, link) = PresenceSync::new("me");
    /// link.inbound
    ///     .send(PresenceEvent::PlayerJoined(RemotePlayer {
    ///         id: "a".into(),
    ///         name: "Ada".into(),
    ///         position: WirePosition { x: 1.0, y: 2.0 },
    ///     }))
    ///     .unwrap();
    /// assert_eq!(presence.pump(), 1);
    /// assert_eq!(presence.mirrors().len(), 1);
    /// ```
    #[must_use]
    pub fn new(local_id: impl Into<String>) -> (Self, TransportLink) {
        let (inbox, link) = PresenceInbox::open();
        (
            Self {
                mirrors: MirrorSet::new(local_id),
                inbox,
            },
            link,
        )
    }

    /// Applies every queued inbound event and returns how many were applied.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        for event in self.inbox.drain() {
            self.mirrors.apply(event);
            applied += 1;
        }
        applied
    }

    /// Applies an event delivered on the tick thread itself.
    pub fn apply(&mut self, event: PresenceEvent) {
        self.mirrors.apply(event);
    }

    /// Publishes the local player's position.
    pub fn publish(&self, update: PositionUpdate) {
        if !self.inbox.send(update) {
            trace!("no transport listening for position updates");
        }
    }

    /// Current mirrors of remote participants.
    #[must_use]
    pub const fn mirrors(&self) -> &MirrorSet {
        &self.mirrors
    }

    /// Drops every mirror, as when leaving the room.
    pub fn leave(&mut self) {
        self.mirrors.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use rstest::rstest;

    fn remote(id: &str) -> RemotePlayer {
        RemotePlayer {
            id: id.to_owned(),
            name: id.to_owned(),
            position: WirePosition::default(),
        }
    }

    #[rstest]
    fn queued_events_only_apply_when_pumped() {
        let (mut presence, link) = PresenceSync::new("me");
        link.inbound
            .send(PresenceEvent::RoomState(vec![remote("a")]))
            .expect("open channel");
        assert!(presence.mirrors().is_empty());
        assert_eq!(presence.pump(), 1);
        assert_eq!(presence.mirrors().len(), 1);
        assert_eq!(presence.pump(), 0);
    }

    #[rstest]
    fn room_move_leave_sequence() {
        let (mut presence, _link) = PresenceSync::new("me");
        presence.apply(PresenceEvent::RoomState(vec![remote("a")]));
        presence.apply(PresenceEvent::PlayerMoved(PlayerMoved {
            id: "a".to_owned(),
            position: Some(WirePosition { x: 10.0, y: 20.0 }),
        }));
        assert_eq!(
            presence.mirrors().get("a").map(|m| m.position),
            Some(Vec2::new(10.0, 20.0))
        );
        presence.apply(PresenceEvent::PlayerLeft("a".to_owned()));
        assert!(presence.mirrors().get("a").is_none());
    }

    #[rstest]
    fn publishing_without_a_transport_is_harmless() {
        let (mut presence, link) = PresenceSync::new("me");
        drop(link);
        presence.publish(PositionUpdate { x: 1.0, y: 1.0 });
        assert_eq!(presence.pump(), 0);
        presence.leave();
        assert!(presence.mirrors().is_empty());
    }
}
