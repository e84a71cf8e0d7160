//! Thread-safe hand-off between the transport and the tick loop.

use crossbeam::channel::{self, Receiver, Sender};
use log::warn;

use super::message::{PositionUpdate, PresenceEvent};

/// Transport side of a presence connection.
///
/// Both ends are cloneable channel handles, so the transport may deliver from
/// any thread.
#[derive(Debug, Clone)]
pub struct TransportLink {
    /// Events for the tick loop to apply.
    pub inbound: Sender<PresenceEvent>,
    /// Local position updates to forward to the room.
    pub outbound: Receiver<PositionUpdate>,
}

impl TransportLink {
    /// Decodes and queues a JSON payload.
    ///
    /// Malformed payloads are logged and dropped. Returns whether the event
    /// was queued.
    #[must_use]
    pub fn deliver_json(&self, payload: &str) -> bool {
        PresenceEvent::from_json(payload).map_or_else(
            |err| {
                warn!("dropping malformed presence payload: {err}");
                false
            },
            |event| self.inbound.send(event).is_ok(),
        )
    }
}

/// Simulation side of a presence connection.
#[derive(Debug)]
pub struct PresenceInbox {
    events: Receiver<PresenceEvent>,
    updates: Sender<PositionUpdate>,
}

impl PresenceInbox {
    /// Creates a connected inbox and transport link.
    #[must_use]
    pub fn open() -> (Self, TransportLink) {
        let (inbound, events) = channel::unbounded();
        let (updates, outbound) = channel::unbounded();
        (
            Self { events, updates },
            TransportLink { inbound, outbound },
        )
    }

    /// Takes every event queued so far, in arrival order.
    pub fn drain(&self) -> impl Iterator<Item = PresenceEvent> + '_ {
        self.events.try_iter()
    }

    /// Hands a position update to the transport.
    ///
    /// Returns `false` once the transport has gone away.
    #[must_use]
    pub fn send(&self, update: PositionUpdate) -> bool {
        self.updates.send(update).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn events_are_drained_in_arrival_order() {
        let (inbox, link) = PresenceInbox::open();
        link.inbound
            .send(PresenceEvent::PlayerLeft("a".to_owned()))
            .expect("open channel");
        assert!(link.deliver_json(r#"{"type":"playerLeft","data":"b"}"#));
        let drained: Vec<_> = inbox.drain().collect();
        assert_eq!(
            drained,
            vec![
                PresenceEvent::PlayerLeft("a".to_owned()),
                PresenceEvent::PlayerLeft("b".to_owned())
            ]
        );
        assert_eq!(inbox.drain().count(), 0);
    }

    #[rstest]
    fn malformed_payloads_are_dropped() {
        let (inbox, link) = PresenceInbox::open();
        assert!(!link.deliver_json("{"));
        assert_eq!(inbox.drain().count(), 0);
    }

    #[rstest]
    fn delivery_works_across_threads() {
        let (inbox, link) = PresenceInbox::open();
        let handle = std::thread::spawn(move || {
            for n in 0..10 {
                link.inbound
                    .send(PresenceEvent::PlayerLeft(n.to_string()))
                    .expect("open channel");
            }
        });
        handle.join().expect("sender thread");
        assert_eq!(inbox.drain().count(), 10);
    }

    #[rstest]
    fn updates_reach_the_transport_until_it_disconnects() {
        let (inbox, link) = PresenceInbox::open();
        assert!(inbox.send(PositionUpdate { x: 1.0, y: 2.0 }));
        assert_eq!(
            link.outbound.try_recv().ok(),
            Some(PositionUpdate { x: 1.0, y: 2.0 })
        );
        drop(link);
        assert!(!inbox.send(PositionUpdate { x: 0.0, y: 0.0 }));
    }
}
