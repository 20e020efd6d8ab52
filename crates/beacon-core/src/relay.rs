//! Per-connection relay loop.
//!
//! ## Lifecycle
//!
//! One relay loop runs per accepted connection: join the resolved room,
//! relay each received payload to every other current member, leave on
//! disconnect. The three states are joining, relaying, and left; join cannot
//! fail, and every exit path out of relaying — end of stream, read error,
//! even cancellation of the loop's future — leaves exactly once.
//!
//! ## Ordering
//!
//! Within one broadcast pass no ordering is promised across peers. Payloads
//! from a single sender reach each peer in send order: the loop is
//! sequential and each peer has a single FIFO outbound queue.

use crate::peer::{PeerHandle, PeerId};
use crate::registry::RoomRegistry;
use crate::room::RoomName;
use crate::transport::Inbound;

/// Outcome of one broadcast pass.
///
/// `suppressed` counts peers whose send failed and was deliberately ignored;
/// suppression is this relay's delivery policy, not an accident, and tests
/// assert on it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Peers the payload was handed to.
    pub delivered: usize,
    /// Peers whose send failed and was skipped.
    pub suppressed: usize,
}

/// Relay one payload to every member of `room` other than `sender`.
///
/// Operates on a snapshot of the membership taken at call time: peers that
/// join mid-pass are not included, peers that leave mid-pass fail their send
/// and are suppressed. A failed send never aborts delivery to the remaining
/// peers. A pass over a room with no other members is a no-op.
pub fn broadcast<P: Clone>(
    registry: &RoomRegistry<P>,
    room: &RoomName,
    sender: PeerId,
    payload: &P,
) -> BroadcastReport {
    let mut report = BroadcastReport::default();
    for peer in registry.snapshot(room) {
        if peer.id() == sender {
            continue;
        }
        match peer.send(payload.clone()) {
            Ok(()) => report.delivered += 1,
            Err(err) => {
                tracing::debug!(room = %room, %err, "suppressed failed delivery");
                report.suppressed += 1;
            },
        }
    }
    report
}

/// Membership that revokes itself: leaving on drop covers every exit path
/// out of the relay loop, including cancellation.
struct Membership<'a, P> {
    registry: &'a RoomRegistry<P>,
    room: &'a RoomName,
    peer: PeerId,
}

impl<P> Drop for Membership<'_, P> {
    fn drop(&mut self) {
        self.registry.leave(self.room, self.peer);
    }
}

/// Run the relay loop for one connection until its inbound stream ends.
///
/// Joins `room`, relays every received payload to the room's other members,
/// and leaves when `inbound` reports the connection is done. The transport
/// layer owns the connection's teardown; this loop never closes anything.
pub async fn run_relay<P, S>(
    registry: &RoomRegistry<P>,
    room: &RoomName,
    peer: PeerHandle<P>,
    mut inbound: S,
) where
    P: Clone + Send,
    S: Inbound<Payload = P>,
{
    let peer_id = peer.id();
    registry.join(room.clone(), peer);
    let _membership = Membership { registry, room, peer: peer_id };

    while let Some(payload) = inbound.next_message().await {
        let report = broadcast(registry, room, peer_id, &payload);
        tracing::trace!(
            peer = %peer_id,
            room = %room,
            delivered = report.delivered,
            suppressed = report.suppressed,
            "broadcast pass"
        );
    }
}
