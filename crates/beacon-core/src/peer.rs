//! Peer handles.
//!
//! A [`PeerHandle`] is the registry's view of one connection: a surrogate
//! identity plus the sending half of that connection's outbound queue. The
//! handle does not own the connection; dropping every handle only closes the
//! queue, never the transport.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::mpsc;

/// Surrogate identity for one connection.
///
/// Peer ids stand in for reference equality: two handles refer to the same
/// connection exactly when their ids are equal. Ids are never reused within a
/// process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PeerId(u64);

impl PeerId {
    /// Allocate the next peer id from the process-local counter.
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A payload could not be handed to a peer's outbound queue.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    /// The peer's outbound queue is gone: its writer task has exited, which
    /// means the connection is dead or dying.
    #[error("peer {0} is gone")]
    PeerGone(PeerId),
}

/// Handle to one connection's outbound half.
///
/// Sends enqueue without blocking; a slow peer delays only its own writer,
/// never a broadcast pass. The queue is unbounded, which the relay accepts
/// (limits, if any, belong to the surrounding layer).
pub struct PeerHandle<P> {
    id: PeerId,
    outbound: mpsc::UnboundedSender<P>,
}

impl<P> PeerHandle<P> {
    /// Create a handle around an existing outbound sender.
    pub fn new(id: PeerId, outbound: mpsc::UnboundedSender<P>) -> Self {
        Self { id, outbound }
    }

    /// Create a handle together with the receiving half of its queue.
    ///
    /// The caller (a transport writer task, or a test) drains the receiver.
    pub fn channel(id: PeerId) -> (Self, mpsc::UnboundedReceiver<P>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(id, tx), rx)
    }

    /// This connection's identity.
    pub fn id(&self) -> PeerId {
        self.id
    }

    /// Enqueue a payload for delivery to this peer.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError::PeerGone`] when the receiving half has been
    /// dropped.
    pub fn send(&self, payload: P) -> Result<(), DeliveryError> {
        self.outbound.send(payload).map_err(|_| DeliveryError::PeerGone(self.id))
    }
}

// Manual impl: cloning the sender never requires `P: Clone`.
impl<P> Clone for PeerHandle<P> {
    fn clone(&self) -> Self {
        Self { id: self.id, outbound: self.outbound.clone() }
    }
}

impl<P> fmt::Debug for PeerHandle<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PeerHandle").field("id", &self.id).finish()
    }
}
